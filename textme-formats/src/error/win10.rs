/*!
 Errors that can happen when decoding or encoding Windows 10 Mobile backups
*/

use std::fmt::{Display, Formatter, Result};

use base64::DecodeError;

/// Errors that can happen when decoding or encoding Windows 10 Mobile backups
#[derive(Debug)]
pub enum Win10Error {
    MissingElement(&'static str),
    InvalidTimestamp(String),
    InvalidBase64(DecodeError),
    InvalidUtf16,
    Write(quick_xml::Error),
}

impl Display for Win10Error {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            Win10Error::MissingElement(tag) => write!(fmt, "Missing element: {tag}"),
            Win10Error::InvalidTimestamp(why) => write!(fmt, "Invalid timestamp: {why}"),
            Win10Error::InvalidBase64(why) => {
                write!(fmt, "Failed to decode attachment payload: {why}")
            }
            Win10Error::InvalidUtf16 => write!(fmt, "Text attachment is not valid UTF-16!"),
            Win10Error::Write(why) => write!(fmt, "Failed to write backup: {why}"),
        }
    }
}

impl From<DecodeError> for Win10Error {
    fn from(err: DecodeError) -> Self {
        Win10Error::InvalidBase64(err)
    }
}

impl From<quick_xml::Error> for Win10Error {
    fn from(err: quick_xml::Error) -> Self {
        Win10Error::Write(err)
    }
}
