/*!
 Errors that can happen when decoding or encoding Android backups
*/

use std::fmt::{Display, Formatter, Result};

/// Errors that can happen when decoding or encoding Android backups
#[derive(Debug)]
pub enum AndroidError {
    UnknownElement(String),
    UnknownAddressRole(String),
    MissingAttribute(&'static str),
    InvalidTimestamp(String),
    MissingAddress,
    Write(quick_xml::Error),
}

impl Display for AndroidError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            AndroidError::UnknownElement(tag) => write!(fmt, "Unrecognized element: {tag}"),
            AndroidError::UnknownAddressRole(role) => {
                write!(fmt, "Unrecognized address role: {role}")
            }
            AndroidError::MissingAttribute(attr) => write!(fmt, "Missing attribute: {attr}"),
            AndroidError::InvalidTimestamp(why) => write!(fmt, "Invalid timestamp: {why}"),
            AndroidError::MissingAddress => write!(fmt, "Message has no sender or recipients!"),
            AndroidError::Write(why) => write!(fmt, "Failed to write backup: {why}"),
        }
    }
}

impl From<quick_xml::Error> for AndroidError {
    fn from(err: quick_xml::Error) -> Self {
        AndroidError::Write(err)
    }
}
