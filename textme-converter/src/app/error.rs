/*!
Errors that can happen during the application's runtime
*/

use std::fmt::{Display, Formatter, Result};
use std::io;

use textme_formats::error::{android::AndroidError, win10::Win10Error};

/// Errors that can happen during the application's runtime
#[derive(Debug)]
pub enum RuntimeError {
    InvalidOptions(String),
    CannotRead(io::Error),
    InvalidXml(roxmltree::Error),
    InvalidJson(serde_json::Error),
    Android(AndroidError),
    Win10(Win10Error),
}

impl Display for RuntimeError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            RuntimeError::InvalidOptions(why) => write!(fmt, "Invalid options: {why}"),
            RuntimeError::CannotRead(why) => write!(fmt, "Unable to read source: {why}"),
            RuntimeError::InvalidXml(why) => write!(fmt, "Failed to parse source: {why}"),
            RuntimeError::InvalidJson(why) => write!(fmt, "Failed to parse source: {why}"),
            RuntimeError::Android(why) => write!(fmt, "{why}"),
            RuntimeError::Win10(why) => write!(fmt, "{why}"),
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        RuntimeError::CannotRead(err)
    }
}

impl From<roxmltree::Error> for RuntimeError {
    fn from(err: roxmltree::Error) -> Self {
        RuntimeError::InvalidXml(err)
    }
}

impl From<serde_json::Error> for RuntimeError {
    fn from(err: serde_json::Error) -> Self {
        RuntimeError::InvalidJson(err)
    }
}

impl From<AndroidError> for RuntimeError {
    fn from(err: AndroidError) -> Self {
        RuntimeError::Android(err)
    }
}

impl From<Win10Error> for RuntimeError {
    fn from(err: Win10Error) -> Self {
        RuntimeError::Win10(err)
    }
}
