pub mod error;
pub mod formats;
pub mod message;
pub mod util;

pub use {
    message::{
        attachment::{Attachment, AttachmentBody},
        Message,
    },
    util::platform::Platform,
};
