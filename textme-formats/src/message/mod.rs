/*!
 This module represents the platform-neutral message records every conversion
 funnels through
*/

pub mod attachment;

use serde::{Deserialize, Serialize};

use crate::{message::attachment::Attachment, util::addresses::normalize};

/// Represents a single SMS/MMS message in an intermediary format.
///
/// A `sender` of `None` marks the message as outgoing from the backup owner;
/// any present value marks it as incoming from that address.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Message {
    /// Whole seconds since the Unix epoch, UTC
    pub timestamp: i64,
    /// Sub-second remainder in nanoseconds, in `[0, 999_999_999]`
    pub timestamp_ns: u32,
    /// Address the message came from; `None` when the backup owner sent it
    pub sender: Option<String>,
    /// Addressees for outgoing messages; for incoming MMS, every other
    /// participant in the thread besides the owner and the sender
    pub recipients: Vec<String>,
    /// Plain text body; always `None` for MMS, whose text lives in
    /// `attachments` as `text/plain` parts
    pub body: Option<String>,
    /// Read/unread flag
    pub is_read: bool,
    /// Attachments; an empty list marks the message as plain SMS
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// An MMS-class message is exactly one that carries attachments
    pub fn is_mms(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Simplify the sender and recipient phone numbers in place.
    ///
    /// Only called when the explicit normalization mode is requested; the
    /// participant-set comparison during decoding normalizes on the fly
    /// without mutating anything.
    pub fn normalize_addresses(&mut self) {
        if let Some(sender) = &self.sender {
            self.sender = Some(normalize(sender));
        }
        for recipient in &mut self.recipients {
            *recipient = normalize(recipient);
        }
    }
}
