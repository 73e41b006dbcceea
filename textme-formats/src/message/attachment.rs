/*!
 This module represents MMS attachments and the payload transforms each
 platform needs
*/

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::win10::Win10Error;

/// Content types whose Windows 10 payloads hold UTF-16LE text under the
/// base64 encoding instead of opaque binary data. This list is fixed by the
/// platform and must never be inferred from content.
const TEXT_CONTENT_TYPES: [&str; 2] = ["text/plain", "application/smil"];

/// Represents a single MMS attachment in an intermediary format.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Attachment {
    /// MIME type of the payload, e.g. `image/jpeg`
    pub content_type: String,
    /// The payload itself
    #[serde(flatten)]
    pub body: AttachmentBody,
}

/// The payload representations an attachment can carry.
///
/// Exactly one is active at a time; which one depends on the content type.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttachmentBody {
    /// Decoded textual payload
    Text { text: String },
    /// Opaque binary payload in its base64 text encoding
    Data { data_base64: String },
}

impl Attachment {
    /// Build an attachment from the base64 string a Windows 10 backup
    /// stores, reversing the UTF-16LE double encoding of text content types
    pub fn from_win10_payload(
        content_type: String,
        data_base64: String,
    ) -> Result<Self, Win10Error> {
        let body = if TEXT_CONTENT_TYPES.contains(&content_type.as_str()) {
            let bytes = BASE64.decode(&data_base64)?;
            AttachmentBody::Text {
                text: decode_utf16_le(&bytes)?,
            }
        } else {
            AttachmentBody::Data { data_base64 }
        };

        Ok(Attachment { content_type, body })
    }

    /// Render the payload as the base64 string a Windows 10 backup stores,
    /// re-encoding text payloads as UTF-16LE first
    pub fn to_win10_payload(&self) -> String {
        match &self.body {
            AttachmentBody::Text { text } => BASE64.encode(encode_utf16_le(text)),
            AttachmentBody::Data { data_base64 } => data_base64.clone(),
        }
    }
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String, Win10Error> {
    if bytes.len() % 2 != 0 {
        return Err(Win10Error::InvalidUtf16);
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&code_units).map_err(|_| Win10Error::InvalidUtf16)
}

fn encode_utf16_le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
    use crate::error::win10::Win10Error;
    use crate::message::attachment::{Attachment, AttachmentBody};

    #[test]
    fn can_decode_text_payload() {
        let attachment = Attachment::from_win10_payload(
            String::from("text/plain"),
            String::from("aABlAGwAbABvAA=="),
        )
        .unwrap();

        assert_eq!(
            attachment.body,
            AttachmentBody::Text {
                text: String::from("hello")
            }
        );
    }

    #[test]
    fn can_roundtrip_text_payload() {
        let attachment = Attachment {
            content_type: String::from("text/plain"),
            body: AttachmentBody::Text {
                text: String::from("hello"),
            },
        };

        let payload = attachment.to_win10_payload();
        assert_eq!(payload, "aABlAGwAbABvAA==");

        let decoded =
            Attachment::from_win10_payload(String::from("text/plain"), payload).unwrap();
        assert_eq!(decoded, attachment);
    }

    #[test]
    fn can_transform_smil_payload() {
        let attachment = Attachment {
            content_type: String::from("application/smil"),
            body: AttachmentBody::Text {
                text: String::from("<smil/>"),
            },
        };

        let decoded = Attachment::from_win10_payload(
            String::from("application/smil"),
            attachment.to_win10_payload(),
        )
        .unwrap();
        assert_eq!(decoded, attachment);
    }

    #[test]
    fn can_passthrough_binary_payload() {
        let attachment = Attachment::from_win10_payload(
            String::from("image/jpeg"),
            String::from("Zm9v"),
        )
        .unwrap();

        assert_eq!(
            attachment.body,
            AttachmentBody::Data {
                data_base64: String::from("Zm9v")
            }
        );
        assert_eq!(attachment.to_win10_payload(), "Zm9v");
    }

    #[test]
    fn cant_decode_odd_length_text() {
        // "Zm9v" decodes to 3 bytes, which cannot be UTF-16 code units
        let result =
            Attachment::from_win10_payload(String::from("text/plain"), String::from("Zm9v"));
        assert!(matches!(result, Err(Win10Error::InvalidUtf16)));
    }

    #[test]
    fn cant_decode_invalid_base64_text() {
        let result =
            Attachment::from_win10_payload(String::from("text/plain"), String::from("!!!"));
        assert!(matches!(result, Err(Win10Error::InvalidBase64(_))));
    }
}
