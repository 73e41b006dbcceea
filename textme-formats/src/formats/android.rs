/*!
 This module converts between the intermediary message format and the XML
 backups Android messaging apps exchange
*/

use std::collections::HashSet;
use std::io::Write;

use quick_xml::{
    escape::escape,
    events::{attributes::Attribute, BytesEnd, BytesStart, Event},
    name::QName,
    Writer,
};
use roxmltree::Node;

use crate::{
    error::android::AndroidError,
    formats::{child, children},
    message::attachment::{Attachment, AttachmentBody},
    util::{addresses::normalize, dates},
    Message,
};

/// `type` code on `sms` and `msg_box` code on `mms` marking received messages
const RECEIVED: &str = "1";
/// `type` code on `sms` and `msg_box` code on `mms` marking sent messages
const SENT: &str = "2";
/// Role code of `addr` elements naming a recipient
const ADDR_TO: &str = "151";
/// Role code of `addr` elements naming the sender
const ADDR_FROM: &str = "137";
/// MIB enum value of the UTF-8 charset
const CHARSET_UTF_8: &str = "106";
/// `m_type` of a retrieve-conf (incoming) MMS PDU
const M_TYPE_RETRIEVE: &str = "132";
/// `m_type` of a send-req (outgoing) MMS PDU
const M_TYPE_SEND: &str = "128";

/// Converts the root element of an Android backup into a list of messages.
pub fn from_android(
    root: Node,
    normalize_addresses: bool,
) -> Result<Vec<Message>, AndroidError> {
    root.children()
        .filter(Node::is_element)
        .map(|elem| {
            let mut message = match elem.tag_name().name() {
                "sms" => from_sms(elem),
                "mms" => from_mms(elem),
                other => Err(AndroidError::UnknownElement(other.to_string())),
            }?;
            if normalize_addresses {
                message.normalize_addresses();
            }
            Ok(message)
        })
        .collect()
}

fn from_sms(sms: Node) -> Result<Message, AndroidError> {
    let (timestamp, timestamp_ns) = dates::from_millis(date_attr(sms)?);
    let address = attr(sms, "address")?;
    let sms_type = attr(sms, "type")?;

    Ok(Message {
        timestamp,
        timestamp_ns,
        sender: (sms_type == RECEIVED).then(|| address.to_string()),
        recipients: if sms_type == SENT {
            vec![address.to_string()]
        } else {
            Vec::new()
        },
        body: sms.attribute("body").map(str::to_string),
        is_read: sms.attribute("read") == Some("1"),
        attachments: Vec::new(),
    })
}

fn from_mms(mms: Node) -> Result<Message, AndroidError> {
    // Everyone in the conversation, excluding yourself; used to filter your
    // own address out of the recipient roles below
    let conversation: HashSet<String> =
        attr(mms, "address")?.split('~').map(normalize).collect();
    let incoming = mms.attribute("msg_box") == Some(RECEIVED);

    let mut sender = None;
    let mut recipients = Vec::new();
    if let Some(addrs) = child(mms, "addrs") {
        for addr in children(addrs, "addr") {
            let address = attr(addr, "address")?;
            match attr(addr, "type")? {
                // A from-role address is the sender only on received
                // messages; outgoing messages name the owner here
                ADDR_FROM => {
                    if incoming {
                        sender = Some(address.to_string());
                    }
                }
                ADDR_TO => {
                    if conversation.contains(&normalize(address)) {
                        recipients.push(address.to_string());
                    }
                }
                role => return Err(AndroidError::UnknownAddressRole(role.to_string())),
            }
        }
    }

    let mut attachments = Vec::new();
    if let Some(parts) = child(mms, "parts") {
        for part in children(parts, "part") {
            attachments.push(from_part(part)?);
        }
    }

    let (timestamp, timestamp_ns) = dates::from_millis(date_attr(mms)?);

    Ok(Message {
        timestamp,
        timestamp_ns,
        sender,
        recipients,
        body: None,
        is_read: mms.attribute("read") == Some("1"),
        attachments,
    })
}

fn from_part(part: Node) -> Result<Attachment, AndroidError> {
    let content_type = attr(part, "ct")?.to_string();

    // MMS text is stored inline in the `text` attribute; everything else is
    // base64 in the `data` attribute
    let body = match part.attribute("data") {
        Some(data) => AttachmentBody::Data {
            data_base64: data.to_string(),
        },
        None => AttachmentBody::Text {
            text: attr(part, "text")?.to_string(),
        },
    };

    Ok(Attachment { content_type, body })
}

fn attr<'a>(elem: Node<'a, '_>, name: &'static str) -> Result<&'a str, AndroidError> {
    elem.attribute(name)
        .ok_or(AndroidError::MissingAttribute(name))
}

/// Append an attribute, escaping the value by hand.
///
/// Besides the usual markup characters, newlines and tabs must become
/// character references: a re-parse folds the literal characters into spaces
/// under attribute-value normalization.
fn push_attr(elem: &mut BytesStart, name: &'static str, value: &str) {
    let escaped = escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;");

    elem.push_attribute(Attribute {
        key: QName(name.as_bytes()),
        value: escaped.into_bytes().into(),
    });
}

fn date_attr(elem: Node) -> Result<i64, AndroidError> {
    let date = attr(elem, "date")?;
    date.parse()
        .map_err(|_| AndroidError::InvalidTimestamp(date.to_string()))
}

/// Converts a list of messages into an Android backup, written as XML.
///
/// Android backups name an explicit address for every slot even when the
/// semantic value is "myself", so `you` must carry the backup owner's own
/// number.
pub fn to_android<W: Write>(
    writer: W,
    messages: &[Message],
    you: &str,
) -> Result<(), AndroidError> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    let mut root = BytesStart::new("smses");
    push_attr(&mut root, "count", &messages.len().to_string());
    writer.write_event(Event::Start(root))?;

    for message in messages {
        if message.is_mms() {
            write_mms(&mut writer, message, you)?;
        } else {
            write_sms(&mut writer, message)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("smses")))?;
    Ok(())
}

fn write_sms<W: Write>(writer: &mut Writer<W>, message: &Message) -> Result<(), AndroidError> {
    let address = message
        .sender
        .as_deref()
        .or_else(|| message.recipients.first().map(String::as_str))
        .ok_or(AndroidError::MissingAddress)?;

    let mut sms = BytesStart::new("sms");
    push_attr(
        &mut sms,
        "date",
        &dates::to_millis(message.timestamp, message.timestamp_ns).to_string(),
    );
    push_attr(&mut sms, "address", address);
    push_attr(
        &mut sms,
        "type",
        if message.sender.is_some() {
            RECEIVED
        } else {
            SENT
        },
    );
    push_attr(&mut sms, "body", message.body.as_deref().unwrap_or_default());
    push_attr(&mut sms, "read", if message.is_read { "1" } else { "0" });

    writer.write_event(Event::Empty(sms))?;
    Ok(())
}

fn write_mms<W: Write>(
    writer: &mut Writer<W>,
    message: &Message,
    you: &str,
) -> Result<(), AndroidError> {
    let incoming = message.sender.is_some();

    // The thread roster is sorted so equivalent messages encode identically
    let mut roster: Vec<&str> = message.recipients.iter().map(String::as_str).collect();
    if let Some(sender) = &message.sender {
        roster.push(sender);
    }
    roster.sort_unstable();

    let mut mms = BytesStart::new("mms");
    push_attr(&mut mms, "m_type", if incoming { M_TYPE_RETRIEVE } else { M_TYPE_SEND });
    push_attr(&mut mms, "msg_box", if incoming { RECEIVED } else { SENT });
    push_attr(
        &mut mms,
        "date",
        &dates::to_millis(message.timestamp, message.timestamp_ns).to_string(),
    );
    push_attr(&mut mms, "address", &roster.join("~"));
    push_attr(&mut mms, "read", if message.is_read { "1" } else { "0" });
    writer.write_event(Event::Start(mms))?;

    writer.write_event(Event::Start(BytesStart::new("parts")))?;
    for attachment in &message.attachments {
        let mut part = BytesStart::new("part");
        push_attr(&mut part, "chset", CHARSET_UTF_8);
        push_attr(&mut part, "ct", &attachment.content_type);
        match &attachment.body {
            AttachmentBody::Text { text } => push_attr(&mut part, "text", text),
            AttachmentBody::Data { data_base64 } => push_attr(&mut part, "data", data_base64),
        }
        writer.write_event(Event::Empty(part))?;
    }
    writer.write_event(Event::End(BytesEnd::new("parts")))?;

    writer.write_event(Event::Start(BytesStart::new("addrs")))?;
    match &message.sender {
        Some(sender) => {
            write_addr(writer, ADDR_FROM, sender)?;
            write_addr(writer, ADDR_TO, you)?;
        }
        None => write_addr(writer, ADDR_FROM, you)?,
    }
    for recipient in &message.recipients {
        write_addr(writer, ADDR_TO, recipient)?;
    }
    writer.write_event(Event::End(BytesEnd::new("addrs")))?;

    writer.write_event(Event::End(BytesEnd::new("mms")))?;
    Ok(())
}

fn write_addr<W: Write>(
    writer: &mut Writer<W>,
    role: &str,
    address: &str,
) -> Result<(), AndroidError> {
    let mut addr = BytesStart::new("addr");
    push_attr(&mut addr, "charset", CHARSET_UTF_8);
    push_attr(&mut addr, "address", address);
    push_attr(&mut addr, "type", role);
    writer.write_event(Event::Empty(addr))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::android::AndroidError;
    use crate::formats::android::{from_android, to_android};
    use crate::message::attachment::{Attachment, AttachmentBody};
    use crate::Message;

    fn decode(text: &str) -> Result<Vec<Message>, AndroidError> {
        let document = roxmltree::Document::parse(text).unwrap();
        from_android(document.root_element(), false)
    }

    fn encode(messages: &[Message], you: &str) -> String {
        let mut encoded = Vec::new();
        to_android(&mut encoded, messages, you).unwrap();
        String::from_utf8(encoded).unwrap()
    }

    fn outgoing_sms(recipient: &str) -> Message {
        Message {
            timestamp: 1640995200,
            timestamp_ns: 0,
            sender: None,
            recipients: vec![recipient.to_string()],
            body: Some(String::from("hi")),
            is_read: true,
            attachments: vec![],
        }
    }

    #[test]
    fn can_decode_incoming_sms() {
        let messages = decode(
            r#"<smses count="1">
                <sms date="1640995200123" address="5550002222" type="1" body="hey" read="1" />
            </smses>"#,
        )
        .unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].timestamp, 1640995200);
        assert_eq!(messages[0].timestamp_ns, 123_000_000);
        assert_eq!(messages[0].sender.as_deref(), Some("5550002222"));
        assert!(messages[0].recipients.is_empty());
        assert_eq!(messages[0].body.as_deref(), Some("hey"));
        assert!(messages[0].is_read);
        assert!(!messages[0].is_mms());
    }

    #[test]
    fn can_decode_outgoing_sms() {
        let messages = decode(
            r#"<smses count="1">
                <sms date="1640995200000" address="5550002222" type="2" body="hi" read="0" />
            </smses>"#,
        )
        .unwrap();

        assert_eq!(messages[0].sender, None);
        assert_eq!(messages[0].recipients, ["5550002222"]);
        assert!(!messages[0].is_read);
    }

    #[test]
    fn can_filter_own_address_from_recipients() {
        // The to-roles include the owner's number, formatted differently
        // than the thread roster spells it; only real participants survive
        let messages = decode(
            r#"<smses count="1">
                <mms m_type="132" msg_box="1" date="1641081600000" address="15550000001~15550000002" read="1">
                    <parts>
                        <part chset="106" ct="text/plain" text="group hello" />
                    </parts>
                    <addrs>
                        <addr charset="106" address="15550000001" type="137" />
                        <addr charset="106" address="+1 555-000-0002" type="151" />
                        <addr charset="106" address="15559999999" type="151" />
                    </addrs>
                </mms>
            </smses>"#,
        )
        .unwrap();

        assert_eq!(messages[0].sender.as_deref(), Some("15550000001"));
        assert_eq!(messages[0].recipients, ["+1 555-000-0002"]);
    }

    #[test]
    fn cant_attribute_sender_on_outgoing_mms() {
        // A from-role addr names the owner on sent messages; msg_box gates it
        let messages = decode(
            r#"<smses count="1">
                <mms m_type="128" msg_box="2" date="1641081600000" address="15550000002" read="1">
                    <parts>
                        <part chset="106" ct="text/plain" text="on my way" />
                    </parts>
                    <addrs>
                        <addr charset="106" address="15559999999" type="137" />
                        <addr charset="106" address="15550000002" type="151" />
                    </addrs>
                </mms>
            </smses>"#,
        )
        .unwrap();

        assert_eq!(messages[0].sender, None);
        assert_eq!(messages[0].recipients, ["15550000002"]);
    }

    #[test]
    fn cant_decode_unknown_address_role() {
        let result = decode(
            r#"<smses count="1">
                <mms m_type="132" msg_box="1" date="0" address="A" read="1">
                    <addrs>
                        <addr charset="106" address="A" type="129" />
                    </addrs>
                </mms>
            </smses>"#,
        );

        assert!(matches!(result, Err(AndroidError::UnknownAddressRole(role)) if role == "129"));
    }

    #[test]
    fn cant_decode_unknown_element() {
        let result = decode(r#"<smses count="1"><call date="0" /></smses>"#);
        assert!(matches!(result, Err(AndroidError::UnknownElement(tag)) if tag == "call"));
    }

    #[test]
    fn cant_decode_missing_date() {
        let result = decode(r#"<smses count="1"><sms address="1" type="1" body="" read="1" /></smses>"#);
        assert!(matches!(result, Err(AndroidError::MissingAttribute("date"))));
    }

    #[test]
    fn cant_decode_garbled_date() {
        let result =
            decode(r#"<smses count="1"><sms date="soon" address="1" type="1" body="" read="1" /></smses>"#);
        assert!(matches!(result, Err(AndroidError::InvalidTimestamp(why)) if why == "soon"));
    }

    #[test]
    fn can_count_children() {
        for total in [0, 1, 5] {
            let messages: Vec<Message> = (0..total)
                .map(|i| outgoing_sms(&format!("555000{i:04}")))
                .collect();

            let encoded = encode(&messages, "5550001111");
            let document = roxmltree::Document::parse(&encoded).unwrap();
            let root = document.root_element();

            assert_eq!(root.attribute("count"), Some(total.to_string().as_str()));
            assert_eq!(
                root.children().filter(roxmltree::Node::is_element).count(),
                total
            );
        }
    }

    #[test]
    fn can_sort_mms_roster() {
        let message = Message {
            timestamp: 1641081600,
            timestamp_ns: 0,
            sender: Some(String::from("5550000003")),
            recipients: vec![String::from("5550000009"), String::from("5550000001")],
            body: None,
            is_read: true,
            attachments: vec![Attachment {
                content_type: String::from("text/plain"),
                body: AttachmentBody::Text {
                    text: String::from("hello"),
                },
            }],
        };

        let encoded = encode(std::slice::from_ref(&message), "5550001111");
        let document = roxmltree::Document::parse(&encoded).unwrap();
        let mms = document
            .root_element()
            .children()
            .find(|n| n.has_tag_name("mms"))
            .unwrap();

        assert_eq!(
            mms.attribute("address"),
            Some("5550000001~5550000003~5550000009")
        );
        assert_eq!(mms.attribute("m_type"), Some("132"));
        assert_eq!(mms.attribute("msg_box"), Some("1"));

        // The addr list keeps the original recipient order, after the
        // sender/owner pair
        let addrs: Vec<_> = mms
            .children()
            .find(|n| n.has_tag_name("addrs"))
            .unwrap()
            .children()
            .filter(|n| n.has_tag_name("addr"))
            .map(|n| {
                (
                    n.attribute("type").unwrap().to_string(),
                    n.attribute("address").unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            addrs,
            [
                (String::from("137"), String::from("5550000003")),
                (String::from("151"), String::from("5550001111")),
                (String::from("151"), String::from("5550000009")),
                (String::from("151"), String::from("5550000001")),
            ]
        );
    }

    #[test]
    fn cant_encode_sms_without_address() {
        let mut message = outgoing_sms("5550002222");
        message.recipients.clear();

        let mut encoded = Vec::new();
        let result = to_android(&mut encoded, &[message], "5550001111");
        assert!(matches!(result, Err(AndroidError::MissingAddress)));
    }

    #[test]
    fn can_escape_body_text() {
        let mut message = outgoing_sms("5550002222");
        message.body = Some(String::from(r#"a < b & "c""#));

        let encoded = encode(&[message.clone()], "5550001111");
        assert_eq!(decode(&encoded).unwrap(), [message]);
    }

    #[test]
    fn can_escape_multiline_body() {
        // Literal whitespace in attributes folds into spaces on re-parse, so
        // the encoder must write character references instead
        let mut message = outgoing_sms("5550002222");
        message.body = Some(String::from("first line\nsecond\tline"));

        let encoded = encode(&[message.clone()], "5550001111");
        assert!(encoded.contains("&#10;"));
        assert_eq!(decode(&encoded).unwrap(), [message]);
    }
}
