/*!
 This module converts between the intermediary message format and the XML
 backups the Windows 10 Mobile contacts+message backup app exchanges
*/

use std::io::Write;

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use roxmltree::Node;

use crate::{
    error::win10::Win10Error,
    formats::{child, children},
    message::attachment::Attachment,
    util::dates,
    Message,
};

/// Converts the root element of a Windows 10 Mobile backup into a list of
/// messages.
pub fn from_win10(root: Node, normalize_addresses: bool) -> Result<Vec<Message>, Win10Error> {
    children(root, "Message")
        .map(|elem| {
            let mut message = from_message(elem)?;
            if normalize_addresses {
                message.normalize_addresses();
            }
            Ok(message)
        })
        .collect()
}

fn from_message(msg: Node) -> Result<Message, Win10Error> {
    let raw_timestamp = text(msg, "LocalTimestamp")?.unwrap_or_default();
    let ticks: i64 = raw_timestamp
        .parse()
        .map_err(|_| Win10Error::InvalidTimestamp(raw_timestamp.to_string()))?;
    let (timestamp, timestamp_ns) = dates::from_ticks(ticks);

    // The misspelling is part of the wire format
    let recipients = match child(msg, "Recepients") {
        Some(recipients) => children(recipients, "string")
            .map(|string| string.text().unwrap_or_default().to_string())
            .collect(),
        None => Vec::new(),
    };

    let mut attachments = Vec::new();
    if let Some(container) = child(msg, "Attachments") {
        for attachment in children(container, "MessageAttachment") {
            attachments.push(from_attachment(attachment)?);
        }
    }

    Ok(Message {
        timestamp,
        timestamp_ns,
        sender: text(msg, "Sender")?.map(str::to_string),
        recipients,
        body: text(msg, "Body")?.map(str::to_string),
        is_read: text(msg, "IsRead")? == Some("true"),
        attachments,
    })
}

fn from_attachment(node: Node) -> Result<Attachment, Win10Error> {
    let content_type = text(node, "AttachmentContentType")?
        .unwrap_or_default()
        .to_string();
    let data_base64 = text(node, "AttachmentDataBase64String")?
        .unwrap_or_default()
        .to_string();

    Attachment::from_win10_payload(content_type, data_base64)
}

/// Text content of a child element the decoder needs. The element itself is
/// required; an empty element reads as `None`.
fn text<'a>(msg: Node<'a, '_>, tag: &'static str) -> Result<Option<&'a str>, Win10Error> {
    Ok(child(msg, tag)
        .ok_or(Win10Error::MissingElement(tag))?
        .text())
}

/// Converts a list of messages into a Windows 10 Mobile backup, written as
/// XML.
///
/// Consuming software reads these children by position, so the element order
/// written here must not change.
pub fn to_win10<W: Write>(writer: W, messages: &[Message]) -> Result<(), Win10Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Start(BytesStart::new("ArrayOfMessage")))?;
    for message in messages {
        write_message(&mut writer, message)?;
    }
    writer.write_event(Event::End(BytesEnd::new("ArrayOfMessage")))?;
    Ok(())
}

fn write_message<W: Write>(writer: &mut Writer<W>, message: &Message) -> Result<(), Win10Error> {
    writer.write_event(Event::Start(BytesStart::new("Message")))?;

    writer.write_event(Event::Start(BytesStart::new("Recepients")))?;
    for recipient in &message.recipients {
        write_text_element(writer, "string", recipient)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Recepients")))?;

    write_text_element(writer, "Body", message.body.as_deref().unwrap_or_default())?;
    write_text_element(writer, "IsIncoming", bool_text(message.sender.is_some()))?;
    write_text_element(writer, "IsRead", bool_text(message.is_read))?;

    writer.write_event(Event::Start(BytesStart::new("Attachments")))?;
    for attachment in &message.attachments {
        writer.write_event(Event::Start(BytesStart::new("MessageAttachment")))?;
        write_text_element(writer, "AttachmentContentType", &attachment.content_type)?;
        write_text_element(
            writer,
            "AttachmentDataBase64String",
            &attachment.to_win10_payload(),
        )?;
        writer.write_event(Event::End(BytesEnd::new("MessageAttachment")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Attachments")))?;

    write_text_element(
        writer,
        "LocalTimestamp",
        &dates::to_ticks(message.timestamp, message.timestamp_ns).to_string(),
    )?;
    write_text_element(writer, "Sender", message.sender.as_deref().unwrap_or_default())?;

    writer.write_event(Event::End(BytesEnd::new("Message")))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), Win10Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
