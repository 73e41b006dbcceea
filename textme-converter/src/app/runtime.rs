/*!
 This module contains the runtime that reads sources, merges them, and writes
 the converted output
*/

use std::{
    fs,
    io::{stdin, stdout, BufWriter, Read, Write},
};

use serde::Serialize;

use textme_formats::{
    formats::{android, win10},
    util::dates,
    Message, Platform,
};

use crate::app::{error::RuntimeError, options::Options, progress::build_progress_bar_decode};

/// Stores the application state and handles the application lifecycle
pub struct State {
    /// App configuration options
    pub options: Options,
}

impl State {
    pub fn new(options: Options) -> Self {
        State { options }
    }

    /// Run the conversion the options describe
    pub fn run(&self) -> Result<(), RuntimeError> {
        let mut messages = self.read_sources()?;

        // Sort messages from oldest to newest, if requested
        if self.options.sort {
            messages.sort_by_key(|message| (message.timestamp, message.timestamp_ns));
        }

        if self.options.diagnostic {
            self.run_diagnostic(&messages);
            return Ok(());
        }

        match &self.options.output {
            Some(path) => {
                let file = fs::File::create(path)?;
                self.write_messages(&messages, BufWriter::new(file))
            }
            None => self.write_messages(&messages, stdout().lock()),
        }
    }

    /// Decode every input source into one combined list, in input order
    fn read_sources(&self) -> Result<Vec<Message>, RuntimeError> {
        if self.options.inputs.is_empty() {
            let mut text = String::new();
            stdin().read_to_string(&mut text)?;
            return self.decode_source(&text);
        }

        let mut messages = Vec::new();
        let pb = build_progress_bar_decode(self.options.inputs.len() as u64);
        for path in &self.options.inputs {
            let text = fs::read_to_string(path)?;
            messages.append(&mut self.decode_source(&text)?);
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(messages)
    }

    /// Decode one source document according to the source format
    fn decode_source(&self, text: &str) -> Result<Vec<Message>, RuntimeError> {
        match self.options.source_format {
            Some(platform) => {
                let document = roxmltree::Document::parse(text)?;
                let root = document.root_element();
                let messages = match platform {
                    Platform::Android => android::from_android(root, self.options.normalize)?,
                    Platform::Win10 => win10::from_win10(root, self.options.normalize)?,
                };
                Ok(messages)
            }
            None => {
                let mut messages: Vec<Message> = serde_json::from_str(text)?;
                if self.options.normalize {
                    for message in &mut messages {
                        message.normalize_addresses();
                    }
                }
                Ok(messages)
            }
        }
    }

    /// Encode the merged messages into the destination format, or dump the
    /// neutral form when no destination was named
    fn write_messages<W: Write>(
        &self,
        messages: &[Message],
        mut writer: W,
    ) -> Result<(), RuntimeError> {
        match self.options.dest_format {
            Some(Platform::Android) => {
                // Checked against the options already, so always present here
                let you = self.options.phone.as_deref().ok_or_else(|| {
                    RuntimeError::InvalidOptions(String::from("missing `--phone`"))
                })?;
                android::to_android(&mut writer, messages, you)?;
            }
            Some(Platform::Win10) => win10::to_win10(&mut writer, messages)?,
            None => {
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
                let mut serializer =
                    serde_json::Serializer::with_formatter(&mut writer, formatter);
                messages.serialize(&mut serializer)?;
            }
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Print a summary of the merged sources to stdout
    fn run_diagnostic(&self, messages: &[Message]) {
        let sms = messages.iter().filter(|message| !message.is_mms()).count();
        let mms = messages.len() - sms;
        let unread = messages.iter().filter(|message| !message.is_read).count();
        let attachments: usize = messages
            .iter()
            .map(|message| message.attachments.len())
            .sum();

        println!("Messages: {}", messages.len());
        println!("  SMS: {sms}");
        println!("  MMS: {mms} ({attachments} attachments)");
        println!("  Unread: {unread}");

        let first = messages.iter().map(|message| message.timestamp).min();
        let last = messages.iter().map(|message| message.timestamp).max();
        if let (Some(first), Some(last)) = (first, last) {
            println!("Range: {} to {}", dates::format(first), dates::format(last));
        }
    }
}
