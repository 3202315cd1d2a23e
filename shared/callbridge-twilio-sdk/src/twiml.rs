//! TwiML generation

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

use crate::{Result, TwilioError};

/// `<Stream>` noun inside `<Connect>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    pub url: String,
}

impl Stream {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// TwiML verbs this bridge emits
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verb {
    Say(String),
    /// Bidirectional media stream to a websocket
    Connect(Stream),
}

/// `<Response>` document, verbs executed in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn connect_stream(mut self, stream: Stream) -> Self {
        self.verbs.push(Verb::Connect(stream));
        self
    }

    /// Serialize to an XML document with declaration
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(&mut writer, Event::Start(BytesStart::new("Response")))?;

        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => {
                    write(&mut writer, Event::Start(BytesStart::new("Say")))?;
                    write(&mut writer, Event::Text(BytesText::new(text)))?;
                    write(&mut writer, Event::End(BytesEnd::new("Say")))?;
                }
                Verb::Connect(stream) => {
                    write(&mut writer, Event::Start(BytesStart::new("Connect")))?;
                    let mut elem = BytesStart::new("Stream");
                    elem.push_attribute(("url", stream.url.as_str()));
                    write(&mut writer, Event::Empty(elem))?;
                    write(&mut writer, Event::End(BytesEnd::new("Connect")))?;
                }
            }
        }

        write(&mut writer, Event::End(BytesEnd::new("Response")))?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| TwilioError::Twiml(e.to_string()))
    }
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| TwilioError::Twiml(e.to_string()))
}
