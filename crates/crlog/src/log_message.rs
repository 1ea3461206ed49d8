use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::DecodeError, message_id::MessageId, scanner::Scanner, source_info::SourceInfo};

/// One record: who logged it, what kind of event it is, and an optional payload.
///
/// `Display` produces the stored line, `parse`/`FromStr` reverse it. An empty payload is written
/// the same way as no payload, so it decodes as `None`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LogMessage {
    source: SourceInfo,
    message_id: MessageId,
    data: Option<String>,
}

impl LogMessage {
    pub fn new(source: SourceInfo, message_id: MessageId) -> Self {
        Self {
            source,
            message_id,
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn from_parts(source: SourceInfo, message_id: MessageId, data: Option<String>) -> Self {
        Self {
            source,
            message_id,
            data,
        }
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// True when `parse(self.to_string())` gives back `self`.
    ///
    /// The format has no escaping: a `"` in the type name or a line break in the payload
    /// corrupts the record, and `Some("")` comes back as `None`.
    pub fn is_lossless(&self) -> bool {
        self.source.is_lossless()
            && match self.data.as_deref() {
                None => true,
                Some(data) => !data.is_empty() && !data.contains(['\n', '\r']),
            }
    }

    /// Decodes one stored line. Any grammar violation or unknown ordinal yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut scanner = Scanner::new(line);
        let source = SourceInfo::scan(&mut scanner).ok()?;
        scanner.expect(' ').ok()?;
        let message_id = MessageId::from_ordinal(scanner.read_u16().ok()?)?;
        let data = match scanner.read() {
            "" => None,
            rest => Some(rest.strip_prefix(' ')?).filter(|data| !data.is_empty()),
        };
        Some(Self::from_parts(source, message_id, data.map(str::to_string)))
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.message_id.ordinal())?;
        match self.data.as_deref() {
            Some(data) if !data.is_empty() => write!(f, " {data}"),
            _ => Ok(()),
        }
    }
}

impl FromStr for LogMessage {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(DecodeError)
    }
}

impl From<LogMessage> for String {
    fn from(message: LogMessage) -> Self {
        message.to_string()
    }
}

impl TryFrom<String> for LogMessage {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Joins a payload with supplementary context as `"<data> - <info>"`.
///
/// Info without a payload is dropped.
pub fn merge_payload(data: Option<&str>, info: Option<&str>) -> Option<String> {
    match (data, info) {
        (Some(data), Some(info)) => Some(format!("{data} - {info}")),
        (data, _) => data.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> SourceInfo {
        SourceInfo::new(0, "Worker")
    }

    #[test]
    fn encodes_without_payload() {
        let message = LogMessage::new(worker(), MessageId::Info);
        assert_eq!(message.to_string(), "0 \"Worker\" 2");
        assert_eq!(LogMessage::parse("0 \"Worker\" 2"), Some(message));
    }

    #[test]
    fn encodes_payload_after_ordinal() {
        let message = LogMessage::new(SourceInfo::new(4402, "UserSession"), MessageId::Error)
            .with_data("connection reset");
        assert_eq!(
            message.to_string(),
            "4402 \"UserSession\" 4 connection reset"
        );
        assert_eq!(LogMessage::parse(&message.to_string()), Some(message));
    }

    #[test]
    fn empty_payload_collapses_to_none() {
        let empty = LogMessage::new(worker(), MessageId::Debug).with_data("");
        let absent = LogMessage::new(worker(), MessageId::Debug);
        assert_eq!(empty.to_string(), absent.to_string());
        assert_eq!(LogMessage::parse(&empty.to_string()).unwrap().data(), None);
        assert!(!empty.is_lossless());
    }

    #[test]
    fn trailing_separator_without_payload_decodes_as_none() {
        let message = LogMessage::parse("0 \"Worker\" 3 ").unwrap();
        assert_eq!(message.message_id(), MessageId::Warning);
        assert_eq!(message.data(), None);
    }

    #[test]
    fn payload_keeps_inner_whitespace() {
        let message = LogMessage::parse("1 \"T\" 0  two  spaces ").unwrap();
        assert_eq!(message.data(), Some(" two  spaces "));
    }

    #[test]
    fn unknown_ordinal_fails_whole_record() {
        assert_eq!(LogMessage::parse("0 \"X\" 99"), None);
        assert_eq!("0 \"X\" 8".parse::<LogMessage>(), Err(DecodeError));
    }

    #[test]
    fn malformed_lines_fail() {
        for line in [
            "",
            "0 \"X\"",
            "0 \"X\" ",
            "0 \"X\"2",
            "0 \"X\" 2x",
            "0 \"X\" -2",
            "0 \"X\" 70000",
            "zero \"X\" 2",
        ] {
            assert_eq!(LogMessage::parse(line), None, "{line:?}");
        }
    }

    #[test]
    fn quote_in_type_does_not_round_trip() {
        let message = LogMessage::new(SourceInfo::new(0, "Wor\"ker"), MessageId::Info);
        assert!(!message.is_lossless());
        assert_ne!(LogMessage::parse(&message.to_string()), Some(message));
    }

    #[test]
    fn line_break_in_type_is_lossy() {
        let message = LogMessage::new(SourceInfo::new(0, "A\nB"), MessageId::Info);
        assert!(!message.is_lossless());
        assert_eq!(message.to_string().lines().count(), 2);
    }

    #[test]
    fn merge_payload_joins_data_and_info() {
        assert_eq!(
            merge_payload(Some("boom"), Some("while saving")),
            Some("boom - while saving".to_string())
        );
        assert_eq!(merge_payload(Some("boom"), None), Some("boom".to_string()));
        assert_eq!(merge_payload(None, Some("ignored")), None);
    }

    #[test]
    fn serde_uses_wire_form() {
        let message = LogMessage::new(worker(), MessageId::Trace).with_data("tick");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#""0 \"Worker\" 0 tick""#);
        assert_eq!(serde_json::from_str::<LogMessage>(&json).unwrap(), message);
    }
}
