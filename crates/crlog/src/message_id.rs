use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMessageId;

/// Kind of event a record describes.
///
/// Records store the ordinal, never the name, so the discriminants below are part of the
/// on-disk format and must not change.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum MessageId {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
    InstanceInit = 6,
    InstanceDeinit = 7,
}

impl MessageId {
    pub const ALL: [MessageId; 8] = [
        MessageId::Trace,
        MessageId::Debug,
        MessageId::Info,
        MessageId::Warning,
        MessageId::Error,
        MessageId::Fatal,
        MessageId::InstanceInit,
        MessageId::InstanceDeinit,
    ];

    pub const fn ordinal(self) -> u16 {
        self as u16
    }

    pub const fn from_ordinal(ordinal: u16) -> Option<Self> {
        match ordinal {
            0 => Some(MessageId::Trace),
            1 => Some(MessageId::Debug),
            2 => Some(MessageId::Info),
            3 => Some(MessageId::Warning),
            4 => Some(MessageId::Error),
            5 => Some(MessageId::Fatal),
            6 => Some(MessageId::InstanceInit),
            7 => Some(MessageId::InstanceDeinit),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            MessageId::Trace => "trace",
            MessageId::Debug => "debug",
            MessageId::Info => "info",
            MessageId::Warning => "warning",
            MessageId::Error => "error",
            MessageId::Fatal => "fatal",
            MessageId::InstanceInit => "instanceInit",
            MessageId::InstanceDeinit => "instanceDeinit",
        }
    }

    /// True for the instance lifecycle markers rather than a severity.
    pub const fn is_lifecycle(self) -> bool {
        matches!(self, MessageId::InstanceInit | MessageId::InstanceDeinit)
    }
}

impl From<MessageId> for u16 {
    fn from(id: MessageId) -> Self {
        id.ordinal()
    }
}

impl TryFrom<u16> for MessageId {
    type Error = UnknownMessageId;

    fn try_from(ordinal: u16) -> Result<Self, UnknownMessageId> {
        MessageId::from_ordinal(ordinal).ok_or(UnknownMessageId(ordinal))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
