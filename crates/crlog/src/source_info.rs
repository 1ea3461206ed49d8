use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{DecodeError, ScanError},
    scanner::Scanner,
};

/// Logical origin of a record.
///
/// `instance_id` correlates records from the same object; `0` means the event was not tied to
/// an instance. The value is opaque to this crate: callers derive it however they like.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SourceInfo {
    instance_id: i64,
    type_name: String,
}

impl SourceInfo {
    /// Longest type name accepted when decoding.
    pub const MAX_TYPE_CHARS: usize = 255;

    pub fn new(instance_id: i64, type_name: impl Into<String>) -> Self {
        Self {
            instance_id,
            type_name: type_name.into(),
        }
    }

    /// Non-instance source named after the last component of `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let type_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => path.to_string_lossy().into_owned(),
        };
        Self::new(0, type_name)
    }

    pub fn instance_id(&self) -> i64 {
        self.instance_id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_instance(&self) -> bool {
        self.instance_id != 0
    }

    /// True when encoding then decoding yields an equal value: the type name must not contain
    /// `"` or a line break and must fit [`Self::MAX_TYPE_CHARS`].
    pub fn is_lossless(&self) -> bool {
        !self.type_name.contains(['"', '\n', '\r'])
            && self.type_name.chars().count() <= Self::MAX_TYPE_CHARS
    }

    /// Decodes the `<instance_id> "<type>"` prefix of `text`; anything after the closing quote
    /// is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        Self::scan(&mut Scanner::new(text)).ok()
    }

    pub(crate) fn scan(scanner: &mut Scanner<'_>) -> Result<Self, ScanError> {
        let instance_id = scanner.read_i64()?;
        scanner.expect(' ')?;
        scanner.expect('"')?;
        let type_name = scanner.read_until_match('"', Self::MAX_TYPE_CHARS)?;
        Ok(Self::new(instance_id, type_name))
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.instance_id, self.type_name)
    }
}

impl FromStr for SourceInfo {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(DecodeError)
    }
}

impl From<SourceInfo> for String {
    fn from(source: SourceInfo) -> Self {
        source.to_string()
    }
}

impl TryFrom<String> for SourceInfo {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
