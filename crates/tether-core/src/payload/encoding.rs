//! Payload encoding metadata.

use crate::handle::{Resource, self_loaned};

/// Well-known encoding prefixes.
///
/// The prefix covers the common cases; anything else rides in the
/// suffix of an [`Encoding`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EncodingPrefix {
    /// No declared encoding.
    #[default]
    Empty,
    /// Opaque bytes.
    AppOctetStream,
    /// JSON, application flavored.
    AppJson,
    /// A serialized integer.
    AppInteger,
    /// A serialized float.
    AppFloat,
    /// Plain UTF-8 text.
    TextPlain,
    /// JSON, text flavored.
    TextJson,
}

impl EncodingPrefix {
    /// Returns the MIME-style prefix string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::AppOctetStream => "application/octet-stream",
            Self::AppJson => "application/json",
            Self::AppInteger => "application/integer",
            Self::AppFloat => "application/float",
            Self::TextPlain => "text/plain",
            Self::TextJson => "text/json",
        }
    }
}

/// The declared encoding of a payload: a well-known prefix plus a free-form
/// suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Encoding {
    prefix: EncodingPrefix,
    suffix: String,
}

impl Encoding {
    /// An encoding with no suffix.
    pub fn new(prefix: EncodingPrefix) -> Self {
        Self {
            prefix,
            suffix: String::new(),
        }
    }

    /// Attaches a suffix, e.g. a charset or schema hint.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Returns the well-known prefix.
    pub fn prefix(&self) -> EncodingPrefix {
        self.prefix
    }

    /// Returns the suffix, empty if none was set.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Resource for Encoding {
    const KIND: &'static str = "encoding";
}

self_loaned!(Encoding);

impl From<EncodingPrefix> for Encoding {
    fn from(prefix: EncodingPrefix) -> Self {
        Self::new(prefix)
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix.as_str(), self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_concatenates_prefix_and_suffix() {
        let encoding = Encoding::new(EncodingPrefix::TextPlain).with_suffix(";charset=utf-8");
        assert_eq!(encoding.to_string(), "text/plain;charset=utf-8");
        assert_eq!(Encoding::default().to_string(), "");
    }
}
