//! Data samples: the unit of publication.

use crate::handle::{Resource, self_loaned};
use crate::keyexpr::KeyExpr;
use crate::payload::{Bytes, Encoding, SliceMap, Timestamp};

/// Whether a sample asserts or retracts a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// The sample carries a new value for its key.
    #[default]
    Put,
    /// The sample retracts the value previously published on its key.
    Delete,
}

/// A single publication: a key, a payload and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    key_expr: KeyExpr,
    payload: Bytes,
    encoding: Encoding,
    kind: SampleKind,
    timestamp: Option<Timestamp>,
    attachment: Option<SliceMap>,
}

impl Sample {
    /// Builds a `Put` sample.
    pub fn put(key_expr: KeyExpr, payload: impl Into<Bytes>) -> Self {
        Self {
            key_expr,
            payload: payload.into(),
            encoding: Encoding::default(),
            kind: SampleKind::Put,
            timestamp: None,
            attachment: None,
        }
    }

    /// Builds a `Delete` sample; the payload is empty.
    pub fn delete(key_expr: KeyExpr) -> Self {
        Self {
            key_expr,
            payload: Bytes::new(),
            encoding: Encoding::default(),
            kind: SampleKind::Delete,
            timestamp: None,
            attachment: None,
        }
    }

    /// Sets the payload encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attaches a key-value map.
    pub fn with_attachment(mut self, attachment: SliceMap) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Returns the key this sample was published on.
    pub fn key_expr(&self) -> &KeyExpr {
        &self.key_expr
    }

    /// Returns the payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Returns the payload encoding.
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Returns whether this is a put or a delete.
    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Returns the timestamp, if the engine stamped one.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    /// Returns the attachment, if any.
    pub fn attachment(&self) -> Option<&SliceMap> {
        self.attachment.as_ref()
    }
}

impl Resource for Sample {
    const KIND: &'static str = "sample";
}

self_loaned!(Sample);
