//! Queries and replies.

use std::sync::Arc;

use crate::engine::RawReplier;
use crate::error::{EngineError, EngineResult};
use crate::handle::{Resource, self_loaned};
use crate::keyexpr::KeyExpr;
use crate::payload::{Bytes, Encoding, Sample, SliceMap};

/// An incoming query, delivered to queryables.
///
/// A query delivered by the engine carries a reply port back to the
/// querier; [`Query::reply`] sends a sample through it. Queries built
/// without a port (for tests or local routing) are *detached* and refuse to
/// reply.
#[derive(Clone)]
pub struct Query {
    key_expr: KeyExpr,
    parameters: String,
    payload: Option<Bytes>,
    encoding: Option<Encoding>,
    attachment: Option<SliceMap>,
    replier: Option<Arc<dyn RawReplier>>,
}

impl Query {
    /// Builds a detached query.
    pub fn new(key_expr: KeyExpr, parameters: impl Into<String>) -> Self {
        Self {
            key_expr,
            parameters: parameters.into(),
            payload: None,
            encoding: None,
            attachment: None,
            replier: None,
        }
    }

    /// Sets the query body.
    pub fn with_payload(mut self, payload: impl Into<Bytes>, encoding: Encoding) -> Self {
        self.payload = Some(payload.into());
        self.encoding = Some(encoding);
        self
    }

    /// Attaches a key-value map.
    pub fn with_attachment(mut self, attachment: SliceMap) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Attaches the engine's reply port.
    pub fn with_replier(mut self, replier: Arc<dyn RawReplier>) -> Self {
        self.replier = Some(replier);
        self
    }

    /// Returns the queried key expression.
    pub fn key_expr(&self) -> &KeyExpr {
        &self.key_expr
    }

    /// Returns the selector parameters, empty if none.
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Returns the full selector (`key?parameters`).
    pub fn selector(&self) -> String {
        if self.parameters.is_empty() {
            self.key_expr.to_string()
        } else {
            format!("{}?{}", self.key_expr, self.parameters)
        }
    }

    /// Returns the query body, if any.
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Returns the body encoding, if a body was set.
    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    /// Returns the attachment, if any.
    pub fn attachment(&self) -> Option<&SliceMap> {
        self.attachment.as_ref()
    }

    /// Sends a sample back to the querier.
    ///
    /// Fails with [`EngineError::DetachedQuery`] if this query carries no
    /// reply port.
    pub fn reply(&self, sample: Sample) -> EngineResult<()> {
        match &self.replier {
            Some(replier) => replier.reply(Reply::ok(sample)),
            None => Err(EngineError::DetachedQuery),
        }
    }

    /// Sends an error back to the querier.
    pub fn reply_err(&self, error: ReplyError) -> EngineResult<()> {
        match &self.replier {
            Some(replier) => replier.reply(Reply::err(error)),
            None => Err(EngineError::DetachedQuery),
        }
    }
}

impl Resource for Query {
    const KIND: &'static str = "query";
}

self_loaned!(Query);

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("selector", &self.selector())
            .field("has_payload", &self.payload.is_some())
            .field("attached", &self.replier.is_some())
            .finish()
    }
}

/// An application-level error reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyError {
    payload: Bytes,
    encoding: Encoding,
}

impl ReplyError {
    /// Builds an error reply from its payload.
    pub fn new(payload: impl Into<Bytes>, encoding: Encoding) -> Self {
        Self {
            payload: payload.into(),
            encoding,
        }
    }

    /// Returns the error payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Returns the payload encoding.
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }
}

/// One reply to a query: either a sample or an application error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    result: Result<Sample, ReplyError>,
}

impl Reply {
    /// Wraps a successful reply.
    pub fn ok(sample: Sample) -> Self {
        Self { result: Ok(sample) }
    }

    /// Wraps an error reply.
    pub fn err(error: ReplyError) -> Self {
        Self { result: Err(error) }
    }

    /// Returns whether this reply carries a sample.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the sample, if this is a successful reply.
    pub fn sample(&self) -> Option<&Sample> {
        self.result.as_ref().ok()
    }

    /// Returns the error, if this is an error reply.
    pub fn error(&self) -> Option<&ReplyError> {
        self.result.as_ref().err()
    }

    /// Unwraps into the underlying result.
    pub fn into_result(self) -> Result<Sample, ReplyError> {
        self.result
    }
}

impl Resource for Reply {
    const KIND: &'static str = "reply";
}

self_loaned!(Reply);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn key(s: &str) -> KeyExpr {
        KeyExpr::new(s).unwrap()
    }

    /// Reply port that records everything sent through it.
    #[derive(Default)]
    struct RecordingReplier {
        replies: Mutex<Vec<Reply>>,
    }

    impl RawReplier for RecordingReplier {
        fn reply(&self, reply: Reply) -> EngineResult<()> {
            self.replies.lock().push(reply);
            Ok(())
        }
    }

    #[test]
    fn selector_combines_key_and_parameters() {
        let query = Query::new(key("demo/a"), "arg=1");
        assert_eq!(query.selector(), "demo/a?arg=1");
        assert_eq!(Query::new(key("demo/a"), "").selector(), "demo/a");
    }

    #[test]
    fn detached_query_refuses_to_reply() {
        let query = Query::new(key("demo/a"), "");
        let result = query.reply(Sample::put(key("demo/a"), "x"));
        assert!(matches!(result, Err(EngineError::DetachedQuery)));
    }

    #[test]
    fn replies_flow_through_the_port() {
        let port = Arc::new(RecordingReplier::default());
        let replier: Arc<dyn RawReplier> = port.clone();
        let query = Query::new(key("demo/a"), "").with_replier(replier);

        query.reply(Sample::put(key("demo/a"), "one")).unwrap();
        query
            .reply_err(ReplyError::new("bad", Encoding::default()))
            .unwrap();

        let replies = port.replies.lock();
        assert_eq!(replies.len(), 2);
        assert!(replies[0].is_ok());
        assert_eq!(replies[0].sample().unwrap().payload().as_slice(), b"one");
        assert!(!replies[1].is_ok());
        assert_eq!(replies[1].error().unwrap().payload().as_slice(), b"bad");
    }
}
