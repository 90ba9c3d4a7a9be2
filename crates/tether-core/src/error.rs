//! Unified error types for the Tether core.
//!
//! Contract violations (loaning an inert handle, calling an unarmed
//! callback) are not represented here — see the module docs in
//! [`crate::handle`] and [`crate::callback`]. These types cover the
//! recoverable failures: engine operations, key-expression validation,
//! configuration parsing, and channel polling.

use thiserror::Error;

// =============================================================================
// Engine Errors
// =============================================================================

/// Errors reported by engine-backed operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The session has been closed.
    #[error("session is closed")]
    SessionClosed,

    /// The entity was already undeclared.
    #[error("entity is undeclared")]
    Undeclared,

    /// A reply was attempted on a query that carries no reply port.
    #[error("query is detached from its queryable")]
    DetachedQuery,

    /// The delivery channel is closed.
    #[error("delivery channel is closed")]
    ChannelClosed,

    /// Invalid key expression.
    #[error(transparent)]
    KeyExpr(#[from] KeyExprError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Engine-specific failure.
    #[error("engine error: {0}")]
    Backend(String),
}

impl EngineError {
    /// Wraps an engine-specific failure message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

// =============================================================================
// Key Expression Errors
// =============================================================================

/// Errors produced by key-expression validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyExprError {
    /// The expression is empty.
    #[error("key expression is empty")]
    Empty,

    /// A chunk between two `/` separators is empty.
    #[error("key expression contains an empty chunk: {0:?}")]
    EmptyChunk(String),

    /// The expression contains a character reserved by the selector syntax.
    #[error("key expression contains reserved character {1:?}: {0:?}")]
    ReservedChar(String, char),

    /// A wildcard appears inside a chunk instead of spanning it.
    #[error("wildcard must span a whole chunk: {0:?}")]
    MisplacedWildcard(String),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors produced by the JSON configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document or an inserted value is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document root is not a JSON object.
    #[error("configuration root must be a JSON object")]
    NotAnObject,

    /// A path segment traverses a non-object value.
    #[error("path {0:?} traverses a non-object value")]
    InvalidPath(String),
}

// =============================================================================
// Channel Errors
// =============================================================================

/// Outcome of polling a channel receiver without blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryRecvError {
    /// No item is available right now; the send end is still alive.
    #[error("channel is empty")]
    Empty,

    /// The send end is gone and the queue is drained.
    #[error("channel is closed")]
    Closed,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for engine-backed operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for key-expression construction.
pub type KeyExprResult<T> = Result<T, KeyExprError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
