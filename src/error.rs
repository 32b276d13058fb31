//! Crate error type.
//!
//! Nothing here is expected during normal operation. A failure aborts the
//! single call that hit it; the monitor logs it and moves on to the next
//! tracked element.

use crate::dom::NodeId;

pub type Result<T> = std::result::Result<T, AdaptError>;

#[derive(Debug, thiserror::Error)]
pub enum AdaptError {
    #[error("element {0} is no longer attached to the document")]
    Detached(NodeId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unsupported selector: {0:?}")]
    InvalidSelector(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid user agent pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dom call failed: {0}")]
    Dom(String),
}
