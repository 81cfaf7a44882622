//! Error taxonomy for collaborator failures.
//!
//! Every variant here is caught at the boundary of the component that calls
//! the collaborator and converted to an empty/degraded result or a single
//! terminal event. No failure in this taxonomy may abort the hosting process.

use thiserror::Error;

/// Embedding collaborator failures.
///
/// Degrade to empty search results or skipped storage; never escalated.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Vector index failures.
///
/// Treated identically to [`EmbeddingError`] from the caller's perspective.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector index unreachable: {0}")]
    Unreachable(String),

    #[error("index query failed: {0}")]
    Query(String),

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

/// Generation collaborator failures.
///
/// Degrade to a single terminal `error` stream event; the turn still
/// finalizes using whatever partial reply was accumulated.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model provider error: {message}")]
    Provider { message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("response decode error: {0}")]
    Decode(String),
}

/// Durable log write failures.
///
/// Logged and swallowed; the in-memory log remains authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_error_display() {
        let err = EmbeddingError::DimensionMismatch {
            expected: 4096,
            actual: 384,
        };
        assert!(err.to_string().contains("4096"));
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Provider {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "model provider error: connection refused");
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Query("disk full".to_string());
        assert_eq!(err.to_string(), "query error: disk full");
    }
}
