//! Error definitions for all `stubgen` pipeline stages.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum StubgenError {
    /// The interface-definition source cannot be read. Fatal: no contract
    /// can be derived without it.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    /// Malformed contract input (empty spec list, unbalanced block).
    #[error("contract error: {0}")]
    ContractError(String),
    /// A method signature that cannot be decomposed.
    #[error("signature error: {0}")]
    SignatureError(String),
    /// Implementation-scan failure at the scan-root level. Per-file read
    /// failures degrade to warnings instead.
    #[error("scan error: {0}")]
    ScanError(String),
    /// Locale file missing or malformed.
    #[error("locale error: {0}")]
    LocaleError(String),
    /// Translation service call failure, surfaced after retries are
    /// exhausted. The batch layer catches this and keeps the source text.
    #[error("translation error: {0}")]
    TranslationError(String),
    /// Output serialization failure.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// Filesystem I/O error from CLI or callers that propagate I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
