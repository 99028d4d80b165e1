//! Error types for lector-rdr

use lector_core::Error as CoreError;
use thiserror::Error;

/// Reader errors
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Page error: {0}")]
    Page(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Embedders working against lector-core surfaces get the matching
/// core variant rather than a stringly wrapper
impl From<ReaderError> for CoreError {
    fn from(err: ReaderError) -> Self {
        match err {
            ReaderError::Session(msg) => CoreError::Session(msg),
            ReaderError::Engine(msg) => CoreError::Engine(msg),
            ReaderError::Page(msg) => CoreError::Page(msg),
            ReaderError::Config(msg) => CoreError::Configuration(msg),
            ReaderError::Io(e) => CoreError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_conversion_preserves_variant() {
        let core: CoreError = ReaderError::Page("missing element".to_string()).into();
        assert!(matches!(core, CoreError::Page(msg) if msg == "missing element"));

        let core: CoreError = ReaderError::Engine("not available".to_string()).into();
        assert!(matches!(core, CoreError::Engine(_)));

        let core: CoreError = ReaderError::Config("bad speed".to_string()).into();
        assert!(matches!(core, CoreError::Configuration(_)));
    }
}
