//! Error types for alignment and feature system loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("unknown segment {segment:?}: no feature table entry")]
    UnknownSegment { segment: char },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("invalid configuration: {message}")]
    Configuration { message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AlignError {
    pub(crate) fn unknown_segment(segment: char) -> Self {
        Self::UnknownSegment { segment }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_segment_message_names_segment() {
        let err = AlignError::unknown_segment('7');
        assert_eq!(err.to_string(), "unknown segment '7': no feature table entry");
    }

    #[test]
    fn test_configuration_message() {
        let err = AlignError::configuration("segment 'p' lacks feature place");
        assert!(err.to_string().starts_with("invalid configuration:"));
    }
}
