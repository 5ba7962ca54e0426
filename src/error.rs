//! Error taxonomy for the generation pipeline.
//!
//! Every variant is fatal for the document being processed: the pipeline never
//! emits a partial artifact list. Callers processing several documents receive
//! [`GenError::Document`], which names the failing document and wraps the
//! underlying cause.

use std::path::PathBuf;

/// Errors raised while parsing, grouping, rendering or emitting.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The contract is not well-formed structured text, or its top-level shape
    /// (`paths` mapping, optional `definitions` mapping) is wrong.
    #[error("failed to parse contract: {reason}")]
    Parse {
        /// Human readable cause
        reason: String,
    },

    /// A template source could not be read.
    #[error("failed to read template `{template}`: {source}")]
    TemplateLoad {
        /// Template identifier as configured
        template: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A template source failed to compile.
    #[error("failed to compile template `{template}`: {source}")]
    TemplateCompile {
        /// Template identifier as configured
        template: String,
        /// Engine diagnostic
        #[source]
        source: minijinja::Error,
    },

    /// A template or one of its helpers failed during rendering.
    #[error("failed to render template `{template}` for `{item}`: {source}")]
    TemplateRender {
        /// Template identifier as configured
        template: String,
        /// Definition reference key or group key being rendered
        item: String,
        /// Engine diagnostic
        #[source]
        source: minijinja::Error,
    },

    /// An included operation has no grouping value at operation or path level.
    #[error(
        "cannot map path operation {path}/{verb}: no `{group_by}` value at path/operation level"
    )]
    Grouping {
        /// Path string of the operation
        path: String,
        /// HTTP verb of the operation
        verb: String,
        /// Grouping field that was looked up
        group_by: String,
    },

    /// Generator configuration is unreadable or invalid.
    #[error("invalid generator configuration: {0}")]
    Config(String),

    /// A definition name or group key produced a path outside the output root.
    #[error("artifact path for `{item}` escapes the output root: {path:?}")]
    OutputPath {
        /// Definition reference key or group key, or the document for sinks
        item: String,
        /// Offending relative path
        path: PathBuf,
    },

    /// An artifact sink failed to persist an artifact.
    #[error("failed to write artifact {path:?}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Processing of a specific contract document failed.
    #[error("failed to process contract `{document}`: {source}")]
    Document {
        /// Document identifier (usually its file path)
        document: String,
        /// Cause of the failure
        #[source]
        source: Box<GenError>,
    },
}

impl GenError {
    /// Build a [`GenError::Parse`] from anything displayable.
    pub fn parse(reason: impl Into<String>) -> Self {
        GenError::Parse {
            reason: reason.into(),
        }
    }

    /// Wrap this error with the identifier of the document being processed.
    #[must_use]
    pub fn in_document(self, document: impl Into<String>) -> Self {
        GenError::Document {
            document: document.into(),
            source: Box::new(self),
        }
    }

    /// Innermost pipeline error, looking through [`GenError::Document`].
    #[must_use]
    pub fn root(&self) -> &GenError {
        match self {
            GenError::Document { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = GenError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wrapping_names_document_and_cause() {
        let err = GenError::Grouping {
            path: "/pets".into(),
            verb: "get".into(),
            group_by: "x-swagger-router-controller".into(),
        }
        .in_document("petstore.yaml");

        let msg = err.to_string();
        assert!(msg.contains("petstore.yaml"));
        assert!(matches!(err.root(), GenError::Grouping { .. }));
    }

    #[test]
    fn test_parse_message() {
        let err = GenError::parse("missing `paths` mapping");
        assert_eq!(
            err.to_string(),
            "failed to parse contract: missing `paths` mapping"
        );
    }
}
