//! # LDBC SNB Validation Generator
//!
//! Turns the validation parameters file of the LDBC Social Network Benchmark into
//! pairs of SPARQL queries and expected SPARQL/JSON results.
//!
//! Each line of the parameters file names a query, the values to substitute into
//! that query's template, and the rows the query is expected to return. The
//! generator routes every line to the first configured handler that owns its
//! query identifier, instantiates the query template, serializes the expected
//! rows, and hands both to a destination. Queries are never executed here; the
//! output is meant to be used as an oracle against a live engine.
//!
//! ## Pipeline
//!
//! - [`parsing`] splits `<query>|<results>` lines into [`ParameterRecord`]s
//! - [`sources`] streams records lazily out of a file
//! - [`handlers`] decide per record what to produce
//! - [`serialization`] renders expected rows as SPARQL/JSON
//! - [`generator`] ties it all together and writes to a [`destination`]
//!
//! ## Example
//!
//! ```rust
//! use validation_generator::parsing::LineParser;
//!
//! fn example() -> validation_generator::Result<()> {
//!     let parser = LineParser::new()?;
//!     let record = parser.parse_line(r#"["q1",123,"Chau",20]|[[1],[2],[3]]"#)?;
//!     assert_eq!(record.query_identifier, "q1");
//!     assert_eq!(record.parameters.len(), 2);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::new_without_default)]

/// Core data structures and types
pub mod core;

/// Parsing of validation parameter lines
pub mod parsing;

/// Lazy record streams over parameter files
pub mod sources;

/// SPARQL/JSON result serialization
pub mod serialization;

/// Query template loading and instantiation
pub mod template;

/// Query handlers that turn records into queries and results
pub mod handlers;

/// Destinations for generated queries and results
pub mod destination;

/// Configuration file model
pub mod config;

/// The generation run itself
pub mod generator;

pub mod error {
    //! Error types and result definitions

    use std::fmt;
    use std::path::PathBuf;
    use thiserror::Error;

    /// Result type alias for validation generator operations
    pub type Result<T> = std::result::Result<T, Error>;

    /// The part of a validation line that failed to decode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Segment {
        Query,
        Results,
    }

    impl fmt::Display for Segment {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Segment::Query => write!(f, "query"),
                Segment::Results => write!(f, "results"),
            }
        }
    }

    /// Main error type for the validation generator
    #[derive(Error, Debug)]
    pub enum Error {
        /// Line does not have the `[...]|...` shape
        #[error("Detected invalid validation line: '{line}'")]
        Parse { line: String },

        /// One of the two line segments is not valid JSON of the expected shape
        #[error("Detected invalid JSON in the {segment} part of: '{line}'\n{message}")]
        JsonDecode { segment: Segment, line: String, message: String },

        /// Parameter count differs from the configured variables
        #[error(
            "Invalid query parameters for '{identifier}'. Encountered a validation query with {actual} parameters, while {expected} variables were defined in the config."
        )]
        ParameterArity { identifier: String, actual: usize, expected: usize },

        /// Result row width differs from the configured result variables
        #[error(
            "Invalid query parameters for '{identifier}'. Encountered a validation query with {actual} variables in a query result, while {expected} result variables were defined in the config."
        )]
        ResultArity { identifier: String, actual: usize, expected: usize },

        /// Term kind that has no SPARQL/JSON representation
        #[error("Unsupported term type {0} for SPARQL/JSON serialization")]
        UnsupportedTermKind(String),

        /// Parameters file could not be opened
        #[error("Could not open parameters file '{}': {source}", path.display())]
        SourceOpen {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },

        /// Query template could not be read
        #[error("Could not read query template '{}': {source}", path.display())]
        Template {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },

        /// Configuration error
        #[error("Configuration error: {0}")]
        Config(String),

        /// Invalid regular expression
        #[error("Pattern error: {0}")]
        Pattern(#[from] regex::Error),

        /// Serialization error
        #[error("Serialization error: {0}")]
        Serialization(String),

        /// IO error
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }

    impl From<serde_json::Error> for Error {
        fn from(err: serde_json::Error) -> Self {
            Error::Serialization(err.to_string())
        }
    }
}

// Re-export commonly used types
pub use crate::core::{ParameterRecord, ParameterValue, ResultValue};
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("test error".to_string());
        assert_eq!(format!("{}", err), "Configuration error: test error");
    }

    #[test]
    fn test_json_decode_error_names_segment() {
        let err = Error::JsonDecode {
            segment: error::Segment::Results,
            line: "[\"q1\"]|{".to_string(),
            message: "EOF while parsing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Detected invalid JSON in the results part of: '[\"q1\"]|{'\nEOF while parsing"
        );
    }
}
