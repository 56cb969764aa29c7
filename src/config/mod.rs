//! JSON configuration of a generation run.
//!
//! ```json
//! {
//!   "parameterSource": { "path": "validation_params.csv" },
//!   "destination": { "path": "out" },
//!   "dispatch": "sequential",
//!   "queryHandlers": [
//!     {
//!       "type": "template",
//!       "identifier": "q1",
//!       "templatePath": "templates/q1.sparql",
//!       "variables": [{ "name": "person", "kind": "namedNode" }],
//!       "results": [{ "name": "firstName", "kind": "literal" }]
//!     },
//!     { "type": "void", "identifier": "u1" }
//!   ]
//! }
//! ```
//!
//! Paths are used as written, so relative paths resolve against the working
//! directory of the process.

use crate::core::VariableSpec;
use crate::destination::DirectoryDestination;
use crate::error::{Error, Result};
use crate::generator::{DispatchMode, ValidationGenerator};
use crate::handlers::{QueryHandler, TemplateHandler, VoidHandler};
use crate::sources::LdbcValidationSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub parameter_source: PathConfig,
    pub destination: PathConfig,
    #[serde(default)]
    pub dispatch: DispatchMode,
    pub query_handlers: Vec<HandlerConfig>,
}

/// A file or directory location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    pub path: PathBuf,
}

/// One entry of `queryHandlers`, in the order handlers are tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HandlerConfig {
    #[serde(rename_all = "camelCase")]
    Template {
        identifier: String,
        template_path: PathBuf,
        #[serde(default)]
        variables: Vec<VariableSpec>,
        #[serde(default)]
        results: Vec<VariableSpec>,
    },
    Void { identifier: String },
}

impl HandlerConfig {
    pub fn identifier(&self) -> &str {
        match self {
            HandlerConfig::Template { identifier, .. } | HandlerConfig::Void { identifier } => {
                identifier
            }
        }
    }

    pub fn build(&self) -> QueryHandler {
        match self {
            HandlerConfig::Template { identifier, template_path, variables, results } => {
                TemplateHandler::new(
                    identifier,
                    template_path.clone(),
                    variables.clone(),
                    results.clone(),
                )
                .into()
            }
            HandlerConfig::Void { identifier } => VoidHandler::new(identifier).into(),
        }
    }
}

impl GeneratorConfig {
    /// Reads and decodes the configuration file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("could not read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)
            .map_err(|e| Error::Config(format!("invalid config '{}': {}", path.display(), e)))?;
        debug!(
            path = %path.display(),
            handlers = config.query_handlers.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Wires the configured source, destination and handlers into a generator.
    pub fn build(&self) -> ValidationGenerator {
        ValidationGenerator::new(
            Box::new(LdbcValidationSource::new(self.parameter_source.path.clone())),
            Box::new(DirectoryDestination::new(self.destination.path.clone())),
            self.query_handlers.iter().map(HandlerConfig::build).collect(),
        )
        .with_dispatch(self.dispatch)
    }
}
