use crate::core::{RdfTerm, TermBinding};
use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A SPARQL variable token, `?name` or `$name`.
const VARIABLE_PATTERN: &str = r"[?$](\w+)";

/// A SPARQL query template read from disk.
///
/// Instantiation replaces every variable token whose name is bound with the
/// SPARQL form of its term. Unbound variables stay as they are.
#[derive(Debug)]
pub struct QueryTemplate {
    path: PathBuf,
    text: String,
    variable_regex: Regex,
}

impl QueryTemplate {
    /// Reads the template at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Template { path: path.clone(), source })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded query template");
        Self::new(path, text)
    }

    /// Builds a template from text that was read elsewhere.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self> {
        Ok(QueryTemplate {
            path: path.into(),
            text: text.into(),
            variable_regex: Regex::new(VARIABLE_PATTERN)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Produces one query with all `bindings` substituted.
    pub fn instantiate(&self, bindings: &[TermBinding]) -> Result<String> {
        let mut substitutions: HashMap<&str, String> = HashMap::with_capacity(bindings.len());
        for binding in bindings {
            let rendered = match &binding.term {
                RdfTerm::DefaultGraph | RdfTerm::Quad(_) => {
                    return Err(Error::UnsupportedTermKind(binding.term.type_name().to_string()));
                }
                term => term.to_string(),
            };
            substitutions.entry(binding.name.as_str()).or_insert(rendered);
        }

        let query = self.variable_regex.replace_all(&self.text, |captures: &Captures| {
            substitutions
                .get(&captures[1])
                .cloned()
                .unwrap_or_else(|| captures[0].to_string())
        });
        Ok(query.into_owned())
    }
}
