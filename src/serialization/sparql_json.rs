//! SPARQL/JSON serialization of expected query results
//!
//! Expected solution mappings are stored as plain JSON rows in the parameters
//! file. This module turns those rows into a [SPARQL 1.1 Query Results JSON]
//! document, using the configured result variables to decide how every column
//! is interpreted as an RDF term.
//!
//! The output is fully deterministic: keys follow variable order, rows follow
//! input order, and the document is pretty-printed with two spaces.
//!
//! [SPARQL 1.1 Query Results JSON]: https://www.w3.org/TR/sparql11-results-json/

use crate::core::{ParameterRecord, RdfTerm, ResultValue, VariableSpec};
use crate::error::{Error, Result};
use oxigraph::model::vocab::xsd;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The `type` member of a SPARQL/JSON term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorType {
    Uri,
    Bnode,
    Literal,
}

/// A single RDF term in SPARQL/JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermDescriptor {
    #[serde(rename = "type")]
    pub term_type: DescriptorType,
    pub value: String,
    #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl TermDescriptor {
    fn new(term_type: DescriptorType, value: &str) -> Self {
        TermDescriptor { term_type, value: value.to_string(), language: None, datatype: None }
    }
}

/// Converts a term into its SPARQL/JSON shape.
///
/// Plain literals and `xsd:string` literals carry no datatype, language-tagged
/// literals carry only their language.
pub fn term_to_descriptor(term: &RdfTerm) -> Result<TermDescriptor> {
    match term {
        RdfTerm::NamedNode(node) => Ok(TermDescriptor::new(DescriptorType::Uri, node.as_str())),
        RdfTerm::BlankNode(node) => Ok(TermDescriptor::new(DescriptorType::Bnode, node.as_str())),
        RdfTerm::Literal(literal) => {
            let mut descriptor = TermDescriptor::new(DescriptorType::Literal, literal.value());
            if let Some(language) = literal.language() {
                descriptor.language = Some(language.to_string());
            } else if literal.datatype() != xsd::STRING {
                descriptor.datatype = Some(literal.datatype().as_str().to_string());
            }
            Ok(descriptor)
        }
        RdfTerm::Variable(_) | RdfTerm::DefaultGraph | RdfTerm::Quad(_) => {
            Err(Error::UnsupportedTermKind(term.type_name().to_string()))
        }
    }
}

/// Serializes expected results of one query to SPARQL/JSON.
pub struct SparqlJsonSerializer {
    result_variables: Vec<VariableSpec>,
}

impl SparqlJsonSerializer {
    pub fn new(result_variables: Vec<VariableSpec>) -> Self {
        SparqlJsonSerializer { result_variables }
    }

    pub fn result_variables(&self) -> &[VariableSpec] {
        &self.result_variables
    }

    /// Serializes the expected results of a record.
    pub fn serialize(&self, record: &ParameterRecord) -> Result<String> {
        self.serialize_rows(&record.query_identifier, &record.results)
    }

    /// Serializes solution mappings of the query `identifier`.
    ///
    /// Every row must have exactly one value per result variable.
    pub fn serialize_rows(&self, identifier: &str, rows: &[Vec<ResultValue>]) -> Result<String> {
        let bindings = rows
            .iter()
            .map(|row| self.solution(identifier, row))
            .collect::<Result<Vec<_>>>()?;

        let document = SparqlJsonDocument {
            head: Head { vars: self.result_variables.iter().map(|v| v.name.as_str()).collect() },
            results: Results { bindings },
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn solution<'a>(&'a self, identifier: &str, row: &[ResultValue]) -> Result<Solution<'a>> {
        if row.len() != self.result_variables.len() {
            return Err(Error::ResultArity {
                identifier: identifier.to_string(),
                actual: row.len(),
                expected: self.result_variables.len(),
            });
        }

        self.result_variables
            .iter()
            .zip(row)
            .map(|(variable, value)| {
                let term = variable.kind.create_term(&value.lexical_form());
                Ok((variable.name.as_str(), term_to_descriptor(&term)?))
            })
            .collect::<Result<Vec<_>>>()
            .map(Solution)
    }
}

#[derive(Serialize)]
struct SparqlJsonDocument<'a> {
    head: Head<'a>,
    results: Results<'a>,
}

#[derive(Serialize)]
struct Head<'a> {
    vars: Vec<&'a str>,
}

#[derive(Serialize)]
struct Results<'a> {
    bindings: Vec<Solution<'a>>,
}

/// One solution mapping, keyed in result variable order.
struct Solution<'a>(Vec<(&'a str, TermDescriptor)>);

impl Serialize for Solution<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, descriptor) in &self.0 {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}
