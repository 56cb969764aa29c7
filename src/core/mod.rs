//! Core data structures and types for the validation generator

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Largest magnitude below which every integral float is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A positional value to fill into a query template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    String(String),
    Number(Number),
}

/// One value inside an expected solution mapping.
///
/// Values may nest, for columns that hold a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    String(String),
    Number(Number),
    Array(Vec<ResultValue>),
}

/// A single instance of validation parameters, i.e. one parsed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    /// Identifier of the query, used to find the owning handler
    pub query_identifier: String,
    /// Values to fill into the query template, in order
    pub parameters: Vec<ParameterValue>,
    /// All expected results of the query.
    /// The outer vector is the solution sequence, each inner vector one solution mapping.
    pub results: Vec<Vec<ResultValue>>,
}

impl ParameterRecord {
    pub fn new(
        query_identifier: &str,
        parameters: Vec<ParameterValue>,
        results: Vec<Vec<ResultValue>>,
    ) -> Self {
        Self { query_identifier: query_identifier.to_string(), parameters, results }
    }
}

impl ParameterValue {
    /// The string form used when this value becomes an RDF term.
    pub fn lexical_form(&self) -> String {
        match self {
            ParameterValue::String(value) => value.clone(),
            ParameterValue::Number(number) => number_lexical_form(number),
        }
    }
}

impl ResultValue {
    /// The string form used when this value becomes an RDF term.
    /// Nested values are joined with commas.
    pub fn lexical_form(&self) -> String {
        match self {
            ResultValue::String(value) => value.clone(),
            ResultValue::Number(number) => number_lexical_form(number),
            ResultValue::Array(values) => {
                values.iter().map(ResultValue::lexical_form).collect::<Vec<_>>().join(",")
            }
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Number(value.into())
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        ResultValue::String(value.to_string())
    }
}

impl From<i64> for ResultValue {
    fn from(value: i64) -> Self {
        ResultValue::Number(value.into())
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        // Non-finite floats have no JSON form, so they can never come out of a parameters file.
        Number::from_f64(value).map_or_else(|| ResultValue::String(value.to_string()), ResultValue::Number)
    }
}

/// Integral floats print without a fraction (`20.0` becomes `20`).
#[allow(clippy::cast_possible_truncation)]
fn number_lexical_form(number: &Number) -> String {
    if number.is_f64() {
        if let Some(value) = number.as_f64() {
            if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
                return (value as i64).to_string();
            }
        }
    }
    number.to_string()
}

pub mod term;
pub use term::{RdfTerm, TermBinding, TermKind, VariableSpec};
