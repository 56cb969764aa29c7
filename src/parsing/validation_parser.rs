use crate::core::{ParameterRecord, ParameterValue, ResultValue};
use crate::error::{Error, Result, Segment};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A `[...]` segment without pipes, a pipe, then the rest of the line.
const LINE_PATTERN: &str = r"(\[[^|]*\])\|(.*)";

/// Parser for lines of an LDBC SNB validation parameters file.
///
/// A line looks like
///
/// ```text
/// ["q1",123,"Chau",20]|[[1],[2],[3]]
/// ```
///
/// The left array holds the query identifier followed by the query parameters.
/// Its last element is a fixed trailing column of the benchmark format and is
/// always dropped. The right array holds one array per expected solution mapping.
pub struct LineParser {
    line_regex: Regex,
}

impl LineParser {
    pub fn new() -> Result<Self> {
        Ok(LineParser { line_regex: Regex::new(LINE_PATTERN)? })
    }

    /// Parses one line of the parameters file, skipping empty lines.
    pub fn parse(&self, line: &str) -> Result<Option<ParameterRecord>> {
        if line.is_empty() {
            return Ok(None);
        }
        self.parse_line(line).map(Some)
    }

    /// Parses a single non-empty validation line into a record.
    pub fn parse_line(&self, line: &str) -> Result<ParameterRecord> {
        let captures =
            self.line_regex.captures(line).ok_or_else(|| Error::Parse { line: line.to_string() })?;
        let (query_part, results_part) = (&captures[1], &captures[2]);

        let mut query_values: Vec<Value> = decode_segment(query_part, line, Segment::Query)?;
        if query_values.is_empty() {
            return Err(segment_error(Segment::Query, line, "missing query identifier"));
        }
        let query_identifier = match query_values.remove(0) {
            Value::String(identifier) => identifier,
            other => {
                return Err(segment_error(
                    Segment::Query,
                    line,
                    &format!("query identifier must be a string, found {}", other),
                ));
            }
        };

        // The trailing column carries no parameter, whatever its value.
        query_values.pop();
        let parameters = query_values
            .into_iter()
            .map(|value| {
                serde_json::from_value::<ParameterValue>(value)
                    .map_err(|e| segment_error(Segment::Query, line, &e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let results: Vec<Vec<ResultValue>> = decode_segment(results_part, line, Segment::Results)?;

        Ok(ParameterRecord { query_identifier, parameters, results })
    }
}

fn decode_segment<T: DeserializeOwned>(data: &str, line: &str, segment: Segment) -> Result<T> {
    serde_json::from_str(data).map_err(|e| segment_error(segment, line, &e.to_string()))
}

fn segment_error(segment: Segment, line: &str, message: &str) -> Error {
    Error::JsonDecode { segment, line: line.to_string(), message: message.to_string() }
}
