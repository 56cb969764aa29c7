//! Validation Generator Integration Tests
//!
//! Runs whole generations with templates on disk, an in-memory parameter source
//! and a destination that records every write.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::fs;
use std::sync::{Arc, Mutex};
use validation_generator::core::VariableSpec;
use validation_generator::destination::QueryResultDestination;
use validation_generator::generator::{DispatchMode, GenerationSummary, ValidationGenerator};
use validation_generator::handlers::{QueryHandler, TemplateHandler};
use validation_generator::sources::{ParameterSource, RecordStream};
use validation_generator::{Error, ParameterRecord, ParameterValue, Result, ResultValue};

const Q1_TEMPLATE: &str = "SELECT ?selected1 ?selected2 ?selected3 WHERE {
  ?var1 <ex:p1> ?selected1.
  ?var2 <ex:p2> ?selected2.
  ?var3 <ex:p3> ?selected3.
}";

const Q2_TEMPLATE: &str = "SELECT ?selected1 WHERE {
  ?var1 <ex:p1.2> ?selected1.
  ?var2 <ex:p2.2> ?selected2.
  ?var3 <ex:p3.2> ?selected3.
}";

fn setup_test_environment(test_name: &str) -> std::io::Result<String> {
    let test_dir = format!("test_data_generator_{}", test_name);
    let _ = fs::remove_dir_all(&test_dir);
    fs::create_dir_all(&test_dir)?;
    fs::write(format!("{}/q1.sparql", test_dir), Q1_TEMPLATE)?;
    fs::write(format!("{}/q2.sparql", test_dir), Q2_TEMPLATE)?;
    Ok(test_dir)
}

fn cleanup_test_environment(test_dir: &str) {
    let _ = fs::remove_dir_all(test_dir);
}

struct RecordsSource(Vec<ParameterRecord>);

#[async_trait]
impl ParameterSource for RecordsSource {
    async fn parameters(&self) -> Result<RecordStream> {
        Ok(stream::iter(self.0.clone().into_iter().map(Ok)).boxed())
    }
}

#[derive(Clone, Default)]
struct RecordingDestination {
    writes: Arc<Mutex<Vec<(usize, String, String)>>>,
}

impl RecordingDestination {
    fn writes(&self) -> Vec<(usize, String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryResultDestination for RecordingDestination {
    async fn write(&self, index: usize, query: &str, results: &str) -> Result<()> {
        self.writes.lock().unwrap().push((index, query.to_string(), results.to_string()));
        Ok(())
    }
}

fn query_handlers(test_dir: &str) -> Vec<QueryHandler> {
    vec![
        TemplateHandler::new(
            "q1",
            format!("{}/q1.sparql", test_dir),
            vec![VariableSpec::named_node("var1"), VariableSpec::named_node("var2")],
            vec![
                VariableSpec::literal("selected1"),
                VariableSpec::literal("selected2"),
                VariableSpec::literal("selected3"),
            ],
        )
        .into(),
        TemplateHandler::new(
            "q2",
            format!("{}/q2.sparql", test_dir),
            vec![
                VariableSpec::named_node("var1"),
                VariableSpec::named_node("var2"),
                VariableSpec::named_node("var3"),
            ],
            vec![VariableSpec::literal("selected1")],
        )
        .into(),
    ]
}

fn q1_record() -> ParameterRecord {
    ParameterRecord::new(
        "q1",
        vec![ParameterValue::from("ex:V1"), ParameterValue::from("ex:V2")],
        vec![
            vec![ResultValue::from("R1.1"), ResultValue::from("R1.2"), ResultValue::from(1.3)],
            vec![ResultValue::from("R2.1"), ResultValue::from("R2.2"), ResultValue::from(2.3)],
        ],
    )
}

fn record_with_three_parameters(identifier: &str) -> ParameterRecord {
    ParameterRecord::new(
        identifier,
        vec![
            ParameterValue::from("ex:V1"),
            ParameterValue::from("ex:V2"),
            ParameterValue::from(3),
        ],
        vec![vec![ResultValue::from("R1.1")], vec![ResultValue::from("R2.1")]],
    )
}

#[tokio::test]
async fn test_generate_valid_parameters() {
    let test_dir = setup_test_environment("valid").unwrap();
    let destination = RecordingDestination::default();
    let generator = ValidationGenerator::new(
        Box::new(RecordsSource(vec![
            q1_record(),
            record_with_three_parameters("q2"),
            record_with_three_parameters("q-ignored"),
        ])),
        Box::new(destination.clone()),
        query_handlers(&test_dir),
    );

    let summary = generator.generate().await.unwrap();
    cleanup_test_environment(&test_dir);

    assert_eq!(summary, GenerationSummary { records: 3, written: 2, skipped: 0, unmatched: 1 });

    let writes = destination.writes();
    assert_eq!(writes.len(), 2);

    assert_eq!(writes[0].0, 0);
    assert_eq!(
        writes[0].1,
        "SELECT ?selected1 ?selected2 ?selected3 WHERE {
  <ex:V1> <ex:p1> ?selected1.
  <ex:V2> <ex:p2> ?selected2.
  ?var3 <ex:p3> ?selected3.
}"
    );
    assert_eq!(
        writes[0].2,
        r#"{
  "head": {
    "vars": [
      "selected1",
      "selected2",
      "selected3"
    ]
  },
  "results": {
    "bindings": [
      {
        "selected1": {
          "type": "literal",
          "value": "R1.1"
        },
        "selected2": {
          "type": "literal",
          "value": "R1.2"
        },
        "selected3": {
          "type": "literal",
          "value": "1.3"
        }
      },
      {
        "selected1": {
          "type": "literal",
          "value": "R2.1"
        },
        "selected2": {
          "type": "literal",
          "value": "R2.2"
        },
        "selected3": {
          "type": "literal",
          "value": "2.3"
        }
      }
    ]
  }
}"#
    );

    assert_eq!(writes[1].0, 1);
    assert_eq!(
        writes[1].1,
        "SELECT ?selected1 WHERE {
  <ex:V1> <ex:p1.2> ?selected1.
  <ex:V2> <ex:p2.2> ?selected2.
  <3> <ex:p3.2> ?selected3.
}"
    );
    assert_eq!(
        writes[1].2,
        r#"{
  "head": {
    "vars": [
      "selected1"
    ]
  },
  "results": {
    "bindings": [
      {
        "selected1": {
          "type": "literal",
          "value": "R1.1"
        }
      },
      {
        "selected1": {
          "type": "literal",
          "value": "R2.1"
        }
      }
    ]
  }
}"#
    );
}

#[tokio::test]
async fn test_generate_invalid_parameters() {
    let test_dir = setup_test_environment("invalid").unwrap();
    let destination = RecordingDestination::default();
    let generator = ValidationGenerator::new(
        Box::new(RecordsSource(vec![
            q1_record(),
            ParameterRecord::new(
                "q2",
                vec![ParameterValue::from("ex:V1"), ParameterValue::from("ex:V2")],
                vec![vec![ResultValue::from("R1.1")], vec![ResultValue::from("R2.1")]],
            ),
        ])),
        Box::new(destination.clone()),
        query_handlers(&test_dir),
    );

    let err = generator.generate().await.unwrap_err();
    cleanup_test_environment(&test_dir);

    assert!(matches!(err, Error::ParameterArity { actual: 2, expected: 3, .. }));
    assert_eq!(
        err.to_string(),
        "Invalid query parameters for 'q2'. Encountered a validation query with 2 parameters, while 3 variables were defined in the config."
    );
    // The write that completed before the failure stays.
    assert_eq!(destination.writes().len(), 1);
}

#[tokio::test]
async fn test_generate_concurrently() {
    let test_dir = setup_test_environment("concurrent").unwrap();
    let destination = RecordingDestination::default();
    let records = (0..20)
        .map(|i| if i % 2 == 0 { q1_record() } else { record_with_three_parameters("q2") })
        .collect();
    let generator = ValidationGenerator::new(
        Box::new(RecordsSource(records)),
        Box::new(destination.clone()),
        query_handlers(&test_dir),
    )
    .with_dispatch(DispatchMode::Concurrent);

    let summary = generator.generate().await.unwrap();
    cleanup_test_environment(&test_dir);

    assert_eq!(summary.records, 20);
    assert_eq!(summary.written, 20);

    let mut indices: Vec<usize> = destination.writes().iter().map(|w| w.0).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_generate_with_missing_template() {
    let test_dir = setup_test_environment("missing_template").unwrap();
    fs::remove_file(format!("{}/q1.sparql", test_dir)).unwrap();

    let generator = ValidationGenerator::new(
        Box::new(RecordsSource(vec![q1_record()])),
        Box::new(RecordingDestination::default()),
        query_handlers(&test_dir),
    );

    let err = generator.generate().await.unwrap_err();
    cleanup_test_environment(&test_dir);

    assert!(matches!(err, Error::Template { .. }));
}
