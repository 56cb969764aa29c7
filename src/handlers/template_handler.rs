use super::HandledQuery;
use crate::core::{ParameterRecord, TermBinding, VariableSpec};
use crate::error::{Error, Result};
use crate::serialization::SparqlJsonSerializer;
use crate::template::QueryTemplate;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// Handles the queries with a given identifier by instantiating a SPARQL template.
pub struct TemplateHandler {
    identifier: String,
    template_path: PathBuf,
    variables: Vec<VariableSpec>,
    serializer: SparqlJsonSerializer,
    // Read on first use, then shared by every record of this query.
    template: OnceCell<QueryTemplate>,
}

impl TemplateHandler {
    /// # Arguments
    ///
    /// * `identifier` - Identifier of the validation queries this handler applies to
    /// * `template_path` - Path to the SPARQL query template to instantiate
    /// * `variables` - The variables that are instantiated within the template, in parameter order
    /// * `results` - The variables selected by the query, in result column order
    pub fn new(
        identifier: &str,
        template_path: impl Into<PathBuf>,
        variables: Vec<VariableSpec>,
        results: Vec<VariableSpec>,
    ) -> Self {
        TemplateHandler {
            identifier: identifier.to_string(),
            template_path: template_path.into(),
            variables,
            serializer: SparqlJsonSerializer::new(results),
            template: OnceCell::new(),
        }
    }

    /// Creates a handler around a template that is already in memory.
    pub fn with_template(
        identifier: &str,
        template: QueryTemplate,
        variables: Vec<VariableSpec>,
        results: Vec<VariableSpec>,
    ) -> Self {
        TemplateHandler {
            identifier: identifier.to_string(),
            template_path: template.path().to_path_buf(),
            variables,
            serializer: SparqlJsonSerializer::new(results),
            template: OnceCell::new_with(Some(template)),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    pub fn result_variables(&self) -> &[VariableSpec] {
        self.serializer.result_variables()
    }

    /// Produces the query and expected results for a record of this handler's query.
    pub async fn handle(&self, record: &ParameterRecord) -> Result<HandledQuery> {
        if record.parameters.len() != self.variables.len() {
            return Err(Error::ParameterArity {
                identifier: self.identifier.clone(),
                actual: record.parameters.len(),
                expected: self.variables.len(),
            });
        }

        let bindings: Vec<TermBinding> = self
            .variables
            .iter()
            .zip(&record.parameters)
            .map(|(variable, value)| variable.bind(&value.lexical_form()))
            .collect();

        let template = self
            .template
            .get_or_try_init(|| QueryTemplate::load(self.template_path.clone()))
            .await?;
        let query = template.instantiate(&bindings)?;

        let results = self.serializer.serialize(record)?;

        Ok(HandledQuery { valid: true, query, results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ParameterValue, ResultValue};

    fn handler() -> TemplateHandler {
        let template =
            QueryTemplate::new("path/q2", "SELECT ?name WHERE { ?person <ex:knows> ?friend. }")
                .unwrap();
        TemplateHandler::with_template(
            "q2",
            template,
            vec![VariableSpec::named_node("person"), VariableSpec::named_node("friend")],
            vec![VariableSpec::literal("name")],
        )
    }

    #[tokio::test]
    async fn test_handle_record() {
        let record = ParameterRecord::new(
            "q2",
            vec![ParameterValue::from("ex:alice"), ParameterValue::from(42)],
            vec![vec![ResultValue::from("Bob")]],
        );

        let handled = handler().handle(&record).await.unwrap();
        assert!(handled.valid);
        assert_eq!(handled.query, "SELECT ?name WHERE { <ex:alice> <ex:knows> <42>. }");
        assert!(handled.results.contains("\"value\": \"Bob\""));
    }

    #[tokio::test]
    async fn test_handle_record_with_wrong_parameter_count() {
        let record = ParameterRecord::new("q2", vec![ParameterValue::from("ex:alice")], vec![]);

        let err = handler().handle(&record).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid query parameters for 'q2'. Encountered a validation query with 1 parameters, while 2 variables were defined in the config."
        );
    }

    #[tokio::test]
    async fn test_missing_template_fails_on_use() {
        let handler = TemplateHandler::new("q3", "missing/q3.sparql", vec![], vec![]);
        let record = ParameterRecord::new("q3", vec![], vec![]);

        let err = handler.handle(&record).await.unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }
}
