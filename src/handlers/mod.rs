//! Query handlers
//!
//! Every configured query identifier is owned by exactly one handler. The
//! generator walks its handlers in configured order and lets the first one that
//! owns a record's identifier handle it.

use crate::core::ParameterRecord;
use crate::error::Result;

pub mod template_handler;
pub mod void_handler;

pub use template_handler::TemplateHandler;
pub use void_handler::VoidHandler;

/// The outcome of handling one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledQuery {
    /// Whether the query and results must be written away.
    /// False for void handlers.
    pub valid: bool,
    pub query: String,
    pub results: String,
}

impl HandledQuery {
    /// A recognized query that produces no output.
    pub fn void() -> Self {
        HandledQuery { valid: false, query: String::new(), results: String::new() }
    }
}

/// A configured rule for one query identifier.
pub enum QueryHandler {
    Template(TemplateHandler),
    Void(VoidHandler),
}

impl QueryHandler {
    pub fn identifier(&self) -> &str {
        match self {
            QueryHandler::Template(handler) => handler.identifier(),
            QueryHandler::Void(handler) => handler.identifier(),
        }
    }

    /// Whether this handler owns the record's query identifier.
    pub fn supports(&self, record: &ParameterRecord) -> bool {
        record.query_identifier == self.identifier()
    }

    /// Handles a record, or returns `None` if the record belongs to another handler.
    pub async fn handle(&self, record: &ParameterRecord) -> Result<Option<HandledQuery>> {
        if !self.supports(record) {
            return Ok(None);
        }
        match self {
            QueryHandler::Template(handler) => handler.handle(record).await.map(Some),
            QueryHandler::Void(handler) => Ok(Some(handler.handle())),
        }
    }
}

impl From<TemplateHandler> for QueryHandler {
    fn from(handler: TemplateHandler) -> Self {
        QueryHandler::Template(handler)
    }
}

impl From<VoidHandler> for QueryHandler {
    fn from(handler: VoidHandler) -> Self {
        QueryHandler::Void(handler)
    }
}
