use super::HandledQuery;

/// A handler that claims a query identifier but produces nothing for it.
///
/// Used for queries that cannot be validated by comparing results,
/// such as updates.
#[derive(Debug, Clone)]
pub struct VoidHandler {
    identifier: String,
}

impl VoidHandler {
    pub fn new(identifier: &str) -> Self {
        VoidHandler { identifier: identifier.to_string() }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn handle(&self) -> HandledQuery {
        HandledQuery::void()
    }
}
