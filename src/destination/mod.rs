use crate::error::Result;
use async_trait::async_trait;

pub mod directory;

pub use directory::DirectoryDestination;

/// A destination for generated queries and their expected results.
#[async_trait]
pub trait QueryResultDestination: Send + Sync {
    /// Writes away one query-results pair.
    ///
    /// # Arguments
    ///
    /// * `index` - Numerical identifier of the query, counting up from 0
    /// * `query` - The query string
    /// * `results` - The serialized expected results
    async fn write(&self, index: usize, query: &str, results: &str) -> Result<()>;
}
