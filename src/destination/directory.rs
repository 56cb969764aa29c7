use super::QueryResultDestination;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Writes every query to `<index>.sparql` and its results to `<index>.results`
/// inside one directory.
pub struct DirectoryDestination {
    path: PathBuf,
}

impl DirectoryDestination {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DirectoryDestination { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn query_path(&self, index: usize) -> PathBuf {
        self.path.join(format!("{}.sparql", index))
    }

    pub fn results_path(&self, index: usize) -> PathBuf {
        self.path.join(format!("{}.results", index))
    }
}

#[async_trait]
impl QueryResultDestination for DirectoryDestination {
    async fn write(&self, index: usize, query: &str, results: &str) -> Result<()> {
        fs::create_dir_all(&self.path).await?;
        fs::write(self.query_path(index), query).await?;
        fs::write(self.results_path(index), results).await?;
        debug!(index, directory = %self.path.display(), "wrote query and results");
        Ok(())
    }
}
