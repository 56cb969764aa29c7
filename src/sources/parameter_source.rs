use crate::core::ParameterRecord;
use crate::error::{Error, Result};
use crate::parsing::LineParser;
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// A lazy, single-pass sequence of parsed records.
/// The first error ends the sequence.
pub type RecordStream = BoxStream<'static, Result<ParameterRecord>>;

/// A source of validation parameters.
#[async_trait]
pub trait ParameterSource: Send + Sync {
    /// Opens the source and returns its records in input order.
    async fn parameters(&self) -> Result<RecordStream>;
}

/// Reads an LDBC SNB validation parameters file.
pub struct LdbcValidationSource {
    path: PathBuf,
}

impl LdbcValidationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LdbcValidationSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ParameterSource for LdbcValidationSource {
    async fn parameters(&self) -> Result<RecordStream> {
        let file = File::open(&self.path)
            .await
            .map_err(|source| Error::SourceOpen { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), "opened parameters file");

        // The file is owned by the stream and closed when the stream is dropped.
        record_stream(BufReader::new(file))
    }
}

/// Parses every `\n`-separated line of `reader` into a record, lazily.
///
/// A final line without a newline is still parsed, empty lines are skipped.
pub fn record_stream<R>(reader: R) -> Result<RecordStream>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = LineState { reader, parser: LineParser::new()?, buffer: Vec::new() };
    Ok(stream::try_unfold(state, next_record).boxed())
}

struct LineState<R> {
    reader: R,
    parser: LineParser,
    buffer: Vec<u8>,
}

async fn next_record<R>(mut state: LineState<R>) -> Result<Option<(ParameterRecord, LineState<R>)>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        state.buffer.clear();
        if state.reader.read_until(b'\n', &mut state.buffer).await? == 0 {
            return Ok(None);
        }
        if state.buffer.last() == Some(&b'\n') {
            state.buffer.pop();
        }

        let parsed = {
            let line = String::from_utf8_lossy(&state.buffer);
            state.parser.parse(&line)?
        };
        if let Some(record) = parsed {
            return Ok(Some((record, state)));
        }
    }
}
