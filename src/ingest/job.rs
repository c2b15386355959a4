use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::schema::schema::Schema;
use crate::storage::writer::{DataWriter, WriterSession};
use crate::tuple::tuple::Tuple;

/// Outcome of a completed ingestion job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub job_id: Uuid,
    pub records: usize,
    pub skipped_lines: usize,
}

/// Loads JSON-lines records of one schema into a [`DataWriter`].
///
/// The writer is opened once, receives one insert per record and is closed
/// on every exit path. The first bad record or storage failure aborts the
/// job; nothing is retried.
pub struct IngestJob {
    schema: Arc<Schema>,
    config: Config,
}

impl IngestJob {
    pub fn new(schema: Arc<Schema>, config: Config) -> Self {
        IngestJob { schema, config }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[tracing::instrument(level = "info", skip_all, fields(job_id = tracing::field::Empty))]
    pub fn run<R, W>(&self, input: R, writer: &mut W) -> Result<IngestReport>
    where
        R: BufRead,
        W: DataWriter + ?Sized,
    {
        let job_id = Uuid::new_v4();
        tracing::Span::current().record("job_id", tracing::field::display(job_id));
        tracing::info!(attributes = self.schema.attribute_count(), "starting ingestion");

        let mut session = WriterSession::begin(writer)?;
        let mut skipped_lines = 0;

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| Error::from(e)
                .with_context(format!("line {}", line_no)))?;

            if line.trim().is_empty() {
                skipped_lines += 1;
                continue;
            }

            let tuple = Tuple::from_json_line(&self.schema, &line).map_err(|e| {
                tracing::warn!(line = line_no, error = %e, "rejected record");
                e.with_context(format!("line {}: {}", line_no, self.excerpt(&line)))
            })?;

            session.insert(&tuple).map_err(|e| {
                tracing::warn!(line = line_no, error = %e, "failed to store record");
                e.with_context(format!("line {}", line_no))
            })?;

            if self.config.progress_interval > 0 && session.inserted() % self.config.progress_interval == 0 {
                tracing::debug!(records = session.inserted(), "ingestion progress");
            }
        }

        let records = session.finish()?;
        tracing::info!(records, skipped_lines, "finished ingestion");

        Ok(IngestReport {
            job_id,
            records,
            skipped_lines,
        })
    }

    pub fn ingest_file<W>(&self, path: impl AsRef<Path>, writer: &mut W) -> Result<IngestReport>
    where
        W: DataWriter + ?Sized,
    {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::from(e).with_context(path.display().to_string()))?;
        self.run(BufReader::new(file), writer)
    }

    fn excerpt<'a>(&self, line: &'a str) -> &'a str {
        match line.char_indices().nth(self.config.record_context_chars) {
            Some((end, _)) => &line[..end],
            None => line,
        }
    }
}
