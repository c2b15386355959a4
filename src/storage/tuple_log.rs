use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::Arc;
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use crate::core::config::SyncMode;
use crate::core::error::{Error, Result};
use crate::core::types::Field;
use crate::schema::schema::Schema;
use crate::storage::layout::StorageLayout;
use crate::storage::writer::DataWriter;
use crate::tuple::tuple::Tuple;

/// Upper bound on one encoded entry, enforced on write and on read
pub const MAX_ENTRY_BYTES: usize = 16 * 1024 * 1024;

const HEADER_BYTES: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogEntry {
    fields: Vec<Field>,
}

// [ LEN u32 LE ][ CRC32 u32 LE ][ bincode(LogEntry) ]
// [ LEN ][ CRC ][ ... ]
fn write_entry(out: &mut impl Write, entry: &LogEntry) -> Result<()> {
    let data = bincode::serialize(entry)?;
    if data.len() > MAX_ENTRY_BYTES {
        return Err(Error::storage(format!(
            "encoded tuple is {} bytes, limit is {}", data.len(), MAX_ENTRY_BYTES
        )));
    }
    let mut hasher = Hasher::new();
    hasher.update(&data);

    out.write_all(&(data.len() as u32).to_le_bytes()).map_err(storage_io)?;
    out.write_all(&hasher.finalize().to_le_bytes()).map_err(storage_io)?;
    out.write_all(&data).map_err(storage_io)?;
    Ok(())
}

fn storage_io(err: std::io::Error) -> Error {
    Error::storage(err)
}

/// Fill `buf` as far as the input allows, returning the bytes read
fn read_up_to(input: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(storage_io(e)),
        }
    }
    Ok(filled)
}

/// Append-only tuple log for one table.
///
/// The table schema is stored next to the log on first open; later opens
/// must use an identical schema.
pub struct TupleLogWriter {
    layout: Arc<StorageLayout>,
    table: String,
    schema: Arc<Schema>,
    sync_mode: SyncMode,
    file: Option<BufWriter<File>>,
    inserted: u64,
}

impl TupleLogWriter {
    pub fn new(
        layout: Arc<StorageLayout>,
        table: impl Into<String>,
        schema: Arc<Schema>,
        sync_mode: SyncMode,
    ) -> Self {
        TupleLogWriter {
            layout,
            table: table.into(),
            schema,
            sync_mode,
            file: None,
            inserted: 0,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn check_schema_file(&self) -> Result<()> {
        let path = self.layout.table_schema_path(&self.table);
        if path.exists() {
            let stored: Schema = serde_json::from_str(&fs::read_to_string(&path).map_err(storage_io)?)
                .map_err(Error::storage)?;
            if stored != *self.schema {
                return Err(Error::storage(format!(
                    "table {} already exists with a different schema", self.table
                )));
            }
        } else {
            let json = serde_json::to_string_pretty(&*self.schema).map_err(Error::storage)?;
            fs::write(&path, json).map_err(storage_io)?;
        }
        Ok(())
    }
}

impl DataWriter for TupleLogWriter {
    fn open(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Err(Error::storage(format!("table {} already open", self.table)));
        }
        self.check_schema_file()?;

        let path = self.layout.table_log_path(&self.table);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(storage_io)?;

        tracing::debug!(table = %self.table, "opened tuple log");
        self.file = Some(BufWriter::new(file));
        Ok(())
    }

    fn insert(&mut self, tuple: &Tuple) -> Result<()> {
        if !Arc::ptr_eq(tuple.schema(), &self.schema) && tuple.schema().as_ref() != self.schema.as_ref() {
            return Err(Error::storage(format!("tuple schema does not match table {}", self.table)));
        }
        let file = self.file.as_mut()
            .ok_or_else(|| Error::storage(format!("table {} not open", self.table)))?;

        let entry = LogEntry {
            fields: tuple.fields().to_vec(),
        };
        write_entry(file, &entry)?;
        self.inserted += 1;

        if self.sync_mode == SyncMode::Immediate {
            file.flush().map_err(storage_io)?;
            file.get_ref().sync_all().map_err(storage_io)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.flush().map_err(storage_io)?;
        if self.sync_mode != SyncMode::None {
            file.get_ref().sync_all().map_err(storage_io)?;
        }
        tracing::debug!(table = %self.table, inserted = self.inserted, "closed tuple log");
        Ok(())
    }
}

/// Reads a table written by [`TupleLogWriter`] back into tuples
///
/// A log that ends part-way through an entry (torn header or payload) is
/// reported as a storage error carrying the entry's byte offset.
pub struct TupleLogReader {
    schema: Arc<Schema>,
    reader: BufReader<File>,
    offset: u64,
}

impl TupleLogReader {
    pub fn open(layout: &StorageLayout, table: &str) -> Result<Self> {
        let json = fs::read_to_string(layout.table_schema_path(table)).map_err(storage_io)?;
        let schema: Schema = serde_json::from_str(&json).map_err(Error::storage)?;
        let file = File::open(layout.table_log_path(table)).map_err(storage_io)?;

        Ok(TupleLogReader {
            schema: Arc::new(schema),
            reader: BufReader::new(file),
            offset: 0,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Next tuple, or `None` at a clean end of log
    pub fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        let start = self.offset;
        let mut header = [0u8; HEADER_BYTES];
        match read_up_to(&mut self.reader, &mut header)? {
            0 => return Ok(None),
            HEADER_BYTES => {}
            n => return Err(torn_entry(start, n, HEADER_BYTES)),
        }

        let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if len > MAX_ENTRY_BYTES {
            return Err(Error::storage(format!(
                "tuple log entry at offset {} too large, possibly corrupted", start
            )));
        }

        let mut data = vec![0u8; len];
        let n = read_up_to(&mut self.reader, &mut data)?;
        if n < len {
            return Err(torn_entry(start, HEADER_BYTES + n, HEADER_BYTES + len));
        }
        self.offset += (HEADER_BYTES + len) as u64;

        let mut hasher = Hasher::new();
        hasher.update(&data);
        if hasher.finalize() != crc {
            return Err(Error::storage("tuple log checksum mismatch"));
        }

        let entry: LogEntry = bincode::deserialize(&data)?;
        Tuple::new(Arc::clone(&self.schema), entry.fields).map(Some)
    }

    pub fn read_all(mut self) -> Result<Vec<Tuple>> {
        let mut tuples = Vec::new();
        while let Some(tuple) = self.next_tuple()? {
            tuples.push(tuple);
        }
        Ok(tuples)
    }
}

fn torn_entry(offset: u64, got: usize, expected: usize) -> Error {
    Error::storage(format!(
        "torn tuple log entry at offset {}: {} of {} bytes present", offset, got, expected
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::types::AttributeType;
    use crate::schema::schema::Attribute;
    use crate::storage::writer::WriterSession;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Attribute::new("id", AttributeType::Integer),
            Attribute::new("body", AttributeType::Text),
            Attribute::new("published", AttributeType::Date),
        ]).unwrap())
    }

    fn row(schema: &Arc<Schema>, id: i32) -> Tuple {
        Tuple::new(Arc::clone(schema), vec![
            Field::Integer(id),
            Field::Text(format!("body {}", id)),
            Field::Date(NaiveDate::from_ymd_opt(2020, 1, 1 + id as u32).unwrap()),
        ]).unwrap()
    }

    #[test]
    fn writes_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());
        let schema = schema();

        let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema.clone(), SyncMode::Batch);
        let mut session = WriterSession::begin(&mut writer).unwrap();
        for id in 0..3 {
            session.insert(&row(&schema, id)).unwrap();
        }
        session.finish().unwrap();

        let tuples = TupleLogReader::open(&layout, "docs").unwrap().read_all().unwrap();
        assert_eq!(tuples, (0..3).map(|id| row(&schema, id)).collect::<Vec<_>>());
        assert_eq!(layout.tables().unwrap(), vec!["docs".to_string()]);
    }

    #[test]
    fn reopening_appends() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());
        let schema = schema();

        for id in 0..2 {
            let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema.clone(), SyncMode::None);
            writer.open().unwrap();
            writer.insert(&row(&schema, id)).unwrap();
            writer.close().unwrap();
        }

        assert_eq!(TupleLogReader::open(&layout, "docs").unwrap().read_all().unwrap().len(), 2);
    }

    #[test]
    fn rejects_schema_change_and_foreign_tuples() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());

        let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema(), SyncMode::Batch);
        writer.open().unwrap();

        let other = Arc::new(Schema::new(vec![Attribute::new("id", AttributeType::Integer)]).unwrap());
        let foreign = Tuple::new(other.clone(), vec![Field::Integer(1)]).unwrap();
        assert!(matches!(writer.insert(&foreign).unwrap_err().kind, ErrorKind::Storage(_)));
        writer.close().unwrap();

        let mut changed = TupleLogWriter::new(layout, "docs", other, SyncMode::Batch);
        assert!(matches!(changed.open().unwrap_err().kind, ErrorKind::Storage(_)));
    }

    #[test]
    fn accepts_tuples_from_an_equal_schema_instance() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());

        let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema(), SyncMode::Batch);
        writer.open().unwrap();
        let separate = schema();
        writer.insert(&row(&separate, 1)).unwrap();
        writer.close().unwrap();

        assert_eq!(TupleLogReader::open(&layout, "docs").unwrap().read_all().unwrap().len(), 1);
    }

    #[test]
    fn oversized_tuple_is_rejected_on_insert() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());
        let schema = schema();

        let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema.clone(), SyncMode::Batch);
        writer.open().unwrap();
        let huge = Tuple::new(schema.clone(), vec![
            Field::Integer(1),
            Field::Text("x".repeat(MAX_ENTRY_BYTES + 1024)),
            Field::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        ]).unwrap();
        let err = writer.insert(&huge).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Storage(ref m) if m.contains("limit")));

        writer.insert(&row(&schema, 2)).unwrap();
        writer.close().unwrap();

        let tuples = TupleLogReader::open(&layout, "docs").unwrap().read_all().unwrap();
        assert_eq!(tuples, vec![row(&schema, 2)]);
    }

    #[test]
    fn torn_tail_is_an_error_in_header_and_payload() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());
        let schema = schema();
        let path = layout.table_log_path("docs");

        let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema.clone(), SyncMode::Batch);
        writer.open().unwrap();
        writer.insert(&row(&schema, 1)).unwrap();
        writer.close().unwrap();
        let first_len = fs::metadata(&path).unwrap().len() as usize;

        writer.open().unwrap();
        writer.insert(&row(&schema, 2)).unwrap();
        writer.close().unwrap();
        let full = fs::read(&path).unwrap();

        for cut in [4, 10] {
            fs::write(&path, &full[..first_len + cut]).unwrap();

            let mut reader = TupleLogReader::open(&layout, "docs").unwrap();
            assert_eq!(reader.next_tuple().unwrap(), Some(row(&schema, 1)));
            let err = reader.next_tuple().unwrap_err();
            assert!(
                matches!(err.kind, ErrorKind::Storage(ref m) if m.contains(&format!("torn tuple log entry at offset {}", first_len))),
                "cut {}: {}", cut, err
            );
        }
    }

    #[test]
    fn detects_corruption() {
        let dir = TempDir::new().unwrap();
        let layout = Arc::new(StorageLayout::new(dir.path().to_path_buf()).unwrap());
        let schema = schema();

        let mut writer = TupleLogWriter::new(layout.clone(), "docs", schema.clone(), SyncMode::Batch);
        writer.open().unwrap();
        writer.insert(&row(&schema, 1)).unwrap();
        writer.close().unwrap();

        let path = layout.table_log_path("docs");
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        let err = TupleLogReader::open(&layout, "docs").unwrap().read_all().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Storage(ref m) if m.contains("checksum")));
    }
}
