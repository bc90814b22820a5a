//! Bulk entry points over reader and writer sessions.
//!
//! - **Lazy reads**: [`read_all`], [`read_all_from`] and [`read_all_path`]
//!   return a [`ReadAll`] iterator that owns its session and releases it when
//!   the iterator is exhausted, fails, or is dropped early.
//! - **Eager reads**: [`read_all_vec`] collects a whole file.
//! - **Writes**: [`write_all`], [`write_all_path`] and [`write_slice`] write
//!   every record and flush the sink on every exit path.

use crate::reader::CsvReader;
use crate::record::Record;
use crate::writer::CsvWriter;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Lazy, fused sequence of records owning a [`CsvReader`].
///
/// The reader (and for path sessions the file) is dropped as soon as the
/// sequence ends.
pub struct ReadAll<R: Record, S> {
    reader: Option<CsvReader<R, S>>,
}

impl<R: Record, S: BufRead> ReadAll<R, S> {
    /// Wrap an existing session. Window options must already be set.
    pub fn new(reader: CsvReader<R, S>) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R: Record, S: BufRead> Iterator for ReadAll<R, S> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.reader.as_mut()?.next_record();
        if !matches!(item, Some(Ok(_))) {
            self.reader = None;
        }
        item
    }
}

impl<R: Record, S: BufRead> std::iter::FusedIterator for ReadAll<R, S> {}

/// Read records lazily from a text source owned by the caller.
///
/// # Errors
/// Returns an error if the record model is invalid.
pub fn read_all<R: Record, S: BufRead>(source: S) -> Result<ReadAll<R, S>> {
    Ok(ReadAll::new(CsvReader::from_buf_reader(source)?))
}

/// Read records lazily from a byte stream owned by the caller.
///
/// # Errors
/// Returns an error if the record model is invalid.
pub fn read_all_from<R: Record, T: Read>(reader: T) -> Result<ReadAll<R, BufReader<T>>> {
    Ok(ReadAll::new(CsvReader::from_reader(reader)?))
}

/// Read records lazily from a file. The file is closed when the sequence
/// ends or is dropped.
///
/// # Errors
/// Returns an error if the record model is invalid or the file cannot be
/// opened.
pub fn read_all_path<R: Record>(path: impl AsRef<Path>) -> Result<ReadAll<R, Box<dyn BufRead>>> {
    Ok(ReadAll::new(CsvReader::from_path(path)?))
}

/// Read a whole file into memory.
///
/// Header failures and row failures are annotated separately; row errors
/// carry the data row number.
///
/// # Errors
/// Returns an error if the file cannot be opened, the header cannot be bound,
/// or reading fails.
pub fn read_all_vec<R: Record>(path: impl AsRef<Path>) -> Result<Vec<R>> {
    let path = path.as_ref();
    let mut reader = CsvReader::<R, _>::from_path(path)?;
    let mut out = Vec::new();
    while let Some(rec) = reader.next_record() {
        match rec {
            Ok(rec) => out.push(rec),
            Err(err) if reader.bindings().is_none() => {
                return Err(err.context(format!("bind CSV header of {}", path.display())));
            }
            Err(err) => {
                let row = out.len() + 1;
                return Err(err.context(format!("read CSV record #{row} from {}", path.display())));
            }
        }
    }
    Ok(out)
}

/// Write every record to a stream owned by the caller.
///
/// The stream is flushed whether or not writing succeeds; the first error is
/// returned.
///
/// # Returns
/// The number of records written.
///
/// # Errors
/// Propagates I/O errors from the stream.
pub fn write_all<R, W, I>(sink: W, records: I) -> Result<usize>
where
    R: Record,
    W: Write,
    I: IntoIterator<Item = R>,
{
    let mut writer = CsvWriter::<R, W>::from_writer(sink)?;
    drain(&mut writer, records)
}

/// Write every record to a file, creating parent directories as needed.
///
/// The file is finished explicitly, so a failure to write a compression
/// trailer is reported.
///
/// # Returns
/// The number of records written.
///
/// # Errors
/// Returns an error if the file cannot be created or any write fails.
pub fn write_all_path<R, I>(path: impl AsRef<Path>, records: I) -> Result<usize>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let path = path.as_ref();
    let mut writer = CsvWriter::<R, _>::from_path(path)?;
    let n = drain(&mut writer, records).with_context(|| format!("write {}", path.display()))?;
    writer.finish().with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = n, "wrote CSV file");
    Ok(n)
}

/// Write a slice of records to a stream owned by the caller.
///
/// # Errors
/// Propagates I/O errors from the stream.
pub fn write_slice<R: Record, W: Write>(sink: W, records: &[R]) -> Result<usize> {
    let mut writer = CsvWriter::<R, W>::from_writer(sink)?;
    let written = records.iter().try_for_each(|r| writer.write(r));
    let flushed = writer.flush();
    written?;
    flushed?;
    Ok(writer.rows_written())
}

fn drain<R, W, I>(writer: &mut CsvWriter<R, W>, records: I) -> Result<usize>
where
    R: Record,
    W: Write,
    I: IntoIterator<Item = R>,
{
    let written = records.into_iter().try_for_each(|r| writer.write(&r));
    let flushed = writer.flush();
    written?;
    flushed?;
    Ok(writer.rows_written())
}
