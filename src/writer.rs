//! Streaming record writer.
//!
//! The first [`CsvWriter::write`] emits a header line of declared field names;
//! every call then emits one row. Lines end with `\n`.
//!
//! Output is buffered inside the writer, so a row reaches the sink as part of
//! one larger write and never split from its line terminator.
//!
//! [`CsvWriter::from_path`] owns its file: dropping the writer flushes and
//! closes it, ignoring errors. Call [`CsvWriter::finish`] to see them.
//! [`CsvWriter::from_writer`] never closes the caller's stream; call
//! [`CsvWriter::flush`] or [`CsvWriter::into_inner`] when done.

use crate::cell::format_line;
use crate::io::compression::{FileSink, create_sink};
use crate::record::{FieldDescriptor, Record, validate_model};
use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Record writer over a byte sink.
pub struct CsvWriter<R: Record, W: Write> {
    sink: BufWriter<W>,
    header: Option<&'static [FieldDescriptor<R>]>,
    rows_written: usize,
}

impl<R: Record> CsvWriter<R, FileSink> {
    /// Create or truncate a file, compressing by extension.
    ///
    /// # Errors
    /// Returns an error if the record model is invalid or the file cannot be
    /// created.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        validate_model::<R>()?;
        let sink = create_sink(path)?;
        tracing::debug!(path = %path.display(), model = std::any::type_name::<R>(), "opened CSV writer");
        Ok(Self::new(sink))
    }

    /// Flush, end the compressed stream if there is one, and close the file.
    ///
    /// # Errors
    /// Propagates I/O errors from the final flush or from writing the
    /// compression trailer.
    pub fn finish(self) -> Result<()> {
        let mut sink = self.into_inner()?;
        let codec = sink.codec().unwrap_or("plain");
        sink.finish().with_context(|| format!("finish {codec} stream"))?;
        Ok(())
    }
}

impl<R: Record, W: Write> CsvWriter<R, W> {
    /// Write to a stream owned by the caller.
    ///
    /// # Errors
    /// Returns an error if the record model is invalid.
    pub fn from_writer(sink: W) -> Result<Self> {
        validate_model::<R>()?;
        Ok(Self::new(sink))
    }

    fn new(sink: W) -> Self {
        Self {
            sink: BufWriter::new(sink),
            header: None,
            rows_written: 0,
        }
    }

    /// Write one record, preceded by the header on the first call.
    ///
    /// The header and the row go out in a single write; the header counts as
    /// written only once that write succeeds.
    ///
    /// # Errors
    /// Propagates I/O errors from the sink.
    pub fn write(&mut self, record: &R) -> Result<()> {
        let fields = R::fields();
        let mut text = String::new();
        if self.header.is_none() {
            text.push_str(&format_line(fields.iter().map(|f| f.name())));
            text.push('\n');
        }
        text.push_str(&format_line(fields.iter().map(|f| f.get(record))));
        text.push('\n');

        self.sink.write_all(text.as_bytes())?;
        self.header = Some(fields);
        self.rows_written += 1;
        Ok(())
    }

    /// Whether the header line has been written.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.header.is_some()
    }

    /// Data rows written so far, excluding the header.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Push buffered rows to the sink and flush it.
    ///
    /// # Errors
    /// Propagates I/O errors from the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Borrow the underlying sink. Buffered rows are not visible here until
    /// [`flush`](Self::flush).
    pub fn get_ref(&self) -> &W {
        self.sink.get_ref()
    }

    /// Mutably borrow the underlying sink. Writing to it directly interleaves
    /// with buffered rows; flush first.
    pub fn get_mut(&mut self) -> &mut W {
        self.sink.get_mut()
    }

    /// Flush and give the sink back to the caller.
    ///
    /// # Errors
    /// Propagates I/O errors from the final flush.
    pub fn into_inner(self) -> Result<W> {
        let mut sink = self.sink.into_inner().map_err(|err| err.into_error())?;
        sink.flush()?;
        Ok(sink)
    }
}
