//! Streaming record reader.
//!
//! A [`CsvReader`] reads one header line, binds each header cell to a field of
//! the record type, and then turns every following line into a fresh record.
//!
//! # Ownership
//! - [`CsvReader::from_path`] owns its file and closes it on drop.
//! - [`CsvReader::from_reader`] and [`CsvReader::from_buf_reader`] never close
//!   the caller's stream. Pass `&mut stream` to keep using it afterwards, or
//!   take it back with [`CsvReader::into_inner`].
//!
//! # Windows
//! Row and column bounds ([`Window`]) must be set before the first call to
//! [`CsvReader::read`]. Changing them afterwards fails with
//! [`CsvError::SessionAlreadyStarted`].

use crate::cell::{Cell, split_line};
use crate::naming::to_pascal_case;
use crate::record::{FieldDescriptor, FieldKind, Record, validate_model};
use crate::{CsvError, Window};
use anyhow::Result;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Resolved association between a CSV column and a record field.
#[derive(Debug)]
pub struct FieldBinding<R: 'static> {
    /// Zero-based column position in the header.
    pub column: usize,
    /// The bound field.
    pub field: &'static FieldDescriptor<R>,
}

/// Record reader over a buffered text source.
pub struct CsvReader<R: Record, S> {
    source: S,
    window: Window,
    bindings: Option<Vec<FieldBinding<R>>>,
    header_error: Option<CsvError>,
    rows_skipped: usize,
    rows_emitted: usize,
    current: Option<R>,
    line: String,
}

impl<R: Record> CsvReader<R, Box<dyn BufRead>> {
    /// Open a file. Compressed files are decoded transparently.
    ///
    /// # Errors
    /// Returns an error if the record model is invalid or the file cannot be
    /// opened.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        validate_model::<R>()?;
        let source = crate::io::compression::open_source(path)?;
        tracing::debug!(path = %path.display(), model = std::any::type_name::<R>(), "opened CSV reader");
        Ok(Self::new(source))
    }
}

impl<R: Record, T: Read> CsvReader<R, BufReader<T>> {
    /// Read from a byte stream owned by the caller.
    ///
    /// # Errors
    /// Returns an error if the record model is invalid.
    pub fn from_reader(reader: T) -> Result<Self> {
        Self::from_buf_reader(BufReader::new(reader))
    }
}

impl<R: Record, S: BufRead> CsvReader<R, S> {
    /// Read from a text source owned by the caller.
    ///
    /// # Errors
    /// Returns an error if the record model is invalid.
    pub fn from_buf_reader(source: S) -> Result<Self> {
        validate_model::<R>()?;
        Ok(Self::new(source))
    }

    fn new(source: S) -> Self {
        Self {
            source,
            window: Window::default(),
            bindings: None,
            header_error: None,
            rows_skipped: 0,
            rows_emitted: 0,
            current: None,
            line: String::new(),
        }
    }

    /// Replace the whole window.
    ///
    /// # Errors
    /// Fails with [`CsvError::SessionAlreadyStarted`] after the first read.
    pub fn with_window(mut self, window: Window) -> Result<Self> {
        self.ensure_not_started("window")?;
        self.window = window;
        Ok(self)
    }

    /// Set how many data rows to skip before the first record.
    ///
    /// # Errors
    /// Fails with [`CsvError::SessionAlreadyStarted`] after the first read.
    pub fn set_row_skip(&mut self, rows: Option<usize>) -> Result<()> {
        self.ensure_not_started("row_skip")?;
        self.window.row_skip = rows;
        Ok(())
    }

    /// Set the maximum number of records to emit.
    ///
    /// # Errors
    /// Fails with [`CsvError::SessionAlreadyStarted`] after the first read.
    pub fn set_row_take(&mut self, rows: Option<usize>) -> Result<()> {
        self.ensure_not_started("row_take")?;
        self.window.row_take = rows;
        Ok(())
    }

    /// Set how many leading columns to leave unpopulated.
    ///
    /// # Errors
    /// Fails with [`CsvError::SessionAlreadyStarted`] after the first read.
    pub fn set_column_skip(&mut self, columns: Option<usize>) -> Result<()> {
        self.ensure_not_started("column_skip")?;
        self.window.column_skip = columns;
        Ok(())
    }

    /// Set how many columns to populate after the skipped ones.
    ///
    /// # Errors
    /// Fails with [`CsvError::SessionAlreadyStarted`] after the first read.
    pub fn set_column_take(&mut self, columns: Option<usize>) -> Result<()> {
        self.ensure_not_started("column_take")?;
        self.window.column_take = columns;
        Ok(())
    }

    fn ensure_not_started(&self, option: &'static str) -> Result<(), CsvError> {
        if self.is_started() {
            return Err(CsvError::SessionAlreadyStarted { option });
        }
        Ok(())
    }

    /// Whether the header has been read (or its binding attempted).
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.bindings.is_some() || self.header_error.is_some()
    }

    /// Row and column bounds in effect.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Header bindings, once the header has been read.
    #[must_use]
    pub fn bindings(&self) -> Option<&[FieldBinding<R>]> {
        self.bindings.as_deref()
    }

    /// Data rows skipped so far by `row_skip`.
    #[must_use]
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    /// Records produced so far.
    #[must_use]
    pub fn rows_emitted(&self) -> usize {
        self.rows_emitted
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the underlying source. Consuming lines from it skips
    /// them for the reader.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Give the source back to the caller.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// The record produced by the last successful [`read`](Self::read).
    ///
    /// # Errors
    /// Fails with [`CsvError::NoCurrentRecord`] before the first successful
    /// read, or after the record was taken.
    pub fn current(&self) -> Result<&R> {
        Ok(self.current.as_ref().ok_or(CsvError::NoCurrentRecord)?)
    }

    /// Move the current record out of the reader.
    ///
    /// # Errors
    /// Fails with [`CsvError::NoCurrentRecord`] when there is no record.
    pub fn take_current(&mut self) -> Result<R> {
        Ok(self.current.take().ok_or(CsvError::NoCurrentRecord)?)
    }

    /// Advance to the next record.
    ///
    /// Returns `Ok(false)` at end of input or once `row_take` rows were
    /// emitted.
    ///
    /// # Errors
    /// Fails with [`CsvError::UnknownColumn`] when a header cell matches no
    /// field, and propagates I/O errors from the source.
    pub fn read(&mut self) -> Result<bool> {
        if let Some(err) = &self.header_error {
            return Err(err.clone().into());
        }
        if self.bindings.is_none() {
            self.read_header()?;
        }

        if let Some(skip) = self.window.row_skip {
            while self.rows_skipped < skip {
                if !self.next_line()? {
                    break;
                }
                self.rows_skipped += 1;
            }
        }

        if self.window.row_take == Some(self.rows_emitted) {
            return Ok(false);
        }

        if !self.next_line()? {
            return Ok(false);
        }

        let cells = split_line(&self.line);
        let mut record = R::default();
        self.populate(&mut record, &cells);
        self.current = Some(record);
        self.rows_emitted += 1;
        Ok(true)
    }

    /// Iterate over the remaining records.
    pub fn records(&mut self) -> Records<'_, R, S> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Read and take the next record; `None` at the end of the window.
    pub(crate) fn next_record(&mut self) -> Option<Result<R>> {
        match self.read() {
            Ok(true) => Some(self.take_current()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }

    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();
        if self.source.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }
        Ok(true)
    }

    fn read_header(&mut self) -> Result<()> {
        if !self.next_line()? {
            self.bindings = Some(Vec::new());
            return Ok(());
        }

        let cells = split_line(&self.line);
        let mut bindings = Vec::with_capacity(cells.len());
        for (column, cell) in cells.iter().enumerate() {
            let Some(field) = resolve_field::<R>(&cell.text) else {
                let err = CsvError::UnknownColumn {
                    column: cell.text.clone(),
                };
                self.header_error = Some(err.clone());
                return Err(err.into());
            };
            bindings.push(FieldBinding { column, field });
        }

        tracing::debug!(
            model = std::any::type_name::<R>(),
            columns = bindings.len(),
            "bound CSV header"
        );
        self.bindings = Some(bindings);
        Ok(())
    }

    fn populate(&self, record: &mut R, cells: &[Cell]) {
        let bindings = self.bindings.as_deref().unwrap_or_default();
        for index in self.window.column_range(cells.len()) {
            let (Some(cell), Some(binding)) = (cells.get(index), bindings.get(index)) else {
                break;
            };
            let field = binding.field;
            let converted = match field.kind() {
                FieldKind::Enumeration if cell.text.trim().is_empty() => continue,
                FieldKind::Enumeration | FieldKind::Convertible => field.set(record, &cell.text),
                FieldKind::Opaque => continue,
            };
            if !converted {
                tracing::trace!(
                    field = field.name(),
                    column = index,
                    text = %cell.text,
                    "cell not convertible, keeping default"
                );
            }
        }
    }
}

fn resolve_field<R: Record>(header: &str) -> Option<&'static FieldDescriptor<R>> {
    R::field(header).or_else(|| R::field(&to_pascal_case(header)))
}

/// Borrowing iterator over a reader's remaining records.
///
/// Yields `Err` once on failure and then stops.
pub struct Records<'a, R: Record, S> {
    reader: &'a mut CsvReader<R, S>,
    done: bool,
}

impl<R: Record, S: BufRead> Iterator for Records<'_, R, S> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.reader.next_record();
        self.done = !matches!(item, Some(Ok(_)));
        item
    }
}

impl<R: Record, S: BufRead> std::iter::FusedIterator for Records<'_, R, S> {}
