//! Row and column windows for streaming reads.
//!
//! A [`Window`] selects a contiguous range of data rows and a contiguous
//! range of cells within each row. Every bound is optional: `None` means
//! "no skip" or "no limit".
//!
//! The window derives Serde traits with defaults for every field, so host
//! applications can keep it in their own configuration:
//!
//! ```
//! use slashcsv::Window;
//!
//! let w = Window::default().rows(1, 2).columns(1, 2);
//! assert_eq!(w.row_skip, Some(1));
//! assert_eq!(w.column_take, Some(2));
//! ```

use serde::{Deserialize, Serialize};

/// Skip/take bounds applied by a reader session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    /// Data rows to discard before the first emitted row.
    pub row_skip: Option<usize>,
    /// Maximum number of rows to emit.
    pub row_take: Option<usize>,
    /// Cells to ignore at the start of every row.
    pub column_skip: Option<usize>,
    /// Maximum number of cells to bind per row, after `column_skip`.
    pub column_take: Option<usize>,
}

impl Window {
    /// Set both row bounds.
    #[must_use]
    pub fn rows(mut self, skip: usize, take: usize) -> Self {
        self.row_skip = Some(skip);
        self.row_take = Some(take);
        self
    }

    /// Set both column bounds.
    #[must_use]
    pub fn columns(mut self, skip: usize, take: usize) -> Self {
        self.column_skip = Some(skip);
        self.column_take = Some(take);
        self
    }

    /// Whether no bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    /// Cell indices of a row with `cell_count` cells that may be bound.
    ///
    /// The caller still stops at the end of its header bindings.
    #[must_use]
    pub fn column_range(&self, cell_count: usize) -> std::ops::Range<usize> {
        let skip = self.column_skip.unwrap_or(0);
        let take = self
            .column_take
            .unwrap_or_else(|| cell_count.saturating_sub(skip));
        skip..skip.saturating_add(take)
    }
}
