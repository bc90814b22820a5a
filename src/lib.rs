//! # slashcsv
//!
//! A **streaming CSV reader/writer** for a line-oriented, backslash-escaped
//! dialect, binding columns to record fields by name.
//!
//! ## Key Features
//!
//! - **Backslash escapes** - `\t`, `\n`, `\r`, `\f`, `\"` and `\\` instead of
//!   RFC 4180 quote doubling; one record is always one line
//! - **Name-tolerant headers** - `user_name`, `user name` and `UserName` all
//!   bind to the field `UserName`
//! - **Windowed reads** - skip/take over rows and columns while streaming
//! - **Best-effort cells** - a cell that does not convert leaves its field at
//!   the default instead of failing the row
//! - **Transparent compression** - gzip and zstd for path-based sessions
//!   (optional via feature flags)
//!
//! ## Quick Start
//!
//! ```
//! use slashcsv::{csv_record, read_all, write_all};
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! csv_record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     struct Reply {
//!         user_name: String,
//!         message: String,
//!         like_count: u32,
//!     }
//! }
//!
//! let mut buf = Vec::new();
//! write_all(&mut buf, vec![Reply {
//!     user_name: "ann".into(),
//!     message: "first line\nsecond, line".into(),
//!     like_count: 3,
//! }])?;
//! let text = String::from_utf8(buf)?;
//! assert_eq!(text, "UserName,Message,LikeCount\nann,\"first line\\nsecond, line\",3\n");
//!
//! let replies: Vec<Reply> = read_all::<Reply, _>(text.as_bytes())?.collect::<Result<_>>()?;
//! assert_eq!(replies[0].message, "first line\nsecond, line");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`naming`] - identifier splitting and PascalCase normalization
//! - [`cell`] - line codec for the dialect
//! - [`record`] - the [`Record`] capability and the `csv_record!`/`csv_enum!` macros
//! - [`window`] - row/column skip and take options
//! - [`reader`] / [`writer`] - streaming sessions
//! - [`io`] - bulk read/write helpers and compression
//! - [`testing`] - temporary-file helpers for tests
//!
//! ## Feature Flags
//!
//! - `compression-gzip` - `.gz` files via `flate2`
//! - `compression-zstd` - `.zst` files via `zstd`

#![warn(missing_docs)]

pub mod cell;
pub mod error;
pub mod io;
pub mod naming;
pub mod reader;
pub mod record;
pub mod testing;
pub mod window;
pub mod writer;

pub use cell::{Cell, format_cell, split_line};
pub use error::CsvError;
pub use io::records::{
    ReadAll, read_all, read_all_from, read_all_path, read_all_vec, write_all, write_all_path,
    write_slice,
};
pub use naming::{split_words, to_pascal_case};
pub use reader::{CsvReader, FieldBinding};
pub use record::{FieldDescriptor, FieldKind, FieldValue, Record};
pub use window::Window;
pub use writer::CsvWriter;

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
}
