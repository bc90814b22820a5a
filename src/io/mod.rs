//! File-level helpers: bulk record I/O and transparent compression.

pub mod compression;
pub mod records;
