//! Transparent compression for path-based sessions.
//!
//! Sessions opened with `from_path` pass their file through this module:
//! - on read, the codec is picked from the file extension, falling back to the
//!   leading magic bytes;
//! - on write, the codec is picked from the extension only.
//!
//! Files without a recognized codec are read and written as plain text.
//!
//! ## Built-in Codecs
//! - **Gzip** (`.gz`, `.gzip`) via `flate2` (feature: `compression-gzip`)
//! - **Zstd** (`.zst`, `.zstd`) via `zstd` (feature: `compression-zstd`)

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// A compression format that can wrap file streams.
pub trait Codec: Sync {
    /// Codec name used in log and error messages.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions, including the leading dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Signature at the start of a compressed stream.
    fn magic_bytes(&self) -> &'static [u8];

    /// Decode a compressed stream.
    fn wrap_reader(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>>;

    /// Encode into a file. The trailer is written by [`FinishWrite::finish`].
    fn wrap_writer(&self, file: File) -> std::io::Result<Box<dyn FinishWrite>>;
}

/// An output stream with an explicit end.
pub trait FinishWrite: Write {
    /// Flush pending data and write any trailer the format needs.
    ///
    /// Calling it again is a no-op.
    fn finish(&mut self) -> std::io::Result<()>;
}

impl FinishWrite for File {
    fn finish(&mut self) -> std::io::Result<()> {
        self.flush()
    }
}

/// File sink returned by [`create_sink`].
///
/// Dropping it finishes the stream but discards errors; call
/// [`FileSink::finish`] to observe them.
pub struct FileSink {
    inner: Box<dyn FinishWrite>,
    codec: Option<&'static str>,
}

impl FileSink {
    /// Name of the codec in use, or `None` for plain text.
    #[must_use]
    pub fn codec(&self) -> Option<&'static str> {
        self.codec
    }

    /// Finish the compressed stream, if any.
    ///
    /// # Errors
    /// Propagates I/O errors from writing the trailer.
    pub fn finish(&mut self) -> std::io::Result<()> {
        self.inner.finish()
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

static CODECS: &[&dyn Codec] = &[
    #[cfg(feature = "compression-gzip")]
    &GzipCodec,
    #[cfg(feature = "compression-zstd")]
    &ZstdCodec,
];

/// Codecs compiled into this build.
#[must_use]
pub fn codecs() -> &'static [&'static dyn Codec] {
    CODECS
}

fn detect_from_extension(path: &Path) -> Option<&'static dyn Codec> {
    let name = path.to_string_lossy().to_lowercase();
    CODECS
        .iter()
        .copied()
        .find(|codec| codec.extensions().iter().any(|ext| name.ends_with(ext)))
}

fn detect_from_magic<R: BufRead>(reader: &mut R) -> Option<&'static dyn Codec> {
    let head = reader.fill_buf().ok()?;
    CODECS
        .iter()
        .copied()
        .find(|codec| head.starts_with(codec.magic_bytes()))
}

/// Open `path` for reading as a buffered, decompressed text source.
///
/// # Errors
/// Returns an error if the file cannot be opened or the decoder cannot be
/// set up.
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;

    if let Some(codec) = detect_from_extension(path) {
        tracing::debug!(path = %path.display(), codec = codec.name(), "decompressing by extension");
        let inner = codec
            .wrap_reader(Box::new(file))
            .with_context(|| format!("wrap reader with {} codec", codec.name()))?;
        return Ok(Box::new(BufReader::new(inner)));
    }

    let mut buffered = BufReader::new(file);
    if let Some(codec) = detect_from_magic(&mut buffered) {
        tracing::debug!(path = %path.display(), codec = codec.name(), "decompressing by magic bytes");
        let inner = codec
            .wrap_reader(Box::new(buffered))
            .with_context(|| format!("wrap reader with {} codec", codec.name()))?;
        return Ok(Box::new(BufReader::new(inner)));
    }

    Ok(Box::new(buffered))
}

/// Create (or truncate) `path` for writing, compressing by extension.
///
/// Parent directories are created as needed. The returned sink is not
/// buffered; [`CsvWriter`](crate::CsvWriter) buffers on top of it.
///
/// # Errors
/// Returns an error if the directories or the file cannot be created.
pub fn create_sink(path: impl AsRef<Path>) -> Result<FileSink> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;

    if let Some(codec) = detect_from_extension(path) {
        tracing::debug!(path = %path.display(), codec = codec.name(), "compressing by extension");
        let inner = codec
            .wrap_writer(file)
            .with_context(|| format!("wrap writer with {} codec", codec.name()))?;
        return Ok(FileSink {
            inner,
            codec: Some(codec.name()),
        });
    }

    Ok(FileSink {
        inner: Box::new(file),
        codec: None,
    })
}

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl Codec for GzipCodec {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".gz", ".gzip"]
    }

    fn magic_bytes(&self) -> &'static [u8] {
        &[0x1f, 0x8b]
    }

    fn wrap_reader(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        use flate2::read::MultiGzDecoder;
        Ok(Box::new(MultiGzDecoder::new(reader)))
    }

    fn wrap_writer(&self, file: File) -> std::io::Result<Box<dyn FinishWrite>> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        Ok(Box::new(GzEncoder::new(file, Compression::default())))
    }
}

#[cfg(feature = "compression-gzip")]
impl FinishWrite for flate2::write::GzEncoder<File> {
    fn finish(&mut self) -> std::io::Result<()> {
        self.try_finish()?;
        self.get_mut().flush()
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".zst", ".zstd"]
    }

    fn magic_bytes(&self) -> &'static [u8] {
        &[0x28, 0xb5, 0x2f, 0xfd]
    }

    fn wrap_reader(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        zstd::stream::read::Decoder::new(reader).map(|d| Box::new(d) as Box<dyn Read>)
    }

    fn wrap_writer(&self, file: File) -> std::io::Result<Box<dyn FinishWrite>> {
        let encoder = zstd::stream::write::Encoder::new(file, 3)?;
        Ok(Box::new(ZstdSink(encoder)))
    }
}

/// Zstd encoder that writes its trailer on drop unless already finished.
#[cfg(feature = "compression-zstd")]
struct ZstdSink(zstd::stream::write::Encoder<'static, File>);

#[cfg(feature = "compression-zstd")]
impl Write for ZstdSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

#[cfg(feature = "compression-zstd")]
impl FinishWrite for ZstdSink {
    fn finish(&mut self) -> std::io::Result<()> {
        self.0.do_finish()?;
        self.0.get_mut().flush()
    }
}

#[cfg(feature = "compression-zstd")]
impl Drop for ZstdSink {
    fn drop(&mut self) {
        if let Err(err) = self.0.do_finish() {
            tracing::warn!(error = %err, "failed to finish zstd stream on drop");
        }
    }
}
