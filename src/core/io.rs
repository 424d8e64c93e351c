//! Annotation file reading
//!
//! Opens plain, gzip and bzip2 annotation files behind one `BufRead`
//! and provides a numbered line reader that reuses its buffer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Read buffer size for annotation files (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Plain,
    Gzip,
    Bzip2,
}

impl CompressionFormat {
    /// Recognize gzip (`1f 8b`) and bzip2 (`BZh`) headers
    pub fn from_magic(head: &[u8]) -> Option<Self> {
        match head {
            [0x1f, 0x8b, ..] => Some(Self::Gzip),
            [b'B', b'Z', b'h', ..] => Some(Self::Bzip2),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") | Some("bgz") => Self::Gzip,
            Some("bz2") => Self::Bzip2,
            _ => Self::Plain,
        }
    }
}

/// Detect compression from the file header
///
/// Files too short to carry a header fall back to their extension.
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let mut head = [0u8; 3];
    let read = File::open(path)?.read(&mut head)?;

    Ok(CompressionFormat::from_magic(&head[..read])
        .unwrap_or_else(|| match read {
            0 => CompressionFormat::from_extension(path),
            _ => CompressionFormat::Plain,
        }))
}

/// Open an annotation file, decompressing transparently
///
/// Gzip input goes through `MultiGzDecoder` so every member of a
/// bgzipped file is read.
pub fn open_annotation<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();
    let format = detect_compression(path)?;
    let file = File::open(path)?;
    log::debug!("Opening {} as {:?}", path.display(), format);

    Ok(match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    })
}

/// Numbered line reader over a single reused buffer
///
/// Lines come back without their `\n` / `\r\n` terminator, paired with
/// their 1-based line number for error reporting.
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
            line_no: 0,
        }
    }

    /// Lines read so far
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    pub fn next_line(&mut self) -> Option<io::Result<(usize, &[u8])>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                let mut line = self.buffer.as_slice();
                if let Some(rest) = line.strip_suffix(b"\n") {
                    line = rest.strip_suffix(b"\r").unwrap_or(rest);
                }
                Some(Ok((self.line_no, line)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
