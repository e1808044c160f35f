//! Line-oriented reading and writing over a [`TextEncoding`]

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::encoding::{TextDecoder, TextEncoding};
use crate::error::{Result, SplitError};

/// Bytes pulled from the input per read
const READ_CHUNK: usize = 8 * 1024;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Line terminator used for every written line
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Reads decoded lines from a byte stream
///
/// Lines end at `\n`, `\r\n` or a lone `\r`; terminators are not part of
/// the returned line. A final terminator does not yield an extra empty
/// line, and a leading byte-order mark is dropped.
pub struct LineReader<R> {
    source: R,
    decoder: TextDecoder,
    buffer: Vec<u8>,
    pending: String,
    /// Bytes of `pending` already searched for a terminator
    scanned: usize,
    bom_checked: bool,
    eof: bool,
}

impl LineReader<File> {
    /// Open `path` for reading in `encoding`
    pub fn open(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let file = File::open(path).map_err(|source| SplitError::OpenRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, encoding))
    }
}

impl<R: Read> LineReader<R> {
    /// Wrap an arbitrary reader
    pub fn new(source: R, encoding: TextEncoding) -> Self {
        Self {
            source,
            decoder: encoding.new_decoder(),
            buffer: vec![0; READ_CHUNK],
            pending: String::new(),
            scanned: 0,
            bom_checked: false,
            eof: false,
        }
    }

    /// Read the next line, or `None` at end of input
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }

            if self.eof {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                self.scanned = 0;
                return Ok(Some(std::mem::take(&mut self.pending)));
            }

            self.fill()?;
        }
    }

    /// Split off one complete line from the decoded text, if there is one
    fn take_line(&mut self) -> Option<String> {
        let Some(offset) = self.pending[self.scanned..].find(['\r', '\n']) else {
            self.scanned = self.pending.len();
            return None;
        };
        let end = self.scanned + offset;
        let bytes = self.pending.as_bytes();

        let terminator_len = if bytes[end] == b'\r' {
            match bytes.get(end + 1) {
                Some(b'\n') => 2,
                Some(_) => 1,
                // A trailing CR may be the first half of CRLF
                None if !self.eof => {
                    self.scanned = end;
                    return None;
                }
                None => 1,
            }
        } else {
            1
        };

        let line = self.pending[..end].to_string();
        self.pending.drain(..end + terminator_len);
        self.scanned = 0;
        Some(line)
    }

    fn fill(&mut self) -> io::Result<()> {
        let read = loop {
            match self.source.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        if read == 0 {
            self.decoder.finish(&mut self.pending);
            self.eof = true;
        } else {
            self.decoder.decode(&self.buffer[..read], &mut self.pending);
        }

        if !self.bom_checked && !self.pending.is_empty() {
            if self.pending.starts_with(BYTE_ORDER_MARK) {
                self.pending.drain(..BYTE_ORDER_MARK.len_utf8());
            }
            self.bom_checked = true;
        }

        Ok(())
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Count the lines of the file at `path`
///
/// Uses its own reader, closed before returning.
pub fn count_lines(path: &Path, encoding: TextEncoding) -> Result<usize> {
    let mut reader = LineReader::open(path, encoding)?;
    let mut count = 0;

    while reader
        .next_line()
        .map_err(|source| SplitError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .is_some()
    {
        count += 1;
    }

    Ok(count)
}

/// Writes encoded lines to a freshly created file
pub struct LineWriter {
    path: PathBuf,
    encoding: TextEncoding,
    writer: BufWriter<File>,
    scratch: Vec<u8>,
    lines_written: usize,
}

impl LineWriter {
    /// Create (or truncate) `path` and write the encoding's preamble
    pub fn create(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let file = File::create(path).map_err(|source| SplitError::OpenWrite {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = Self {
            path: path.to_path_buf(),
            encoding,
            writer: BufWriter::new(file),
            scratch: Vec::new(),
            lines_written: 0,
        };
        writer.write_bytes(encoding.preamble())?;
        Ok(writer)
    }

    /// Write one line followed by [`LINE_ENDING`]
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        self.encoding.encode_into(line, &mut scratch);
        self.encoding.encode_into(LINE_ENDING, &mut scratch);

        let result = self.write_bytes(&scratch);
        self.scratch = scratch;
        result?;

        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Path being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file, returning the number of lines written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|source| SplitError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.lines_written)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(|source| SplitError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
