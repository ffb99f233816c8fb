//! Opening log files, plain or gzip-compressed.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens `path` for line reading.
///
/// Gzip input is recognized by its magic bytes, not by the file name, and
/// may consist of several concatenated members (as written by `pigz` or
/// log rotation appending to a `.gz`).
pub fn open_log(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let mut reader = BufReader::new(File::open(path)?);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        log::debug!("{} is gzip compressed", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads the next line into `buf` without its line terminator.
///
/// Invalid UTF-8 is replaced rather than rejected. Returns `Ok(false)` at
/// end of input.
pub fn read_line(reader: &mut dyn BufRead, buf: &mut String) -> io::Result<bool> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(false);
    }
    while matches!(bytes.last(), Some(b'\n') | Some(b'\r')) {
        bytes.pop();
    }
    buf.clear();
    buf.push_str(&String::from_utf8_lossy(&bytes));
    Ok(true)
}
