use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tracing::trace;

use crate::errors::ScanError;
use crate::matcher::LiteralMatcher;
use crate::walk::STDIN_PATH;

const BUFFER_CAPACITY: usize = 8192;

/// Reads `reader` line by line and feeds every line containing the pattern to
/// `sink` together with its 1-based line number. `origin` only labels errors.
///
/// Lines are read as raw bytes and decoded lossily, so invalid UTF-8 never
/// aborts a scan. The line terminator is stripped before matching; end of
/// stream is success.
pub fn scan_lines<R, F>(
    mut reader: R,
    origin: &Path,
    matcher: &LiteralMatcher,
    mut sink: F,
) -> Result<(), ScanError>
where
    R: BufRead,
    F: FnMut(u64, &str) -> Result<(), ScanError>,
{
    let mut buf = Vec::with_capacity(256);
    let mut line_number: u64 = 0;

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ScanError::read(origin, e))?;
        if n == 0 {
            return Ok(());
        }
        line_number += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let line = String::from_utf8_lossy(&buf);
        if matcher.is_match(&line) {
            sink(line_number, &line)?;
        }
    }
}

/// Scans one file, handing each matching line to `sink`. The stdin
/// pseudo-path is read from the process stdin handle instead.
pub fn scan_path<F>(path: &Path, matcher: &LiteralMatcher, sink: F) -> Result<(), ScanError>
where
    F: FnMut(u64, &str) -> Result<(), ScanError>,
{
    trace!("scanning {}", path.display());

    if path == Path::new(STDIN_PATH) {
        let stdin = io::stdin();
        scan_lines(stdin.lock(), path, matcher, sink)
    } else {
        let file = File::open(path).map_err(|e| ScanError::open(path, e))?;
        scan_lines(
            BufReader::with_capacity(BUFFER_CAPACITY, file),
            path,
            matcher,
            sink,
        )
    }
}

/// Default reporter: prints matching lines to stdout, prefixed conditionally
/// by the file path and the 1-based line number.
///
/// This is the scan-and-report primitive in the shape the dispatch engine
/// invokes it: once per claimed path, never concurrently for the same path.
/// Each matched line is emitted as a single write, so concurrent scans of
/// different files interleave at line granularity.
pub fn report_to_stdout(
    path: &Path,
    pattern: &str,
    line_numbers: bool,
    show_filename: bool,
) -> Result<(), ScanError> {
    let matcher = LiteralMatcher::new(pattern);
    scan_path(path, &matcher, |line_number, line| {
        let mut rendered = String::with_capacity(line.len() + 16);
        if show_filename {
            let _ = write!(rendered, "{}:", path.display());
        }
        if line_numbers {
            let _ = write!(rendered, "{}:", line_number);
        }
        rendered.push_str(line);

        writeln!(io::stdout(), "{}", rendered).map_err(ScanError::write)
    })
}
