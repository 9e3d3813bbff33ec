use colored::Colorize;
use linescout::{scan_path, LiteralMatcher, ScanError};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

/// Scans one file and streams its matching lines to stdout, with the
/// conditional prefixes and per-occurrence highlighting.
///
/// Each matched line goes out as a single write, so output from concurrently
/// scanned files interleaves at line granularity and per-file line order is
/// preserved.
pub fn print_file(
    path: &Path,
    pattern: &str,
    line_numbers: bool,
    show_filename: bool,
) -> Result<(), ScanError> {
    let matcher = LiteralMatcher::new(pattern);

    scan_path(path, &matcher, |line_number, line| {
        let mut rendered = String::with_capacity(line.len() + 32);
        if show_filename {
            let _ = write!(rendered, "{}:", path.display().to_string().blue());
        }
        if line_numbers {
            let _ = write!(rendered, "{}:", line_number.to_string().green());
        }
        rendered.push_str(&highlight(&matcher, line));

        writeln!(io::stdout(), "{}", rendered).map_err(ScanError::write)
    })
}

/// Paints every occurrence of the pattern red, leaving the rest untouched.
fn highlight(matcher: &LiteralMatcher, line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for (start, end) in matcher.find_matches(line) {
        out.push_str(&line[last..start]);
        let _ = write!(out, "{}", line[start..end].red());
        last = end;
    }
    out.push_str(&line[last..]);
    out
}
