pub mod config;
pub mod dispatch;
pub mod errors;
pub mod matcher;
pub mod scan;
pub mod walk;

pub use config::{FilenameMode, SearchJob};
pub use dispatch::{dispatch, show_filename};
pub use errors::{DispatchError, ScanError, TraversalError};
pub use matcher::LiteralMatcher;
pub use scan::{report_to_stdout, scan_lines, scan_path};
pub use walk::{enumerate, PathSet, STDIN_PATH};
