//! Append-only file logging
//!
//! Provides the instance-based [`Logger`], the composition of its header and entry
//! lines, and management of the underlying log file.

mod entry;
mod file_writer;
mod logger;

pub use entry::{format_timestamp, LINE_ENDING};
pub use file_writer::log_file_name;
pub use logger::{LogAppendCallback, Logger};
