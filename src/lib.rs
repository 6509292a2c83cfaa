//! aclog - append-only file logger for dumping values while debugging
//!
//! Each [`Logger`] owns one dated log file (`<log_dir>/<YYYY-MM-DD>.log` by default)
//! and writes every logged value on its own entry:
//!
//! ```text
//! ==========[ 'Wed, 21 Jan 2026 14:30:45 +0100' ]==========
//! [src/main.rs:12] 14:30:45.123 +0100 | 'hello'
//! [src/main.rs:12] 14:30:45.123 +0100 | array (
//!   0 => 1,
//!   1 => 2,
//! )
//! ```
//!
//! Values are rendered according to the logger's [`OutputMethod`]. The [`facade`]
//! module exposes one process-wide logger through free functions.
//!
//! ```no_run
//! use aclog::{values, Logger, LoggerOptions, OutputMethod};
//!
//! let options = LoggerOptions::new("logs").with_output_method(OutputMethod::DebugDump);
//! let mut logger = Logger::new(options)?;
//! logger.add_log_append_callback(|| "-- end of call --");
//! logger.log(values!["hello", vec![1, 2]])?;
//! logger.destroy()?;
//! # Ok::<(), aclog::Error>(())
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod facade;
pub mod logging;
pub mod value;

pub use config::{LoggerOptions, OutputMethod};
pub use error::{Error, Result};
pub use facade::FacadeGuard;
pub use logging::{LogAppendCallback, Logger};
pub use value::{Key, Record, Value};
