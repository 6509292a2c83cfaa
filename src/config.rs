//! Logger construction options

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How logged values are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputMethod {
    /// Re-parseable literal syntax (`'text'`, `array (...)`, `NULL`)
    #[default]
    Export,
    /// Human-readable nested dump using `[key] => value`
    Print,
    /// Verbose dump with type names and lengths (`string(3) "abc"`)
    DebugDump,
}

impl OutputMethod {
    /// Get the configuration name for this method
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMethod::Export => "export",
            OutputMethod::Print => "print",
            OutputMethod::DebugDump => "debug_dump",
        }
    }
}

impl fmt::Display for OutputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "export" => Ok(OutputMethod::Export),
            "print" => Ok(OutputMethod::Print),
            "debug_dump" | "dump" => Ok(OutputMethod::DebugDump),
            _ => Err(Error::UnknownOutputMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputMethod {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Numeric codes: 0 = export, 1 = print, 2 = debug dump
impl TryFrom<u8> for OutputMethod {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(OutputMethod::Export),
            1 => Ok(OutputMethod::Print),
            2 => Ok(OutputMethod::DebugDump),
            _ => Err(Error::UnknownOutputMethod(code.to_string())),
        }
    }
}

impl From<OutputMethod> for String {
    fn from(method: OutputMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Options for [`Logger`](crate::Logger) construction
///
/// Only `log_dir` is required. Anything accepting `impl Into<LoggerOptions>` also takes
/// a bare directory path, in which case every other option keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerOptions {
    /// Directory the log file lives in (created if missing)
    pub log_dir: PathBuf,

    /// How values are rendered
    #[serde(default)]
    pub output_method: OutputMethod,

    /// Explicit file name; when unset the current date plus `.log` is used
    #[serde(default)]
    pub filename: Option<String>,

    /// strftime format for the date-based default file name
    #[serde(default = "default_filename_date_format")]
    pub filename_date_format: String,

    /// strftime format for the one-time session header
    #[serde(default = "default_header_date_format")]
    pub header_date_format: String,

    /// Unix permission bits applied to the log file after opening (e.g. `0o640`)
    #[serde(default)]
    pub file_permission: Option<u32>,

    /// Blank lines written when the logger is torn down, if anything was logged
    #[serde(default = "default_line_breaks_between_header")]
    pub line_breaks_between_header: usize,

    /// Prefix every entry with `[file:line]` of the caller
    #[serde(default = "default_true")]
    pub include_trace: bool,

    /// strftime format for the per-entry timestamp; empty disables it
    #[serde(default = "default_log_date_format")]
    pub log_date_format: String,

    /// Write the session header before the first entry
    #[serde(default = "default_true")]
    pub log_header: bool,
}

fn default_filename_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_header_date_format() -> String {
    // RFC 2822, e.g. "Thu, 21 Dec 2000 16:01:07 +0200"
    "%a, %d %b %Y %H:%M:%S %z".to_string()
}

fn default_line_breaks_between_header() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_log_date_format() -> String {
    "%H:%M:%S%.3f %z".to_string()
}

impl LoggerOptions {
    /// Create options for `log_dir` with every other option at its default
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            output_method: OutputMethod::default(),
            filename: None,
            filename_date_format: default_filename_date_format(),
            header_date_format: default_header_date_format(),
            file_permission: None,
            line_breaks_between_header: default_line_breaks_between_header(),
            include_trace: true,
            log_date_format: default_log_date_format(),
            log_header: true,
        }
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(Error::io("failed to read options file"))?;
        Self::from_toml_str(&content)
    }

    /// Set how logged values are rendered
    pub fn with_output_method(mut self, output_method: OutputMethod) -> Self {
        self.output_method = output_method;
        self
    }

    /// Use a fixed file name instead of the dated default
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the strftime format of the dated file name (without `.log`)
    pub fn with_filename_date_format(mut self, format: impl Into<String>) -> Self {
        self.filename_date_format = format.into();
        self
    }

    /// Set the strftime format shown in the header line
    pub fn with_header_date_format(mut self, format: impl Into<String>) -> Self {
        self.header_date_format = format.into();
        self
    }

    /// Set the Unix mode applied to the log file after opening it
    pub fn with_file_permission(mut self, mode: u32) -> Self {
        self.file_permission = Some(mode);
        self
    }

    /// Set how many line breaks teardown appends after the last entry
    pub fn with_line_breaks_between_header(mut self, count: usize) -> Self {
        self.line_breaks_between_header = count;
        self
    }

    /// Prefix each entry with the calling `[file:line]`
    pub fn with_include_trace(mut self, include_trace: bool) -> Self {
        self.include_trace = include_trace;
        self
    }

    /// Set the strftime format of the per-entry timestamp; empty disables it
    pub fn with_log_date_format(mut self, format: impl Into<String>) -> Self {
        self.log_date_format = format.into();
        self
    }

    /// Write a dated header line before the first entry
    pub fn with_log_header(mut self, log_header: bool) -> Self {
        self.log_header = log_header;
        self
    }

    /// Check every date format so that rendering cannot fail later
    pub(crate) fn validate(&self) -> Result<()> {
        validate_date_format(&self.header_date_format)?;
        validate_date_format(&self.log_date_format)?;
        if self.filename.is_none() {
            validate_date_format(&self.filename_date_format)?;
        }
        Ok(())
    }
}

fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

impl From<PathBuf> for LoggerOptions {
    fn from(log_dir: PathBuf) -> Self {
        Self::new(log_dir)
    }
}

impl From<&Path> for LoggerOptions {
    fn from(log_dir: &Path) -> Self {
        Self::new(log_dir)
    }
}

impl From<&str> for LoggerOptions {
    fn from(log_dir: &str) -> Self {
        Self::new(log_dir)
    }
}

impl From<String> for LoggerOptions {
    fn from(log_dir: String) -> Self {
        Self::new(log_dir)
    }
}
