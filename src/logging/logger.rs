//! The instance-based file logger

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::entry::{self, LINE_ENDING};
use super::file_writer;
use crate::config::{LoggerOptions, OutputMethod};
use crate::dump;
use crate::error::{Error, Result};
use crate::value::Value;

/// Callback run after every `log()` call; its return value is appended to the log
pub type LogAppendCallback = Box<dyn FnMut() -> Value + Send>;

/// Append-only logger writing rendered values to a dated file
///
/// The file handle is opened on construction and released by [`Logger::destroy`],
/// which also runs on drop.
pub struct Logger {
    log_dir: PathBuf,
    log_file: PathBuf,
    handle: Option<File>,
    output_method: OutputMethod,
    header_date_format: String,
    log_date_format: String,
    include_trace: bool,
    log_header: bool,
    line_breaks_between_header: usize,
    is_header_logged: bool,
    count_logged: usize,
    log_append_callbacks: Vec<LogAppendCallback>,
}

impl Logger {
    /// Create the log directory if needed and open the log file for appending
    pub fn new(options: impl Into<LoggerOptions>) -> Result<Self> {
        let options = options.into();
        options.validate()?;

        file_writer::ensure_log_dir(&options.log_dir)?;
        let resolved_dir = options
            .log_dir
            .canonicalize()
            .map_err(Error::io("failed to resolve log directory"))?;
        let log_file = resolved_dir.join(file_writer::log_file_name(&options)?);

        let handle = file_writer::open_log_file(&log_file)?;
        if let Some(mode) = options.file_permission {
            file_writer::set_file_permission(&log_file, mode)?;
        }

        tracing::debug!("Logging to: {}", log_file.display());

        Ok(Self {
            log_dir: options.log_dir,
            log_file,
            handle: Some(handle),
            output_method: options.output_method,
            header_date_format: options.header_date_format,
            log_date_format: options.log_date_format,
            include_trace: options.include_trace,
            log_header: options.log_header,
            line_breaks_between_header: options.line_breaks_between_header,
            is_header_logged: false,
            count_logged: 0,
            log_append_callbacks: Vec::new(),
        })
    }

    /// Log each value on its own entry, attributed to the calling line
    #[track_caller]
    pub fn log<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log_at(Location::caller(), values)
    }

    /// Log values attributed to an explicit caller location
    ///
    /// Wrappers that forward to the logger capture their own caller with
    /// `#[track_caller]` and pass it here.
    pub fn log_at<I>(&mut self, caller: &Location<'_>, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        if self.handle.is_none() {
            return Err(Error::Closed);
        }
        self.count_logged += 1;

        let mut text = String::new();
        let write_header = self.log_header && !self.is_header_logged;
        if write_header {
            text.push_str(&entry::header_line(&Local::now(), &self.header_date_format)?);
        }

        let trace = if self.include_trace {
            Some(caller)
        } else {
            None
        };
        for value in values {
            let body = dump::render(&value.into(), self.output_method);
            text.push_str(&entry::compose(
                trace,
                &Local::now(),
                &self.log_date_format,
                &body,
            )?);
        }

        self.write(&text)?;
        if write_header {
            self.is_header_logged = true;
        }

        self.run_callbacks()
    }

    fn run_callbacks(&mut self) -> Result<()> {
        if self.log_append_callbacks.is_empty() {
            return Ok(());
        }

        let mut text = String::new();
        for callback in &mut self.log_append_callbacks {
            let value = callback();
            text.push_str(&dump::render(&value, self.output_method));
            text.push_str(LINE_ENDING);
        }
        self.write(&text)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        let handle = self.handle.as_mut().ok_or(Error::Closed)?;
        handle
            .write_all(text.as_bytes())
            .map_err(Error::io("failed to write log entry"))
    }

    /// Remove all content from the log file
    ///
    /// The append handle is reopened so later entries start at the beginning of the file.
    pub fn clear_file(&mut self) -> Result<()> {
        file_writer::truncate_log_file(&self.log_file)?;
        if self.handle.is_some() {
            self.handle = Some(file_writer::open_log_file(&self.log_file)?);
        }
        Ok(())
    }

    /// Register a callback whose return value is appended after every `log()` call
    pub fn add_log_append_callback<F, V>(&mut self, mut callback: F)
    where
        F: FnMut() -> V + Send + 'static,
        V: Into<Value>,
    {
        self.log_append_callbacks
            .push(Box::new(move || callback().into()));
    }

    /// Write the trailing blank lines (if anything was logged) and close the file
    ///
    /// Calling this more than once is a no-op.
    pub fn destroy(&mut self) -> Result<()> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(());
        };

        if self.count_logged > 0 {
            handle
                .write_all(LINE_ENDING.repeat(self.line_breaks_between_header).as_bytes())
                .map_err(Error::io("failed to write log trailer"))?;
        }
        handle
            .flush()
            .map_err(Error::io("failed to flush log file"))?;

        tracing::debug!(
            "Closed log file {} after {} log calls",
            self.log_file.display(),
            self.count_logged
        );
        Ok(())
    }

    /// Directory the logger was created with
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Absolute path of the log file
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Renderer used for logged values
    pub fn output_method(&self) -> OutputMethod {
        self.output_method
    }

    /// Number of `log()` calls so far
    pub fn count_logged(&self) -> usize {
        self.count_logged
    }

    /// Whether [`Logger::destroy`] has released the file handle
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            tracing::warn!("Failed to close log file {}: {}", self.log_file.display(), e);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("log_dir", &self.log_dir)
            .field("log_file", &self.log_file)
            .field("output_method", &self.output_method)
            .field("closed", &self.is_closed())
            .field("count_logged", &self.count_logged)
            .field("callbacks", &self.log_append_callbacks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Options producing bare entries: no header, trace or timestamp
    fn plain_options(dir: &Path) -> LoggerOptions {
        LoggerOptions::new(dir)
            .with_filename("plain.log")
            .with_log_header(false)
            .with_include_trace(false)
            .with_log_date_format("")
    }

    fn read(logger: &Logger) -> String {
        fs::read_to_string(logger.log_file()).unwrap()
    }

    #[test]
    fn test_new_creates_directory_and_dated_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let logger = Logger::new(log_dir.as_path()).unwrap();

        assert!(log_dir.is_dir());
        let expected = log_dir.join(format!("{}.log", Local::now().format("%Y-%m-%d")));
        assert!(expected.is_file());
        assert_eq!(logger.log_dir(), log_dir.as_path());
        assert_eq!(
            logger.log_file().canonicalize().unwrap(),
            expected.canonicalize().unwrap()
        );
        assert!(logger.log_file().is_absolute());
    }

    #[test]
    fn test_new_fails_when_directory_cannot_be_created() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let err = Logger::new(blocker.join("logs")).unwrap_err();
        assert!(matches!(err, Error::Io(_, _)));
    }

    #[test]
    fn test_new_rejects_invalid_date_format() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path()).with_header_date_format("%Q");
        assert!(matches!(
            Logger::new(options),
            Err(Error::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_log_found_in_export_format() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(temp_dir.path()).unwrap();

        logger.log(["find-this-string."]).unwrap();

        assert!(read(&logger).contains("'find-this-string.'"));
        assert_eq!(logger.count_logged(), 1);
    }

    #[test]
    fn test_plain_entries() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(plain_options(temp_dir.path())).unwrap();

        logger.log(crate::values!["a", 1, true]).unwrap();

        assert_eq!(read(&logger), "'a'\n1\ntrue\n");
    }

    #[test]
    fn test_all_options() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path())
            .with_output_method(OutputMethod::DebugDump)
            .with_filename("options.txt")
            .with_header_date_format("%Y%m%d")
            .with_line_breaks_between_header(6)
            .with_log_date_format("%Y%m%H");
        let mut logger = Logger::new(options).unwrap();

        logger.log(["vardump"]).unwrap();
        let content = read(&logger);

        assert!(content.contains("string(7) \"vardump\""));
        let header = format!("==========[ '{}' ]==========", Local::now().format("%Y%m%d"));
        assert!(content.starts_with(&header));
        assert!(content.contains(&format!("[{}:", file!())));
        assert!(content.contains(&format!("] {} | ", Local::now().format("%Y%m%H"))));

        logger.destroy().unwrap();
        assert!(read(&logger).ends_with("\"vardump\"\n\n\n\n\n\n\n"));
    }

    #[test]
    fn test_trace_names_calling_line() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path()).with_log_date_format("");
        let mut logger = Logger::new(options).unwrap();

        let line = line!() + 1;
        logger.log(["traced", "twice"]).unwrap();

        let content = read(&logger);
        let prefix = format!("[{}:{}] ", file!(), line);
        assert!(content.contains(&format!("{prefix}'traced'\n")));
        assert!(content.contains(&format!("{prefix}'twice'\n")));
    }

    #[test]
    fn test_log_at_uses_given_location() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path())
            .with_log_header(false)
            .with_log_date_format("");
        let mut logger = Logger::new(options).unwrap();

        let caller = Location::caller();
        logger.log_at(caller, ["x"]).unwrap();

        assert_eq!(
            read(&logger),
            format!("[{}:{}] 'x'\n", caller.file(), caller.line())
        );
    }

    #[test]
    fn test_header_written_once() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(temp_dir.path()).unwrap();

        logger.log(["one"]).unwrap();
        logger.log(["two"]).unwrap();
        logger.log(Vec::<Value>::new()).unwrap();

        assert_eq!(read(&logger).matches("==========[ '").count(), 1);
        assert_eq!(logger.count_logged(), 3);
    }

    #[test]
    fn test_header_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path()).with_log_header(false);
        let mut logger = Logger::new(options).unwrap();

        logger.log(["one"]).unwrap();
        logger.log(["two"]).unwrap();

        assert!(!read(&logger).contains("=========="));
    }

    #[test]
    fn test_callbacks_run_in_order_after_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(plain_options(temp_dir.path())).unwrap();

        logger.add_log_append_callback(|| "callback-1.");
        logger.add_log_append_callback(|| "callback-2.");

        logger
            .log(crate::values!["hello.", "andgoodbye.", vec!["array."]])
            .unwrap();

        assert_eq!(
            read(&logger),
            "'hello.'\n'andgoodbye.'\narray (\n  0 => 'array.',\n)\n'callback-1.'\n'callback-2.'\n"
        );
    }

    #[test]
    fn test_callbacks_fire_once_per_call() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(plain_options(temp_dir.path())).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        logger.add_log_append_callback(move || counter.fetch_add(1, Ordering::SeqCst) + 1);

        logger.log(["a", "b", "c"]).unwrap();
        logger.log(Vec::<Value>::new()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(read(&logger), "'a'\n'b'\n'c'\n1\n2\n");
    }

    #[test]
    fn test_callback_output_uses_output_method() {
        let temp_dir = TempDir::new().unwrap();
        let options = plain_options(temp_dir.path()).with_output_method(OutputMethod::Print);
        let mut logger = Logger::new(options).unwrap();

        logger.add_log_append_callback(|| Record::new("Memory").field("peak", 1024));
        logger.log(["entry"]).unwrap();

        assert_eq!(
            read(&logger),
            "entry\nMemory Object\n(\n    [peak] => 1024\n)\n"
        );
    }

    #[test]
    fn test_clear_file_keeps_handle_usable() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(plain_options(temp_dir.path())).unwrap();

        logger.log(["hello."]).unwrap();
        assert!(!read(&logger).is_empty());

        logger.clear_file().unwrap();
        assert_eq!(read(&logger), "");

        logger.log(["again."]).unwrap();
        assert_eq!(read(&logger), "'again.'\n");
    }

    #[test]
    fn test_clear_file_does_not_repeat_header() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path())
            .with_include_trace(false)
            .with_log_date_format("");
        let mut logger = Logger::new(options).unwrap();

        logger.log(["first"]).unwrap();
        logger.clear_file().unwrap();
        logger.log(["second"]).unwrap();

        assert_eq!(read(&logger), "'second'\n");
    }

    #[test]
    fn test_destroy_without_logs_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(temp_dir.path()).unwrap();

        logger.destroy().unwrap();

        assert!(logger.is_closed());
        assert_eq!(read(&logger), "");
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let options = plain_options(temp_dir.path()).with_line_breaks_between_header(3);
        let mut logger = Logger::new(options).unwrap();

        logger.log(["a"]).unwrap();
        logger.destroy().unwrap();
        logger.destroy().unwrap();

        assert_eq!(read(&logger), "'a'\n\n\n\n");
    }

    #[test]
    fn test_drop_writes_trailer() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let mut logger = Logger::new(plain_options(temp_dir.path())).unwrap();
            logger.log(["a"]).unwrap();
            logger.log_file().to_path_buf()
        };

        assert_eq!(fs::read_to_string(path).unwrap(), "'a'\n\n\n");
    }

    #[test]
    fn test_log_after_destroy_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = Logger::new(plain_options(temp_dir.path())).unwrap();

        logger.destroy().unwrap();

        assert!(matches!(logger.log(["late"]), Err(Error::Closed)));
        assert_eq!(logger.count_logged(), 0);
        assert_eq!(read(&logger), "");
    }

    #[test]
    fn test_loggers_append_to_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut first = Logger::new(plain_options(temp_dir.path())).unwrap();
            first.log(["first"]).unwrap();
        }
        let mut second = Logger::new(plain_options(temp_dir.path())).unwrap();
        second.log(["second"]).unwrap();

        assert_eq!(read(&second), "'first'\n\n\n'second'\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permission_applied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new(temp_dir.path()).with_file_permission(0o640);
        let logger = Logger::new(options).unwrap();

        let mode = fs::metadata(logger.log_file()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_debug_output() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(temp_dir.path()).unwrap();
        let debug = format!("{:?}", logger);
        assert!(debug.contains("Logger"));
        assert!(debug.contains("count_logged: 0"));
    }
}
