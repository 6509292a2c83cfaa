//! Process-wide logger facade
//!
//! Holds a single [`Logger`] behind free functions so any part of a program can log
//! without passing a handle around. [`setup`] must run first; every other function
//! returns [`Error::NotInitialized`] until it has.
//!
//! [`setup`] returns a [`FacadeGuard`]. Keep it alive for as long as the program logs;
//! dropping it tears the logger down, writing the trailing blank lines and closing the
//! file. [`destroy`] does the same on demand.
//!
//! ```no_run
//! let _guard = aclog::facade::setup("logs")?;
//! aclog::facade::log(["started", "up"])?;
//! # Ok::<(), aclog::Error>(())
//! ```

use std::panic::Location;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::LoggerOptions;
use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::value::Value;

struct Installed {
    generation: u64,
    logger: Logger,
}

static LOGGER: Mutex<Option<Installed>> = Mutex::new(None);
static GENERATION: AtomicU64 = AtomicU64::new(0);

fn slot() -> MutexGuard<'static, Option<Installed>> {
    LOGGER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Guard returned by [`setup`]; dropping it tears down the logger it installed
///
/// A guard whose logger has since been replaced by another [`setup`] call does
/// nothing on drop.
#[must_use = "dropping the guard closes the facade logger"]
#[derive(Debug)]
pub struct FacadeGuard {
    generation: u64,
}

impl Drop for FacadeGuard {
    fn drop(&mut self) {
        let mut slot = slot();
        let Some(installed) = slot.as_mut() else {
            return;
        };
        if installed.generation != self.generation {
            return;
        }
        if let Err(e) = installed.logger.destroy() {
            tracing::warn!("Failed to close facade log file: {}", e);
        }
    }
}

/// Run `operation` against the installed logger
///
/// The slot stays locked for the duration, so log append callbacks must not call
/// back into the facade.
fn with_logger<T>(name: &str, operation: impl FnOnce(&mut Logger) -> Result<T>) -> Result<T> {
    match slot().as_mut() {
        Some(installed) => operation(&mut installed.logger),
        None => {
            tracing::error!("aclog::facade::{} called before setup", name);
            Err(Error::NotInitialized)
        }
    }
}

/// Install the process-wide logger
///
/// Accepts a bare directory or full [`LoggerOptions`]. Calling it again replaces the
/// current logger; the replaced one is dropped, which closes its file, and its guard
/// becomes inert.
pub fn setup(options: impl Into<LoggerOptions>) -> Result<FacadeGuard> {
    let logger = Logger::new(options)?;
    let generation = GENERATION.fetch_add(1, Ordering::Relaxed) + 1;
    let previous = slot().replace(Installed { generation, logger });
    drop(previous);
    Ok(FacadeGuard { generation })
}

/// Whether [`setup`] has installed a logger
pub fn is_setup() -> bool {
    slot().is_some()
}

/// Log values, attributed to the line that called this function
#[track_caller]
pub fn log<I>(values: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let caller = Location::caller();
    with_logger("log", |logger| logger.log_at(caller, values))
}

/// Truncate the installed logger's file
pub fn clear_file() -> Result<()> {
    with_logger("clear_file", Logger::clear_file)
}

/// Register a callback whose value is logged after every [`log`] call
pub fn add_log_append_callback<F, V>(callback: F) -> Result<()>
where
    F: FnMut() -> V + Send + 'static,
    V: Into<Value>,
{
    with_logger("add_log_append_callback", |logger| {
        logger.add_log_append_callback(callback);
        Ok(())
    })
}

/// Directory the installed logger writes into
pub fn log_dir() -> Result<PathBuf> {
    with_logger("log_dir", |logger| Ok(logger.log_dir().to_path_buf()))
}

/// Full path of the installed logger's file
pub fn log_file() -> Result<PathBuf> {
    with_logger("log_file", |logger| Ok(logger.log_file().to_path_buf()))
}

/// Tear down the installed logger; a no-op when [`setup`] never ran
///
/// The logger stays installed, so [`log_dir`] and [`log_file`] keep working.
pub fn destroy() -> Result<()> {
    match slot().as_mut() {
        Some(installed) => installed.logger.destroy(),
        None => Ok(()),
    }
}
