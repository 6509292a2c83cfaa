//! Composition of header and entry lines

use std::fmt::Write;
use std::panic::Location;

use chrono::{DateTime, TimeZone};

use crate::error::{Error, Result};

/// Line terminator used for every entry
pub const LINE_ENDING: &str = "\n";

const HEADER_RULE: &str = "==========";

/// Format a timestamp, reporting an unrenderable format instead of panicking
pub fn format_timestamp<Tz>(time: &DateTime<Tz>, format: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", time.format(format))
        .map_err(|_| Error::InvalidDateFormat(format.to_string()))?;
    Ok(out)
}

/// Session header: `==========[ '<date>' ]==========`
pub fn header_line<Tz>(time: &DateTime<Tz>, date_format: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let date = format_timestamp(time, date_format)?;
    Ok(format!(
        "{HEADER_RULE}[ '{date}' ]{HEADER_RULE}{LINE_ENDING}"
    ))
}

/// Caller prefix: `[<file>:<line>] `
pub fn trace_prefix(caller: &Location<'_>) -> String {
    format!("[{}:{}] ", caller.file(), caller.line())
}

/// Compose one entry: optional trace, optional timestamp, the rendered body and a terminator
pub fn compose<Tz>(
    caller: Option<&Location<'_>>,
    time: &DateTime<Tz>,
    date_format: &str,
    body: &str,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut line = String::new();
    if let Some(caller) = caller {
        line.push_str(&trace_prefix(caller));
    }
    if !date_format.is_empty() {
        line.push_str(&format_timestamp(time, date_format)?);
        line.push_str(" | ");
    }
    line.push_str(body);
    line.push_str(LINE_ENDING);
    Ok(line)
}
