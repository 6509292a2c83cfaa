//! Value renderers, one per output method
//!
//! Every renderer is deterministic and returns text without a trailing line terminator;
//! the logger appends exactly one after each rendered value.

mod debug_dump;
mod export;
mod print;

use crate::config::OutputMethod;
use crate::value::{Key, Value};

/// Render a value using the given output method
pub fn render(value: &Value, method: OutputMethod) -> String {
    let mut out = String::new();
    match method {
        OutputMethod::Export => export::write_value(&mut out, value, 0),
        OutputMethod::Print => print::write_value(&mut out, value, 0),
        OutputMethod::DebugDump => {
            debug_dump::write_value(&mut out, value, 0);
            // Every dumped line is terminated, including the last one
            out.pop();
        }
    }
    out
}

/// Format a float the way the plain renderers show it (`1.5`, `2`, `1.0E+300`, `INF`, `NAN`)
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NAN".to_string();
    }
    if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        return format!("{sign}INF");
    }

    // Shortest round-trip digits; exponent form below 1e-4 and from 1e15 up
    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..15).contains(&exponent) {
        return n.to_string();
    }

    let fraction = if mantissa.contains('.') { "" } else { ".0" };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{fraction}E{sign}{}", exponent.unsigned_abs())
}

fn pad(out: &mut String, width: usize) {
    out.extend(std::iter::repeat(' ').take(width));
}

/// Borrowed key of a list position or map entry
#[derive(Debug, Clone, Copy, PartialEq)]
enum EntryKey<'a> {
    Index(i64),
    Name(&'a str),
}

impl<'a> From<&'a Key> for EntryKey<'a> {
    fn from(key: &'a Key) -> Self {
        match key {
            Key::Index(i) => EntryKey::Index(*i),
            Key::Name(name) => EntryKey::Name(name),
        }
    }
}

/// Entries of a list or map, with list positions as integer keys
fn array_entries(value: &Value) -> Option<Vec<(EntryKey<'_>, &Value)>> {
    match value {
        Value::List(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (EntryKey::Index(i as i64), v))
                .collect(),
        ),
        Value::Map(entries) => Some(entries.iter().map(|(k, v)| (k.into(), v)).collect()),
        _ => None,
    }
}
