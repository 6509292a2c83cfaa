//! Literal syntax renderer
//!
//! Produces text that reads back as the same value: quoted strings, `NULL`,
//! `array (...)` blocks and `\Name::__set_state(array(...))` for records.

use super::{array_entries, format_float, pad, EntryKey};
use crate::value::{Record, Value};

pub(super) fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&format_export_float(*n)),
        Value::String(s) => write_quoted(out, s),
        Value::Record(record) => write_record(out, record, indent),
        Value::List(_) | Value::Map(_) => {
            let entries = array_entries(value).unwrap_or_default();
            write_array(out, &entries, indent);
        }
    }
}

fn write_array(out: &mut String, entries: &[(EntryKey<'_>, &Value)], indent: usize) {
    out.push_str("array (\n");
    for (key, value) in entries {
        pad(out, indent + 2);
        write_key(out, *key);
        write_entry_value(out, value, indent + 2);
    }
    pad(out, indent);
    out.push(')');
}

fn write_record(out: &mut String, record: &Record, indent: usize) {
    out.push('\\');
    out.push_str(&record.name);
    out.push_str("::__set_state(array(\n");
    for (name, value) in &record.fields {
        pad(out, indent + 3);
        write_quoted(out, name);
        write_entry_value(out, value, indent + 2);
    }
    pad(out, indent);
    out.push_str("))");
}

/// Write ` => value,` where nested blocks start on their own line
fn write_entry_value(out: &mut String, value: &Value, indent: usize) {
    out.push_str(" => ");
    if value.is_container() {
        out.push('\n');
        pad(out, indent);
    }
    write_value(out, value, indent);
    out.push_str(",\n");
}

fn write_key(out: &mut String, key: EntryKey<'_>) {
    match key {
        EntryKey::Index(i) => out.push_str(&i.to_string()),
        EntryKey::Name(name) => write_quoted(out, name),
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

/// Floats always keep a fractional part so they read back as floats
fn format_export_float(n: f64) -> String {
    let mut s = format_float(n);
    if n.is_finite() && !s.contains(&['.', 'e', 'E'][..]) {
        s.push_str(".0");
    }
    s
}
