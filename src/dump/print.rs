//! Human-readable renderer
//!
//! Scalars are written bare; lists, maps and records become indented
//! `[key] => value` blocks.

use super::{array_entries, format_float, pad, EntryKey};
use crate::value::Value;

pub(super) fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => out.push('1'),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&format_float(*n)),
        Value::String(s) => out.push_str(s),
        Value::List(_) | Value::Map(_) => {
            let entries = array_entries(value).unwrap_or_default();
            write_block(out, "Array", &entries, indent);
        }
        Value::Record(record) => {
            let entries: Vec<_> = record
                .fields
                .iter()
                .map(|(name, v)| (EntryKey::Name(name), v))
                .collect();
            write_block(out, &format!("{} Object", record.name), &entries, indent);
        }
    }
}

fn write_block(out: &mut String, label: &str, entries: &[(EntryKey<'_>, &Value)], indent: usize) {
    out.push_str(label);
    out.push('\n');
    pad(out, indent);
    out.push_str("(\n");
    for (key, value) in entries {
        pad(out, indent + 4);
        out.push('[');
        match key {
            EntryKey::Index(i) => out.push_str(&i.to_string()),
            EntryKey::Name(name) => out.push_str(name),
        }
        out.push_str("] => ");
        write_value(out, value, indent + 8);
        out.push('\n');
        if value.is_container() {
            out.push('\n');
        }
    }
    pad(out, indent);
    out.push(')');
}
