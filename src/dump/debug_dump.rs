//! Diagnostic renderer with type names, lengths and element counts

use super::{array_entries, format_float, pad, EntryKey};
use crate::value::Value;

/// Write `value` as one or more lines, each terminated by `\n`
pub(super) fn write_value(out: &mut String, value: &Value, indent: usize) {
    pad(out, indent);
    match value {
        Value::Null => out.push_str("NULL\n"),
        Value::Bool(b) => out.push_str(&format!("bool({b})\n")),
        Value::Int(n) => out.push_str(&format!("int({n})\n")),
        Value::Float(n) => out.push_str(&format!("float({})\n", format_float(*n))),
        Value::String(s) => out.push_str(&format!("string({}) \"{s}\"\n", s.len())),
        Value::List(_) | Value::Map(_) => {
            let entries = array_entries(value).unwrap_or_default();
            out.push_str(&format!("array({}) {{\n", entries.len()));
            for (key, v) in &entries {
                pad(out, indent + 2);
                match key {
                    EntryKey::Index(i) => out.push_str(&format!("[{i}]=>\n")),
                    EntryKey::Name(name) => out.push_str(&format!("[\"{name}\"]=>\n")),
                }
                write_value(out, v, indent + 2);
            }
            pad(out, indent);
            out.push_str("}\n");
        }
        Value::Record(record) => {
            out.push_str(&format!(
                "object({}) ({}) {{\n",
                record.name,
                record.fields.len()
            ));
            for (name, v) in &record.fields {
                pad(out, indent + 2);
                out.push_str(&format!("[\"{name}\"]=>\n"));
                write_value(out, v, indent + 2);
            }
            pad(out, indent);
            out.push_str("}\n");
        }
    }
}
