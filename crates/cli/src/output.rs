// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value rendering for command output.

use clap::ValueEnum;
use knob_core::Value;
use serde_json::json;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Plain JSON for a value: numbers stay numbers, lists become arrays.
///
/// Non-finite floats have no JSON form and render as `null`.
pub fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(v) => json!(v),
        Value::U8(v) => json!(v),
        Value::I8(v) => json!(v),
        Value::U16(v) => json!(v),
        Value::I16(v) => json!(v),
        Value::U32(v) => json!(v),
        Value::I32(v) => json!(v),
        Value::U64(v) => json!(v),
        Value::I64(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Double(v) => json!(v),
        Value::String(v) => json!(v),
        Value::Strv(items) => json!(items),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_json).collect()),
    }
}

/// Render a value on one line.
pub fn format_value(value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => value.to_string(),
        OutputFormat::Json => value_json(value).to_string(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
