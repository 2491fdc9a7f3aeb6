// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parse command-line text into typed values.

use anyhow::{bail, Result};
use knob_core::{convert, Kind, Value};

/// Parse one argument as `kind`.
///
/// String lists are comma separated. Value arrays are built element by
/// element with `--array` instead.
pub fn parse_value(raw: &str, kind: Kind) -> Result<Value> {
    match kind {
        Kind::Strv => Ok(Value::Strv(
            raw.split(',').map(|item| item.trim().to_string()).filter(|s| !s.is_empty()).collect(),
        )),
        Kind::Array => bail!("array values are given with --array and repeated --value"),
        kind => Ok(convert(Value::String(raw.to_string()), kind)?),
    }
}

/// Pair up `--value`/`--type` occurrences into array elements.
///
/// With no `--type` every element is a string; a single `--type` applies to
/// every element; otherwise the counts must match.
pub fn parse_elements(values: &[String], kinds: &[Kind]) -> Result<Vec<Value>> {
    if values.is_empty() {
        bail!("--array needs at least one --value");
    }
    let kind_at = |index: usize| match kinds {
        [] => Ok(Kind::String),
        [only] => Ok(*only),
        many if many.len() == values.len() => Ok(many[index]),
        many => bail!("{} --type given for {} --value", many.len(), values.len()),
    };
    values
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let kind = kind_at(index)?;
            parse_value(raw, kind).map_err(|e| e.context(format!("element {index}")))
        })
        .collect()
}

#[cfg(test)]
#[path = "value_arg_tests.rs"]
mod tests;
