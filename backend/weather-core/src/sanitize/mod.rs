//! Parse a buffered response and strip credential-bearing fields.
//!
//! Known limitation: only the top level of an object document is redacted.
//! A `password` key nested inside `data` or an array survives.

use crate::error::format::FormatError;
use crate::error::sanitize::SanitizeError;

use std::io::Write;

use log::{debug, info};
use serde_json::Value;

/// Top-level keys removed from every document before it can be formatted.
pub const REDACTION_SET: [&str; 3] = ["user", "password", "credentials"];

/// A parsed document whose top level no longer holds any [`REDACTION_SET`] key.
///
/// The only constructor is [`parse_and_redact`], so anything that formats a
/// `SanitizedDocument` is formatting redacted data.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedDocument {
    root: Value,
}

impl SanitizedDocument {
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// JSON with 2-space indentation, no trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Write the indented document followed by a newline.
    ///
    /// The document is serialized completely before the first byte is written.
    pub fn write_pretty<W>(&self, out: &mut W) -> Result<(), FormatError>
    where
        W: Write,
    {
        let text = self.to_pretty_string()?;
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}

/// Parse `bytes` as one JSON document and remove the [`REDACTION_SET`] keys.
///
/// # Errors
///
/// Returns [`SanitizeError::Parse`] with the parser's line, column and
/// message; no partial document is produced.
pub fn parse_and_redact(bytes: &[u8]) -> Result<SanitizedDocument, SanitizeError> {
    let mut root: Value = serde_json::from_slice(bytes)?;

    let removed = redact(&mut root);
    if removed > 0 {
        info!("Redacted {removed} credential field(s) from response");
    }

    Ok(SanitizedDocument { root })
}

/// Remove the [`REDACTION_SET`] keys from the top level of `root`.
///
/// Absent keys and non-object roots are left alone. Returns how many keys
/// were removed, so a second call always returns 0.
pub fn redact(root: &mut Value) -> usize {
    let Value::Object(map) = root else {
        debug!("Response root is not an object, nothing to redact");
        return 0;
    };

    REDACTION_SET
        .iter()
        .filter(|key| map.shift_remove(**key).is_some())
        .count()
}
