//! Conversion between the editor text and [`SecretData`].
//!
//! The editor shows one `key: value` pair per line with plain values. The
//! document stores the same pairs with base64 values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::secret::SecretData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// `line` is the 1-based row in the editor, blank rows included.
    #[error("Line {line} is missing a ':' between key and value")]
    MalformedLine { line: usize },
}

/// Parse editor text into secret data.
///
/// Blank lines are skipped. Each remaining line is split on its first `:`,
/// so values may themselves contain colons.
///
/// # Errors
/// Returns [`PayloadError::MalformedLine`] for the first line without a `:`.
pub fn decode(text: &str) -> Result<SecretData, PayloadError> {
    let mut data = SecretData::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(PayloadError::MalformedLine { line: index + 1 });
        };

        data.insert(key.trim().to_string(), STANDARD.encode(value.trim()));
    }

    Ok(data)
}

/// Render secret data as editor text, one `key: value` line per entry.
///
/// Values that are not valid base64 are shown as stored.
pub fn encode(data: &SecretData) -> String {
    data.iter()
        .map(|(key, value)| format!("{key}: {}\n", display_value(value)))
        .collect()
}

fn display_value(encoded: &str) -> String {
    STANDARD.decode(encoded).map_or_else(
        |_| encoded.to_string(),
        |bytes| String::from_utf8_lossy(&bytes).into_owned(),
    )
}
