//! Structured error types for the Planche engine.
//!
//! The core layout and render paths never fail on data-shape problems (they
//! normalize and warn instead), so the error surface is small: input parsing,
//! font loading, and composition-level programmer errors.

use thiserror::Error;

/// The unified error type returned by the public Planche API.
#[derive(Debug, Error)]
pub enum PlancheError {
    /// JSON input failed to parse as a valid Planche document.
    #[error("failed to parse input: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font could not be loaded or parsed.
    #[error("font error: {0}")]
    Font(String),

    /// The composer was used incorrectly (fail fast and loud in development).
    #[error("compose error: {0}")]
    Compose(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  hint: {hint}")
    }
}

impl From<serde_json::Error> for PlancheError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "check for trailing commas, missing quotes, or unescaped characters".to_string()
            }
            serde_json::error::Category::Data => {
                "the JSON is valid but does not match the Planche input schema; check field names and types"
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "unexpected end of input — is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PlancheError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_hint() {
        let err: PlancheError = serde_json::from_str::<serde_json::Value>("{ nope")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.contains("failed to parse input"));
        assert!(msg.contains("hint:"));
    }

    #[test]
    fn test_font_error_display() {
        let err = PlancheError::Font("bad face".to_string());
        assert_eq!(err.to_string(), "font error: bad face");
    }

    #[test]
    fn test_compose_error_display() {
        let err = PlancheError::Compose("layout export failed".to_string());
        assert_eq!(err.to_string(), "compose error: layout export failed");
    }
}
