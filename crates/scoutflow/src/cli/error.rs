//! Operator-facing errors for CLI commands
//!
//! A [`HelpfulError`] carries a one-line message, optional context and
//! `TRY:` suggestions. In `--json` mode the same fields are printed as JSON.

use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub struct HelpfulError {
    pub message: String,
    /// Usually the underlying cause.
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    /// Schema file missing or unreadable
    pub fn schema_unavailable(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(format!("Cannot load schema: {}", path.display()))
            .with_context(cause.to_string())
            .with_suggestions([
                format!("TRY: Check that the schema file exists: ls -la {}", path.display()),
                "TRY: Point at another file with --schema or SCOUTFLOW_SCHEMA".to_string(),
            ])
    }

    /// Schema file present but rejected
    pub fn schema_invalid(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(format!("Invalid schema: {}", path.display()))
            .with_context(cause.to_string())
            .with_suggestions([
                "TRY: Give every kind a single-character start_character and separator".to_string(),
                "TRY: Make sure no two kinds share a start_character".to_string(),
            ])
    }

    /// Input file for codes missing
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("The specified codes file does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                "TRY: Pass codes as arguments or pipe them on stdin".to_string(),
            ])
    }

    /// Store could not be opened
    pub fn store_unavailable(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(format!("Cannot open database: {}", path.display()))
            .with_context(cause.to_string())
            .with_suggestions([
                "TRY: Check write permissions for the database directory".to_string(),
                "TRY: Point at another file with --db or SCOUTFLOW_DB".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// JSON form of a failed command, for `--json` callers.
pub fn json_error(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": {
                "message": helpful.message,
                "context": helpful.context,
                "suggestions": helpful.suggestions,
            }
        }),
        None => serde_json::json!({
            "error": {
                "message": format!("{:#}", err),
                "context": null,
                "suggestions": [],
            }
        }),
    }
}

/// Print a failed command as JSON on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let value = json_error(err);
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_format() {
        let err = HelpfulError::new("Something failed")
            .with_context("While ingesting")
            .with_suggestion("TRY: again");
        let text = err.to_string();
        assert!(text.starts_with("ERROR: Something failed\n"));
        assert!(text.contains("CONTEXT: While ingesting\n"));
        assert!(text.contains("  TRY: again\n"));
    }

    #[test]
    fn test_schema_unavailable_mentions_path() {
        let err = HelpfulError::schema_unavailable(&PathBuf::from("/nope/schema.yml"), "missing");
        assert!(err.message.contains("/nope/schema.yml"));
        assert_eq!(err.context.as_deref(), Some("missing"));
        assert!(err.suggestions.iter().any(|s| s.contains("--schema")));
    }

    #[test]
    fn test_json_error_shapes() {
        let helpful: anyhow::Error = HelpfulError::new("bad").with_context("ctx").into();
        let value = json_error(&helpful);
        assert_eq!(value["error"]["message"], "bad");
        assert_eq!(value["error"]["context"], "ctx");

        let plain = anyhow::anyhow!("boom").context("outer");
        let value = json_error(&plain);
        assert_eq!(value["error"]["message"], "outer: boom");
        assert!(value["error"]["context"].is_null());
    }
}
