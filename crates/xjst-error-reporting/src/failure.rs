//! Failures reported by the template compiler.

use serde::{Deserialize, Serialize};

/// A failure signalled by the external template compiler.
///
/// The compiler reports errors as loosely shaped objects with a message and
/// optional `line`/`column` fields. They are normalized into this tagged
/// union on arrival so that "is it positioned" is decided exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCompileFailure", into = "RawCompileFailure")]
pub enum CompileFailure {
    /// A failure with a 1-indexed line and column in the merged unit
    Positioned {
        message: String,
        line: usize,
        column: usize,
    },
    /// A failure without a usable position
    Unpositioned { message: String },
}

/// Wire shape of a compiler failure: `{ "message", "line"?, "column"? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompileFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl CompileFailure {
    /// Create a positioned failure.
    pub fn positioned(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Positioned {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a failure without position.
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self::Unpositioned {
            message: message.into(),
        }
    }

    /// The compiler's message, verbatim.
    pub fn message(&self) -> &str {
        match self {
            Self::Positioned { message, .. } | Self::Unpositioned { message } => message,
        }
    }

    /// Line and column when the failure is positioned.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Positioned { line, column, .. } => Some((*line, *column)),
            Self::Unpositioned { .. } => None,
        }
    }
}

impl From<RawCompileFailure> for CompileFailure {
    /// A failure counts as positioned only when both line and column are
    /// present and non-zero.
    fn from(raw: RawCompileFailure) -> Self {
        match (raw.line, raw.column) {
            (Some(line), Some(column)) if line > 0 && column > 0 => Self::Positioned {
                message: raw.message,
                line,
                column,
            },
            _ => Self::Unpositioned {
                message: raw.message,
            },
        }
    }
}

impl From<CompileFailure> for RawCompileFailure {
    fn from(failure: CompileFailure) -> Self {
        match failure {
            CompileFailure::Positioned {
                message,
                line,
                column,
            } => RawCompileFailure {
                message,
                line: Some(line),
                column: Some(column),
            },
            CompileFailure::Unpositioned { message } => RawCompileFailure {
                message,
                line: None,
                column: None,
            },
        }
    }
}

impl std::fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CompileFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positioned_from_json() {
        let failure: CompileFailure =
            serde_json::from_str(r#"{"message": "Unexpected token", "line": 2, "column": 5}"#)
                .unwrap();
        assert_eq!(failure, CompileFailure::positioned("Unexpected token", 2, 5));
        assert_eq!(failure.position(), Some((2, 5)));
    }

    #[test]
    fn test_missing_column_is_unpositioned() {
        let failure: CompileFailure =
            serde_json::from_str(r#"{"message": "boom", "line": 2}"#).unwrap();
        assert_eq!(failure, CompileFailure::unpositioned("boom"));
        assert!(failure.position().is_none());
    }

    #[test]
    fn test_zero_position_is_unpositioned() {
        let raw = RawCompileFailure {
            message: "boom".to_string(),
            line: Some(0),
            column: Some(3),
        };
        assert_eq!(CompileFailure::from(raw), CompileFailure::unpositioned("boom"));
    }

    #[test]
    fn test_unpositioned_serializes_without_position_fields() {
        let json = serde_json::to_value(CompileFailure::unpositioned("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "boom" }));
    }

    #[test]
    fn test_display_is_the_message() {
        let failure = CompileFailure::positioned("Unexpected token at: 2:5", 2, 5);
        assert_eq!(failure.to_string(), "Unexpected token at: 2:5");
    }
}
