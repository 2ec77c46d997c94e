//! Rule model

use serde::{Deserialize, Serialize};

/// How a violated rule affects acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A violation rejects the output
    Blocking,
    /// A violation is recorded but does not reject
    Advisory,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::Advisory => "advisory",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declarative guardrail rule
///
/// `name` selects a predicate known to the validator; `params` carries its
/// parameters. Rules deserialize straight from configuration, so an unknown
/// name or malformed parameters must be representable here and are handled
/// (fail closed) at validation time, not at load time.
///
/// # Example
///
/// ```
/// use brief_guard::GuardrailRule;
/// use serde_json::json;
///
/// let rule = GuardrailRule::blocking("max_chars", json!({ "limit": 4000 }));
/// assert_eq!(rule.name, "max_chars");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailRule {
    /// Predicate name (e.g. "max_chars", "banned_terms")
    pub name: String,

    /// Predicate parameters
    #[serde(default)]
    pub params: serde_json::Value,

    pub severity: Severity,
}

impl GuardrailRule {
    /// Create a blocking rule
    pub fn blocking(name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            params,
            severity: Severity::Blocking,
        }
    }

    /// Create an advisory rule
    pub fn advisory(name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            params,
            severity: Severity::Advisory,
        }
    }
}
