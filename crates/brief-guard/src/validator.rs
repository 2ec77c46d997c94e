//! Rule evaluation
//!
//! Every rule in the list is evaluated in order with no short-circuit, so
//! the caller always gets the complete violation list for feedback
//! construction. Predicates are pure functions of (output, params): no side
//! effects, no network.

use crate::rule::{GuardrailRule, Severity};
use serde_json::Value;
use tracing::debug;

/// One recorded rule violation
#[derive(Debug, Clone)]
pub struct Violation {
    pub rule: String,
    pub severity: Severity,
    pub detail: String,
}

/// Outcome of validating one candidate output
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// False when any blocking rule (or any invalid rule definition) failed
    pub passed: bool,
    /// Violations in rule-list order, advisory ones included
    pub violations: Vec<Violation>,
    /// Corrective text for the next attempt, absent when nothing violated
    pub hint: Option<String>,
}

impl ValidationResult {
    /// Names of violated rules, in rule-list order
    pub fn violated_rules(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.rule.as_str()).collect()
    }

    /// Number of blocking violations
    pub fn blocking_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Blocking)
            .count()
    }

    /// One-line failure description for logs and exhausted outputs
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.rule, v.detail))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Evaluates declarative rule sets against candidate output
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardrailValidator;

impl GuardrailValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `output` against `rules`
    ///
    /// Blocking violations reject the output; advisory violations are
    /// recorded only. An unknown predicate name or malformed parameters
    /// fail closed: the rule counts as a blocking violation no matter what
    /// severity it declared, and contributes no model-facing hint (the
    /// problem is in the configuration, not the output).
    pub fn validate(&self, output: &str, rules: &[GuardrailRule]) -> ValidationResult {
        let mut violations = Vec::new();
        let mut hints: Vec<String> = Vec::new();
        let mut blocking = 0usize;

        for rule in rules {
            match evaluate(&rule.name, &rule.params, output) {
                Ok(None) => {}
                Ok(Some(failure)) => {
                    if rule.severity == Severity::Blocking {
                        blocking += 1;
                    }
                    hints.push(failure.hint);
                    violations.push(Violation {
                        rule: rule.name.clone(),
                        severity: rule.severity,
                        detail: failure.detail,
                    });
                }
                Err(detail) => {
                    blocking += 1;
                    violations.push(Violation {
                        rule: rule.name.clone(),
                        severity: Severity::Blocking,
                        detail: format!("invalid rule: {detail}"),
                    });
                }
            }
        }

        let passed = blocking == 0;
        debug!(
            rule_count = rules.len(),
            violations = violations.len(),
            passed,
            "Guardrail validation completed"
        );

        let hint = if hints.is_empty() {
            None
        } else {
            Some(hints.join("; "))
        };

        ValidationResult {
            passed,
            violations,
            hint,
        }
    }
}

struct RuleFailure {
    detail: String,
    hint: String,
}

/// Dispatch one predicate
///
/// `Ok(None)` means the rule passed, `Ok(Some(_))` a violation, `Err` an
/// invalid rule definition.
fn evaluate(name: &str, params: &Value, output: &str) -> Result<Option<RuleFailure>, String> {
    match name {
        "nonempty" => Ok(nonempty(output)),
        "max_chars" => Ok(max_chars(output, require_limit(params)?)),
        "min_chars" => Ok(min_chars(output, require_limit(params)?)),
        "banned_terms" => Ok(banned_terms(output, &string_list(params, "terms")?)),
        "required_fields" => Ok(required_fields(output, &string_list(params, "fields")?)),
        "json_object" => Ok(json_object(output)),
        _ => Err(format!("unknown predicate '{name}'")),
    }
}

fn require_limit(params: &Value) -> Result<usize, String> {
    params
        .get("limit")
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .ok_or_else(|| "missing numeric 'limit' parameter".to_string())
}

fn string_list(params: &Value, key: &str) -> Result<Vec<String>, String> {
    let items = params
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| format!("missing '{key}' list parameter"))?;

    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("non-string entry in '{key}'"))
        })
        .collect()
}

fn nonempty(output: &str) -> Option<RuleFailure> {
    if output.trim().is_empty() {
        Some(RuleFailure {
            detail: "output is empty".to_string(),
            hint: "produce a non-empty response".to_string(),
        })
    } else {
        None
    }
}

fn max_chars(output: &str, limit: usize) -> Option<RuleFailure> {
    let len = output.chars().count();
    (len > limit).then(|| RuleFailure {
        detail: format!("length {len} exceeds limit {limit}"),
        hint: format!("shorten the response to at most {limit} characters"),
    })
}

fn min_chars(output: &str, limit: usize) -> Option<RuleFailure> {
    let len = output.chars().count();
    (len < limit).then(|| RuleFailure {
        detail: format!("length {len} is below minimum {limit}"),
        hint: format!("expand the response to at least {limit} characters"),
    })
}

fn banned_terms(output: &str, terms: &[String]) -> Option<RuleFailure> {
    let lower = output.to_lowercase();
    let found: Vec<&str> = terms
        .iter()
        .filter(|t| !t.is_empty() && lower.contains(&t.to_lowercase()))
        .map(String::as_str)
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(RuleFailure {
            detail: format!("contains banned terms: {}", found.join(", ")),
            hint: format!("remove these phrases: {}", found.join(", ")),
        })
    }
}

fn required_fields(output: &str, fields: &[String]) -> Option<RuleFailure> {
    match serde_json::from_str::<Value>(output) {
        Ok(Value::Object(map)) => {
            let missing: Vec<&str> = fields
                .iter()
                .filter(|f| !map.contains_key(f.as_str()))
                .map(String::as_str)
                .collect();

            if missing.is_empty() {
                None
            } else {
                Some(RuleFailure {
                    detail: format!("missing fields: {}", missing.join(", ")),
                    hint: format!(
                        "include the fields {} in the JSON object",
                        missing.join(", ")
                    ),
                })
            }
        }
        _ => Some(RuleFailure {
            detail: "output is not a JSON object".to_string(),
            hint: format!(
                "respond with a single JSON object containing the fields: {}",
                fields.join(", ")
            ),
        }),
    }
}

fn json_object(output: &str) -> Option<RuleFailure> {
    match serde_json::from_str::<Value>(output) {
        Ok(Value::Object(_)) => None,
        _ => Some(RuleFailure {
            detail: "output is not a JSON object".to_string(),
            hint: "respond with a single JSON object and no surrounding prose".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> GuardrailValidator {
        GuardrailValidator::new()
    }

    #[test]
    fn test_all_rules_pass() {
        let rules = vec![
            GuardrailRule::blocking("nonempty", json!(null)),
            GuardrailRule::blocking("max_chars", json!({ "limit": 100 })),
        ];

        let result = validator().validate("short and present", &rules);
        assert!(result.passed);
        assert!(result.violations.is_empty());
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_no_short_circuit_collects_all_violations() {
        let rules = vec![
            GuardrailRule::blocking("max_chars", json!({ "limit": 3 })),
            GuardrailRule::blocking("banned_terms", json!({ "terms": ["moon"] })),
        ];

        let result = validator().validate("to the moon", &rules);
        assert!(!result.passed);
        assert_eq!(result.violated_rules(), vec!["max_chars", "banned_terms"]);
        assert_eq!(result.blocking_count(), 2);

        let hint = result.hint.unwrap();
        assert!(hint.contains("at most 3 characters"));
        assert!(hint.contains("moon"));
    }

    #[test]
    fn test_advisory_recorded_but_not_blocking() {
        let rules = vec![
            GuardrailRule::blocking("nonempty", json!(null)),
            GuardrailRule::advisory("min_chars", json!({ "limit": 1000 })),
        ];

        let result = validator().validate("present but brief", &rules);
        assert!(result.passed);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, Severity::Advisory);
        assert!(result.hint.is_some());
    }

    #[test]
    fn test_unknown_rule_fails_closed() {
        let rules = vec![GuardrailRule::blocking("sentiment_is_nice", json!(null))];

        let result = validator().validate("anything", &rules);
        assert!(!result.passed);
        assert!(result.violations[0].detail.starts_with("invalid rule"));
        // Configuration problems produce no model-facing hint
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_malformed_params_fail_closed() {
        let rules = vec![GuardrailRule::blocking("max_chars", json!({ "lim": 3 }))];

        let result = validator().validate("anything", &rules);
        assert!(!result.passed);
        assert!(result.violations[0].detail.contains("invalid rule"));
        assert!(result.violations[0].detail.contains("limit"));
    }

    #[test]
    fn test_advisory_invalid_rule_still_blocks() {
        let rules = vec![GuardrailRule::advisory("no_such_predicate", json!(null))];

        let result = validator().validate("anything", &rules);
        assert!(!result.passed);
        assert_eq!(result.violations[0].severity, Severity::Blocking);
    }

    #[test]
    fn test_nonempty() {
        let rules = vec![GuardrailRule::blocking("nonempty", json!(null))];
        assert!(!validator().validate("   \n ", &rules).passed);
        assert!(validator().validate("text", &rules).passed);
    }

    #[test]
    fn test_banned_terms_case_insensitive() {
        let rules = vec![GuardrailRule::blocking(
            "banned_terms",
            json!({ "terms": ["Guaranteed Returns"] }),
        )];

        let result = validator().validate("this offers GUARANTEED returns", &rules);
        assert!(!result.passed);
        assert!(result.violations[0].detail.contains("Guaranteed Returns"));
    }

    #[test]
    fn test_required_fields() {
        let rules = vec![GuardrailRule::blocking(
            "required_fields",
            json!({ "fields": ["overall", "posts"] }),
        )];

        let ok = r#"{"overall": "mixed", "posts": []}"#;
        assert!(validator().validate(ok, &rules).passed);

        let missing = r#"{"overall": "mixed"}"#;
        let result = validator().validate(missing, &rules);
        assert!(!result.passed);
        assert!(result.violations[0].detail.contains("posts"));

        let not_json = "plain prose";
        let result = validator().validate(not_json, &rules);
        assert!(!result.passed);
        assert!(result.violations[0].detail.contains("not a JSON object"));
    }

    #[test]
    fn test_json_object() {
        let rules = vec![GuardrailRule::blocking("json_object", json!(null))];
        assert!(validator().validate(r#"{"a": 1}"#, &rules).passed);
        assert!(!validator().validate(r#"[1, 2]"#, &rules).passed);
        assert!(!validator().validate("prose", &rules).passed);
    }

    #[test]
    fn test_summary_format() {
        let rules = vec![
            GuardrailRule::blocking("max_chars", json!({ "limit": 2 })),
            GuardrailRule::blocking("nonempty", json!(null)),
        ];

        let result = validator().validate("abc", &rules);
        let summary = result.summary();
        assert!(summary.starts_with("max_chars:"));
        assert!(!summary.contains("nonempty:"));
    }

    #[test]
    fn test_empty_rule_list_passes() {
        let result = validator().validate("anything", &[]);
        assert!(result.passed);
        assert!(result.violations.is_empty());
    }
}
