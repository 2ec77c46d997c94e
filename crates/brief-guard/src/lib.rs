//! Declarative guardrails for agent output
//!
//! Guardrail rules are data, not code: a predicate name, a parameter bag,
//! and a severity. That keeps rule sets configurable per role and lets the
//! validator fail closed on rule definitions it does not recognize. The
//! validator is the sole acceptance gate for agent output; nothing else in
//! the pipeline second-guesses it.

pub mod rule;
pub mod validator;

pub use rule::{GuardrailRule, Severity};
pub use validator::{GuardrailValidator, ValidationResult, Violation};
