//! Declarative request validation.
//!
//! A [`RuleSet`] is an ordered list of named predicates, each paired with the
//! message reported when it does not hold. Rules look only at the request's
//! fields; they never touch the store.

use std::fmt;

type Predicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// A single named check over a request.
pub struct Rule<R> {
    name: &'static str,
    message: &'static str,
    predicate: Predicate<R>,
}

impl<R> Rule<R> {
    pub fn new(
        name: &'static str,
        message: &'static str,
        predicate: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            message,
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn holds_for(&self, request: &R) -> bool {
        (self.predicate)(request)
    }
}

impl<R> fmt::Debug for Rule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A rule that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: &'static str,
    pub message: &'static str,
}

/// All rules declared for one request type.
#[derive(Debug)]
pub struct RuleSet<R> {
    rules: Vec<Rule<R>>,
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R> RuleSet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(
        mut self,
        name: &'static str,
        message: &'static str,
        predicate: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule::new(name, message, predicate));
        self
    }

    /// Appends every rule of `other`.
    pub fn extend(mut self, other: RuleSet<R>) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<R>> {
        self.rules.iter()
    }

    /// Evaluates every rule and returns each one that failed, in declaration
    /// order. Evaluation does not stop at the first violation.
    pub fn validate(&self, request: &R) -> Vec<Violation> {
        self.rules
            .iter()
            .filter(|rule| !rule.holds_for(request))
            .map(|rule| Violation {
                rule: rule.name,
                message: rule.message,
            })
            .collect()
    }
}

/// Joins violation messages into a single failure reason.
pub fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| violation.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// True when the string has at least one non-whitespace character.
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}
