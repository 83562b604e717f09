use crate::error::BuildError;
use crate::flowchart::{Action, Step};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A value a checker may return and a case may be declared for.
///
/// Comparison is strict: `Int(1)` never matches `Str("1")` or `Bool(true)`.
/// Enumerated symbols are represented by their name as a `Str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl CaseValue {
    /// Reads a case value out of a raw definition scalar.
    ///
    /// Only booleans, integers and strings qualify; everything else
    /// (floats, arrays, maps, null) returns `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(CaseValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(CaseValue::Int),
            Value::String(s) => Some(CaseValue::Str(s.clone())),
            _ => None,
        }
    }
}

/// The canonical stringified form, used in `when@` branch keys and
/// diagnostics. Never used for equality.
impl fmt::Display for CaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseValue::Bool(b) => write!(f, "{}", b),
            CaseValue::Int(i) => write!(f, "{}", i),
            CaseValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for CaseValue {
    fn from(v: bool) -> Self {
        CaseValue::Bool(v)
    }
}

impl From<i64> for CaseValue {
    fn from(v: i64) -> Self {
        CaseValue::Int(v)
    }
}

impl From<&str> for CaseValue {
    fn from(v: &str) -> Self {
        CaseValue::Str(v.to_owned())
    }
}

impl From<String> for CaseValue {
    fn from(v: String) -> Self {
        CaseValue::Str(v)
    }
}

/// The ordered outcome table of a decision node.
///
/// Holds the declared full set of expected values plus the `(value, next
/// step)` pairs bound so far. Built once by the builder; immutable after the
/// owning node exists.
#[derive(Debug, Clone)]
pub struct Cases {
    declared: Vec<CaseValue>,
    conditions: Vec<(CaseValue, Step)>,
}

impl Cases {
    /// Fixes the complete set of outcomes this node must eventually handle.
    pub fn new(declared: Vec<CaseValue>) -> Self {
        Self {
            declared,
            conditions: Vec::new(),
        }
    }

    /// Registers `(value, next)`. Binding the same value twice is a build
    /// error, regardless of where the two bindings point.
    pub fn bind(&mut self, node_id: &str, value: CaseValue, next: Step) -> Result<(), BuildError> {
        if self.conditions.iter().any(|(bound, _)| *bound == value) {
            return Err(BuildError::DuplicateCase {
                node_id: node_id.to_owned(),
                case: value,
            });
        }
        self.conditions.push((value, next));
        Ok(())
    }

    /// Looks up the step bound to `value` using strict equality.
    ///
    /// `None` covers checker outcomes outside the bound set; the engine
    /// reports those as a no-case-match runtime error.
    pub fn resolve(&self, value: &CaseValue) -> Option<&Step> {
        self.conditions
            .iter()
            .find(|(bound, _)| bound == value)
            .map(|(_, next)| next)
    }

    /// Every declared value that is never bound or is explicitly bound to
    /// [`Action::Unhandled`], in declaration order, deduplicated by value.
    pub fn unhandled(&self) -> Vec<&CaseValue> {
        self.declared
            .iter()
            .filter(|case| match self.resolve(case) {
                None => true,
                Some(Step::Action(Action::Unhandled)) => true,
                Some(_) => false,
            })
            .unique()
            .collect()
    }

    /// The declared full set of expected values.
    pub fn declared(&self) -> &[CaseValue] {
        &self.declared
    }

    /// The bound `(value, next step)` pairs, in binding order.
    pub fn conditions(&self) -> &[(CaseValue, Step)] {
        &self.conditions
    }
}
