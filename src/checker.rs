use crate::error::CheckerError;
use crate::flowchart::{CaseValue, Context};
use serde_json::Value;

/// The classifier contract consumed by the execution engine.
///
/// A checker receives the evaluation subject, the current node's opaque
/// `criteria` and the running context, and returns the case value the node
/// dispatches on. Returning `Err` aborts the run immediately (wrapped with
/// the state snapshot); returning a value outside the node's declared case
/// set is reported as a no-case-match instead.
pub trait Checker: Send + Sync {
    fn satisfies(
        &self,
        subject: &Value,
        criteria: Option<&Value>,
        context: &Context,
    ) -> Result<CaseValue, CheckerError>;
}

/// Adapts a closure into a [`Checker`].
///
/// The primary way to wire classifiers without a dedicated type:
///
/// ```rust
/// use bunki::checker::FnChecker;
/// use bunki::flowchart::CaseValue;
///
/// let checker = FnChecker::new(|subject, _criteria, _context| {
///     Ok(CaseValue::Bool(subject["stock"].as_i64().unwrap_or(0) > 0))
/// });
/// ```
pub struct FnChecker<F>(F);

impl<F> FnChecker<F>
where
    F: Fn(&Value, Option<&Value>, &Context) -> Result<CaseValue, CheckerError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Checker for FnChecker<F>
where
    F: Fn(&Value, Option<&Value>, &Context) -> Result<CaseValue, CheckerError> + Send + Sync,
{
    fn satisfies(
        &self,
        subject: &Value,
        criteria: Option<&Value>,
        context: &Context,
    ) -> Result<CaseValue, CheckerError> {
        (self.0)(subject, criteria, context)
    }
}
