use crate::checker::Checker;
use crate::flowchart::{CaseValue, Context, DecisionNode, Flowchart};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Per-evaluation state threaded through the dispatch loop.
///
/// Private to one evaluation, never shared across concurrent runs.
/// Transitions are functional: each step consumes the state and returns the
/// updated one, carrying the history and last result forward and merging
/// context last-write-wins. The state attached to a runtime error is the
/// snapshot at the point of failure.
pub struct RunnerState {
    node: Arc<DecisionNode>,
    flowchart: Arc<Flowchart>,
    subject: Value,
    checker: Arc<dyn Checker>,
    checker_id: String,
    context: Context,
    last_result: Option<CaseValue>,
    history: Vec<(String, CaseValue)>,
}

impl RunnerState {
    pub(crate) fn new(
        node: Arc<DecisionNode>,
        flowchart: Arc<Flowchart>,
        subject: Value,
        checker: Arc<dyn Checker>,
        checker_id: String,
        context: Context,
    ) -> Self {
        Self {
            node,
            flowchart,
            subject,
            checker,
            checker_id,
            context,
            last_result: None,
            history: Vec::new(),
        }
    }

    /// Switches to another decision node and its resolved checker.
    pub(crate) fn with_node(
        mut self,
        node: Arc<DecisionNode>,
        checker: Arc<dyn Checker>,
        checker_id: String,
    ) -> Self {
        self.node = node;
        self.checker = checker;
        self.checker_id = checker_id;
        self
    }

    /// Appends the current node's decision to the history and sets the last
    /// result.
    pub(crate) fn record(mut self, result: CaseValue) -> Self {
        self.history.push((self.node.id.clone(), result.clone()));
        self.last_result = Some(result);
        self
    }

    /// Merges `extra` into the running context, last write winning per key.
    pub(crate) fn merge_context(mut self, extra: &Context) -> Self {
        for (key, value) in extra {
            self.context.insert(key.clone(), value.clone());
        }
        self
    }

    pub(crate) fn checker(&self) -> &Arc<dyn Checker> {
        &self.checker
    }

    /// The decision node the run currently sits at.
    pub fn node(&self) -> &Arc<DecisionNode> {
        &self.node
    }

    pub fn node_id(&self) -> &str {
        &self.node.id
    }

    pub fn flowchart(&self) -> &Arc<Flowchart> {
        &self.flowchart
    }

    pub fn subject(&self) -> &Value {
        &self.subject
    }

    /// The id of the currently resolved checker.
    pub fn checker_id(&self) -> &str {
        &self.checker_id
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The most recent checker result, `None` before the first decision.
    pub fn last_result(&self) -> Option<&CaseValue> {
        self.last_result.as_ref()
    }

    /// Every decision made so far, as ordered `(node id, result)` pairs.
    pub fn history(&self) -> &[(String, CaseValue)] {
        &self.history
    }
}

// Manual implementation because the checker instance is opaque.
impl fmt::Debug for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerState")
            .field("node", &self.node.id)
            .field("checker", &self.checker_id)
            .field("context", &self.context)
            .field("last_result", &self.last_result)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
