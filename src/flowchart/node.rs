use crate::flowchart::{Action, Cases, Context};
use serde_json::Value;
use std::sync::Arc;

/// What a resolved case leads to: another decision or a terminal action.
#[derive(Debug, Clone)]
pub enum Step {
    Decision(Arc<DecisionNode>),
    Action(Action),
}

/// One evaluation point in the tree.
///
/// Created by the builder and immutable thereafter; shared between the tree
/// edge that owns it and the flowchart's jump registry.
#[derive(Debug)]
pub struct DecisionNode {
    /// Unique within one flowchart; the jump target key.
    pub id: String,
    /// Name used to resolve the classifier through the service registry.
    pub checker_id: String,
    /// Documentation only.
    pub label: Option<String>,
    /// Opaque data handed to the checker; a single condition or a list of
    /// conditions, meaning defined by the checker.
    pub criteria: Option<Value>,
    /// Merged into the running state when this node is entered.
    pub context: Context,
    pub cases: Cases,
}
