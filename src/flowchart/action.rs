use crate::flowchart::{CaseValue, Context};

/// Terminal behaviors reachable from a decision node instead of another
/// decision. Pure descriptions; the runner's dispatch loop applies them.
#[derive(Debug, Clone)]
pub enum Action {
    /// Stop the run and return `result`, or the last checker result when
    /// `result` is absent. `context` is merged into the state first.
    End {
        result: Option<CaseValue>,
        context: Context,
    },

    /// Transfer control to the node registered under `target`, merging
    /// `context` on the way. Resolved at run time against the flowchart's
    /// id registry, not a structural edge.
    Goto { target: String, context: Context },

    /// Abort the run with `message`. `kind` is an opaque caller-chosen
    /// label carried on the resulting error.
    RaiseError {
        message: String,
        kind: Option<String>,
        context: Context,
    },

    /// This branch intentionally has no behavior yet; reaching it at run
    /// time aborts the evaluation.
    Unhandled,
}

impl Action {
    /// Default message for a `RaiseError` declared without one.
    pub const DEFAULT_ERROR_MESSAGE: &'static str =
        "An error occurred while running the flowchart.";
}
