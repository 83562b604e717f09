use crate::error::RuntimeError;
use crate::flowchart::{Action, CaseValue, Context, Flowchart, Step};
use crate::registry::ServiceRegistry;
use serde_json::Value;
use std::sync::Arc;

mod state;

pub use state::RunnerState;

/// The result of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    /// The terminal result of the applied `end` action.
    pub result: CaseValue,
    /// The final runner state: trace, merged context, last node.
    pub state: RunnerState,
}

/// Walks a flowchart, delegating each decision to its named checker.
///
/// The runner itself is stateless between evaluations; a single instance can
/// serve any number of concurrent `satisfies` calls against shared
/// flowcharts. Evaluation is synchronous and runs to completion or failure —
/// a `goto` cycle with no terminating condition loops forever, by design.
pub struct FlowchartRunner {
    registry: ServiceRegistry,
}

impl FlowchartRunner {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Evaluates `subject` against a flowchart registered under `name`.
    pub fn satisfies_named(
        &self,
        subject: Value,
        name: &str,
        context: Context,
    ) -> Result<RunOutcome, RuntimeError> {
        let flowchart = self.registry.flowchart(name)?;
        self.satisfies(subject, flowchart, context)
    }

    /// Evaluates `subject` against `flowchart`, starting from `context`.
    ///
    /// Returns the terminal result together with the final state; a failed
    /// run returns a [`RuntimeError`] carrying the state snapshot (and thus
    /// the trace) at the point of failure.
    pub fn satisfies(
        &self,
        subject: Value,
        flowchart: Arc<Flowchart>,
        context: Context,
    ) -> Result<RunOutcome, RuntimeError> {
        let entry = Arc::clone(&flowchart.entrypoint);
        let checker = self.registry.checker(&entry.checker_id)?;
        let checker_id = entry.checker_id.clone();
        let flowchart_context = flowchart.context.clone();
        let state = RunnerState::new(entry, flowchart, subject, checker, checker_id, context)
            .merge_context(&flowchart_context);
        self.process(state)
    }

    /// The dispatch loop. One iteration per visited decision node: merge the
    /// node's context, run its checker, record the decision, then either
    /// descend into the next node or apply a terminal action. `goto` is a
    /// control transfer handled right here, not an error travelling through
    /// call frames: the target is looked up in the flowchart's id registry
    /// and the loop resumes from it.
    fn process(&self, mut state: RunnerState) -> Result<RunOutcome, RuntimeError> {
        loop {
            let node = Arc::clone(state.node());
            state = state.merge_context(&node.context);

            let result = match state.checker().satisfies(
                state.subject(),
                node.criteria.as_ref(),
                state.context(),
            ) {
                Ok(result) => result,
                Err(source) => {
                    return Err(RuntimeError::CheckerFailed {
                        checker_id: state.checker_id().to_owned(),
                        source,
                        state,
                    });
                }
            };
            state = state.record(result.clone());

            let next = match node.cases.resolve(&result) {
                Some(step) => step.clone(),
                None => return Err(RuntimeError::NoCaseMatch { result, state }),
            };

            match next {
                Step::Decision(child) => {
                    let checker = self.registry.checker(&child.checker_id)?;
                    let checker_id = child.checker_id.clone();
                    state = state.with_node(child, checker, checker_id);
                }
                Step::Action(Action::End {
                    result: explicit,
                    context,
                }) => {
                    state = state.merge_context(&context);
                    return Ok(RunOutcome {
                        result: explicit.unwrap_or(result),
                        state,
                    });
                }
                Step::Action(Action::Goto { target, context }) => {
                    state = state.merge_context(&context);
                    let Some(target_node) = state.flowchart().find_node(&target).cloned() else {
                        return Err(RuntimeError::UnknownJumpTarget { target, state });
                    };
                    let checker = self.registry.checker(&target_node.checker_id)?;
                    let checker_id = target_node.checker_id.clone();
                    state = state.with_node(target_node, checker, checker_id);
                }
                Step::Action(Action::RaiseError {
                    message,
                    kind,
                    context,
                }) => {
                    state = state.merge_context(&context);
                    return Err(RuntimeError::Raised {
                        message,
                        kind,
                        state,
                    });
                }
                Step::Action(Action::Unhandled) => {
                    return Err(RuntimeError::UnhandledStep { state });
                }
            }
        }
    }
}
