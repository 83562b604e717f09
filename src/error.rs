use crate::flowchart::CaseValue;
use crate::runner::RunnerState;
use itertools::Itertools;
use thiserror::Error;

/// Errors that can occur while building a flowchart from its raw definition.
///
/// All are fatal to the build call; where a node identity exists, the error
/// names it.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("`{node_id}`: case `{case}` is already defined")]
    DuplicateCase { node_id: String, case: CaseValue },

    #[error("cannot declare more than one of `end`, `goto`, `error` in a single node")]
    MultipleActions,

    #[error("block `{0}` not found")]
    UnknownBlock(String),

    #[error("`{field}`: {message}")]
    InvalidField { field: String, message: String },

    #[error("unrecognized key `{0}` in node definition")]
    UnknownField(String),

    #[error("`{node_id}`: no checker declared and no default checker configured")]
    MissingChecker { node_id: String },

    #[error("unsupported case value `{0}`: cases must be booleans, integers or strings")]
    InvalidCaseValue(serde_json::Value),

    #[error("{}", format_unhandled(.0))]
    UnhandledCases(Vec<(String, Vec<String>)>),

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
}

fn format_unhandled(entries: &[(String, Vec<String>)]) -> String {
    entries
        .iter()
        .map(|(node_id, cases)| {
            format!(
                "cases `{}` are not handled at step `{}`",
                cases.iter().join(", "),
                node_id
            )
        })
        .join("; ")
}

/// Errors that can occur while running a flowchart.
///
/// Every mid-run variant carries the [`RunnerState`] snapshot at the point of
/// failure, so the trace accumulated so far stays recoverable through
/// [`RuntimeError::state`]. None are retried; a failed evaluation yields no
/// terminal result.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("checker `{checker_id}` failed at step `{}`: {source}", state.node_id())]
    CheckerFailed {
        checker_id: String,
        #[source]
        source: CheckerError,
        state: RunnerState,
    },

    #[error("no case found for result `{result}` at step `{}`", state.node_id())]
    NoCaseMatch {
        result: CaseValue,
        state: RunnerState,
    },

    #[error("id `{target}` not found")]
    UnknownJumpTarget { target: String, state: RunnerState },

    /// An explicit `error` action. `kind` is the caller-chosen label from
    /// the definition.
    #[error("{message}")]
    Raised {
        message: String,
        kind: Option<String>,
        state: RunnerState,
    },

    #[error("unhandled step at `{}`", state.node_id())]
    UnhandledStep { state: RunnerState },

    /// A name failed to resolve through the service registry. Carries no
    /// state: the failure may happen before any state exists.
    #[error(transparent)]
    Service(#[from] RegistryError),
}

impl RuntimeError {
    /// The runner state snapshot at the point of failure, when one exists.
    pub fn state(&self) -> Option<&RunnerState> {
        match self {
            RuntimeError::CheckerFailed { state, .. }
            | RuntimeError::NoCaseMatch { state, .. }
            | RuntimeError::UnknownJumpTarget { state, .. }
            | RuntimeError::Raised { state, .. }
            | RuntimeError::UnhandledStep { state } => Some(state),
            RuntimeError::Service(_) => None,
        }
    }
}

/// An opaque failure raised by a checker implementation.
///
/// The engine wraps it immediately as [`RuntimeError::CheckerFailed`]; it is
/// distinct from a checker returning a value outside the declared case set,
/// which is a no-case-match instead.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct CheckerError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl CheckerError {
    /// A checker error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

/// Errors from the named service registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("service `{0}` not found")]
    NotFound(String),

    #[error("service `{name}` is not a {expected}")]
    WrongKind { name: String, expected: &'static str },
}
