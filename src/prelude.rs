//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the bunki crate. Import this
//! module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = std::fs::read_to_string("path/to/flowchart.json")?;
//! let definition: FlowchartDefinition = serde_json::from_str(&raw)?;
//! let flowchart = std::sync::Arc::new(FlowchartBuilder::new(definition).build()?);
//!
//! let registry = ServiceRegistry::new().with_checker(
//!     "default",
//!     FnChecker::new(|subject, _criteria, _context| {
//!         Ok(CaseValue::Bool(subject["stock"].as_i64().unwrap_or(0) > 0))
//!     }),
//! );
//! let runner = FlowchartRunner::new(registry);
//!
//! let outcome = runner.satisfies(json!({"stock": 10}), flowchart, Context::default())?;
//! println!("{} ({})", outcome.result, TraceFormatter::format_history(outcome.state.history()));
//! # Ok(())
//! # }
//! ```

// Building and running
pub use crate::builder::FlowchartBuilder;
pub use crate::runner::{FlowchartRunner, RunOutcome, RunnerState};

// Decision model
pub use crate::flowchart::{Action, CaseValue, Cases, Context, DecisionNode, Flowchart, Step};

// Definition model
pub use crate::definition::{FlowchartDefinition, FlowchartOptions};

// Checkers and service resolution
pub use crate::checker::{Checker, FnChecker};
pub use crate::registry::{Service, ServiceRegistry};

// Error types
pub use crate::error::{BuildError, CheckerError, RegistryError, RuntimeError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Commonly used alongside this crate
pub use serde_json::{Value, json};
