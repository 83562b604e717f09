//! # Bunki - Flowchart Decision Engine
//!
//! **Bunki** evaluates a subject against a tree of binary or multi-valued
//! decision points and produces a terminal outcome plus a trace of every
//! decision made along the way. Each decision point delegates its actual
//! test to a pluggable, named classifier (a "checker"); the tree itself only
//! encodes control flow: which branch to take for which checker outcome, and
//! what to do at the leaves (end with a result, jump elsewhere by id, raise
//! an error, or flag the branch as not implemented yet).
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Definition**: Parse a flowchart definition (e.g. from
//!     JSON or YAML) into a [`definition::FlowchartDefinition`]. The node
//!     tree inside stays raw; any self-describing serde format works.
//! 2.  **Build**: Run it through [`builder::FlowchartBuilder`], which
//!     normalizes shorthand forms, validates every field, expands the
//!     declared cases of each node, and produces an immutable
//!     [`flowchart::Flowchart`] with a flattened id registry for jumps.
//! 3.  **Wire Checkers**: Register checker implementations (and optionally
//!     flowcharts) by name in a [`registry::ServiceRegistry`].
//! 4.  **Run**: Hand subject, flowchart and an initial context to
//!     [`runner::FlowchartRunner`]. The runner resolves each node's checker
//!     by name, threads the evolving context through the walk, and returns
//!     the terminal result together with the final state and history.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A flowchart: sellable when in stock and not blacklisted.
//!     let definition: FlowchartDefinition = serde_json::from_value(json!({
//!         "entrypoint": {
//!             "id": "stock_check",
//!             "checker": "default",
//!             "criteria": "stock > 0",
//!             "when@false": { "end": { "result": false, "context": { "reason": "Out of stock" } } },
//!             "when@true": {
//!                 "id": "blacklist_check",
//!                 "checker": "default",
//!                 "criteria": "blacklisted",
//!                 "when@true": { "end": false },
//!                 "when@false": { "end": true }
//!             }
//!         }
//!     }))?;
//!
//!     let flowchart = Arc::new(FlowchartBuilder::new(definition).build()?);
//!
//!     // Checkers are resolved by the name each node carries.
//!     let registry = ServiceRegistry::new().with_checker(
//!         "default",
//!         FnChecker::new(|subject, criteria, _context| {
//!             match criteria.and_then(Value::as_str) {
//!                 Some("stock > 0") => Ok(CaseValue::Bool(subject["stock"].as_i64().unwrap_or(0) > 0)),
//!                 Some("blacklisted") => Ok(CaseValue::Bool(subject["blacklisted"].as_bool().unwrap_or(false))),
//!                 other => Err(CheckerError::msg(format!("unknown criteria: {:?}", other))),
//!             }
//!         }),
//!     );
//!     let runner = FlowchartRunner::new(registry);
//!
//!     let subject = json!({ "stock": 10, "blacklisted": false });
//!     let outcome = runner.satisfies(subject, flowchart, Context::default())?;
//!
//!     println!("-> Result: {}", outcome.result);
//!     println!("-> Trace: {}", TraceFormatter::format_history(outcome.state.history()));
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod checker;
pub mod definition;
pub mod error;
pub mod flowchart;
pub mod prelude;
pub mod registry;
pub mod runner;
pub mod trace;
