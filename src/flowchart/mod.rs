pub mod action;
pub mod case;
pub mod node;

pub use action::*;
pub use case::*;
pub use node::*;

use ahash::AHashMap;
use serde_json::Value;
use std::sync::Arc;

/// The evolving string-keyed auxiliary data visible to checkers and carried
/// through the trace. Merge semantics are last-write-wins per key.
pub type Context = AHashMap<String, Value>;

/// The complete, validated, immutable decision tree plus its flattened jump
/// registry.
///
/// Built once; safe to share and reuse concurrently across independent
/// evaluations because it is never mutated after construction.
#[derive(Debug)]
pub struct Flowchart {
    pub entrypoint: Arc<DecisionNode>,
    pub context: Context,
    nodes: AHashMap<String, Arc<DecisionNode>>,
}

impl Flowchart {
    /// Walks every case edge from the entrypoint and flattens the reachable
    /// nodes into the id registry. `Goto` edges are not walked; they resolve
    /// dynamically against this registry at run time.
    pub fn new(context: Context, entrypoint: Arc<DecisionNode>) -> Self {
        let mut nodes = AHashMap::new();
        Self::register(&entrypoint, &mut nodes);
        Self {
            entrypoint,
            context,
            nodes,
        }
    }

    /// Looks up a node by id in the flattened registry.
    pub fn find_node(&self, id: &str) -> Option<&Arc<DecisionNode>> {
        self.nodes.get(id)
    }

    /// All registered nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<DecisionNode>> {
        self.nodes.values()
    }

    // Pre-order walk; the first node seen under an id wins, so a duplicate
    // id deeper in the tree is shadowed for jump resolution.
    fn register(node: &Arc<DecisionNode>, nodes: &mut AHashMap<String, Arc<DecisionNode>>) {
        nodes
            .entry(node.id.clone())
            .or_insert_with(|| Arc::clone(node));
        for (_, step) in node.cases.conditions() {
            if let Step::Decision(child) = step {
                Self::register(child, nodes);
            }
        }
    }
}
