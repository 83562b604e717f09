use crate::checker::Checker;
use crate::error::RegistryError;
use crate::flowchart::Flowchart;
use ahash::AHashMap;
use std::sync::Arc;

/// A named capability the runner can resolve at execution time.
#[derive(Clone)]
pub enum Service {
    Checker(Arc<dyn Checker>),
    Flowchart(Arc<Flowchart>),
}

/// Maps string identifiers to checkers and flowcharts.
///
/// Nodes store checker names, not instances; the runner resolves them here
/// on every node switch. Flowcharts registered by name can be executed via
/// [`crate::runner::FlowchartRunner::satisfies_named`]. Use your own service
/// container at the application boundary; this type is the minimal lookup
/// the engine needs.
#[derive(Default, Clone)]
pub struct ServiceRegistry {
    services: AHashMap<String, Service>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a checker under `id`, consuming and returning the registry.
    pub fn with_checker(mut self, id: impl Into<String>, checker: impl Checker + 'static) -> Self {
        self.register_checker(id, Arc::new(checker));
        self
    }

    /// Registers a flowchart under `id`, consuming and returning the registry.
    pub fn with_flowchart(mut self, id: impl Into<String>, flowchart: Arc<Flowchart>) -> Self {
        self.register_flowchart(id, flowchart);
        self
    }

    pub fn register_checker(&mut self, id: impl Into<String>, checker: Arc<dyn Checker>) {
        self.services.insert(id.into(), Service::Checker(checker));
    }

    pub fn register_flowchart(&mut self, id: impl Into<String>, flowchart: Arc<Flowchart>) {
        self.services
            .insert(id.into(), Service::Flowchart(flowchart));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// Resolves a checker by name.
    pub fn checker(&self, id: &str) -> Result<Arc<dyn Checker>, RegistryError> {
        match self.services.get(id) {
            Some(Service::Checker(checker)) => Ok(Arc::clone(checker)),
            Some(Service::Flowchart(_)) => Err(RegistryError::WrongKind {
                name: id.to_owned(),
                expected: "checker",
            }),
            None => Err(RegistryError::NotFound(id.to_owned())),
        }
    }

    /// Resolves a flowchart by name.
    pub fn flowchart(&self, id: &str) -> Result<Arc<Flowchart>, RegistryError> {
        match self.services.get(id) {
            Some(Service::Flowchart(flowchart)) => Ok(Arc::clone(flowchart)),
            Some(Service::Checker(_)) => Err(RegistryError::WrongKind {
                name: id.to_owned(),
                expected: "flowchart",
            }),
            None => Err(RegistryError::NotFound(id.to_owned())),
        }
    }
}
