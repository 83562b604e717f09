use crate::flowchart::Context;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The raw, loader-produced shape of a flowchart definition.
///
/// Only the root keys are typed here; node definitions (the `entrypoint` and
/// each `blocks` entry) stay untyped [`Value`] trees, decoded once and
/// validated by [`crate::builder::FlowchartBuilder`]. Any self-describing
/// serde format can produce this structure; the optional `yaml` feature adds
/// `from_yaml_str` / `from_yaml_file` entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowchartDefinition {
    /// The root node definition. Must resolve to a decision node.
    pub entrypoint: Value,
    /// Top-level context merged into every run of this flowchart.
    #[serde(default)]
    pub context: Context,
    /// Reusable node-definition fragments, keyed by id.
    #[serde(default)]
    pub blocks: AHashMap<String, Value>,
    #[serde(default)]
    pub options: FlowchartOptions,
}

/// Flowchart-wide options carried inside the definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FlowchartOptions {
    /// When false, building fails if any declared case across the tree is
    /// left unhandled.
    pub allow_unhandled_cases: bool,
    /// Checker id assumed for nodes that do not declare one.
    pub default_checker: Option<String>,
}

impl Default for FlowchartOptions {
    fn default() -> Self {
        Self {
            allow_unhandled_cases: true,
            default_checker: None,
        }
    }
}

/// Parses a YAML document into a [`FlowchartDefinition`].
#[cfg(feature = "yaml")]
pub fn from_yaml_str(yaml: &str) -> Result<FlowchartDefinition, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Reads and parses a YAML definition file.
#[cfg(feature = "yaml")]
pub fn from_yaml_file(
    path: impl AsRef<std::path::Path>,
) -> Result<FlowchartDefinition, Box<dyn std::error::Error + Send + Sync>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
