use crate::definition::FlowchartDefinition;
use crate::error::BuildError;
use crate::flowchart::{Action, CaseValue, Cases, Context, DecisionNode, Flowchart, Step};
use ahash::AHashMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keys a node definition may carry, besides the `when@<value>` branch keys.
const NODE_KEYS: &[&str] = &[
    "checker", "id", "label", "cases", "criteria", "context", "end", "goto", "error", "use",
];
const ACTION_KEYS: &[&str] = &["end", "goto", "error"];

/// Builds a validated [`Flowchart`] out of a raw [`FlowchartDefinition`].
///
/// The builder normalizes shorthand forms (bare terminal values, reusable
/// block references, scalar action declarations), validates every field,
/// expands the declared cases of each node, and optionally proves that no
/// declared case is left unhandled anywhere in the tree.
///
/// Options set here override the ones carried inside the definition's
/// `options` map.
pub struct FlowchartBuilder {
    definition: FlowchartDefinition,
    default_checker: Option<String>,
    allow_unhandled_cases: Option<bool>,
}

impl FlowchartBuilder {
    pub fn new(definition: FlowchartDefinition) -> Self {
        Self {
            definition,
            default_checker: None,
            allow_unhandled_cases: None,
        }
    }

    /// Overrides the definition's `defaultChecker` option.
    pub fn default_checker(mut self, checker_id: impl Into<String>) -> Self {
        self.default_checker = Some(checker_id.into());
        self
    }

    /// Overrides the definition's `allowUnhandledCases` option.
    pub fn allow_unhandled_cases(mut self, allow: bool) -> Self {
        self.allow_unhandled_cases = Some(allow);
        self
    }

    pub fn build(self) -> Result<Flowchart, BuildError> {
        let default_checker = self
            .default_checker
            .or_else(|| self.definition.options.default_checker.clone());
        let allow_unhandled = self
            .allow_unhandled_cases
            .unwrap_or(self.definition.options.allow_unhandled_cases);

        let FlowchartDefinition {
            entrypoint,
            context,
            blocks,
            options: _,
        } = self.definition;

        let blocks = prepare_blocks(&blocks)?;
        let entry = build_step(&entrypoint, &blocks, default_checker.as_deref())?;
        let Step::Decision(entrypoint) = entry else {
            return Err(BuildError::InvalidDefinition(
                "the entrypoint must be a decision node".to_owned(),
            ));
        };

        if !allow_unhandled {
            let mut entries = Vec::new();
            collect_unhandled(&entrypoint, &mut entries);
            if !entries.is_empty() {
                return Err(BuildError::UnhandledCases(entries));
            }
        }

        Ok(Flowchart::new(context, entrypoint))
    }
}

/// Validates the reusable blocks and defaults each block's `id` to its key.
fn prepare_blocks(
    raw: &AHashMap<String, Value>,
) -> Result<AHashMap<String, Map<String, Value>>, BuildError> {
    let mut blocks = AHashMap::with_capacity(raw.len());
    for (key, value) in raw {
        let Value::Object(map) = value else {
            return Err(BuildError::InvalidField {
                field: format!("blocks.{}", key),
                message: format!("a reusable block must be a map, got {}", type_name(value)),
            });
        };
        let mut map = map.clone();
        map.entry("id")
            .or_insert_with(|| Value::String(key.clone()));
        blocks.insert(key.clone(), map);
    }
    Ok(blocks)
}

/// Normalizes one raw step definition into a [`Step`].
///
/// `null` is an unhandled branch, a bare scalar is an immediate end with
/// that result, and a map is either a terminal action (`end`/`goto`/`error`)
/// or a full decision node.
fn build_step(
    data: &Value,
    blocks: &AHashMap<String, Map<String, Value>>,
    default_checker: Option<&str>,
) -> Result<Step, BuildError> {
    let map = match data {
        Value::Null => return Ok(Step::Action(Action::Unhandled)),
        Value::Object(map) => map,
        scalar => {
            let result = CaseValue::from_json(scalar).ok_or_else(|| {
                BuildError::InvalidDefinition(
                    "a step must be a map, a terminal scalar or null".to_owned(),
                )
            })?;
            return Ok(Step::Action(Action::End {
                result: Some(result),
                context: Context::default(),
            }));
        }
    };

    // Merge a referenced block underneath the referencing node's own fields.
    let merged;
    let map = match map.get("use") {
        Some(Value::String(name)) => {
            let block = blocks
                .get(name)
                .ok_or_else(|| BuildError::UnknownBlock(name.clone()))?;
            let mut combined = block.clone();
            for (key, value) in map {
                combined.insert(key.clone(), value.clone());
            }
            merged = combined;
            &merged
        }
        Some(other) => {
            return Err(BuildError::InvalidField {
                field: "use".to_owned(),
                message: format!("should be a block id string, got {}", type_name(other)),
            });
        }
        None => map,
    };

    let mut actions = 0;
    for key in map.keys() {
        if key.starts_with("when@") {
            continue;
        }
        if !NODE_KEYS.contains(&key.as_str()) {
            return Err(BuildError::UnknownField(key.clone()));
        }
        if ACTION_KEYS.contains(&key.as_str()) {
            actions += 1;
        }
    }
    if actions > 1 {
        return Err(BuildError::MultipleActions);
    }

    if let Some(end) = map.get("end") {
        return Ok(Step::Action(normalize_end(end)?));
    }
    if let Some(error) = map.get("error") {
        return Ok(Step::Action(normalize_error(error)?));
    }
    if let Some(goto) = map.get("goto") {
        return Ok(Step::Action(normalize_goto(goto)?));
    }

    build_decision_node(map, blocks, default_checker)
}

fn build_decision_node(
    map: &Map<String, Value>,
    blocks: &AHashMap<String, Map<String, Value>>,
    default_checker: Option<&str>,
) -> Result<Step, BuildError> {
    let id = match map.get("id") {
        None | Some(Value::Null) => generate_id(),
        Some(Value::String(id)) => id.clone(),
        Some(other) => {
            return Err(BuildError::InvalidField {
                field: "id".to_owned(),
                message: format!("should be a string, got {}", type_name(other)),
            });
        }
    };

    let checker_id = match map.get("checker") {
        Some(Value::String(checker)) => checker.clone(),
        None | Some(Value::Null) => default_checker
            .map(str::to_owned)
            .ok_or_else(|| BuildError::MissingChecker {
                node_id: id.clone(),
            })?,
        Some(other) => {
            return Err(BuildError::InvalidField {
                field: "checker".to_owned(),
                message: format!("should be a string, got {}", type_name(other)),
            });
        }
    };

    let label = match map.get("label") {
        None | Some(Value::Null) => None,
        Some(Value::String(label)) => Some(label.clone()),
        Some(other) => {
            return Err(BuildError::InvalidField {
                field: "label".to_owned(),
                message: format!("should be a string, got {}", type_name(other)),
            });
        }
    };

    let declared: Vec<CaseValue> = match map.get("cases") {
        None | Some(Value::Null) => vec![CaseValue::Bool(true), CaseValue::Bool(false)],
        Some(Value::Array(values)) => values
            .iter()
            .map(|value| {
                CaseValue::from_json(value).ok_or_else(|| BuildError::InvalidCaseValue(value.clone()))
            })
            .collect::<Result<_, _>>()?,
        Some(other) => {
            return Err(BuildError::InvalidField {
                field: "cases".to_owned(),
                message: format!("should be a list of case values, got {}", type_name(other)),
            });
        }
    };

    let criteria = match map.get("criteria") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    };

    let context = context_from("context", map.get("context"))?;

    // Branches keyed by values outside the declared set are ignored.
    let mut cases = Cases::new(declared.clone());
    for case in declared {
        let branch = map.get(&format!("when@{}", case));
        let next = build_step(branch.unwrap_or(&Value::Null), blocks, default_checker)?;
        cases.bind(&id, case, next)?;
    }

    Ok(Step::Decision(Arc::new(DecisionNode {
        id,
        checker_id,
        label,
        criteria,
        context,
        cases,
    })))
}

fn normalize_end(data: &Value) -> Result<Action, BuildError> {
    match data {
        Value::Object(map) => {
            ensure_keys("end", map, &["result", "context"])?;
            let result = match map.get("result") {
                None | Some(Value::Null) => None,
                Some(value) => {
                    Some(
                        CaseValue::from_json(value).ok_or_else(|| BuildError::InvalidField {
                            field: "end.result".to_owned(),
                            message: "should be a boolean, integer or string".to_owned(),
                        })?,
                    )
                }
            };
            let context = context_from("end.context", map.get("context"))?;
            Ok(Action::End { result, context })
        }
        scalar => {
            let result = CaseValue::from_json(scalar).ok_or_else(|| BuildError::InvalidField {
                field: "end".to_owned(),
                message: format!("should be a terminal value or a map, got {}", type_name(scalar)),
            })?;
            Ok(Action::End {
                result: Some(result),
                context: Context::default(),
            })
        }
    }
}

fn normalize_goto(data: &Value) -> Result<Action, BuildError> {
    match data {
        Value::String(target) => Ok(Action::Goto {
            target: target.clone(),
            context: Context::default(),
        }),
        Value::Object(map) => {
            ensure_keys("goto", map, &["id", "context"])?;
            let target = match map.get("id") {
                Some(Value::String(id)) => id.clone(),
                _ => {
                    return Err(BuildError::InvalidField {
                        field: "goto.id".to_owned(),
                        message: "should be a string".to_owned(),
                    });
                }
            };
            let context = context_from("goto.context", map.get("context"))?;
            Ok(Action::Goto { target, context })
        }
        other => Err(BuildError::InvalidField {
            field: "goto".to_owned(),
            message: format!(
                "should be a target id string or a map, got {}",
                type_name(other)
            ),
        }),
    }
}

fn normalize_error(data: &Value) -> Result<Action, BuildError> {
    match data {
        Value::String(message) => Ok(Action::RaiseError {
            message: message.clone(),
            kind: None,
            context: Context::default(),
        }),
        Value::Object(map) => {
            ensure_keys("error", map, &["message", "error-kind", "context"])?;
            let message = match map.get("message") {
                None | Some(Value::Null) => Action::DEFAULT_ERROR_MESSAGE.to_owned(),
                Some(Value::String(message)) => message.clone(),
                Some(other) => {
                    return Err(BuildError::InvalidField {
                        field: "error.message".to_owned(),
                        message: format!("should be a string, got {}", type_name(other)),
                    });
                }
            };
            let kind = match map.get("error-kind") {
                None | Some(Value::Null) => None,
                Some(Value::String(kind)) => Some(kind.clone()),
                Some(other) => {
                    return Err(BuildError::InvalidField {
                        field: "error.error-kind".to_owned(),
                        message: format!("should be a string, got {}", type_name(other)),
                    });
                }
            };
            let context = context_from("error.context", map.get("context"))?;
            Ok(Action::RaiseError {
                message,
                kind,
                context,
            })
        }
        other => Err(BuildError::InvalidField {
            field: "error".to_owned(),
            message: format!(
                "should be a message string or a map, got {}",
                type_name(other)
            ),
        }),
    }
}

fn ensure_keys(field: &str, map: &Map<String, Value>, allowed: &[&str]) -> Result<(), BuildError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(BuildError::InvalidField {
                field: field.to_owned(),
                message: format!("must contain only `{}`, got `{}`", allowed.join("`, `"), key),
            });
        }
    }
    Ok(())
}

fn context_from(field: &str, value: Option<&Value>) -> Result<Context, BuildError> {
    match value {
        None | Some(Value::Null) => Ok(Context::default()),
        Some(Value::Object(map)) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        Some(other) => Err(BuildError::InvalidField {
            field: field.to_owned(),
            message: format!("should be a map, got {}", type_name(other)),
        }),
    }
}

fn collect_unhandled(node: &Arc<DecisionNode>, entries: &mut Vec<(String, Vec<String>)>) {
    let unhandled = node.cases.unhandled();
    if !unhandled.is_empty() {
        entries.push((
            node.id.clone(),
            unhandled.iter().map(|case| case.to_string()).collect(),
        ));
    }
    for (_, step) in node.cases.conditions() {
        if let Step::Decision(child) = step {
            collect_unhandled(child, entries);
        }
    }
}

/// Generates a tree-wide-unique node id from a process-wide counter pushed
/// through an LCG scramble, so generated ids do not read as sequential.
fn generate_id() -> String {
    static SEED: AtomicU64 = AtomicU64::new(1);
    let seed = SEED.fetch_add(1, Ordering::Relaxed);
    let mixed = seed
        .wrapping_mul(1_664_525)
        .wrapping_add(1_013_904_223)
        & 0xFFFF_FFFF;
    format!("{:08x}", mixed)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}
