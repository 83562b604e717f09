//! Common test utilities: the product-sellable flowchart and its checkers.
use bunki::prelude::*;

/// The product-sellable flowchart: stock, blacklist, role, category and
/// expiration checks, exercising a reusable block (`use`) and a `goto`.
///
/// The expiration node leaves its `false` case unconfigured on purpose.
#[allow(dead_code)]
pub fn sellable_definition() -> FlowchartDefinition {
    serde_json::from_value(json!({
        "entrypoint": {
            "id": "stock_check",
            "label": "Ensure product is in stock",
            "checker": "default",
            "criteria": "stock > 0",
            "when@false": {
                "end": { "result": false, "context": { "reason": "Out of stock" } }
            },
            "when@true": {
                "id": "blacklist_check",
                "label": "Ensure product is allowed to be purchased",
                "checker": "default",
                "criteria": "blacklisted",
                "when@true": {
                    "id": "role_check",
                    "checker": "default",
                    "criteria": "role == ADMIN",
                    "when@false": {
                        "end": { "result": false, "context": { "reason": "Product is blacklisted" } }
                    },
                    "when@true": { "goto": "category_check" }
                },
                "when@false": { "use": "category_check" }
            }
        },
        "blocks": {
            "category_check": {
                "label": "Ensure product is categorized",
                "checker": "default",
                "criteria": "categorized",
                "when@false": { "error": "Product should never be uncategorized" },
                "when@true": {
                    "id": "expiration_check",
                    "label": "Ensure product is not expired",
                    "checker": "default",
                    "criteria": "!expired",
                    "when@true": { "end": true }
                }
            }
        }
    }))
    .expect("definition should deserialize")
}

#[allow(dead_code)]
pub fn product(stock: i64, blacklisted: bool, categorized: bool) -> Value {
    json!({
        "stock": stock,
        "blacklisted": blacklisted,
        "categorized": categorized,
        "expired": false,
    })
}

#[allow(dead_code)]
pub fn expired_product() -> Value {
    json!({ "stock": 10, "blacklisted": false, "categorized": true, "expired": true })
}

/// A registry with the criteria-string checker the sellable flowchart names
/// as `default` — it stands in for the expression checker wired externally
/// in production.
#[allow(dead_code)]
pub fn product_registry() -> ServiceRegistry {
    ServiceRegistry::new().with_checker("default", FnChecker::new(product_checker))
}

fn product_checker(
    subject: &Value,
    criteria: Option<&Value>,
    context: &Context,
) -> Result<CaseValue, CheckerError> {
    let criteria = criteria.and_then(Value::as_str).unwrap_or_default();
    let satisfied = match criteria {
        "stock > 0" => subject["stock"].as_i64().unwrap_or(0) > 0,
        "blacklisted" => subject["blacklisted"].as_bool().unwrap_or(false),
        "role == ADMIN" => context.get("role").and_then(Value::as_str) == Some("ADMIN"),
        "categorized" => subject["categorized"].as_bool().unwrap_or(false),
        "!expired" => !subject["expired"].as_bool().unwrap_or(false),
        other => return Err(CheckerError::msg(format!("unknown criteria: {}", other))),
    };
    Ok(CaseValue::Bool(satisfied))
}

#[allow(dead_code)]
pub fn user_context(role: &str) -> Context {
    Context::from_iter([("role".to_owned(), json!(role))])
}

/// Flattens a state's history into `(id, bool)` pairs for assertions.
#[allow(dead_code)]
pub fn bool_history(state: &RunnerState) -> Vec<(String, bool)> {
    state
        .history()
        .iter()
        .map(|(id, result)| match result {
            CaseValue::Bool(b) => (id.clone(), *b),
            other => panic!("expected a boolean decision, got {:?}", other),
        })
        .collect()
}
