use crate::flowchart::CaseValue;
use itertools::Itertools;

/// Formats run histories into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Formats a `(node id, result)` history into a single explanation line,
    /// e.g. `stock_check: true -> blacklist_check: false`.
    pub fn format_history(history: &[(String, CaseValue)]) -> String {
        if history.is_empty() {
            return "no decisions were made".to_owned();
        }
        history
            .iter()
            .map(|(node_id, result)| format!("{}: {}", node_id, result))
            .join(" -> ")
    }
}
