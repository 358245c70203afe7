use serde_json::{Value, json};

use crate::client::SseEvent;
use crate::router::{GuardDecision, Navigation};

pub(crate) fn output_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// One compact line per stream event, for piping into other tools
pub(crate) fn output_event_json(event: &SseEvent) -> String {
    json!({"event": event.event, "data": event.data}).to_string()
}

pub(crate) fn output_navigation_json(nav: &Navigation) -> String {
    let (decision, redirect) = match &nav.decision {
        GuardDecision::Allowed => ("allowed", None),
        GuardDecision::RedirectLogin { redirect } => ("login", Some(redirect.as_str())),
        GuardDecision::RedirectHome => ("home", None),
    };
    let value = json!({
        "path": nav.resolved.full_path,
        "page": nav.resolved.leaf().and_then(|r| r.name),
        "decision": decision,
        "redirect": redirect,
    });
    output_json(&value)
}
