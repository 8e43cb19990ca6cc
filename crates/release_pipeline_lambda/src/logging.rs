//! One JSON object per log line on stderr, picked up by CloudWatch Logs.

use std::sync::OnceLock;

use serde_json::{json, Value};

pub const LOG_LEVEL_ENV: &str = "RELEASE_LOG_LEVEL";

pub fn log_info(component: &str, event: &str, details: Value) {
    emit("info", component, event, details);
}

pub fn log_warn(component: &str, event: &str, details: Value) {
    emit("warn", component, event, details);
}

pub fn log_error(component: &str, event: &str, details: Value) {
    emit("error", component, event, details);
}

/// Emitted only when `RELEASE_LOG_LEVEL=debug`.
pub fn log_debug(component: &str, event: &str, details: Value) {
    if debug_enabled() {
        emit("debug", component, event, details);
    }
}

fn debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var(LOG_LEVEL_ENV)
            .map(|level| level.trim().eq_ignore_ascii_case("debug"))
            .unwrap_or(false)
    })
}

fn emit(level: &str, component: &str, event: &str, details: Value) {
    eprintln!("{}", log_line(level, component, event, details));
}

fn log_line(level: &str, component: &str, event: &str, details: Value) -> Value {
    json!({
        "component": component,
        "level": level,
        "event": event,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "details": details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_line_carries_component_and_details() {
        let line = log_line("error", "stage_handler", "job_failed", json!({"job_id": "job-1"}));
        assert_eq!(line["component"], "stage_handler");
        assert_eq!(line["level"], "error");
        assert_eq!(line["event"], "job_failed");
        assert_eq!(line["details"]["job_id"], "job-1");
        assert!(line["timestamp"].as_str().is_some());
    }
}
