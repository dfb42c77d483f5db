//! Diagnostic logging for the streaming pipeline. With the TUI owning the
//! terminal, messages go to a file (`CODEMEND_LOG_PATH`, defaulting to
//! /tmp when stderr is a terminal) and fall back to stderr otherwise.

use crate::util::parse_bool;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

const DEFAULT_LOG_PATH: &str = "/tmp/codemend-debug.log";
const DEBUG_PAYLOAD_ENV: &str = "CODEMEND_DEBUG_PAYLOAD";
const LOG_PATH_ENV: &str = "CODEMEND_LOG_PATH";

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false)
}

pub fn emit_debug_payload(request_url: &str, payload: &Value) {
    let body = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    emit("DEBUG", &format!("payload_request url={request_url}\n{body}"));
}

pub fn emit_sse_parse_error(
    event_type: Option<&str>,
    json_data: &str,
    parse_error: &serde_json::Error,
) {
    emit(
        "ERROR",
        &format!(
            "sse_parse_failed event_type={} error={parse_error}\n{json_data}",
            event_type.unwrap_or("<none>")
        ),
    );
}

pub fn emit_rejected_action(tag: &str, phase: &str) {
    emit("WARN", &format!("action_rejected tag={tag} phase={phase}"));
}

pub fn emit_empty_buffer(action: &str) {
    emit(
        "WARN",
        &format!("prompt_skipped action={action} reason=empty_buffer"),
    );
}

fn emit(level: &str, message: &str) {
    let line = format!("CODEMEND {level} {message}\n");
    if let Some(path) = resolve_log_path() {
        if append_log_file(&path, &line).is_ok() {
            return;
        }
    }
    eprintln!("{line}");
}

fn resolve_log_path() -> Option<String> {
    if let Ok(path) = std::env::var(LOG_PATH_ENV) {
        let path = path.trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }

    if std::io::stderr().is_terminal() {
        Some(DEFAULT_LOG_PATH.to_string())
    } else {
        None
    }
}

fn append_log_file(path: &str, message: &str) -> std::io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?
        .write_all(message.as_bytes())
}
