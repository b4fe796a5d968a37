//! MCP tool implementations.
//!
//! This module contains all tools exposed by the qcache server.

pub mod cache;

/// Parse the JSON text payload of a successful tool result.
#[cfg(test)]
pub(crate) fn output_json<T: serde::de::DeserializeOwned>(result: &rmcp::model::CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
