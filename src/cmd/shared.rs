/*!
shared.rs - helpers over raw MCP payloads.

Focus:
  - tool_names: names from a serialized `ListToolsResult`
  - ToolOutput: `isError` + `content[].text` from a serialized `CallToolResult`

Payloads are handled as `serde_json::Value` rather than rmcp's typed models so
the extraction does not depend on the exact model layout of a given rmcp
release.
*/

use serde_json::Value;

/* ---- Tool Listing ---- */

/// Names from a JSON value containing a `tools` array.
/// Silent on missing / malformed content (returns empty vec).
pub fn tool_names(value: &Value) -> Vec<String> {
    value
        .get("tools")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.get("name").and_then(|n| n.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/* ---- Call Results ---- */

/// What a tool returned, reduced to the parts the CLI prints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub is_error: bool,
    /// One entry per content item; non-text items are empty strings.
    pub content: Vec<String>,
}

impl ToolOutput {
    #[cfg(test)]
    pub fn ok<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_error: false,
            content: texts.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a serialized `CallToolResult` (`{"content":[..],"isError":..}`).
    pub fn from_json(value: &Value) -> Self {
        let is_error = value
            .get("isError")
            .or_else(|| value.get("is_error"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let content = value
            .get("content")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        item.get("text")
                            .and_then(|t| t.as_str())
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { is_error, content }
    }

    pub fn joined(&self) -> String {
        self.content.join("\n")
    }
}

/* ---- Tests (basic) ---- */
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_names_from_listing() {
        let val = json!({"tools":[{"name":"search_apple_docs"},{"name":"list_wwdc_years"},{"description":"nameless"}]});
        assert_eq!(tool_names(&val), vec!["search_apple_docs", "list_wwdc_years"]);
    }

    #[test]
    fn tool_names_empty_or_malformed() {
        assert!(tool_names(&json!({"tools":[]})).is_empty());
        assert!(tool_names(&json!({"other":1})).is_empty());
        assert!(tool_names(&Value::Null).is_empty());
    }

    #[test]
    fn output_from_call_result() {
        let val = json!({
            "content":[
                {"type":"text","text":"A"},
                {"type":"image","data":"..","mimeType":"image/png"},
                {"type":"text","text":"B"}
            ],
            "isError": false
        });
        let out = ToolOutput::from_json(&val);
        assert!(!out.is_error);
        assert_eq!(out.joined(), "A\n\nB");
    }

    #[test]
    fn output_error_flag() {
        let out = ToolOutput::from_json(&json!({"content":[{"type":"text","text":"nope"}],"isError":true}));
        assert!(out.is_error);
        assert_eq!(out.joined(), "nope");
        // absent flag means success
        assert!(!ToolOutput::from_json(&json!({"content":[]})).is_error);
    }

    #[test]
    fn constructors() {
        assert_eq!(ToolOutput::ok(["A", "B"]).joined(), "A\nB");
        assert!(!ToolOutput::ok(["x"]).is_error);
    }
}
