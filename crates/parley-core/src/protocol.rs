use serde::{Deserialize, Serialize};

/// One tool invocation, read as a single JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    #[serde(default)]
    pub id: serde_json::Value,
    pub tool: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolRequest {
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

/// The answer to a [`ToolRequest`], written as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: serde_json::Value,
    pub is_error: bool,
    pub content: String,
}

impl ToolResponse {
    pub fn text(id: serde_json::Value, content: impl Into<String>) -> Self {
        Self {
            id,
            is_error: false,
            content: content.into(),
        }
    }

    pub fn error(id: serde_json::Value, message: impl Into<String>) -> Self {
        Self {
            id,
            is_error: true,
            content: message.into(),
        }
    }

    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default() + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_line() {
        let request =
            ToolRequest::from_line(r#"{"id": 7, "tool": "get_chat", "arguments": {"chat_jid": "a@s.whatsapp.net"}}"#)
                .unwrap();
        assert_eq!(request.id, json!(7));
        assert_eq!(request.tool, "get_chat");
        assert_eq!(request.arguments["chat_jid"], "a@s.whatsapp.net");
    }

    #[test]
    fn test_request_without_arguments() {
        let request = ToolRequest::from_line(r#"{"tool": "list_chats"}"#).unwrap();
        assert!(request.id.is_null());
        assert!(request.arguments.is_null());
    }

    #[test]
    fn test_response_is_one_line() {
        let line = ToolResponse::error(json!("abc"), "Error: boom\nsecond line").to_line();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        let decoded: ToolResponse = serde_json::from_str(&line).unwrap();
        assert!(decoded.is_error);
        assert_eq!(decoded.content, "Error: boom\nsecond line");
    }
}
