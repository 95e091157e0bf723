use serde::{Deserialize, Serialize};

pub const SUCCESS_CODE: i32 = 200;

/// Response wrapper shared by controller-to-controller endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub content: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(content: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: "success".to_string(),
            content: Some(content),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelRouterDescriptor;

    #[test]
    fn test_parse_peer_envelope() {
        let body = r#"{"code":200,"msg":"success","content":[{"channel_id":"c1"},{"channel_id":"c2","client_id":"x","extra":1}]}"#;
        let envelope: ApiEnvelope<Vec<ChannelRouterDescriptor>> = serde_json::from_str(body).unwrap();
        let content = envelope.content.unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[1].client_id, "x");
    }

    #[test]
    fn test_null_content() {
        let envelope: ApiEnvelope<Vec<ChannelRouterDescriptor>> =
            serde_json::from_str(r#"{"code":500,"msg":"boom","content":null}"#).unwrap();
        assert!(envelope.content.is_none());
    }
}
