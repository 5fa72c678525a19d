use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;

pub const ALIVE_STATUS: &str = "alive";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_alive(&self) -> bool {
        self.status == ALIVE_STATUS
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    pub client_id: String,
}

/// `resposta` is the reply field name the service uses on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatReply {
    #[serde(default)]
    pub resposta: Option<String>,
}

impl ChatReply {
    /// Reads the reply out of a decoded `/chat` body.
    ///
    /// Bodies that are not objects carry no `resposta`, and falsy values
    /// (`null`, `false`, `0`, `""`) count as absent. A `null` body or a
    /// truthy non-string `resposta` cannot be rendered and is an error.
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let field = match body {
            Value::Null => return Err(ApiError::Decode("reply body is null".to_string())),
            Value::Object(mut map) => map.remove("resposta"),
            _ => None,
        };

        let resposta = match field {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(other) => {
                return Err(ApiError::Decode(format!("resposta is not text: {}", other)));
            }
        };

        Ok(Self { resposta })
    }

    /// The reply text, if the service produced a non-empty one.
    pub fn text(&self) -> Option<&str> {
        self.resposta.as_deref().filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_sentinel() {
        let alive: HealthResponse = serde_json::from_value(json!({"status": "alive"})).unwrap();
        let down: HealthResponse = serde_json::from_value(json!({"status": "down"})).unwrap();
        assert!(alive.is_alive());
        assert!(!down.is_alive());
    }

    #[test]
    fn health_without_status_is_malformed() {
        assert!(serde_json::from_value::<HealthResponse>(json!({})).is_err());
    }

    #[test]
    fn chat_request_wire_shape() {
        let req = ChatRequest {
            message: "oi".to_string(),
            session_id: "s".to_string(),
            client_id: "c".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"message": "oi", "session_id": "s", "client_id": "c"})
        );
    }

    #[test]
    fn reply_field_is_optional() {
        let reply: ChatReply = serde_json::from_value(json!({"other": 1})).unwrap();
        assert_eq!(reply.text(), None);

        let empty: ChatReply = serde_json::from_value(json!({"resposta": ""})).unwrap();
        assert_eq!(empty.text(), None);

        let full: ChatReply = serde_json::from_value(json!({"resposta": "Olá"})).unwrap();
        assert_eq!(full.text(), Some("Olá"));
    }

    #[test]
    fn non_object_bodies_have_no_reply() {
        for body in [json!("hello"), json!(42), json!(true), json!([]), json!({})] {
            let reply = ChatReply::from_body(body).unwrap();
            assert_eq!(reply.text(), None);
        }
    }

    #[test]
    fn falsy_reply_fields_fall_back() {
        for field in [json!(null), json!(false), json!(0), json!("")] {
            let reply = ChatReply::from_body(json!({ "resposta": field })).unwrap();
            assert_eq!(reply.text(), None);
        }
    }

    #[test]
    fn unrenderable_bodies_are_errors() {
        assert!(matches!(ChatReply::from_body(json!(null)), Err(ApiError::Decode(_))));
        assert!(matches!(
            ChatReply::from_body(json!({"resposta": 7})),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            ChatReply::from_body(json!({"resposta": {"text": "oi"}})),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn string_reply_is_kept() {
        let reply = ChatReply::from_body(json!({"resposta": "**Oi**", "extra": 1})).unwrap();
        assert_eq!(reply.text(), Some("**Oi**"));
    }
}
