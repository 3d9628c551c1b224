use super::{Reply, Request};
use crate::core::SchemaInfo;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 1.0 call as sent by Go's `net/rpc/jsonrpc` clients
#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RpcRequest {
    pub method: String,

    #[serde(default)]
    pub params: Value,

    #[serde(default)]
    pub id: Value,
}

impl SchemaInfo for RpcRequest {}

impl RpcRequest {
    pub fn new(request: &Request, id: u64) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: request.method().as_ref().to_string(),
            params: Value::Array(vec![request.params()?]),
            id: Value::from(id),
        })
    }
}

/// JSON-RPC 1.0 answer; exactly one of `result` and `error` is non-null
#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RpcResponse {
    pub id: Value,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl SchemaInfo for RpcResponse {}

impl RpcResponse {
    pub fn success(id: Value, reply: &Reply) -> Self {
        match serde_json::to_value(reply) {
            Ok(result) => Self {
                id,
                result: Some(result),
                error: None,
            },
            Err(x) => Self::failure(id, format!("Failed to encode reply: {}", x)),
        }
    }

    pub fn failure(id: Value, error: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::msg::{EmptyReply, ExecArgs};
    use serde_json::json;

    #[test]
    fn new_should_wrap_params_in_array() {
        let request = Request::Exec(ExecArgs {
            cmd: String::from("ls"),
            timeout: 0,
        });
        let rpc = RpcRequest::new(&request, 3).unwrap();
        assert_eq!(
            serde_json::to_value(&rpc).unwrap(),
            json!({
                "method": "Exec",
                "params": [{"cmd": "ls", "timeout": 0}],
                "id": 3,
            })
        );
    }

    #[test]
    fn response_should_always_carry_both_result_and_error_fields() {
        let ok = RpcResponse::success(json!(1), &Reply::Empty(EmptyReply {}));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"id": 1, "result": {}, "error": null})
        );

        let err = RpcResponse::failure(json!("a"), "boom");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"id": "a", "result": null, "error": "boom"})
        );
    }
}
