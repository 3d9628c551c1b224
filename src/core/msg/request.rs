use crate::core::{AgentError, SchemaInfo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumString, VariantNames};

/// Runs `cmd` through the agent's shell
#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
#[serde(default)]
pub struct ExecArgs {
    pub cmd: String,

    /// Seconds before the process group is killed; zero or less falls back
    /// to the server default
    pub timeout: i64,
}

impl SchemaInfo for ExecArgs {}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
#[serde(default)]
pub struct ScreenshotArgs {
    /// Image quality 0-100, handed to the capture tool untouched
    pub quality: i32,
}

impl SchemaInfo for ScreenshotArgs {}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
#[serde(default)]
pub struct UiClickArgs {
    pub x: i32,
    pub y: i32,
}

impl SchemaInfo for UiClickArgs {}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
#[serde(default)]
pub struct UiKeysArgs {
    pub text: String,
}

impl SchemaInfo for UiKeysArgs {}

/// Names under which operations are exposed over RPC
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumString, VariantNames, AsRefStr,
)]
pub enum Method {
    Exec,
    Screenshot,
    #[strum(serialize = "UIClick")]
    UiClick,
    #[strum(serialize = "UIKeys")]
    UiKeys,
}

impl Method {
    /// Resolves a method name, ignoring any service prefix such as the
    /// `Agent.` in `Agent.Exec`
    pub fn resolve(name: &str) -> Option<Self> {
        let name = name.rsplit('.').next().unwrap_or(name);
        Self::from_str(name).ok()
    }
}

#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
pub enum Request {
    #[serde(rename = "Exec")]
    Exec(ExecArgs),

    #[serde(rename = "Screenshot")]
    Screenshot(ScreenshotArgs),

    #[serde(rename = "UIClick")]
    UiClick(UiClickArgs),

    #[serde(rename = "UIKeys")]
    UiKeys(UiKeysArgs),
}

impl SchemaInfo for Request {}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Self::Exec(_) => Method::Exec,
            Self::Screenshot(_) => Method::Screenshot,
            Self::UiClick(_) => Method::UiClick,
            Self::UiKeys(_) => Method::UiKeys,
        }
    }

    /// Produces the params object for this request
    pub fn params(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Exec(args) => serde_json::to_value(args),
            Self::Screenshot(args) => serde_json::to_value(args),
            Self::UiClick(args) => serde_json::to_value(args),
            Self::UiKeys(args) => serde_json::to_value(args),
        }
    }

    /// Decodes a request from an RPC method name and its params, which are
    /// either a one-element array or a bare object
    pub fn from_rpc(method: &str, params: Value) -> Result<Self, AgentError> {
        let method = Method::resolve(method).ok_or_else(|| {
            AgentError::invalid_request(format!("unknown method {}", method))
        })?;

        let params = match params {
            Value::Array(mut items) if items.len() == 1 => items.remove(0),
            Value::Array(items) => {
                return Err(AgentError::invalid_request(format!(
                    "expected exactly one param, got {}",
                    items.len()
                )))
            }
            Value::Null => Value::Object(Default::default()),
            x => x,
        };

        fn decode<T: serde::de::DeserializeOwned>(
            params: Value,
        ) -> Result<T, AgentError> {
            serde_json::from_value(params).map_err(|x| {
                AgentError::invalid_request(format!("bad params: {}", x))
            })
        }

        Ok(match method {
            Method::Exec => Self::Exec(decode(params)?),
            Method::Screenshot => Self::Screenshot(decode(params)?),
            Method::UiClick => Self::UiClick(decode(params)?),
            Method::UiKeys => Self::UiKeys(decode(params)?),
        })
    }
}

impl From<ExecArgs> for Request {
    fn from(args: ExecArgs) -> Self {
        Self::Exec(args)
    }
}

impl From<ScreenshotArgs> for Request {
    fn from(args: ScreenshotArgs) -> Self {
        Self::Screenshot(args)
    }
}

impl From<UiClickArgs> for Request {
    fn from(args: UiClickArgs) -> Self {
        Self::UiClick(args)
    }
}

impl From<UiKeysArgs> for Request {
    fn from(args: UiKeysArgs) -> Self {
        Self::UiKeys(args)
    }
}
