use crate::core::SchemaInfo;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct ExecReply {
    /// Real exit code, or -1 if the process was terminated by a signal
    pub exit_code: i32,

    /// Combined stdout and stderr in arrival order
    pub output: String,
}

impl SchemaInfo for ExecReply {}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct ScreenshotReply {
    /// Standard base64 encoding of the captured image file
    pub image: String,
}

impl SchemaInfo for ScreenshotReply {}

/// Result of operations with nothing to report beyond success
#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct EmptyReply {}

impl SchemaInfo for EmptyReply {}

/// Successful outcome of a request; encodes as the bare payload
#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reply {
    Exec(ExecReply),
    Screenshot(ScreenshotReply),
    Empty(EmptyReply),
}

impl SchemaInfo for Reply {}

impl From<ExecReply> for Reply {
    fn from(args: ExecReply) -> Self {
        Self::Exec(args)
    }
}

impl From<ScreenshotReply> for Reply {
    fn from(args: ScreenshotReply) -> Self {
        Self::Screenshot(args)
    }
}

impl From<EmptyReply> for Reply {
    fn from(args: EmptyReply) -> Self {
        Self::Empty(args)
    }
}
