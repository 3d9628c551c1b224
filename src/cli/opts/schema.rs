use clap::{
    builder::{PossibleValuesParser, TypedValueParser},
    Args, Subcommand,
};
use strum::VariantNames;
use strum_macros::{EnumString, VariantNames};

#[derive(Args, Debug)]
pub struct SchemaCommand {
    #[command(subcommand)]
    pub command: SchemaSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SchemaSubcommand {
    /// Lists all possible items to print schema
    #[command(name = "list")]
    List,

    /// Prints information about schema for specific item
    #[command(name = "info")]
    Info(SchemaInfo),
}

#[derive(Args, Debug)]
pub struct SchemaInfo {
    /// The type of message whose schema to print
    #[arg(
        value_name = "TYPE",
        value_parser = PossibleValuesParser::new(SchemaType::VARIANTS.iter().copied())
            .try_map(|s| s.parse::<SchemaType>()),
    )]
    pub schema_type: SchemaType,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum SchemaType {
    Request,
    Reply,
    RpcRequest,
    RpcResponse,
    ExecRequest,
    ScreenshotRequest,
    UiClickRequest,
    UiKeysRequest,
    ExecReply,
    ScreenshotReply,
    EmptyReply,
    HttpExecRequest,
    HttpExecReply,
}
