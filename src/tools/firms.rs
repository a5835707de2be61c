//! Firm and organization tools

use serde_json::Value;

use super::ToolContext;
use crate::error::{Result, VigiliaError};
use crate::schema::{parse_args, EmptyArgs, Firm, ListArgs, Paginated, Structure};

pub const TOOLS: &[super::ToolSpec] = &[
    (
        "list_firms",
        "List the accounting firms registered under the organization.",
        r#"{"type":"object","properties":{"page":{"type":"integer","minimum":1},"per_page":{"type":"integer","minimum":1,"maximum":100}},"additionalProperties":false}"#,
    ),
    (
        "get_structure",
        "Fetch the organization's subscription counters: remaining customers, users and validators.",
        r#"{"type":"object","properties":{},"additionalProperties":false}"#,
    ),
];

pub async fn dispatch(ctx: &ToolContext, name: &str, args: Value) -> Result<Value> {
    match name {
        "list_firms" => list(ctx, args).await,
        "get_structure" => structure(ctx, args).await,
        _ => Err(VigiliaError::UnknownOperation(name.to_string())),
    }
}

async fn list(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: ListArgs = parse_args(args)?;
    let page: Paginated<Firm> = ctx.client.get("/firms", &args.query()).await?;
    Ok(serde_json::to_value(page)?)
}

async fn structure(ctx: &ToolContext, args: Value) -> Result<Value> {
    let _args: EmptyArgs = parse_args(args)?;
    let structure: Structure = ctx.client.get("/structure", &[]).await?;
    Ok(serde_json::to_value(structure)?)
}
