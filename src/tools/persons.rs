//! Natural-person tools

use serde_json::Value;

use super::ToolContext;
use crate::error::{Result, VigiliaError};
use crate::schema::{parse_args, IdArgs, ListArgs, Paginated, Person};

pub const TOOLS: &[super::ToolSpec] = &[
    (
        "list_persons",
        "List natural persons known to the organization, with their screening flags (politically exposed, integrity doubts, frozen assets).",
        r#"{"type":"object","properties":{"page":{"type":"integer","minimum":1},"per_page":{"type":"integer","minimum":1,"maximum":100}},"additionalProperties":false}"#,
    ),
    (
        "get_person",
        "Fetch one person with their graded nationality and birth country, screening flags and the dossiers they appear on.",
        r#"{"type":"object","properties":{"id":{"type":"string","format":"uuid","description":"Person identifier"}},"required":["id"],"additionalProperties":false}"#,
    ),
];

pub async fn dispatch(ctx: &ToolContext, name: &str, args: Value) -> Result<Value> {
    match name {
        "list_persons" => list(ctx, args).await,
        "get_person" => get(ctx, args).await,
        _ => Err(VigiliaError::UnknownOperation(name.to_string())),
    }
}

async fn list(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: ListArgs = parse_args(args)?;
    let page: Paginated<Person> = ctx.client.get("/persons", &args.query()).await?;
    Ok(serde_json::to_value(page)?)
}

async fn get(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: IdArgs = parse_args(args)?;
    let person: Person = ctx
        .client
        .get(&format!("/persons/{}", args.id), &[])
        .await?;
    Ok(serde_json::to_value(person)?)
}
