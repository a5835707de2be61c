//! Cabinet user tools

use serde_json::Value;

use super::ToolContext;
use crate::error::{Result, VigiliaError};
use crate::schema::{parse_args, CreateUserArgs, IdArgs, ListArgs, Paginated, User};

pub const TOOLS: &[super::ToolSpec] = &[
    (
        "list_users",
        "List the cabinet's users on the vigilance platform, with their role.",
        r#"{"type":"object","properties":{"page":{"type":"integer","minimum":1},"per_page":{"type":"integer","minimum":1,"maximum":100}},"additionalProperties":false}"#,
    ),
    (
        "get_user",
        "Fetch one user by identifier.",
        r#"{"type":"object","properties":{"id":{"type":"string","format":"uuid","description":"User identifier"}},"required":["id"],"additionalProperties":false}"#,
    ),
    (
        "create_user",
        "Invite a user into the cabinet. The role must be one of certified_accountant, controller or collaborator.",
        r#"{"type":"object","properties":{"firstname":{"type":"string"},"lastname":{"type":"string"},"email":{"type":"string","format":"email"},"role":{"type":"string","enum":["certified_accountant","controller","collaborator"]}},"required":["firstname","lastname","email","role"],"additionalProperties":false}"#,
    ),
    (
        "delete_user",
        "Remove a user from the cabinet. Their dossier assignments are released by the platform.",
        r#"{"type":"object","properties":{"id":{"type":"string","format":"uuid","description":"User identifier"}},"required":["id"],"additionalProperties":false}"#,
    ),
];

pub async fn dispatch(ctx: &ToolContext, name: &str, args: Value) -> Result<Value> {
    match name {
        "list_users" => list(ctx, args).await,
        "get_user" => get(ctx, args).await,
        "create_user" => create(ctx, args).await,
        "delete_user" => delete(ctx, args).await,
        _ => Err(VigiliaError::UnknownOperation(name.to_string())),
    }
}

async fn list(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: ListArgs = parse_args(args)?;
    let page: Paginated<User> = ctx.client.get("/users", &args.query()).await?;
    Ok(serde_json::to_value(page)?)
}

async fn get(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: IdArgs = parse_args(args)?;
    let user: User = ctx.client.get(&format!("/users/{}", args.id), &[]).await?;
    Ok(serde_json::to_value(user)?)
}

async fn create(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: CreateUserArgs = parse_args(args)?;
    let user: User = ctx.client.post("/users", &[], &args).await?;
    Ok(serde_json::to_value(user)?)
}

async fn delete(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: IdArgs = parse_args(args)?;
    ctx.client.delete(&format!("/users/{}", args.id)).await?;
    Ok(serde_json::json!({"deleted": args.id}))
}
