//! Customer dossier tools

use serde_json::Value;

use super::ToolContext;
use crate::error::{Result, VigiliaError};
use crate::schema::{
    parse_args, AssignCustomersArgs, AssignmentResult, CreateCustomerArgs, Customer, IdArgs,
    ListArgs, Paginated, RiskSummaryReport, SearchCustomersArgs, UpdateCustomerArgs,
};

pub const TOOLS: &[super::ToolSpec] = &[
    (
        "list_customers",
        "List vigilance dossiers page by page. Each entry carries the company identity, lifecycle state and current risk grading.",
        r#"{"type":"object","properties":{"page":{"type":"integer","minimum":1,"description":"Page number, starting at 1"},"per_page":{"type":"integer","minimum":1,"maximum":100,"description":"Page size, at most 100"}},"additionalProperties":false}"#,
    ),
    (
        "get_customer",
        "Fetch one vigilance dossier in full: identity, risk breakdown, activities, addresses, associated persons, missions, diligences, assignments and documents.",
        r#"{"type":"object","properties":{"id":{"type":"string","format":"uuid","description":"Dossier identifier"}},"required":["id"],"additionalProperties":false}"#,
    ),
    (
        "create_customer",
        "Open a vigilance dossier from a company registration number. The platform enriches it from the public registry; duplicate detection is bypassed unless bypass_duplicates is set to false.",
        r#"{"type":"object","properties":{"company_number":{"type":"string","description":"Company registration number (SIREN)"},"company_name":{"type":"string"},"country":{"type":"string","description":"ISO 3166-1 alpha-2 country code"},"legal_form":{"type":"string"},"supervisor":{"type":"string","format":"uuid","description":"User to assign as supervisor"},"contributors":{"type":"array","items":{"type":"string","format":"uuid"}},"firm_id":{"type":"string","format":"uuid"},"fiscal_year_end_date":{"type":"string","format":"date"},"turnover":{"type":"number","minimum":0},"bypass_duplicates":{"type":"boolean","default":true},"fetch_documents":{"type":"boolean","description":"Also pull registry documents into the dossier"}},"required":["company_number"],"additionalProperties":false}"#,
    ),
    (
        "update_customer",
        "Update mutable fields of a dossier. Only the provided fields change; the rest of the dossier is left as is.",
        r#"{"type":"object","properties":{"id":{"type":"string","format":"uuid"},"company_name":{"type":"string"},"country":{"type":"string"},"legal_form":{"type":"string"},"state":{"type":"string","enum":["draft","in_progress","valid","ended","to_validate"]},"vigilance_level":{"type":"string","description":"Risk grade, e.g. low, standard, enhanced"},"fiscal_year_end_date":{"type":"string","format":"date"},"turnover":{"type":"number","minimum":0}},"required":["id"],"additionalProperties":false}"#,
    ),
    (
        "search_customers",
        "Search dossiers by company number, company name or internal code. At least one criterion is required; results are paginated like list_customers.",
        r#"{"type":"object","properties":{"company_number":{"type":"string"},"company_name":{"type":"string"},"code":{"type":"string","description":"Internal file reference"},"page":{"type":"integer","minimum":1},"per_page":{"type":"integer","minimum":1,"maximum":100}},"additionalProperties":false}"#,
    ),
    (
        "assign_customers",
        "Reassign a batch of dossiers in one call. Omit a field to leave that assignment unchanged; pass null (or an empty contributors list) to clear it.",
        r#"{"type":"object","properties":{"customers":{"type":"array","items":{"type":"string","format":"uuid"},"minItems":1,"description":"Dossiers to reassign"},"supervisor":{"type":["string","null"],"description":"Supervisor user id, or null to clear"},"contributors":{"type":"array","items":{"type":"string","format":"uuid"},"description":"Replacement contributor list; empty clears"},"firm_id":{"type":["string","null"],"description":"Owning firm id, or null to detach"}},"required":["customers"],"additionalProperties":false}"#,
    ),
    (
        "get_customer_risk_summary",
        "Fetch the risk breakdown of one dossier: the grade on each of the four axes (location, activity, mission, customer) plus the overall vigilance level.",
        r#"{"type":"object","properties":{"id":{"type":"string","format":"uuid","description":"Dossier identifier"}},"required":["id"],"additionalProperties":false}"#,
    ),
];

pub async fn dispatch(ctx: &ToolContext, name: &str, args: Value) -> Result<Value> {
    match name {
        "list_customers" => list(ctx, args).await,
        "get_customer" => get(ctx, args).await,
        "create_customer" => create(ctx, args).await,
        "update_customer" => update(ctx, args).await,
        "search_customers" => search(ctx, args).await,
        "assign_customers" => assign(ctx, args).await,
        "get_customer_risk_summary" => risk_summary(ctx, args).await,
        _ => Err(VigiliaError::UnknownOperation(name.to_string())),
    }
}

async fn list(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: ListArgs = parse_args(args)?;
    let page: Paginated<Customer> = ctx.client.get("/customers", &args.query()).await?;
    Ok(serde_json::to_value(page)?)
}

async fn get(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: IdArgs = parse_args(args)?;
    let customer: Customer = ctx
        .client
        .get(&format!("/customers/{}", args.id), &[])
        .await?;
    Ok(serde_json::to_value(customer)?)
}

async fn create(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: CreateCustomerArgs = parse_args(args)?;
    let customer: Customer = ctx.client.post("/customers", &[], &args).await?;
    Ok(serde_json::to_value(customer)?)
}

async fn update(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: UpdateCustomerArgs = parse_args(args)?;
    let customer: Customer = ctx
        .client
        .patch(&format!("/customers/{}", args.id), &args)
        .await?;
    Ok(serde_json::to_value(customer)?)
}

async fn search(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: SearchCustomersArgs = parse_args(args)?;
    let page: Paginated<Customer> = ctx
        .client
        .post("/customers/search", &args.query(), &args)
        .await?;
    Ok(serde_json::to_value(page)?)
}

async fn assign(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: AssignCustomersArgs = parse_args(args)?;
    let outcome: AssignmentResult = ctx.client.post("/customers/assignment", &[], &args).await?;
    Ok(serde_json::to_value(outcome)?)
}

async fn risk_summary(ctx: &ToolContext, args: Value) -> Result<Value> {
    let args: IdArgs = parse_args(args)?;
    let report: RiskSummaryReport = ctx
        .client
        .get(&format!("/customers/{}/risk-summary", args.id), &[])
        .await?;
    Ok(serde_json::to_value(report)?)
}
