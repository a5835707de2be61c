//! MCP resources over the vigilance platform
//!
//! Three fixed documents plus one parameterized risk-summary lookup, all
//! addressed under the `vigilia://` scheme and rendered as JSON text.

use futures::future::join_all;
use serde_json::{json, Value};
use uuid::Uuid;

use super::protocol::{ResourceContents, ResourceDefinition, ResourceTemplateDefinition};
use crate::error::{Result, VigiliaError, Violations};
use crate::schema::{
    check_uuid, page_query, Customer, CustomerSummary, Firm, Paginated, RiskSummaryReport, User,
    MAX_PER_PAGE,
};
use crate::tools::ToolContext;

const SCHEME: &str = "vigilia://";
const MIME_JSON: &str = "application/json";

/// Static resources advertised by resources/list
pub fn resource_definitions() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition {
            uri: "vigilia://organization".to_string(),
            name: "Organization".to_string(),
            description: "Firms and users of the organization in one document".to_string(),
            mime_type: MIME_JSON.to_string(),
        },
        ResourceDefinition {
            uri: "vigilia://customers/summary".to_string(),
            name: "Customer roster".to_string(),
            description: "Compact roster of dossiers: identity, state and risk grade".to_string(),
            mime_type: MIME_JSON.to_string(),
        },
        ResourceDefinition {
            uri: "vigilia://customers/risk-summaries".to_string(),
            name: "Risk summary sweep".to_string(),
            description:
                "Risk breakdown of every dossier on the first roster page; dossiers whose \
                 breakdown cannot be fetched are listed as unavailable instead of failing the sweep"
                    .to_string(),
            mime_type: MIME_JSON.to_string(),
        },
    ]
}

/// Parameterized resources advertised by resources/templates/list
pub fn template_definitions() -> Vec<ResourceTemplateDefinition> {
    vec![ResourceTemplateDefinition {
        uri_template: "vigilia://customers/{id}/risk-summary".to_string(),
        name: "Customer risk summary".to_string(),
        description: "Risk breakdown of a single dossier".to_string(),
        mime_type: MIME_JSON.to_string(),
    }]
}

/// Parsed `vigilia://` address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Organization,
    CustomerRoster,
    RiskSummaries,
    CustomerRiskSummary(Uuid),
}

impl ResourceUri {
    /// Parse an address; unknown paths are not-found, a malformed dossier
    /// id inside a known path is a parameter error.
    pub fn parse(uri: &str) -> Result<Self> {
        let path = uri
            .strip_prefix(SCHEME)
            .ok_or_else(|| VigiliaError::NotFound(uri.to_string()))?;

        match path {
            "organization" => return Ok(ResourceUri::Organization),
            "customers/summary" => return Ok(ResourceUri::CustomerRoster),
            "customers/risk-summaries" => return Ok(ResourceUri::RiskSummaries),
            _ => {}
        }

        if let Some(id) = path
            .strip_prefix("customers/")
            .and_then(|rest| rest.strip_suffix("/risk-summary"))
        {
            let mut violations = Violations::new();
            check_uuid("uri", id, &mut violations);
            violations.into_result()?;
            let id = Uuid::parse_str(id).map_err(|_| {
                VigiliaError::Parameter(Violations::of("uri", "must contain a dossier UUID"))
            })?;
            return Ok(ResourceUri::CustomerRiskSummary(id));
        }

        Err(VigiliaError::NotFound(uri.to_string()))
    }
}

/// Read one resource and render it as a JSON document.
pub async fn read(ctx: &ToolContext, uri: &str) -> Result<ResourceContents> {
    let value = match ResourceUri::parse(uri)? {
        ResourceUri::Organization => organization(ctx).await?,
        ResourceUri::CustomerRoster => roster(ctx).await?,
        ResourceUri::RiskSummaries => risk_summaries(ctx).await?,
        ResourceUri::CustomerRiskSummary(id) => {
            let report: RiskSummaryReport = ctx
                .client
                .get(&format!("/customers/{id}/risk-summary"), &[])
                .await?;
            serde_json::to_value(report)?
        }
    };

    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: MIME_JSON.to_string(),
        text: serde_json::to_string_pretty(&value)?,
    })
}

fn first_page() -> Vec<(String, String)> {
    page_query(Some(1), Some(MAX_PER_PAGE))
}

/// Both listings are capped at the first page; each section carries the
/// platform total next to its rows.
async fn organization(ctx: &ToolContext) -> Result<Value> {
    let query = first_page();
    let (firms, users) = tokio::join!(
        ctx.client.get::<Paginated<Firm>>("/firms", &query),
        ctx.client.get::<Paginated<User>>("/users", &query),
    );
    let firms = firms?;
    let users = users?;

    Ok(json!({
        "firms": { "total": firms.total, "items": firms.data },
        "users": { "total": users.total, "items": users.data },
    }))
}

async fn roster(ctx: &ToolContext) -> Result<Value> {
    let page: Paginated<Customer> = ctx.client.get("/customers", &first_page()).await?;
    let customers: Vec<CustomerSummary> = page.data.iter().map(CustomerSummary::from).collect();

    Ok(json!({
        "total": page.total,
        "customers": customers,
    }))
}

/// Per-dossier fan-out with settle-all semantics: one failed breakdown
/// never discards the others.
async fn risk_summaries(ctx: &ToolContext) -> Result<Value> {
    let page: Paginated<Customer> = ctx.client.get("/customers", &first_page()).await?;

    let lookups = page.data.iter().map(|customer| {
        let client = ctx.client.clone();
        let id = customer.id;
        async move {
            let result: Result<RiskSummaryReport> = client
                .get(&format!("/customers/{id}/risk-summary"), &[])
                .await;
            (id, result)
        }
    });

    let mut summaries = Vec::new();
    let mut unavailable = Vec::new();
    for (id, result) in join_all(lookups).await {
        match result {
            Ok(report) => summaries.push(serde_json::to_value(report)?),
            Err(err) => {
                tracing::warn!(customer = %id, error = %err, "risk summary unavailable");
                unavailable.push(json!({
                    "customer_id": id,
                    "error": err.to_string(),
                }));
            }
        }
    }

    Ok(json!({
        "total": page.data.len(),
        "available": summaries.len(),
        "summaries": summaries,
        "unavailable": unavailable,
    }))
}
