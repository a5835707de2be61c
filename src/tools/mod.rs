//! MCP tool surface
//!
//! Tools are grouped by the platform resource they shim. Each group owns
//! its inventory (name, description, JSON schema) and an async dispatch
//! over the exact tool names; the registry maps every advertised name to
//! its group and refuses to start on a duplicate.

pub mod customers;
pub mod firms;
pub mod persons;
pub mod users;

use std::collections::HashMap;

use crate::client::ApiClient;
use crate::error::{Result, VigiliaError};
use crate::mcp::protocol::ToolDefinition;

/// Raw inventory entry: name, description, JSON schema source
pub type ToolSpec = (&'static str, &'static str, &'static str);

/// Resource group a tool belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolGroup {
    Customers,
    Users,
    Persons,
    Firms,
}

/// Shared state handed to every tool handler
#[derive(Clone)]
pub struct ToolContext {
    pub client: ApiClient,
}

/// Group inventories in advertised order
fn inventories() -> [(ToolGroup, &'static [ToolSpec]); 4] {
    [
        (ToolGroup::Customers, customers::TOOLS),
        (ToolGroup::Users, users::TOOLS),
        (ToolGroup::Persons, persons::TOOLS),
        (ToolGroup::Firms, firms::TOOLS),
    ]
}

/// Get all tool definitions for MCP tools/list
///
/// The order is fixed: the listing is identical on every call.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    inventories()
        .iter()
        .flat_map(|(_, tools)| tools.iter())
        .map(|(name, description, schema)| ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::from_str(schema).unwrap_or_else(|_| serde_json::json!({})),
        })
        .collect()
}

/// Exact-name routing table over the group inventories
pub struct ToolRegistry {
    routes: HashMap<&'static str, ToolGroup>,
}

impl ToolRegistry {
    /// Build the table, rejecting duplicate names across groups.
    pub fn new() -> Result<Self> {
        let mut routes = HashMap::new();
        for (group, tools) in inventories() {
            for (name, _, _) in tools {
                if routes.insert(*name, group).is_some() {
                    return Err(VigiliaError::Execution {
                        status: None,
                        detail: format!("duplicate tool name in registry: {name}"),
                    });
                }
            }
        }
        Ok(Self { routes })
    }

    /// Exact lookup; near-misses and prefixes do not route.
    pub fn group_for(&self, name: &str) -> Option<ToolGroup> {
        self.routes.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Route a tool call to its group handler.
pub async fn dispatch_tool(
    registry: &ToolRegistry,
    ctx: &ToolContext,
    name: &str,
    args: serde_json::Value,
) -> Result<serde_json::Value> {
    match registry.group_for(name) {
        Some(ToolGroup::Customers) => customers::dispatch(ctx, name, args).await,
        Some(ToolGroup::Users) => users::dispatch(ctx, name, args).await,
        Some(ToolGroup::Persons) => persons::dispatch(ctx, name, args).await,
        Some(ToolGroup::Firms) => firms::dispatch(ctx, name, args).await,
        None => Err(VigiliaError::UnknownOperation(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_is_valid_json() {
        for (group, tools) in inventories() {
            for (name, description, schema) in tools {
                let parsed: serde_json::Value = serde_json::from_str(schema)
                    .unwrap_or_else(|e| panic!("{group:?}/{name}: bad schema: {e}"));
                assert_eq!(parsed["type"], "object", "{name}");
                assert!(!description.is_empty(), "{name}");
            }
        }
    }

    #[test]
    fn registry_covers_all_fifteen_tools() {
        let registry = ToolRegistry::new().unwrap();
        assert_eq!(registry.len(), 15);
        assert_eq!(registry.group_for("list_customers"), Some(ToolGroup::Customers));
        assert_eq!(registry.group_for("delete_user"), Some(ToolGroup::Users));
        assert_eq!(registry.group_for("get_person"), Some(ToolGroup::Persons));
        assert_eq!(registry.group_for("get_structure"), Some(ToolGroup::Firms));
    }

    #[test]
    fn lookup_is_exact_not_substring() {
        let registry = ToolRegistry::new().unwrap();
        assert_eq!(registry.group_for("customer"), None);
        assert_eq!(registry.group_for("list_customers_v2"), None);
        assert_eq!(registry.group_for("LIST_CUSTOMERS"), None);
        assert_eq!(registry.group_for(""), None);
    }

    #[test]
    fn definitions_are_stable_across_calls() {
        let first: Vec<String> = get_tool_definitions().into_iter().map(|t| t.name).collect();
        let second: Vec<String> = get_tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 15);
    }
}
