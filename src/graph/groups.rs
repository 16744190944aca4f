//! Entra ID group resolution
//!
//! A report targets exactly one group, resolved once by display name before
//! any device-management call is made.

use crate::error::{Asg365Error, Result};
use crate::graph::{CollectionResponse, GraphClient};
use serde::Deserialize;

/// A directory group, resolved once and read-only afterward.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub display_name: String,
}

/// Resolve a group by exact display name.
///
/// Uses an OData `eq` filter so the directory does the exact match; a group
/// that merely contains the requested name as a substring does not resolve.
/// "Not found" is reported as `GroupNotFound`, distinct from any transport
/// or authorization failure.
pub async fn resolve_by_display_name(client: &GraphClient, name: &str) -> Result<Group> {
    let escaped = name.replace('\'', "''");
    let response: CollectionResponse<Group> = client
        .get_directory(&format!(
            "groups?$filter=displayName eq '{}'&$select=id,displayName",
            escaped
        ))
        .await?;

    response
        .value
        .into_iter()
        .next()
        .ok_or_else(|| Asg365Error::GroupNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_deserializes_from_graph_shape() {
        let json = r#"{"id":"b9f2...","displayName":"Finance"}"#;
        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.display_name, "Finance");
    }
}
