//! Assignment aggregation
//!
//! Normalizes heterogeneous policy-category endpoints into one filtered,
//! uniform record collection: for each endpoint of a category, pull every
//! remote object with its assignments expanded, keep the objects whose
//! assignment targets reference the group, and map them to `AssignmentRecord`.
//!
//! One page per endpoint, no retries; failures propagate to the caller so a
//! report is either complete or absent.

use crate::error::Result;
use crate::graph::groups::Group;
use crate::graph::{CollectionResponse, GraphClient};
use crate::report::categories::PolicyCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentRecord {
    pub display_name: String,
    pub last_modified: Option<DateTime<Utc>>,
    /// Platform/provider tag when the category spans several endpoints
    pub sub_label: Option<String>,
    /// True for the "nothing assigned" placeholder row
    pub is_sentinel: bool,
}

impl AssignmentRecord {
    fn sentinel(category: PolicyCategory, sub_label: Option<String>) -> Self {
        Self {
            display_name: category.sentinel_text(),
            last_modified: None,
            sub_label,
            is_sentinel: true,
        }
    }
}

/// A policy/application object as returned by the device-management API
/// with `$expand=assignments`. Only the fields the report needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Settings Catalog policies name their objects `name`, not `displayName`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_modified_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub target: AssignmentTarget,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentTarget {
    #[serde(rename = "@odata.type", default)]
    pub odata_type: Option<String>,
    /// Absent for "all users"/"all devices" targets
    #[serde(default)]
    pub group_id: Option<String>,
}

impl PolicyObject {
    /// Exact-equality check against the resolved group id. Substring or
    /// pattern matching here would let one group id false-positive match a
    /// longer id that contains it.
    fn targets_group(&self, group_id: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.target.group_id.as_deref() == Some(group_id))
    }

    fn record_name(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "(unnamed)".to_string())
    }
}

/// Collect the assignment records of one category for one resolved group.
///
/// Output ordering is endpoint declaration order, then remote listing order
/// within each endpoint. Each endpoint that yields no match contributes one
/// sentinel row, so every endpoint is visible in the report even when empty.
pub async fn collect_assignments(
    client: &GraphClient,
    group: &Group,
    category: PolicyCategory,
) -> Result<Vec<AssignmentRecord>> {
    let endpoints = category.endpoints();
    let fan_out = endpoints.len() > 1;
    let mut records = Vec::new();

    for endpoint in endpoints {
        let sub_label = fan_out.then(|| endpoint.label.to_string());

        let response: CollectionResponse<PolicyObject> = client
            .get(&format!("{}?$expand=assignments", endpoint.path))
            .await?;

        let mut matched = false;
        for object in response.value {
            if !object.targets_group(&group.id) {
                continue;
            }
            records.push(AssignmentRecord {
                display_name: object.record_name(),
                last_modified: object.last_modified_date_time,
                sub_label: sub_label.clone(),
                is_sentinel: false,
            });
            matched = true;
        }

        // Zero remote objects and zero surviving matches look the same here
        if !matched {
            records.push(AssignmentRecord::sentinel(category, sub_label));
        }
    }

    Ok(records)
}
