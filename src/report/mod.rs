//! Group-assignment report pipeline
//!
//! Category dispatch, assignment aggregation, and HTML rendering.

pub mod aggregator;
pub mod categories;
pub mod html;

use crate::error::Result;
use crate::graph::GraphClient;
use crate::graph::groups::Group;
use self::aggregator::AssignmentRecord;
use self::categories::PolicyCategory;
use std::collections::{BTreeMap, BTreeSet};

/// What the user asked to inspect. Produced at the selection boundary,
/// validated before any network call.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub group_name: String,
    pub categories: Vec<PolicyCategory>,
}

/// Run the aggregator once per requested category.
///
/// Categories are deduplicated and processed in key order; every requested
/// category appears as a key in the result, even when its value is only
/// sentinel rows. Endpoints are queried strictly sequentially.
pub async fn collect_categories(
    client: &GraphClient,
    group: &Group,
    categories: &[PolicyCategory],
    mut on_category: impl FnMut(PolicyCategory),
) -> Result<BTreeMap<PolicyCategory, Vec<AssignmentRecord>>> {
    let requested: BTreeSet<PolicyCategory> = categories.iter().copied().collect();
    let mut results = BTreeMap::new();

    for category in requested {
        on_category(category);
        let records = aggregator::collect_assignments(client, group, category).await?;
        results.insert(category, records);
    }

    Ok(results)
}
