//! Integration tests for the assignment aggregation pipeline
//!
//! Uses wiremock as a stand-in Graph server to verify filtering, sentinel
//! emission, ordering, and error propagation.

use asg365::graph::groups::{self, Group};
use asg365::graph::{ApiVersion, GraphClient};
use asg365::report;
use asg365::report::aggregator::collect_assignments;
use asg365::report::categories::PolicyCategory;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_group(id: &str, name: &str) -> Group {
    serde_json::from_value(json!({ "id": id, "displayName": name })).unwrap()
}

async fn client_for(server: &MockServer) -> GraphClient {
    GraphClient::with_base_url("test-token".into(), server.uri(), ApiVersion::Beta).unwrap()
}

/// Mount an expanded listing for one endpoint path (relative to /beta/)
async fn mount_listing(server: &MockServer, endpoint: &str, objects: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/beta/{}", endpoint)))
        .and(query_param("$expand", "assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": objects })))
        .mount(server)
        .await;
}

/// Group "Finance" resolves to G1; mobileApps returns two apps, one
/// targeting G1, one targeting G2. Applications yields exactly one record.
#[tokio::test]
async fn test_single_endpoint_filters_to_group() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "deviceAppManagement/mobileApps",
        json!([
            {
                "id": "app-1",
                "displayName": "Company Portal",
                "lastModifiedDateTime": "2025-11-03T09:15:00Z",
                "assignments": [
                    { "id": "a1", "target": { "@odata.type": "#microsoft.graph.groupAssignmentTarget", "groupId": "G1" } }
                ]
            },
            {
                "id": "app-2",
                "displayName": "Other App",
                "assignments": [
                    { "id": "a2", "target": { "@odata.type": "#microsoft.graph.groupAssignmentTarget", "groupId": "G2" } }
                ]
            }
        ]),
    )
    .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");
    let records = collect_assignments(&client, &group, PolicyCategory::Applications)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].display_name, "Company Portal");
    assert!(records[0].sub_label.is_none());
    assert!(!records[0].is_sentinel);
    assert_eq!(
        records[0].last_modified.unwrap().to_rfc3339(),
        "2025-11-03T09:15:00+00:00"
    );
}

/// A group id that is a proper substring of another valid id must never
/// pick up that other group's assignments.
#[tokio::test]
async fn test_exact_match_rejects_substring_ids() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "deviceAppManagement/mobileApps",
        json!([
            {
                "id": "app-1",
                "displayName": "Targeted at G12",
                "assignments": [
                    { "id": "a1", "target": { "@odata.type": "#microsoft.graph.groupAssignmentTarget", "groupId": "G12" } }
                ]
            }
        ]),
    )
    .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");
    let records = collect_assignments(&client, &group, PolicyCategory::Applications)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].is_sentinel);
    assert_eq!(records[0].display_name, "No Applications assigned");
    assert!(records[0].last_modified.is_none());
}

/// Fan-out category: an endpoint with zero objects contributes one sentinel,
/// an endpoint with a match contributes that match; every row carries its
/// endpoint label.
#[tokio::test]
async fn test_fan_out_mixes_sentinels_and_matches() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "deviceAppManagement/androidManagedAppProtections",
        json!([]),
    )
    .await;
    mount_listing(
        &server,
        "deviceAppManagement/iosManagedAppProtections",
        json!([
            {
                "id": "iosp-1",
                "displayName": "iOS MAM Baseline",
                "assignments": [
                    { "id": "a1", "target": { "@odata.type": "#microsoft.graph.groupAssignmentTarget", "groupId": "G1" } }
                ]
            }
        ]),
    )
    .await;
    mount_listing(
        &server,
        "deviceAppManagement/windowsManagedAppProtections",
        json!([]),
    )
    .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");
    let records =
        collect_assignments(&client, &group, PolicyCategory::ApplicationProtectionPolicies)
            .await
            .unwrap();

    // One row per endpoint: matches if any, else one sentinel
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.sub_label.is_some()));

    assert!(records[0].is_sentinel);
    assert_eq!(
        records[0].sub_label.as_deref(),
        Some("AndroidManagedAppProtections")
    );

    assert!(!records[1].is_sentinel);
    assert_eq!(records[1].display_name, "iOS MAM Baseline");
    assert_eq!(
        records[1].sub_label.as_deref(),
        Some("iOSManagedAppProtections")
    );

    assert!(records[2].is_sentinel);
    assert_eq!(
        records[2].sub_label.as_deref(),
        Some("WindowsManagedAppProtections")
    );
}

/// Settings Catalog objects carry `name` instead of `displayName`
#[tokio::test]
async fn test_configuration_policy_name_fallback() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "deviceManagement/deviceConfigurations",
        json!([]),
    )
    .await;
    mount_listing(
        &server,
        "deviceManagement/configurationPolicies",
        json!([
            {
                "id": "cp-1",
                "name": "Defender AV baseline",
                "lastModifiedDateTime": "2026-01-10T08:00:00Z",
                "assignments": [
                    { "id": "a1", "target": { "@odata.type": "#microsoft.graph.groupAssignmentTarget", "groupId": "G1" } }
                ]
            }
        ]),
    )
    .await;
    mount_listing(
        &server,
        "deviceManagement/groupPolicyConfigurations",
        json!([]),
    )
    .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Workstations");
    let records =
        collect_assignments(&client, &group, PolicyCategory::DeviceConfigurationPolicies)
            .await
            .unwrap();

    let real: Vec<_> = records.iter().filter(|r| !r.is_sentinel).collect();
    assert_eq!(real.len(), 1);
    assert_eq!(real[0].display_name, "Defender AV baseline");
    assert_eq!(real[0].sub_label.as_deref(), Some("SettingsCatalog"));
}

/// Remote listing order is preserved within an endpoint
#[tokio::test]
async fn test_remote_listing_order_preserved() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "deviceManagement/deviceCompliancePolicies",
        json!([
            {
                "id": "c-1",
                "displayName": "Zulu policy",
                "assignments": [{ "id": "a1", "target": { "groupId": "G1" } }]
            },
            {
                "id": "c-2",
                "displayName": "Alpha policy",
                "assignments": [{ "id": "a2", "target": { "groupId": "G1" } }]
            }
        ]),
    )
    .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");
    let records = collect_assignments(&client, &group, PolicyCategory::DeviceCompliancePolicies)
        .await
        .unwrap();

    let names: Vec<_> = records.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["Zulu policy", "Alpha policy"]);
}

/// Running the aggregator twice against unchanged remote state yields an
/// identical record sequence, order included.
#[tokio::test]
async fn test_idempotent_against_unchanged_remote() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "deviceManagement/deviceManagementScripts",
        json!([
            {
                "id": "s-1",
                "displayName": "Map network drives",
                "lastModifiedDateTime": "2025-06-01T12:00:00Z",
                "assignments": [{ "id": "a1", "target": { "groupId": "G1" } }]
            }
        ]),
    )
    .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");

    let first = collect_assignments(&client, &group, PolicyCategory::PlatformScripts)
        .await
        .unwrap();
    let second = collect_assignments(&client, &group, PolicyCategory::PlatformScripts)
        .await
        .unwrap();

    assert_eq!(first, second);
}

/// "All" with a group that has zero assignments anywhere: every category is
/// present in the result and consists solely of sentinel rows.
#[tokio::test]
async fn test_all_categories_empty_everywhere() {
    let server = MockServer::start().await;
    for category in PolicyCategory::ALL {
        for endpoint in category.endpoints() {
            mount_listing(&server, endpoint.path, json!([])).await;
        }
    }

    let client = client_for(&server).await;
    let group = test_group("G1", "Empty Group");
    let results = report::collect_categories(&client, &group, &PolicyCategory::ALL, |_| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 8);
    for category in PolicyCategory::ALL {
        let records = results.get(&category).unwrap();
        assert_eq!(records.len(), category.endpoints().len());
        assert!(records.iter().all(|r| r.is_sentinel));
    }
}

/// Requested categories are deduplicated and every one appears as a key
#[tokio::test]
async fn test_dispatcher_dedupes_and_keys_every_request() {
    let server = MockServer::start().await;
    mount_listing(&server, "deviceAppManagement/mobileApps", json!([])).await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");
    let requested = [PolicyCategory::Applications, PolicyCategory::Applications];
    let results = report::collect_categories(&client, &group, &requested, |_| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results.contains_key(&PolicyCategory::Applications));
}

/// An authorization failure on any endpoint aborts the whole category;
/// there is no partial result and no retry.
#[tokio::test]
async fn test_authorization_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/beta/deviceAppManagement/mobileApps"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": "Forbidden",
                "message": "Insufficient privileges to complete the operation."
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let group = test_group("G1", "Finance");
    let err = collect_assignments(&client, &group, PolicyCategory::Applications)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("403"));
    assert!(message.contains("Forbidden"));
}

/// Group resolution: exact display-name match returns the group
#[tokio::test]
async fn test_resolve_group_by_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "b9f2", "displayName": "Finance" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let group = groups::resolve_by_display_name(&client, "Finance")
        .await
        .unwrap();

    assert_eq!(group.id, "b9f2");
    assert_eq!(group.display_name, "Finance");
}

/// Group resolution: an empty match set is GroupNotFound, distinct from a
/// transport failure
#[tokio::test]
async fn test_resolve_group_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = groups::resolve_by_display_name(&client, "Ghost Group")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        asg365::error::Asg365Error::GroupNotFound(ref name) if name == "Ghost Group"
    ));
}
