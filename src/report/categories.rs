//! Policy categories and their Graph endpoint tables
//!
//! Every inspectable kind of Intune object is one `PolicyCategory`. Each
//! category is driven by a data-declared endpoint table, so the aggregator
//! has a single code path whether a category maps to one endpoint or fans
//! out across several platform variants.

use std::fmt;

/// One REST resource path holding a collection of policy objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Platform/provider tag shown in the report when the category fans out
    pub label: &'static str,
    /// Resource path relative to the API version segment
    pub path: &'static str,
}

/// The eight inspectable categories, in report order.
///
/// Variants are declared alphabetically by label; dispatch iterates a
/// `BTreeMap` keyed on this enum, so report sections come out key-sorted
/// and deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PolicyCategory {
    ApplicationConfigurations,
    ApplicationProtectionPolicies,
    Applications,
    DeviceCompliancePolicies,
    DeviceConfigurationPolicies,
    PlatformScripts,
    RemediationScripts,
    WindowsAutopilotProfiles,
}

impl PolicyCategory {
    pub const ALL: [PolicyCategory; 8] = [
        PolicyCategory::ApplicationConfigurations,
        PolicyCategory::ApplicationProtectionPolicies,
        PolicyCategory::Applications,
        PolicyCategory::DeviceCompliancePolicies,
        PolicyCategory::DeviceConfigurationPolicies,
        PolicyCategory::PlatformScripts,
        PolicyCategory::RemediationScripts,
        PolicyCategory::WindowsAutopilotProfiles,
    ];

    /// Endpoint table for this category. Length 1 for simple categories;
    /// app protection and device configuration fan out per platform/provider.
    pub fn endpoints(&self) -> &'static [EndpointSpec] {
        match self {
            PolicyCategory::Applications => &[EndpointSpec {
                label: "MobileApps",
                path: "deviceAppManagement/mobileApps",
            }],
            PolicyCategory::ApplicationConfigurations => &[EndpointSpec {
                label: "MobileAppConfigurations",
                path: "deviceAppManagement/mobileAppConfigurations",
            }],
            PolicyCategory::ApplicationProtectionPolicies => &[
                EndpointSpec {
                    label: "AndroidManagedAppProtections",
                    path: "deviceAppManagement/androidManagedAppProtections",
                },
                EndpointSpec {
                    label: "iOSManagedAppProtections",
                    path: "deviceAppManagement/iosManagedAppProtections",
                },
                EndpointSpec {
                    label: "WindowsManagedAppProtections",
                    path: "deviceAppManagement/windowsManagedAppProtections",
                },
            ],
            PolicyCategory::DeviceCompliancePolicies => &[EndpointSpec {
                label: "DeviceCompliancePolicies",
                path: "deviceManagement/deviceCompliancePolicies",
            }],
            PolicyCategory::DeviceConfigurationPolicies => &[
                EndpointSpec {
                    label: "DeviceConfigurations",
                    path: "deviceManagement/deviceConfigurations",
                },
                // Settings Catalog objects carry `name` instead of `displayName`
                EndpointSpec {
                    label: "SettingsCatalog",
                    path: "deviceManagement/configurationPolicies",
                },
                EndpointSpec {
                    label: "GroupPolicyConfigurations",
                    path: "deviceManagement/groupPolicyConfigurations",
                },
            ],
            PolicyCategory::PlatformScripts => &[EndpointSpec {
                label: "DeviceManagementScripts",
                path: "deviceManagement/deviceManagementScripts",
            }],
            PolicyCategory::RemediationScripts => &[EndpointSpec {
                label: "DeviceHealthScripts",
                path: "deviceManagement/deviceHealthScripts",
            }],
            PolicyCategory::WindowsAutopilotProfiles => &[EndpointSpec {
                label: "WindowsAutopilotDeploymentProfiles",
                path: "deviceManagement/windowsAutopilotDeploymentProfiles",
            }],
        }
    }

    /// Human-readable section title
    pub fn display_name(&self) -> &'static str {
        match self {
            PolicyCategory::Applications => "Applications",
            PolicyCategory::ApplicationConfigurations => "Application Configurations",
            PolicyCategory::ApplicationProtectionPolicies => "Application Protection Policies",
            PolicyCategory::DeviceCompliancePolicies => "Device Compliance Policies",
            PolicyCategory::DeviceConfigurationPolicies => "Device Configuration Policies",
            PolicyCategory::PlatformScripts => "Platform Scripts",
            PolicyCategory::RemediationScripts => "Remediation Scripts",
            PolicyCategory::WindowsAutopilotProfiles => "Windows Autopilot Profiles",
        }
    }

    /// CLI key, as accepted by `report --categories`
    pub fn key(&self) -> &'static str {
        match self {
            PolicyCategory::Applications => "applications",
            PolicyCategory::ApplicationConfigurations => "app-configurations",
            PolicyCategory::ApplicationProtectionPolicies => "app-protection",
            PolicyCategory::DeviceCompliancePolicies => "compliance",
            PolicyCategory::DeviceConfigurationPolicies => "configuration",
            PolicyCategory::PlatformScripts => "platform-scripts",
            PolicyCategory::RemediationScripts => "remediation-scripts",
            PolicyCategory::WindowsAutopilotProfiles => "autopilot",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Placeholder row text for an endpoint with no matches
    pub fn sentinel_text(&self) -> String {
        format!("No {} assigned", self.display_name())
    }
}

impl fmt::Display for PolicyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_every_category_has_at_least_one_endpoint() {
        for category in PolicyCategory::ALL {
            assert!(!category.endpoints().is_empty(), "{} has no endpoints", category);
        }
    }

    #[test]
    fn test_fan_out_categories() {
        assert_eq!(
            PolicyCategory::ApplicationProtectionPolicies.endpoints().len(),
            3
        );
        assert_eq!(
            PolicyCategory::DeviceConfigurationPolicies.endpoints().len(),
            3
        );
        for category in [
            PolicyCategory::Applications,
            PolicyCategory::ApplicationConfigurations,
            PolicyCategory::DeviceCompliancePolicies,
            PolicyCategory::PlatformScripts,
            PolicyCategory::RemediationScripts,
            PolicyCategory::WindowsAutopilotProfiles,
        ] {
            assert_eq!(category.endpoints().len(), 1);
        }
    }

    #[test]
    fn test_endpoint_labels_unique_within_category() {
        for category in PolicyCategory::ALL {
            let labels: BTreeSet<_> = category.endpoints().iter().map(|e| e.label).collect();
            assert_eq!(labels.len(), category.endpoints().len());
        }
    }

    #[test]
    fn test_keys_roundtrip() {
        for category in PolicyCategory::ALL {
            assert_eq!(PolicyCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(PolicyCategory::from_key("nonsense"), None);
    }

    #[test]
    fn test_sentinel_text() {
        assert_eq!(
            PolicyCategory::Applications.sentinel_text(),
            "No Applications assigned"
        );
    }
}
