//! Static tables driving settings normalization.
//!
//! Everything here is data: the field denylist, the allow-list of settings
//! types that extract cleanly, and the feature dependency table.

use crate::types::ExtractionScope;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Denylist categories
// ---------------------------------------------------------------------------

/// Values that only exist on production or Dev Hub orgs.
pub const ENVIRONMENT_ONLY: &[&str] = &[
    "Packaging2",
    "ExpandedSourceTrackingPref",
    "ScratchOrgManagementPref",
    "ShapeExportPref",
    "PRMAccRelPref",
];

/// Values that fail scratch org creation.
pub const KNOWN_BUGGY: &[&str] = &[
    "enableOmniAutoLoginPrompt",
    "enableOmniSecondaryRoutingPriority",
    "VoiceCallListEnabled",
    "VoiceCallRecordingEnabled",
    "VoiceCoachingEnabled",
    "VoiceConferencingEnabled",
    "VoiceEnabled",
    "VoiceLocalPresenceEnabled",
    "VoiceMailDropEnabled",
    "VoiceMailEnabled",
    "CallDispositionEnabled",
];

/// Values that failed at least once and have not been investigated yet.
pub const UNVERIFIED: &[&str] = &[
    "enableEngagementHistoryDashboards",
    "EventLogWaveIntegEnabled",
    "SendThroughGmailPref",
    "PardotAppV1Enabled",
    "PardotEmbeddedAnalyticsPref",
    "PardotEnabled",
    "allowUsersToRelateMultipleContactsToTasksAndEvents",
    "socialCustomerServiceSettings",
    "opportunityFilterSettings",
    "enableAccountOwnerReport",
    "defaultCaseOwner",
    "PortalUserShareOnCase",
    "keepRecordTypeOnAssignmentRule",
    "webToCase",
    "routingAddresses",
];

// ---------------------------------------------------------------------------
// Settings allow-list
// ---------------------------------------------------------------------------

/// Settings types known to deploy cleanly to a scratch org.
pub const CLEAN_SETTINGS: &[&str] = &[
    "AccountSettings",
    "ActivitiesSettings",
    "AddressSettings",
    "BusinessHoursSettings",
    "CaseSettings",
    "CommunitiesSettings",
    "CompanySettings",
    "ContractSettings",
    "EntitlementSettings",
    "FileUploadAndDownloadSecuritySettings",
    "IdeasSettings",
    "MacroSettings",
    "MobileSettings",
    "NameSettings",
    "OmniChannelSettings",
    "OpportunitySettings",
    "OrderSettings",
    "PathAssistantSettings",
    "ProductSettings",
    "QuoteSettings",
    "SecuritySettings",
    "SocialCustomerServiceSettings",
];

/// Settings type holding flat `preferences` name/value pairs.
pub const ORG_PREFERENCE_SETTINGS: &str = "OrgPreferenceSettings";

pub fn is_clean_setting(type_name: &str) -> bool {
    CLEAN_SETTINGS.contains(&type_name)
}

// ---------------------------------------------------------------------------
// Feature dependencies
// ---------------------------------------------------------------------------

const FEATURE_DEPENDENCIES: &[(&str, &str)] = &[("enableCommunityWorkspaces", "Communities")];

/// Scratch org feature a setting needs in order to be accepted.
pub fn required_feature(setting: &str) -> Option<&'static str> {
    FEATURE_DEPENDENCIES
        .iter()
        .find(|(name, _)| *name == setting)
        .map(|(_, feature)| *feature)
}

// ---------------------------------------------------------------------------
// Denylist
// ---------------------------------------------------------------------------

/// The set of field names stripped from extracted settings.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    names: BTreeSet<&'static str>,
}

impl Denylist {
    /// Denylist for `scope`: all three categories for `basic`, nothing for
    /// `full`. The representation scope never normalizes, so it gets the
    /// empty list.
    pub fn for_scope(scope: ExtractionScope) -> Self {
        match scope {
            ExtractionScope::Basic => {
                Self::from_categories(&[ENVIRONMENT_ONLY, KNOWN_BUGGY, UNVERIFIED])
            }
            ExtractionScope::Full | ExtractionScope::ShapeRepresentation => Self::default(),
        }
    }

    pub fn from_categories(categories: &[&[&'static str]]) -> Self {
        Self {
            names: categories.iter().flat_map(|c| c.iter().copied()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
