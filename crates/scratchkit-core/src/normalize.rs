//! Settings normalization: metadata records in, scratch definition
//! `settings` and `features` out.
//!
//! Two record shapes exist. `OrgPreferenceSettings` carries a flat list of
//! `{settingName, settingValue}` preferences that get flattened into one
//! object. Every other settings type is a typed object that is copied
//! under its lower-camel name once denylisted fields are pruned.

use crate::case::lower_camel;
use crate::connection::MetadataRecord;
use crate::denylist::{self, Denylist, ORG_PREFERENCE_SETTINGS};
use crate::types::ExtractionScope;
use serde_json::{Map, Value};
use tracing::debug;

/// Output of normalization, ready to merge into a scratch definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSettings {
    /// Normalized type name → filtered field object.
    pub settings: Map<String, Value>,
    /// Features required by the extracted settings, first-seen order.
    pub features: Vec<String>,
}

impl NormalizedSettings {
    fn require_feature(&mut self, feature: &str) {
        if !self.features.iter().any(|f| f == feature) {
            self.features.push(feature.to_string());
        }
    }

    fn note_dependency(&mut self, setting: &str) {
        if let Some(feature) = denylist::required_feature(setting) {
            self.require_feature(feature);
        }
    }
}

/// Drop every object key found in `denylist`, at any depth.
pub fn prune(value: &mut Value, denylist: &Denylist) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !denylist.contains(key));
            for child in map.values_mut() {
                prune(child, denylist);
            }
        }
        Value::Array(items) => {
            for item in items {
                prune(item, denylist);
            }
        }
        _ => {}
    }
}

pub struct Normalizer {
    scope: ExtractionScope,
    denylist: Denylist,
}

impl Normalizer {
    pub fn new(scope: ExtractionScope) -> Self {
        Self {
            scope,
            denylist: Denylist::for_scope(scope),
        }
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    pub fn normalize<I>(&self, records: I) -> NormalizedSettings
    where
        I: IntoIterator<Item = MetadataRecord>,
    {
        let mut out = NormalizedSettings::default();
        for record in records {
            if record.is_empty() {
                debug!(setting = %record.type_name, "skipping empty settings record");
                continue;
            }
            if record.type_name == ORG_PREFERENCE_SETTINGS {
                self.org_preferences(record, &mut out);
            } else if self.scope == ExtractionScope::Full
                || denylist::is_clean_setting(&record.type_name)
            {
                self.typed_setting(record, &mut out);
            } else {
                debug!(setting = %record.type_name, "settings type not in allow-list, skipping");
            }
        }
        out
    }

    fn org_preferences(&self, record: MetadataRecord, out: &mut NormalizedSettings) {
        let preferences = match record.fields.get("preferences") {
            Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
            // A single preference is not wrapped in a list.
            Some(single @ Value::Object(_)) => vec![single],
            _ => Vec::new(),
        };

        let mut values = Map::new();
        for preference in preferences {
            let Some(raw_name) = preference.get("settingName").and_then(Value::as_str) else {
                continue;
            };
            let name = lower_camel(raw_name);
            if self.denylist.contains(raw_name) || self.denylist.contains(&name) {
                debug!(preference = raw_name, "denylisted preference dropped");
                continue;
            }
            let value = preference
                .get("settingValue")
                .cloned()
                .unwrap_or(Value::Null);
            out.note_dependency(&name);
            values.insert(name, value);
        }

        out.settings
            .insert(lower_camel(ORG_PREFERENCE_SETTINGS), Value::Object(values));
    }

    fn typed_setting(&self, record: MetadataRecord, out: &mut NormalizedSettings) {
        let name = lower_camel(&record.type_name);
        if self.denylist.contains(&name) {
            debug!(setting = %name, "denylisted settings type dropped");
            return;
        }

        let mut fields = record.fields;
        fields.shift_remove("fullName");
        let mut value = Value::Object(fields);
        prune(&mut value, &self.denylist);

        if let Value::Object(fields) = &value {
            for key in fields.keys() {
                out.note_dependency(key);
            }
        }
        out.settings.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(type_name: &str, fields: Value) -> MetadataRecord {
        let Value::Object(fields) = fields else {
            panic!("fields must be an object")
        };
        MetadataRecord::new(type_name, fields)
    }

    fn preferences(pairs: &[(&str, &str)]) -> MetadataRecord {
        let prefs: Vec<Value> = pairs
            .iter()
            .map(|(name, value)| json!({"settingName": name, "settingValue": value}))
            .collect();
        record(
            ORG_PREFERENCE_SETTINGS,
            json!({"fullName": "OrgPreference", "preferences": prefs}),
        )
    }

    fn keys_at_depth(value: &Value, depth: usize, out: &mut Vec<String>) {
        if let Value::Object(map) = value {
            for (k, v) in map {
                if depth == 0 {
                    out.push(k.clone());
                } else {
                    keys_at_depth(v, depth - 1, out);
                }
            }
        }
    }

    #[test]
    fn org_preferences_are_flattened_and_renamed() {
        let out = Normalizer::new(ExtractionScope::Basic).normalize([preferences(&[
            ("S1DesktopEnabled", "true"),
            ("AnalyticsSharingEnable", "false"),
        ])]);
        assert_eq!(
            out.settings["orgPreferenceSettings"],
            json!({"s1DesktopEnabled": "true", "analyticsSharingEnable": "false"})
        );
        assert!(out.features.is_empty());
    }

    #[test]
    fn org_preferences_drop_denylisted_names() {
        let out = Normalizer::new(ExtractionScope::Basic).normalize([preferences(&[
            ("Packaging2", "true"),
            ("VoiceEnabled", "true"),
            ("ChatterEnabled", "true"),
        ])]);
        assert_eq!(
            out.settings["orgPreferenceSettings"],
            json!({"chatterEnabled": "true"})
        );
    }

    #[test]
    fn full_scope_keeps_denylisted_preferences() {
        let out = Normalizer::new(ExtractionScope::Full)
            .normalize([preferences(&[("Packaging2", "true")])]);
        assert_eq!(
            out.settings["orgPreferenceSettings"],
            json!({"packaging2": "true"})
        );
    }

    #[test]
    fn single_preference_object_is_accepted() {
        let rec = record(
            ORG_PREFERENCE_SETTINGS,
            json!({"preferences": {"settingName": "ChatterEnabled", "settingValue": "true"}}),
        );
        let out = Normalizer::new(ExtractionScope::Basic).normalize([rec]);
        assert_eq!(
            out.settings["orgPreferenceSettings"],
            json!({"chatterEnabled": "true"})
        );
    }

    #[test]
    fn preference_feature_dependency_recorded_once() {
        let rec = preferences(&[
            ("EnableCommunityWorkspaces", "true"),
            ("ChatterEnabled", "true"),
        ]);
        let communities = record(
            "CommunitiesSettings",
            json!({"fullName": "Communities", "enableCommunityWorkspaces": "true"}),
        );
        let out = Normalizer::new(ExtractionScope::Basic).normalize([rec, communities]);
        assert_eq!(out.features, vec!["Communities".to_string()]);
    }

    #[test]
    fn typed_setting_drops_full_name_and_renames_type() {
        let out = Normalizer::new(ExtractionScope::Basic).normalize([record(
            "MobileSettings",
            json!({"fullName": "Mobile", "enableS1EncryptedStoragePref2": "false"}),
        )]);
        assert_eq!(
            out.settings["mobileSettings"],
            json!({"enableS1EncryptedStoragePref2": "false"})
        );
    }

    #[test]
    fn types_outside_allow_list_skipped_in_basic_scope() {
        let rec = record(
            "ForecastingSettings",
            json!({"fullName": "Forecasting", "enableForecasts": "true"}),
        );
        let basic = Normalizer::new(ExtractionScope::Basic).normalize([rec.clone()]);
        assert!(basic.settings.is_empty());

        let full = Normalizer::new(ExtractionScope::Full).normalize([rec]);
        assert_eq!(
            full.settings["forecastingSettings"],
            json!({"enableForecasts": "true"})
        );
    }

    #[test]
    fn denylisted_settings_type_is_dropped_whole() {
        let out = Normalizer::new(ExtractionScope::Basic).normalize([record(
            "SocialCustomerServiceSettings",
            json!({"fullName": "SocialCustomerService", "enableSocialApprovals": "true"}),
        )]);
        assert!(out.settings.is_empty());
    }

    #[test]
    fn denylisted_fields_absent_at_depth_zero_and_one() {
        let rec = record(
            "CaseSettings",
            json!({
                "fullName": "Case",
                "defaultCaseOwner": "myQueue",
                "keepRecordTypeOnAssignmentRule": "true",
                "enableCaseFeed": "true",
                "webToCase": {"enableWebToCase": "true", "caseOrigin": "Web"},
                "emailToCase": {
                    "enableEmailToCase": "true",
                    "routingAddresses": {"routingName": "support"}
                }
            }),
        );
        let normalizer = Normalizer::new(ExtractionScope::Basic);
        let out = normalizer.normalize([rec]);
        let case = &out.settings["caseSettings"];

        let mut keys = Vec::new();
        keys_at_depth(case, 0, &mut keys);
        keys_at_depth(case, 1, &mut keys);
        for key in &keys {
            assert!(!normalizer.denylist().contains(key), "{key} survived pruning");
        }
        assert_eq!(case["enableCaseFeed"], json!("true"));
        assert_eq!(case["emailToCase"], json!({"enableEmailToCase": "true"}));
    }

    #[test]
    fn pruning_reaches_deeper_levels_and_arrays() {
        let deny = Denylist::for_scope(ExtractionScope::Basic);
        let mut value = json!({
            "a": {"b": {"c": {"webToCase": "x", "keep": "y"}}},
            "list": [{"PardotEnabled": "true", "other": "1"}]
        });
        prune(&mut value, &deny);
        assert_eq!(
            value,
            json!({"a": {"b": {"c": {"keep": "y"}}}, "list": [{"other": "1"}]})
        );
    }

    #[test]
    fn empty_records_are_ignored() {
        let out = Normalizer::new(ExtractionScope::Full)
            .normalize([MetadataRecord::new("AccountSettings", Map::new())]);
        assert!(out.settings.is_empty());
    }

    #[test]
    fn org_preferences_not_duplicated_by_full_scope() {
        let out = Normalizer::new(ExtractionScope::Full)
            .normalize([preferences(&[("ChatterEnabled", "true")])]);
        assert_eq!(out.settings.len(), 1);
        assert!(out.settings["orgPreferenceSettings"].get("preferences").is_none());
    }
}
