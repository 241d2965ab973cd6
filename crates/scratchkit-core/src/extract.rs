//! `org shape extract`: org configuration → scratch org definition.

use crate::connection::{MetadataRecord, OrgConnection};
use crate::definition::ScratchDefinition;
use crate::edition::scratch_edition_for;
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::org::OrganizationProfile;
use crate::representation::ShapeRepresentation;
use crate::types::ExtractionScope;
use futures::future::try_join_all;
use tracing::info;

/// Metadata type listing every configurable settings component.
pub const SETTINGS_TYPE: &str = "Settings";

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub org_id: String,
    pub definition: ScratchDefinition,
}

pub struct ShapeExtractor<'a, C> {
    conn: &'a C,
    scope: ExtractionScope,
}

impl<'a, C: OrgConnection> ShapeExtractor<'a, C> {
    pub fn new(conn: &'a C, scope: ExtractionScope) -> Self {
        Self { conn, scope }
    }

    pub async fn extract(&self) -> Result<Extraction> {
        let profile = OrganizationProfile::fetch(self.conn).await?;
        info!(
            org = %profile.name,
            edition = %profile.edition_label,
            scope = %self.scope,
            "extracting org shape"
        );

        let definition = if self.scope.is_direct() {
            self.direct_definition(&profile).await?
        } else {
            self.shape_definition(&profile).await?
        };

        Ok(Extraction {
            org_id: profile.id,
            definition,
        })
    }

    async fn shape_definition(&self, profile: &OrganizationProfile) -> Result<ScratchDefinition> {
        let shape = ShapeRepresentation::fetch_active(self.conn).await?;
        Ok(ScratchDefinition {
            org_name: profile.name.clone(),
            edition: shape.edition,
            language: profile.locale.clone(),
            features: shape.features,
            settings: shape.settings.unwrap_or_default(),
        })
    }

    async fn direct_definition(&self, profile: &OrganizationProfile) -> Result<ScratchDefinition> {
        let records = fetch_settings(self.conn).await?;
        let normalized = Normalizer::new(self.scope).normalize(records);
        info!(
            settings = normalized.settings.len(),
            features = normalized.features.len(),
            "settings normalized"
        );

        Ok(ScratchDefinition {
            org_name: profile.name.clone(),
            edition: Some(scratch_edition_for(&profile.edition_label).to_string()),
            language: profile.locale.clone(),
            features: normalized.features,
            settings: normalized.settings,
        })
    }
}

/// List every settings type and read them all concurrently.
///
/// The batch is all-or-nothing: the first failed read fails the whole call.
/// Types the org lists but cannot read back are dropped.
pub async fn fetch_settings<C: OrgConnection>(conn: &C) -> Result<Vec<MetadataRecord>> {
    let items = conn.list_metadata(SETTINGS_TYPE).await?;
    info!(count = items.len(), "reading settings");

    let reads = items.iter().map(|item| {
        let type_name = item.qualified_type();
        async move { conn.read_metadata(&type_name, &item.full_name).await }
    });

    Ok(try_join_all(reads).await?.into_iter().flatten().collect())
}
