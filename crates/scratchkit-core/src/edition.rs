//! Organization edition → scratch org edition mapping.
//!
//! Scratch orgs come in four editions. Every commercial `OrganizationType`
//! lands in one of them, falling back to `Developer`.

const GROUP_TYPES: &[&str] = &["Team Edition", "Personal Edition", "Base Edition"];
const PROFESSIONAL_TYPES: &[&str] = &["Contact Manager Edition"];
const ENTERPRISE_TYPES: &[&str] = &["Unlimited Edition"];

/// Editions a scratch definition accepts verbatim.
pub const SCRATCH_EDITIONS: &[&str] = &["Group", "Professional", "Enterprise", "Developer"];

pub const DEFAULT_EDITION: &str = "Developer";

const EDITION_SUFFIX: &str = " Edition";

/// Map an `OrganizationType` label to a scratch org edition.
///
/// Matching is exact and case-sensitive. Retired editions are folded into
/// their closest current tier before the ` Edition` suffix is stripped.
pub fn scratch_edition_for(organization_type: &str) -> &str {
    if GROUP_TYPES.contains(&organization_type) {
        return "Group";
    }
    if PROFESSIONAL_TYPES.contains(&organization_type) {
        return "Professional";
    }
    if ENTERPRISE_TYPES.contains(&organization_type) {
        return "Enterprise";
    }
    let stripped = organization_type
        .strip_suffix(EDITION_SUFFIX)
        .unwrap_or(organization_type);
    SCRATCH_EDITIONS
        .iter()
        .copied()
        .find(|edition| *edition == stripped)
        .unwrap_or(DEFAULT_EDITION)
}
