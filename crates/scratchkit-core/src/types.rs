use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ExtractionScope
// ---------------------------------------------------------------------------

/// How much of the org's configuration `org shape extract` pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionScope {
    /// Allow-listed settings types, active denylist applied.
    #[default]
    Basic,
    /// Every listed settings type, no denylist.
    Full,
    /// Copy the org's active ShapeRepresentation record.
    ShapeRepresentation,
}

impl ExtractionScope {
    pub fn all() -> &'static [ExtractionScope] {
        &[
            ExtractionScope::Basic,
            ExtractionScope::Full,
            ExtractionScope::ShapeRepresentation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionScope::Basic => "basic",
            ExtractionScope::Full => "full",
            ExtractionScope::ShapeRepresentation => "shaperepresentation",
        }
    }

    /// True for the modes that read every settings type individually.
    pub fn is_direct(self) -> bool {
        !matches!(self, ExtractionScope::ShapeRepresentation)
    }
}

impl fmt::Display for ExtractionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExtractionScope {
    type Err = crate::error::ScratchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ExtractionScope::Basic),
            "full" => Ok(ExtractionScope::Full),
            "shaperepresentation" => Ok(ExtractionScope::ShapeRepresentation),
            _ => Err(crate::error::ScratchError::InvalidScope(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusCategory
// ---------------------------------------------------------------------------

/// Status category of a ContractStatus picklist value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusCategory {
    #[default]
    Draft,
    Activated,
    InApprovalProcess,
}

impl StatusCategory {
    pub fn all() -> &'static [StatusCategory] {
        &[
            StatusCategory::Draft,
            StatusCategory::Activated,
            StatusCategory::InApprovalProcess,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusCategory::Draft => "Draft",
            StatusCategory::Activated => "Activated",
            StatusCategory::InApprovalProcess => "InApprovalProcess",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusCategory {
    type Err = crate::error::ScratchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(StatusCategory::Draft),
            "Activated" => Ok(StatusCategory::Activated),
            "InApprovalProcess" => Ok(StatusCategory::InApprovalProcess),
            _ => Err(crate::error::ScratchError::InvalidStatusCategory(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
