use crate::error::{Result, ScratchError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// OrgCredentials
// ---------------------------------------------------------------------------

/// Everything needed to talk to one org.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgCredentials {
    pub instance_url: String,
    pub access_token: String,
    /// Pinned API version; the latest available one is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl OrgCredentials {
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config (orgs.yaml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Alias used when no org is named explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub orgs: BTreeMap<String, OrgCredentials>,
}

impl Config {
    /// Load `path`, or an empty config when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())?;
        Ok(())
    }

    /// Look up `alias`, or the default alias when `None`.
    pub fn org(&self, alias: Option<&str>) -> Result<Option<&OrgCredentials>> {
        let Some(alias) = alias.or(self.default.as_deref()) else {
            return Ok(None);
        };
        self.orgs
            .get(alias)
            .map(Some)
            .ok_or_else(|| ScratchError::UnknownOrg(alias.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Connection values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub instance_url: Option<String>,
    pub access_token: Option<String>,
    pub target_org: Option<String>,
    pub api_version: Option<String>,
}

/// Resolve the credentials for this run.
///
/// An explicit instance URL and token win over the config file; otherwise
/// the named (or default) alias is read from `config_path`. An explicit API
/// version overrides whatever the alias pins.
pub fn resolve(overrides: &ConnectionOverrides, config_path: &Path) -> Result<OrgCredentials> {
    let mut credentials = match (&overrides.instance_url, &overrides.access_token) {
        (Some(url), Some(token)) => OrgCredentials::new(url.clone(), token.clone()),
        (Some(_), None) | (None, Some(_)) => {
            return Err(ScratchError::Config(
                "--instance-url and --access-token must be given together".to_string(),
            ))
        }
        (None, None) => Config::load(config_path)?
            .org(overrides.target_org.as_deref())?
            .cloned()
            .ok_or_else(|| ScratchError::MissingCredentials {
                config_path: PathBuf::from(config_path),
            })?,
    };

    if let Some(version) = &overrides.api_version {
        credentials.api_version = Some(version.clone());
    }
    if let Some(version) = &credentials.api_version {
        validate_api_version(version)?;
    }
    credentials.instance_url = credentials.instance_url.trim_end_matches('/').to_string();
    Ok(credentials)
}

// ---------------------------------------------------------------------------
// API version validation
// ---------------------------------------------------------------------------

static API_VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn api_version_re() -> &'static Regex {
    API_VERSION_RE.get_or_init(|| Regex::new(r"^\d{1,3}\.\d$").unwrap())
}

pub fn validate_api_version(version: &str) -> Result<()> {
    if !api_version_re().is_match(version) {
        return Err(ScratchError::InvalidApiVersion(version.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
