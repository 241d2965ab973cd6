use anyhow::Context;
use clap::Args;
use scratchkit_client::OrgClient;
use scratchkit_core::config::{self, ConnectionOverrides};
use scratchkit_core::paths;
use std::path::PathBuf;
use tracing::debug;

/// Global flags that pick the target org.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Instance URL, e.g. https://example.my.salesforce.com
    #[arg(long, global = true, env = "SCRATCHKIT_INSTANCE_URL")]
    pub instance_url: Option<String>,

    /// OAuth access token or session id for the instance
    #[arg(long, global = true, env = "SCRATCHKIT_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Org alias from the config file (default: the file's default alias)
    #[arg(long, short = 'u', global = true, env = "SCRATCHKIT_TARGET_ORG")]
    pub target_org: Option<String>,

    /// API version to use, e.g. 60.0 (default: latest the org offers)
    #[arg(long = "apiversion", global = true, env = "SCRATCHKIT_API_VERSION")]
    pub api_version: Option<String>,

    /// Org config file (default: ~/.scratchkit/orgs.yaml)
    #[arg(long, global = true, env = "SCRATCHKIT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(paths::default_config_path()?),
        }
    }

    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            instance_url: self.instance_url.clone(),
            access_token: self.access_token.clone(),
            target_org: self.target_org.clone(),
            api_version: self.api_version.clone(),
        }
    }

    /// Resolve credentials and open a client for the target org.
    pub async fn connect(&self) -> anyhow::Result<OrgClient> {
        let config_path = self.config_path()?;
        let credentials = config::resolve(&self.overrides(), &config_path)?;
        debug!(instance = %credentials.instance_url, "connecting");
        OrgClient::connect(&credentials)
            .await
            .with_context(|| format!("failed to connect to {}", credentials.instance_url))
    }
}
