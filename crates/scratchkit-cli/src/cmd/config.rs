use crate::connect::ConnectionArgs;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use scratchkit_core::config::{validate_api_version, Config, OrgCredentials};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Save an org connection under an alias
    ///
    /// Takes the connection from --instance-url, --access-token and
    /// --apiversion.
    SetOrg {
        /// Alias to store the connection under
        alias: String,
        /// Also make this alias the default
        #[arg(long)]
        default: bool,
    },

    /// List saved org connections (tokens are not printed)
    Show,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(connection: &ConnectionArgs, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::SetOrg { alias, default } => set_org(connection, &alias, default),
        ConfigSubcommand::Show => show(connection, json),
    }
}

// ---------------------------------------------------------------------------
// set-org
// ---------------------------------------------------------------------------

fn set_org(connection: &ConnectionArgs, alias: &str, make_default: bool) -> anyhow::Result<()> {
    let (Some(instance_url), Some(access_token)) =
        (&connection.instance_url, &connection.access_token)
    else {
        anyhow::bail!("config set-org needs --instance-url and --access-token");
    };
    if let Some(version) = &connection.api_version {
        validate_api_version(version)?;
    }

    let path = connection.config_path()?;
    let mut config = Config::load(&path).context("failed to load config")?;
    let mut credentials = OrgCredentials::new(instance_url.trim_end_matches('/'), access_token);
    credentials.api_version = connection.api_version.clone();
    config.orgs.insert(alias.to_string(), credentials);
    if make_default || config.default.is_none() {
        config.default = Some(alias.to_string());
    }
    config
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Saved org '{alias}' to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(connection: &ConnectionArgs, json: bool) -> anyhow::Result<()> {
    let path = connection.config_path()?;
    let config = Config::load(&path).context("failed to load config")?;

    if json {
        let orgs: Vec<serde_json::Value> = config
            .orgs
            .iter()
            .map(|(alias, creds)| {
                serde_json::json!({
                    "alias": alias,
                    "instance_url": creds.instance_url,
                    "api_version": creds.api_version,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "default": config.default,
            "orgs": orgs,
        }))?;
        return Ok(());
    }

    if config.orgs.is_empty() {
        println!("No orgs configured in {}", path.display());
        return Ok(());
    }
    for (alias, creds) in &config.orgs {
        let marker = if config.default.as_deref() == Some(alias.as_str()) {
            "*"
        } else {
            " "
        };
        let version = creds.api_version.as_deref().unwrap_or("latest");
        println!("{marker} {alias:<16} {:<48} {version}", creds.instance_url);
    }
    Ok(())
}
