use crate::connect::ConnectionArgs;
use crate::output::print_message;
use anyhow::Context;
use clap::Subcommand;
use scratchkit_core::types::StatusCategory;
use scratchkit_core::value_set::{NewValue, ValueSetAppender, CONTRACT_STATUS};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ContractstatusSubcommand {
    /// Manage individual ContractStatus values
    Value {
        #[command(subcommand)]
        subcommand: ValueSubcommand,
    },
}

#[derive(Subcommand)]
pub enum ValueSubcommand {
    /// Append a value to the ContractStatus picklist
    Add {
        /// Label shown to users
        #[arg(long, short = 'l')]
        label: String,
        /// API name of the new value
        #[arg(long = "apiname", short = 'a')]
        api_name: String,
        /// Status category: Draft, Activated, or InApprovalProcess
        #[arg(long = "statuscategory", short = 's', default_value_t = StatusCategory::Draft)]
        status_category: StatusCategory,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    connection: &ConnectionArgs,
    subcmd: ContractstatusSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ContractstatusSubcommand::Value {
            subcommand:
                ValueSubcommand::Add {
                    label,
                    api_name,
                    status_category,
                },
        } => add(
            connection,
            NewValue::new(label, api_name, status_category),
            json,
        ),
    }
}

// ---------------------------------------------------------------------------
// value add
// ---------------------------------------------------------------------------

fn add(connection: &ConnectionArgs, value: NewValue, json: bool) -> anyhow::Result<()> {
    warn!(
        "deprecated: the Metadata API now manages {CONTRACT_STATUS} values directly; \
         prefer deploying the StandardValueSet"
    );

    let rt = tokio::runtime::Runtime::new()?;
    let value_set = rt.block_on(async {
        let client = connection.connect().await?;
        info!(
            label = %value.label,
            api_name = %value.api_name,
            status_category = %value.status_category,
            "adding {CONTRACT_STATUS} value"
        );
        let appender = ValueSetAppender::contract_status(&client);
        appender.add_value(&value).await.with_context(|| {
            format!("failed to add {} value '{}'", appender.value_set(), value.api_name)
        })?;
        anyhow::Ok(appender.value_set().to_string())
    })?;

    print_message(&format!("{value_set} value added"), json)
}
