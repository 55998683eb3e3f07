//! Command-line front end for the IdP behavioral-biometrics and number-profile APIs

use anyhow::{Context, Result};
use behavebio::{DeviceType, FieldType};
use clap::{Parser, Subcommand};
use saidp_client::{Client, ClientConfig, SignedResponse};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Call the SecureAuth IdP REST API with credentials from `SAIDP_*` variables
#[derive(Debug, Parser)]
#[command(name = "saidp", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the behavioral-biometrics browser script
    BehaveJs,
    /// Submit a behavior profile for scoring
    BehaveProfile {
        #[arg(long)]
        user: String,
        /// JSON string produced by the browser script
        #[arg(long)]
        profile: String,
        #[arg(long)]
        host_address: String,
        #[arg(long)]
        user_agent: String,
    },
    /// Reset a stored behavior profile
    BehaveReset {
        #[arg(long)]
        user: String,
        /// Field to reset, or ALL
        #[arg(long, default_value = "ALL")]
        field_name: String,
        /// regulartext, anonymoustext or ALL
        #[arg(long, default_value = "ALL")]
        field_type: FieldType,
        /// Desktop, Mobile or ALL
        #[arg(long, default_value = "ALL")]
        device_type: DeviceType,
    },
    /// Look up the carrier and portability of a phone number
    NumberProfile {
        #[arg(long)]
        user: String,
        #[arg(long)]
        phone_number: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // JSON logs for log shippers, plain text otherwise
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("Failed to load IdP configuration")?;
    info!(host = %config.host, realm = %config.realm, "Using IdP realm");
    let client = Client::new(config).context("Failed to create IdP client")?;

    match cli.command {
        Command::BehaveJs => {
            let response = behavebio::Request::default()
                .get_behave_js(&client)
                .await
                .context("Failed to fetch behavebio script")?;
            print_response(&client, &response)
        }
        Command::BehaveProfile {
            user,
            profile,
            host_address,
            user_agent,
        } => {
            let response = behavebio::Request::default()
                .post_behave_profile(&client, user, profile, host_address, user_agent)
                .await
                .context("Failed to submit behavior profile")?;
            print_response(&client, &response)
        }
        Command::BehaveReset {
            user,
            field_name,
            field_type,
            device_type,
        } => {
            let response = behavebio::Request::default()
                .reset_behave_profile(&client, user, field_name, field_type, device_type)
                .await
                .context("Failed to reset behavior profile")?;
            print_response(&client, &response)
        }
        Command::NumberProfile { user, phone_number } => {
            let response = numberprofile::Request::new(user, phone_number)
                .post(&client)
                .await
                .context("Failed to profile phone number")?;
            print_response(&client, &response)
        }
    }
}

fn print_response<R>(client: &Client, response: &R) -> Result<()>
where
    R: Serialize + SignedResponse,
{
    println!("{}", serde_json::to_string_pretty(response)?);
    println!("signature valid: {}", response.is_signature_valid(client));
    Ok(())
}
