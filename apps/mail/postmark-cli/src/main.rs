//! Postmark CLI
//!
//! Builds one email from command-line arguments and either prints the
//! Postmark payload (`preview`) or sends it (`send`).
//!
//! `send` reads `POSTMARK_SERVER_TOKEN`, `POSTMARK_DEBUG`, `POSTMARK_API_URL`
//! and `POSTMARK_TIMEOUT_SECS` from the environment.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::Result;
use postmark_mail::{OutboundPayload, PostmarkConfig, PostmarkMailer};
use tracing::info;

mod compose;

use compose::ComposeArgs;

#[derive(Parser)]
#[command(name = "postmark-send")]
#[command(about = "Preview or send a transactional email through Postmark")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the JSON payload without sending anything
    Preview {
        #[command(flatten)]
        compose: ComposeArgs,
    },

    /// Send the message and print Postmark's response
    Send {
        #[command(flatten)]
        compose: ComposeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { compose } => {
            let payload = OutboundPayload::from_message(&compose.to_message()?)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }

        Commands::Send { compose } => {
            let message = compose.to_message()?;
            let config = PostmarkConfig::from_env()?;
            let mailer = PostmarkMailer::new(config)?;

            let result = mailer.send(&message).await?;
            info!(message_id = ?result.message_id, "Email accepted");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
