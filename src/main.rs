mod commands;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use maskedemail::config::{Config, Overrides, Settings};
use maskedemail::models::Output;
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maskedemail")]
#[command(version, about = "Manage Fastmail masked email addresses", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Fastmail API token
    #[arg(long, global = true, env = "MASKEDEMAIL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Account ID (default: primary masked email account)
    #[arg(long, global = true, env = "MASKEDEMAIL_ACCOUNTID")]
    account_id: Option<String>,

    /// Name used to label created masked emails
    #[arg(long, global = true, env = "MASKEDEMAIL_APPNAME")]
    app_name: Option<String>,

    /// JMAP session discovery URL
    #[arg(long, global = true, env = "MASKEDEMAIL_SESSION_URL", hide = true)]
    session_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an API token and store it
    Auth {
        /// API token from Fastmail settings
        token: String,
    },

    /// Show session details and accounts
    Session,

    /// List masked email addresses
    List {
        /// Include deleted addresses
        #[arg(long)]
        show_deleted: bool,
    },

    /// Create a new masked email address
    Create {
        /// Domain this masked email is for (e.g., https://example.com)
        #[arg(long)]
        domain: String,

        /// Description for the masked email
        #[arg(long)]
        description: Option<String>,

        /// Custom prefix for the email address (max 64 chars, a-z/0-9/underscore)
        #[arg(long)]
        prefix: Option<String>,

        /// Create a pending address that must be confirmed before use
        #[arg(long)]
        pending: bool,
    },

    /// Confirm a pending masked email
    Confirm {
        /// Masked email ID
        id: String,
    },

    /// Enable a masked email address
    Enable {
        /// Masked email address
        email: String,
    },

    /// Disable a masked email address
    Disable {
        /// Masked email address
        email: String,
    },

    /// Delete a masked email address
    Delete {
        /// Masked email address
        email: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Change the domain or description of a masked email address
    Update {
        /// Masked email address
        email: String,

        /// New domain (empty string clears it)
        #[arg(long)]
        domain: Option<String>,

        /// New description (empty string clears it)
        #[arg(long)]
        description: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate(shell, &mut Cli::command(), "maskedemail", &mut io::stdout());
        return;
    }

    let result = match Config::load() {
        Ok(config) => {
            let settings = Settings::resolve(
                Overrides {
                    token: cli.global.token,
                    account_id: cli.global.account_id,
                    app_name: cli.global.app_name,
                    session_url: cli.global.session_url,
                },
                config,
            );
            run(cli.command, &settings).await
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        Output::<()>::error(e.to_string()).print();
        std::process::exit(1);
    }
}

async fn run(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::Auth { token } => commands::auth(settings, &token).await,

        Commands::Session => commands::show_session(settings).await,

        Commands::List { show_deleted } => {
            commands::list_masked_emails(settings, show_deleted).await
        }

        Commands::Create {
            domain,
            description,
            prefix,
            pending,
        } => {
            commands::create_masked_email(
                settings,
                &domain,
                description.as_deref(),
                prefix.as_deref(),
                pending,
            )
            .await
        }

        Commands::Confirm { id } => commands::confirm_masked_email(settings, &id).await,

        Commands::Enable { email } => commands::enable_masked_email(settings, &email).await,

        Commands::Disable { email } => commands::disable_masked_email(settings, &email).await,

        Commands::Delete { email, yes } => {
            if !yes {
                eprintln!("Delete masked email {}? Use -y to confirm.", email);
                std::process::exit(1);
            }
            commands::delete_masked_email(settings, &email).await
        }

        Commands::Update {
            email,
            domain,
            description,
        } => {
            commands::update_masked_email(
                settings,
                &email,
                domain.as_deref(),
                description.as_deref(),
            )
            .await
        }

        Commands::Completions { .. } => Ok(()),
    }
}
