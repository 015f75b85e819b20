use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use ftp_site_editor::auth::issue_token;
use ftp_site_editor::config::{Config, DEFAULT_CONFIG_PATH};
use ftp_site_editor::crypto::PasswordCipher;
use ftp_site_editor::domain::{Profile, Role};
use ftp_site_editor::editor::{parse_events, parse_schedule};
use ftp_site_editor::ftp::FtpClient;
use ftp_site_editor::server::{start_server, AppState};
use ftp_site_editor::storage::{InMemoryStorage, Storage};
use ftp_site_editor::{logging, metrics};

#[derive(Parser)]
#[command(name = "site-editor")]
#[command(about = "Edit event and schedule fragments of FTP-hosted sites")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the event blocks of an HTML file as JSON
    ParseEvents { file: PathBuf },
    /// Print the annual schedule blocks of an HTML file as JSON
    ParseSchedule { file: PathBuf },
    /// Read an FTP password from stdin and print its encrypted form
    EncryptPassword,
    /// Create an administrator profile and print its access token
    CreateAdmin {
        #[arg(long)]
        email: String,
    },
}

fn read_document(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    logging::init_logging(&config.logging.dir);

    match cli.command {
        Commands::Serve { port } => {
            metrics::init_metrics();

            let cipher = Arc::new(PasswordCipher::from_env().context("ENCRYPTION_KEY must be set")?);
            let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::open(&config.storage.data_file)?);
            let files = Arc::new(FtpClient::new(cipher.clone(), config.ftp.timeout()));

            let port = port.unwrap_or(config.server.port);
            start_server(AppState::new(storage, files, cipher), &config.server.host, port).await?;
        }
        Commands::ParseEvents { file } => {
            let events = parse_events(&read_document(&file)?);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Commands::ParseSchedule { file } => {
            let schedule = parse_schedule(&read_document(&file)?);
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        Commands::EncryptPassword => {
            let cipher = PasswordCipher::from_env().context("ENCRYPTION_KEY must be set")?;
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let password = input.trim_end_matches(['\r', '\n']);
            anyhow::ensure!(!password.is_empty(), "no password given on stdin");
            println!("{}", cipher.encrypt(password)?);
        }
        Commands::CreateAdmin { email } => {
            let storage = InMemoryStorage::open(&config.storage.data_file)?;
            let (token, token_hash) = issue_token();
            let mut profile = Profile::new(email.trim().to_string(), Role::Admin, token_hash);
            storage.create_profile(&mut profile).await?;

            info!("Created admin profile {}", profile.email);
            println!("{token}");
        }
    }
    Ok(())
}
