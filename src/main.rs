use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use finance_dashboard::auth::Authenticator;
use finance_dashboard::backend::{self, AppState};
use finance_dashboard::config::AppConfig;
use finance_dashboard::database::db::{connection, migrate};
use finance_dashboard::realtime::ChangeFeed;
use finance_dashboard::store::Store;
use rand::RngCore;
use tracing_subscriber::EnvFilter;

const TUI_LOG_FILE: &str = "finance_dashboard.log";

#[derive(Parser)]
#[command(name = "finance-dashboard", version, about = "Personal finance dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Open the terminal dashboard (default)
    Tui,
    /// Create an account without opening the dashboard
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    // The TUI owns the terminal, so its logs go to a file.
    if matches!(command, Command::Tui) {
        let file = OpenOptions::new().create(true).append(true).open(TUI_LOG_FILE)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    }

    let config = AppConfig::from_env()?;
    let pool = connection::connect(&config.database_url).await?;
    migrate::run_migrations(&pool).await?;

    let store = Store::new(pool.clone(), ChangeFeed::new(config.change_feed_capacity));

    match command {
        Command::Serve => {
            let secret = config.require_session_secret()?;
            let auth = Authenticator::new(pool, secret, &config);
            backend::run_server(AppState { store, auth }, config.bind_addr).await?;
        }
        Command::Tui => {
            // Sessions only live as long as this process unless a secret is configured.
            let secret = config.session_secret.clone().unwrap_or_else(|| {
                let mut key = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut key);
                key
            });
            let auth = Authenticator::new(pool, secret, &config);
            finance_dashboard::cli::run(store, auth).await?;
        }
        Command::SignUp {
            email,
            password,
            full_name,
        } => {
            let secret = config.session_secret.clone().unwrap_or_default();
            let auth = Authenticator::new(pool, secret, &config);
            let user = auth.sign_up(&email, &password, full_name.as_deref()).await?;
            println!("Created account {} ({})", user.email, user.id);
        }
    }

    Ok(())
}
