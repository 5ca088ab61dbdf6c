use anyhow::Context;
use clap::{Parser, Subcommand};
use huddle_config::load as load_config;
use huddle_database::{ChatOverview, ChatRepository};
use huddle_gateway::{create_gateway_state, create_router};
use huddle_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "huddle-backend")]
#[command(about = "Huddle chat backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP and websocket server
    Serve,
    /// Print every chat with its participant and message counts
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::DumpData => dump_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting Huddle backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = create_gateway_state(services.db_pool.clone(), &config)
        .await
        .context("failed to build gateway state")?;
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(huddle_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let chats = ChatRepository::new(services.db_pool.clone())
        .overview()
        .await
        .context("failed to fetch chats")?;

    print!("{}", render_overview(&chats));
    Ok(())
}

fn render_overview(chats: &[ChatOverview]) -> String {
    let mut out = String::from("=== CHATS ===\n");
    if chats.is_empty() {
        out.push_str("No chats found in database\n");
        return out;
    }

    out.push_str(&format!("Found {} chats:\n", chats.len()));
    out.push_str(&format!(
        "{:<38} {:<30} {:<14} {:<10} {:<10}\n",
        "ID", "Title", "Participants", "Messages", "Deleted"
    ));
    out.push_str(&"-".repeat(106));
    out.push('\n');

    for chat in chats {
        out.push_str(&format!(
            "{:<38} {:<30} {:<14} {:<10} {:<10}\n",
            chat.id, chat.title, chat.participant_count, chat.message_count, chat.deleted_message_count
        ));
    }
    out
}
