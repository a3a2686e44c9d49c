mod config_commands;
mod db_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    drape_auto_reply::{TurnPipeline, fallback_reply},
    drape_common::{ImageAttachment, TurnInput},
    drape_config::DrapeConfig,
    drape_providers::OpenAiCompatClassifier,
    drape_routing::{IntentRouter, prompt::load_prompt_template},
    drape_sessions::{SqliteProfileStore, SqliteRoutingStateStore},
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "drape", about = "Drape, intent routing for a styling assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./drape.toml and the user config dir).
    #[arg(long, global = true, env = "DRAPE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Route one inbound turn and print the resulting state as JSON.
    Route {
        /// Conversation session key, e.g. `wa:15551234567`.
        #[arg(long)]
        session: String,
        /// User whose profile drives missing-field and cooldown checks.
        #[arg(long)]
        user: String,
        /// Message text.
        #[arg(short, long, default_value = "")]
        message: String,
        /// Button token the user tapped.
        #[arg(long)]
        button: Option<String>,
        /// Number of image attachments on the turn.
        #[arg(long, default_value_t = 0)]
        image: usize,
    },
    /// Database management.
    Db {
        #[command(subcommand)]
        action: db_commands::DbAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so `route` output stays machine-readable.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Build the inbound turn from `route` arguments.
fn build_turn(message: String, button: Option<String>, images: usize) -> TurnInput {
    let images = (0..images)
        .map(|i| ImageAttachment {
            media_type: "image/jpeg".into(),
            data: format!("cli-attachment-{i}"),
        })
        .collect();
    TurnInput {
        body: message,
        button,
        images,
        history: Vec::new(),
    }
}

async fn build_router(config: &DrapeConfig) -> anyhow::Result<IntentRouter> {
    let classifier = Arc::new(OpenAiCompatClassifier::from_config(&config.classifier));
    let mut router =
        IntentRouter::new(classifier).with_classifier_timeout(config.routing.classifier_timeout());
    if let Some(path) = &config.routing.prompt_path {
        let template = load_prompt_template(path)
            .await
            .with_context(|| format!("failed to load router prompt {}", path.display()))?;
        router = router.with_prompt_template(template);
    }
    Ok(router)
}

async fn route(
    config: &DrapeConfig,
    session: &str,
    user: &str,
    turn: TurnInput,
) -> anyhow::Result<()> {
    let pool = db_commands::connect(config).await?;
    let pipeline = TurnPipeline::new(
        build_router(config).await?,
        Arc::new(SqliteProfileStore::new(pool.clone())),
        Arc::new(SqliteRoutingStateStore::new(pool)),
    );

    match pipeline.handle(session, user, &turn).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        },
        Err(e) => {
            error!(session, user, error = %e, "turn failed");
            let replies = [fallback_reply()];
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "replies": replies }))?
            );
            Err(e.into())
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "drape starting");

    let (config, config_path) = drape_config::load_or_discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Route {
            session,
            user,
            message,
            button,
            image,
        } => route(&config, &session, &user, build_turn(message, button, image)).await,
        Commands::Db { action } => db_commands::handle_db(action, &config).await,
        Commands::Config { action } => {
            config_commands::handle_config(action, &config, config_path.as_deref())
        },
    }
}
