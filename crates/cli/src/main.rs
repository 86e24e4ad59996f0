use std::{sync::Arc, time::Duration};

use {
    clap::{Parser, Subcommand},
    secrecy::ExposeSecret,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    meishi_bot::{Dispatcher, LineContentFetcher, Replier},
    meishi_config::MeishiConfig,
    meishi_line::LineClient,
    meishi_media::{CommandTransformer, ContentStore, Materializer},
    meishi_server::{AppState, build_app},
};

#[derive(Parser)]
#[command(name = "meishi", about = "Meishi, a LINE self-introduction chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Config file path (overrides discovery).
    #[arg(long, global = true, env = "MEISHI_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default when no subcommand is provided).
    Serve,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration with secrets redacted.
    Show,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load the effective config: explicit file or discovery, then env
/// fallbacks for secrets, then flag overrides.
fn effective_config(cli: &Cli) -> anyhow::Result<MeishiConfig> {
    let mut config = match cli.config {
        Some(ref path) => meishi_config::load_config(path)?,
        None => meishi_config::discover_and_load(),
    };
    meishi_config::apply_env_overrides(&mut config);

    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

/// Render the config as TOML with non-empty secrets masked.
fn render_redacted(config: &MeishiConfig) -> anyhow::Result<String> {
    let mut value = toml::Value::try_from(config)?;
    if let Some(line) = value.get_mut("line").and_then(toml::Value::as_table_mut) {
        for key in ["channel_secret", "channel_token"] {
            if let Some(entry) = line.get_mut(key)
                && entry.as_str().is_some_and(|s| !s.is_empty())
            {
                *entry = toml::Value::String("[REDACTED]".to_string());
            }
        }
    }
    Ok(toml::to_string_pretty(&value)?)
}

fn show_config(cli: &Cli) -> anyhow::Result<()> {
    let config = effective_config(cli)?;
    print!("{}", render_redacted(&config)?);
    Ok(())
}

async fn serve(cli: &Cli) -> anyhow::Result<()> {
    let config = effective_config(cli)?;

    if config.line.channel_secret.expose_secret().is_empty() {
        anyhow::bail!(
            "line.channel_secret is not set; configure it or export {}",
            meishi_config::ENV_CHANNEL_SECRET
        );
    }
    if config.line.channel_token.expose_secret().is_empty() {
        anyhow::bail!(
            "line.channel_token is not set; configure it or export {}",
            meishi_config::ENV_CHANNEL_TOKEN
        );
    }

    let client = Arc::new(
        LineClient::new(
            config.line.channel_token.clone(),
            Duration::from_secs(config.media.fetch_timeout_secs),
        )?
        .with_api_base(&config.line.api_base)
        .with_blob_base(&config.line.blob_base),
    );
    let replier = Replier::new(Arc::clone(&client) as _);
    let fetcher = Arc::new(LineContentFetcher::new(Arc::clone(&client)));
    let transformer = Arc::new(CommandTransformer::new(
        &config.media.convert_path,
        &config.media.ffmpeg_path,
        Duration::from_secs(config.media.transform_timeout_secs),
    ));

    let store = ContentStore::new(
        &config.media.download_dir,
        format!(
            "{}/downloaded",
            config.server.base_url.trim_end_matches('/')
        ),
    );
    store.ensure_root().await?;
    let materializer = Materializer::new(fetcher, transformer, store);

    let dispatcher = Dispatcher::new(
        replier,
        materializer,
        config.profile.clone(),
        &config.server.base_url,
    );

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        channel_secret: config.line.channel_secret.clone(),
        download_dir: config.media.download_dir.clone().into(),
        static_dir: config.media.static_dir.clone().into(),
    };

    meishi_server::serve(build_app(state), &config.server.bind, config.server.port).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "meishi starting");

    match cli.command {
        // Default: start the webhook server when no subcommand is provided
        None | Some(Commands::Serve) => serve(&cli).await,
        Some(Commands::Config { ref action }) => match action {
            ConfigAction::Show => show_config(&cli),
        },
    }
}
