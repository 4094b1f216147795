use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use futures::future::join_all;
use iconvault_config::{Config, ConfigLoader};
use iconvault_core::{
    FetchCoordinator, IconCacheStore, IconImage, IconKey, IconLoader,
    LayoutRect, LocalFileSystem, ReqwestTransport, TintColor,
    build_access_path,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "iconvaultctl", about = "Fetch and inspect cached icons")]
struct Cli {
    /// Path to an iconvault.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the cache root directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Make sure icons are cached and print their access paths
    Fetch {
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
        #[command(flatten)]
        presentation: PresentationArgs,
    },
    /// Print the access path of an already cached icon
    Path {
        #[arg(value_name = "KEY")]
        key: String,
        #[command(flatten)]
        presentation: PresentationArgs,
    },
    /// Print the remote URL an icon is fetched from
    Url {
        #[arg(value_name = "KEY")]
        key: String,
    },
}

#[derive(Args, Clone, Copy)]
struct PresentationArgs {
    #[arg(long, default_value_t = 32.0)]
    width: f32,
    #[arg(long, default_value_t = 32.0)]
    height: f32,
    /// Tint as #rgb, #rrggbb or #rrggbbaa
    #[arg(long)]
    color: Option<TintColor>,
}

impl PresentationArgs {
    fn rect(&self) -> LayoutRect {
        LayoutRect::new(self.width, self.height)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.cache_dir.clone())?;

    match cli.command {
        Command::Fetch { keys, presentation } => {
            fetch(&config, &keys, presentation).await
        }
        Command::Path { key, presentation } => {
            path(&config, &key, presentation).await
        }
        Command::Url { key } => {
            let key = parse_key(&key)?;
            println!("{}", key.remote_url(&config.remote.api_base));
            Ok(())
        }
    }
}

fn load_config(
    config_path: Option<&PathBuf>,
    cache_dir: Option<PathBuf>,
) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    if let Some(dir) = cache_dir {
        loader = loader.with_cache_root(dir);
    }
    let load = loader.load().context("failed to load configuration")?;
    for warning in &load.warnings.items {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    Ok(load.config)
}

fn parse_key(raw: &str) -> Result<IconKey> {
    IconKey::parse(raw).with_context(|| format!("invalid icon key '{raw}'"))
}

fn store_for(config: &Config) -> IconCacheStore {
    IconCacheStore::new(Arc::new(LocalFileSystem::new(&config.cache.root)))
}

async fn fetch(
    config: &Config,
    raw_keys: &[String],
    presentation: PresentationArgs,
) -> Result<()> {
    let keys = raw_keys
        .iter()
        .map(|raw| parse_key(raw))
        .collect::<Result<Vec<_>>>()?;

    config
        .ensure_directories()
        .context("failed to create cache directory")?;

    let transport = ReqwestTransport::new(
        config.remote.timeout,
        &config.remote.user_agent,
    )
    .context("failed to build HTTP client")?;
    let loader = IconLoader::new(FetchCoordinator::new(
        store_for(config),
        Arc::new(transport),
        config.remote.api_base.clone(),
    ));

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let rect = presentation.rect();
    let outcomes = join_all(keys.iter().map(|key| {
        loader.resolve_or_placeholder(key, rect, presentation.color, &cancel)
    }))
    .await;
    interrupt.abort();

    info!(
        keys = keys.len(),
        fetched = loader.coordinator().stats().leaders,
        "fetch finished"
    );

    for (key, outcome) in keys.iter().zip(outcomes) {
        match outcome.with_context(|| format!("failed to resolve {key}"))? {
            IconImage::Ready(path) => println!("{key}\t{path}"),
            IconImage::Placeholder => println!("{key}\tplaceholder"),
        }
    }
    Ok(())
}

async fn path(
    config: &Config,
    raw_key: &str,
    presentation: PresentationArgs,
) -> Result<()> {
    let key = parse_key(raw_key)?;
    let store = store_for(config);

    let Some(tintability) = store.cached_variant(&key).await else {
        bail!(
            "{key} is not cached under {}",
            config.cache.root.display()
        );
    };

    let path = build_access_path(
        &key,
        tintability,
        presentation.rect(),
        presentation.color,
    );
    println!("{path}");
    Ok(())
}
