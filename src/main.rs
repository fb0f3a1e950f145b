use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use gg_ingest::{Ingestor, is_accepted_upload};
use gg_server::state::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use gg_server::{AppConfig, AppState};
use gg_store::{ArtifactStore, FsArtifactStore, ReplaceMode, StoreConfig};

/// Store directory created under the data directory.
const STORE_DIR_NAME: &str = "gg";

/// gg - A versioned artifact repository
#[derive(Parser)]
#[command(name = "gg")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory, the store lives in <DIR>/gg (default: home directory)
  #[arg(short, long, global = true)]
  dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Serve the HTTP API
  Serve {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Build re-uploaded versions next to the old one before swapping them in
    #[arg(long)]
    staged_replace: bool,

    /// Largest accepted upload in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
  },

  /// Ingest a local archive into the store
  Ingest {
    /// Path to the archive (.zip, .tar.gz or .tar)
    archive: PathBuf,

    /// Build a re-uploaded version next to the old one before swapping it in
    #[arg(long)]
    staged_replace: bool,
  },

  /// Print stored artifacts and their versions as JSON
  List {
    /// Case-insensitive name filter
    #[arg(default_value = "")]
    filter: String,
  },

  /// Print the recorded SHA-256 of a stored archive
  Check {
    /// Artifact name
    name: String,

    /// Exact version (default: latest)
    #[arg(short, long)]
    version: Option<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let data_dir = match cli.dir {
    Some(dir) => dir,
    None => dirs::home_dir().context("could not determine home directory, pass --dir")?,
  };
  let root = data_dir.join(STORE_DIR_NAME);

  match cli.command {
    Some(Commands::Serve {
      port,
      staged_replace,
      max_upload_bytes,
    }) => {
      let config = AppConfig {
        port,
        max_upload_bytes,
      };
      run(serve(store_config(root, staged_replace), config))?;
    }
    Some(Commands::Ingest {
      archive,
      staged_replace,
    }) => {
      run(ingest(store_config(root, staged_replace), archive))?;
    }
    Some(Commands::List { filter }) => {
      run(list(StoreConfig::new(root), filter))?;
    }
    Some(Commands::Check { name, version }) => {
      run(check(StoreConfig::new(root), name, version))?;
    }
    None => {
      println!("gg - use --help to see available commands");
    }
  }

  Ok(())
}

/// Log to stderr so command output stays parseable.
fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

fn run(task: impl Future<Output = Result<()>>) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(task)
}

fn store_config(root: PathBuf, staged_replace: bool) -> StoreConfig {
  let mode = if staged_replace {
    ReplaceMode::Staged
  } else {
    ReplaceMode::InPlace
  };
  StoreConfig::new(root).with_replace_mode(mode)
}

async fn serve(store_config: StoreConfig, config: AppConfig) -> Result<()> {
  tokio::fs::create_dir_all(&store_config.root)
    .await
    .with_context(|| {
      format!(
        "failed to create store directory: {}",
        store_config.root.display()
      )
    })?;

  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .with_context(|| format!("failed to bind {addr}"))?;

  let shutdown = CancellationToken::new();
  let on_signal = shutdown.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::info!("shutdown_requested");
    }
    on_signal.cancel();
  });

  let state = AppState::new(FsArtifactStore::new(store_config), config);
  gg_server::serve(listener, state, shutdown)
    .await
    .context("server failed")
}

async fn ingest(store_config: StoreConfig, archive: PathBuf) -> Result<()> {
  let file_name = archive
    .file_name()
    .and_then(|n| n.to_str())
    .with_context(|| format!("invalid archive path: {}", archive.display()))?
    .to_string();
  if !is_accepted_upload(&file_name) {
    bail!("unsupported archive type '{file_name}': only .zip, .tar.gz and .tar are accepted");
  }
  if !gg_fs::exists(&archive).await {
    bail!("archive not found: {}", archive.display());
  }

  // The pipeline unpacks next to the archive, so work on a private copy.
  let staged = tempfile::Builder::new()
    .prefix("gg-ingest-")
    .tempdir()
    .context("failed to create staging directory")?;
  stage_copy(&archive, &staged.path().join(&file_name)).await?;

  let ingestor = Ingestor::new(FsArtifactStore::new(store_config));
  let stored = ingestor
    .ingest(staged.path(), &file_name)
    .await
    .with_context(|| format!("failed to ingest {}", archive.display()))?;

  println!("{}", serde_json::to_string_pretty(&stored)?);
  Ok(())
}

async fn stage_copy(archive: &Path, dest: &Path) -> Result<()> {
  tokio::fs::copy(archive, dest)
    .await
    .with_context(|| format!("failed to read archive: {}", archive.display()))?;
  Ok(())
}

async fn list(store_config: StoreConfig, filter: String) -> Result<()> {
  let store = FsArtifactStore::new(store_config);
  let artifacts = store
    .list(&filter)
    .await
    .context("failed to list artifacts")?;

  println!("{}", serde_json::to_string_pretty(&artifacts)?);
  Ok(())
}

async fn check(store_config: StoreConfig, name: String, version: Option<String>) -> Result<()> {
  let store = FsArtifactStore::new(store_config);
  let (resolved, digest) = store
    .resolver()
    .resolve_digest(&name, version.as_deref())
    .await
    .with_context(|| format!("failed to check {name}"))?;

  let report = serde_json::json!({
    "name": resolved.name,
    "version": resolved.version,
    "file_name": resolved.file_name,
    "digest": digest,
  });
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}
