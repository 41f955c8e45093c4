use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fedisync::config::Config;

#[derive(Parser, Debug)]
#[command(name = "fedisync")]
#[command(about = "Sync a Mastodon or Pixelfed timeline into a local cache for static site builds")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./fedisync.yaml or $XDG_CONFIG_HOME/fedisync/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Development build: serve the cache without contacting the server
  #[arg(long)]
  dev: bool,

  /// Write the posts document here instead of stdout
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Also log to fedisync.log in this directory
  #[arg(long)]
  log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Stdout carries the document, so logs go to stderr
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fedisync=info"));
  let file_layer = args.log_dir.as_ref().map(|dir| {
    let appender = tracing_appender::rolling::never(dir, "fedisync.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    (fmt::layer().with_writer(writer).with_ansi(false), guard)
  });
  let (file_layer, _guard) = match file_layer {
    Some((layer, guard)) => (Some(layer), Some(guard)),
    None => (None, None),
  };
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(file_layer)
    .init();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  // Force a development build if requested on the command line
  let config = if args.dev {
    Config {
      is_production: false,
      ..config
    }
  } else {
    config
  };

  let document = fedisync::get_posts(config).await?;
  let json = serde_json::to_string_pretty(&document)?;

  match args.output {
    Some(path) => {
      std::fs::write(&path, json)
        .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;
      info!(path = %path.display(), posts = document.posts.len(), "Wrote posts");
    }
    None => println!("{}", json),
  }

  Ok(())
}
