use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use workable::config::Config;
use workable::{CacheNamespace, QueryParams, WorkableClient};

#[derive(Parser, Debug)]
#[command(name = "workable")]
#[command(about = "Query job postings from the Workable API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/workable/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Workable subdomain, overriding the config file
  #[arg(short, long, global = true)]
  subdomain: Option<String>,

  /// Write logs to this file instead of stderr
  #[arg(long, global = true)]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List jobs
  Jobs {
    /// Query parameter, e.g. -p state=published (repeatable, order matters)
    #[arg(short, long = "param", value_parser = QueryParams::parse_pair)]
    params: Vec<(String, String)>,
  },
  /// Show a single job by shortcode
  Job {
    shortcode: String,
    #[arg(short, long = "param", value_parser = QueryParams::parse_pair)]
    params: Vec<(String, String)>,
  },
  /// List jobs with full details (one request per job)
  FullJobs {
    #[arg(short, long = "param", value_parser = QueryParams::parse_pair)]
    params: Vec<(String, String)>,
  },
  /// Clear the cache
  Flush,
}

fn init_logging(log_file: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workable=info"));

  match log_file {
    Some(path) => {
      let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
      let name = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("workable.log"));
      let appender = tracing_appender::rolling::never(dir, name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
      Some(guard)
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
      None
    }
  }
}

/// Build the API client. Fails before any request if the subdomain or API key is missing.
fn build_client(config: &Config, namespace: CacheNamespace) -> Result<WorkableClient> {
  Ok(WorkableClient::new(Arc::new(config.transport()?), namespace))
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_logging(args.log_file.as_ref());

  // Load configuration, a --subdomain alone is enough
  let config = Config::resolve(args.config.as_deref(), args.subdomain)?;
  let namespace = config.cache_namespace()?;

  let output = match args.command {
    Command::Flush => {
      namespace.flush()?;
      eprintln!("Cache cleared");
      return Ok(());
    }
    Command::Jobs { params } => {
      let client = build_client(&config, namespace)?;
      let jobs = client.list_jobs(&params.into_iter().collect()).await?;
      serde_json::to_string_pretty(&jobs)?
    }
    Command::Job { shortcode, params } => {
      let client = build_client(&config, namespace)?;
      let job = client
        .get_job(&shortcode, &params.into_iter().collect())
        .await?;
      serde_json::to_string_pretty(&job)?
    }
    Command::FullJobs { params } => {
      let client = build_client(&config, namespace)?;
      let jobs = client.list_full_jobs(&params.into_iter().collect()).await?;
      serde_json::to_string_pretty(&jobs)?
    }
  };

  println!("{}", output);

  Ok(())
}
