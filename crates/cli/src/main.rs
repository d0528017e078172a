mod clipboard;
mod config;
mod serve;
mod shell;
mod submit;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::DeciderConfig;

/// Collect a decision, its options, and weighted criteria, then save them.
#[derive(Parser)]
#[command(name = "decider", version, about = "Decision submission workflow")]
struct Cli {
    /// Path to decider.toml (default: $DECIDER_CONFIG, then ./decider.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive decision session
    Session,

    /// Replay a decision file through the workflow and save it
    Submit {
        /// Path to the decision TOML file
        file: PathBuf,
    },

    /// Run the reference save endpoint
    Serve {
        /// Port to listen on (default: serve.port from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

    let config = match DeciderConfig::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Session => {
            if let Err(e) = shell::run_shell(&config) {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        }
        Commands::Submit { file } => cmd_submit(&file, &config),
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.serve.port);
            let rt = runtime();
            if let Err(e) = rt.block_on(serve::start_server(port)) {
                eprintln!("error: server failed: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Logs go to stderr so session output on stdout stays readable.
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_submit(file: &std::path::Path, config: &DeciderConfig) {
    let rt = runtime();
    match rt.block_on(submit::run_submit(file, config)) {
        Ok(status) => println!("{}", status),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
