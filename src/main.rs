// src/main.rs
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{error, info};

mod api;
mod candidate;
mod config;
mod directory;
mod dynamo;
mod logging;
mod s3;
#[cfg(test)]
mod test_utils;

use crate::candidate::Candidate;
use crate::directory::CandidateDirectory;
use crate::dynamo::{FakeTable, Table};
use crate::s3::{FakeStorage, Storage};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind, overrides APP_HOST
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides APP_PORT
        #[arg(long)]
        port: Option<u16>,

        /// Keep records and images in memory instead of AWS
        #[arg(long)]
        in_memory: bool,
    },
    /// Store a candidate, uploading its image when a path is given
    Create {
        #[arg(long)]
        uin: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        major: Option<String>,

        /// Local image file to upload with the record
        #[arg(long, value_name = "PATH")]
        image: Option<String>,
    },
    /// Print every stored candidate
    List,
    /// Upload a local image as a candidate's image
    UploadImage {
        #[arg(long)]
        uin: i64,

        #[arg(long, value_name = "PATH")]
        path: PathBuf,
    },
    /// Print a presigned URL for a candidate's image
    PresignUrl {
        #[arg(long)]
        uin: i64,

        /// Lifetime of the URL in seconds
        #[arg(long, default_value_t = 3600)]
        expires_in: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    let _guard = logging::init_logging(config.logging.as_ref(), cli.verbose)?;
    info!("Recruitment Backend v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Serve {
        host,
        port,
        in_memory,
    } = &cli.command
    {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
        if *in_memory {
            info!("Serving from in-memory stores");
            let directory = CandidateDirectory::new(FakeTable::new("candidates"), FakeStorage::new());
            return finish(api::serve(&config.server, directory).await);
        }
    }

    let directory = match CandidateDirectory::from_config(&config) {
        Ok(directory) => directory,
        Err(e) => {
            error!("Failed to initialize candidate directory: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { .. } => api::serve(&config.server, directory).await,
        command => run_command(&directory, command).await,
    };
    finish(result)
}

fn finish(result: Result<()>) -> Result<()> {
    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
    Ok(())
}

/// Run a one-shot directory command and print its result as JSON
async fn run_command<T, S>(directory: &CandidateDirectory<T, S>, command: Commands) -> Result<()>
where
    T: Table,
    S: Storage,
{
    match command {
        Commands::Create {
            uin,
            name,
            email,
            major,
            image,
        } => {
            let mut candidate = Candidate::new(uin, name, email);
            if let Some(major) = major {
                candidate = candidate.with_major(major);
            }
            if let Some(image) = image {
                candidate = candidate.with_image_url(image);
            }
            print_json(&directory.create_candidate(&candidate).await?)
        }
        Commands::List => print_json(&directory.list_candidates().await?),
        Commands::UploadImage { uin, path } => {
            print_json(&directory.upload_candidate_image(uin, &path).await?)
        }
        Commands::PresignUrl { uin, expires_in } => {
            let url = directory
                .presigned_image_url(uin, Duration::from_secs(expires_in))
                .await?;
            print_json(&serde_json::json!({ "uin": uin, "url": url }))
        }
        Commands::Serve { .. } => anyhow::bail!("serve is not a one-shot command"),
    }
}

fn print_json<V: Serialize>(value: &V) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
