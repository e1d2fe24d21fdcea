//! jsdrop CLI: upload a JavaScript bundle and show the result as an alert.
//!
//! Set JSDROP_API_URL (default http://localhost:5000). JSDROP_UPLOAD_PATH,
//! JSDROP_FIELD_NAME and JSDROP_MAX_UPLOAD_SIZE_BYTES override the defaults.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jsdrop_api_client::{AlertPresenter, SelectedFile, UploadClient};
use jsdrop_cli::{init_tracing, TerminalSink};

#[derive(Parser)]
#[command(name = "jsdrop", about = "jsdrop bundle uploader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a .js or .jsx file
    Upload {
        /// Path to the file; omit to submit with nothing selected
        file: Option<PathBuf>,
        /// Override the media type guessed from the extension
        #[arg(long)]
        content_type: Option<String>,
        /// Keep running until the alert is dismissed
        #[arg(long)]
        linger: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = UploadClient::from_env().context(
        "Failed to create upload client. Check JSDROP_API_URL and JSDROP_MAX_UPLOAD_SIZE_BYTES",
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            content_type,
            linger,
        } => {
            let selected = match file {
                Some(path) => {
                    let mut selected = SelectedFile::from_path(&path)?;
                    if let Some(content_type) = content_type {
                        selected = selected.with_content_type(content_type);
                    }
                    Some(selected)
                }
                None => None,
            };

            let presenter = AlertPresenter::new(Arc::new(TerminalSink));
            let (outcome, _) = client.submit(selected.as_ref(), &presenter).await;

            if linger {
                presenter.settled().await;
            }
            drop(presenter);

            if !outcome.is_uploaded() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
