mod config;
mod errors;
mod github;
mod layout;
mod models;
mod relay;
mod render;
mod routes;
mod state;
mod store;
mod sync;
mod visibility;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::SanityClient;
use crate::sync::{PullSummary, PushOutcome};

#[derive(Parser)]
#[command(name = "portfolio", version, about = "Portfolio resume sync, relay and renderers")]
struct Cli {
    /// Canonical resume file (overrides RESUME_JSON_PATH)
    #[arg(long, global = true)]
    resume: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the webhook relay HTTP server
    Serve,
    /// Upload resume.json to the content store
    Push,
    /// Overwrite resume.json with the content store's copy
    Pull,
    /// Render the static site page
    Site {
        /// Output directory (overrides SITE_OUTPUT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the PDF resume
    Pdf {
        /// Output directory (overrides PDF_OUTPUT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.resume {
        config.resume_path = path;
    }

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Serve => serve(config).await.map_err(|e| {
            error!("Error starting the relay: {e:#}");
            e
        }),
        Command::Push => run_push(&config).await.map_err(|e| {
            error!("Error pushing to the content store: {e}");
            if e.is_upstream_unauthorized() {
                error!("Authentication failed. Check that SANITY_API_TOKEN is set and has write access.");
            }
            anyhow::Error::from(e)
        }),
        Command::Pull => run_pull(&config).await.map_err(|e| {
            error!("Error pulling from the content store: {e}");
            if e.is_upstream_unauthorized() {
                error!("Authentication failed. Check that SANITY_API_TOKEN is set.");
            }
            anyhow::Error::from(e)
        }),
        Command::Site { out } => {
            let out = out.unwrap_or_else(|| config.site_output_dir.clone());
            render_with(&config, |doc| render::render_site(doc, &out)).map_err(|e| {
                error!("Error rendering site: {e}");
                anyhow::Error::from(e)
            })
        }
        Command::Pdf { out } => {
            let out = out.unwrap_or_else(|| config.pdf_output_dir.clone());
            render_with(&config, |doc| render::render_pdf(doc, &out)).map_err(|e| {
                error!("Error generating resume PDF: {e}");
                anyhow::Error::from(e)
            })
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting portfolio relay v{}", env!("CARGO_PKG_VERSION"));

    let port = crate::config::listen_port()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = AppState::from_config(config);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_push(config: &Config) -> Result<(), AppError> {
    info!("Starting push to the content store...");
    let store = SanityClient::new(&config.sanity)?;
    match sync::push(&store, &config.resume_path).await? {
        PushOutcome::Created(receipt) => {
            info!("Created document {}", receipt.document_id)
        }
        PushOutcome::Updated(receipt) => {
            info!("Updated document {}", receipt.document_id)
        }
    }
    info!("Push complete. Edit the resume in the studio from now on.");
    Ok(())
}

async fn run_pull(config: &Config) -> Result<(), AppError> {
    info!("Starting pull from the content store...");
    let store = SanityClient::new(&config.sanity)?;
    let PullSummary {
        jobs,
        projects,
        skills,
        schools,
    } = sync::pull(&store, &config.resume_path).await?;

    info!("Pull complete: {jobs} job(s), {projects} project(s), {skills} skill categories, {schools} school(s)");
    info!(
        "Next: review the diff of {}, commit it and push",
        config.resume_path.display()
    );
    Ok(())
}

fn render_with<F>(config: &Config, render: F) -> Result<(), AppError>
where
    F: FnOnce(&ResumeDocument) -> Result<PathBuf, AppError>,
{
    info!("Reading {}...", config.resume_path.display());
    let document = ResumeDocument::load(&config.resume_path)?;
    let path = render(&document)?;
    info!("Output: {}", path.display());
    Ok(())
}
