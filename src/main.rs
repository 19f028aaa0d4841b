use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Outcome};
use crate::commands::Backend;
use crate::config::KeyResolver;
use crate::gateway::ClusterGateway;
use crate::pipeline::{FileStore, Pipeline, SopsEncryptor};

mod app;
mod cli;
mod commands;
mod config;
mod gateway;
mod message;
mod pipeline;
mod secret;
mod session;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazysecret");

    let args = cli::Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    config.apply_args(&args);

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let gateway = ClusterGateway::new(config.kube.kubeconfig.clone(), config.kube.context.clone());
    let pipeline = Pipeline::new(
        Arc::new(FileStore::new(config.output_dir.clone())),
        Arc::new(SopsEncryptor::new(config.sops.binary.clone(), config.sops.config.clone())),
    );
    let backend = Backend::new(Arc::new(gateway), pipeline);

    match App::new(backend, resolver, theme).run().await? {
        Outcome::Saved(path) => {
            info!(path = ?path, "Finished");
            println!("Encrypted secret written to {}", path.display());
        }
        Outcome::Quit => println!("See you later!"),
    }

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazysecret").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazysecret.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
