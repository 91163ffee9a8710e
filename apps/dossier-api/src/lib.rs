pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = dossier_cli::VERSION,
	rename_all = "kebab",
	styles = dossier_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `dossiers.folder` from the config file.
	#[arg(long, short = 'f', value_name = "DIR")]
	pub folder: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let mut config = dossier_config::load(&args.config)?;

	if let Some(folder) = args.folder {
		config.dossiers.folder = folder;
	}

	init_tracing(&config)?;

	let folder = std::path::absolute(&config.dossiers.folder)?;

	if !folder.is_dir() {
		return Err(eyre::eyre!("Search folder not found: {}.", folder.display()));
	}

	config.dossiers.folder = folder;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let state = AppState::new(config.dossiers);
	let dossier_dir = state.service.dossier_dir()?;
	let dossier_count = match dossier_dir.as_deref() {
		Some(dir) => dossier_service::markdown_files(dir)?.len(),
		None => 0,
	};

	tracing::info!(
		folder = %state.service.folder().display(),
		dossier_dir = ?dossier_dir,
		dossier_count,
		"Serving dossiers."
	);

	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(http_listener, app).await?;

	Ok(())
}

fn init_tracing(config: &dossier_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|err| eyre::eyre!(err))?;

	Ok(())
}
