pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Failed to read directory at {path:?}.")]
	ReadDir { path: std::path::PathBuf, source: std::io::Error },
	#[error(transparent)]
	Dossier(#[from] dossier_extract::Error),
}
