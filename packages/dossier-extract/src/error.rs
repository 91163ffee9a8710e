pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read dossier at {path:?}.")]
	ReadDossier { path: std::path::PathBuf, source: std::io::Error },
}
