mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Dossiers, Service};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a valid socket address.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.dossiers.folder.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "dossiers.folder must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	for list in [
		&mut cfg.dossiers.excluded_dirs,
		&mut cfg.dossiers.excluded_substrings,
		&mut cfg.dossiers.skip_prefixes,
	] {
		*list = list
			.iter()
			.map(|item| item.trim())
			.filter(|item| !item.is_empty())
			.map(str::to_string)
			.collect();
	}
}
