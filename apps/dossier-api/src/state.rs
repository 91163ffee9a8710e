use std::sync::Arc;

use dossier_config::Dossiers;
use dossier_service::DossierService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DossierService>,
}
impl AppState {
	pub fn new(dossiers: Dossiers) -> Self {
		Self { service: Arc::new(DossierService::new(dossiers)) }
	}
}
