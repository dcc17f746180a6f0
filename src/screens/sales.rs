use std::sync::{Arc, Mutex};
use tracing::error;

use crate::models::Sale;
use crate::screens::LoadState;
use crate::services::events::EventsClient;

/// State holder for the global sale-history screen. The client already
/// deduplicates by sale id and orders newest-first.
pub struct SalesModel {
    client: Arc<EventsClient>,
    state: Mutex<LoadState<Vec<Sale>>>,
}

impl SalesModel {
    pub fn new(client: Arc<EventsClient>) -> Self {
        Self {
            client,
            state: Mutex::new(LoadState::Loading),
        }
    }

    pub fn state(&self) -> LoadState<Vec<Sale>> {
        self.state.lock().unwrap().clone()
    }

    pub async fn load(&self) {
        *self.state.lock().unwrap() = LoadState::Loading;
        match self.client.sales().await {
            Ok(sales) => {
                *self.state.lock().unwrap() = LoadState::Ready(sales);
            }
            Err(e) => {
                error!("Failed to fetch sale history: {}", e);
                *self.state.lock().unwrap() =
                    LoadState::Failed(format!("Error al cargar el historial: {}", e));
            }
        }
    }
}
