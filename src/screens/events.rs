use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use crate::models::Event;
use crate::screens::LoadState;
use crate::services::events::EventsClient;

/// State holder for the event list screen.
pub struct EventListModel {
    client: Arc<EventsClient>,
    state: Mutex<LoadState<Vec<Event>>>,
}

impl EventListModel {
    pub fn new(client: Arc<EventsClient>) -> Self {
        Self {
            client,
            state: Mutex::new(LoadState::Loading),
        }
    }

    pub fn state(&self) -> LoadState<Vec<Event>> {
        self.state.lock().unwrap().clone()
    }

    /// Reloads the event list, preserving server order.
    pub async fn refresh(&self) {
        *self.state.lock().unwrap() = LoadState::Loading;
        match self.client.events().await {
            Ok(events) => {
                debug!("Loaded {} events", events.len());
                *self.state.lock().unwrap() = LoadState::Ready(events);
            }
            Err(e) => {
                error!("Failed to fetch events: {}", e);
                *self.state.lock().unwrap() = LoadState::Failed(e.to_string());
            }
        }
    }
}
