//! purchase.rs
//!
//! State holder for the purchase-confirmation screen. The screen is entered
//! with an already-blocked seat; confirming sends the sale under the buyer's
//! name at the event's ticket price. A failed sale keeps the entered name so
//! the user can retry in place.

use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::models::EventDetail;
use crate::services::events::EventsClient;

/// Outcome of the confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseState {
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

/// Snapshot of the screen's form.
#[derive(Debug, Clone)]
pub struct PurchaseForm {
    pub detail: Option<EventDetail>,
    pub buyer_name: String,
    pub loading: bool,
    pub state: PurchaseState,
}

pub struct PurchaseModel {
    client: Arc<EventsClient>,
    event_id: i32,
    row: i32,
    column: i32,
    form: Mutex<PurchaseForm>,
}

impl PurchaseModel {
    pub fn new(client: Arc<EventsClient>, event_id: i32, row: i32, column: i32) -> Self {
        Self {
            client,
            event_id,
            row,
            column,
            form: Mutex::new(PurchaseForm {
                detail: None,
                buyer_name: String::new(),
                loading: true,
                state: PurchaseState::Idle,
            }),
        }
    }

    pub fn form(&self) -> PurchaseForm {
        self.form.lock().unwrap().clone()
    }

    pub fn seat(&self) -> (i32, i32) {
        (self.row, self.column)
    }

    /// Fetches the event record; it carries the authoritative ticket price.
    pub async fn load(&self) {
        match self.client.event_detail(self.event_id).await {
            Ok(detail) => {
                let mut form = self.form.lock().unwrap();
                form.detail = Some(detail);
                form.loading = false;
            }
            Err(e) => {
                error!("Failed to fetch event {} for purchase: {}", self.event_id, e);
                let mut form = self.form.lock().unwrap();
                form.loading = false;
                form.state = PurchaseState::Failed;
            }
        }
    }

    pub fn set_buyer_name(&self, name: impl Into<String>) {
        self.form.lock().unwrap().buyer_name = name.into();
    }

    /// Sends the sale. A blank buyer name or a missing event record is a
    /// no-op; a confirmation already in flight is not doubled.
    pub async fn confirm(&self) {
        let (detail, buyer) = {
            let mut form = self.form.lock().unwrap();
            if form.state == PurchaseState::InProgress {
                return;
            }
            let Some(detail) = form.detail.clone() else {
                return;
            };
            if form.buyer_name.trim().is_empty() {
                return;
            }
            form.state = PurchaseState::InProgress;
            (detail, form.buyer_name.clone())
        };

        let result = self
            .client
            .sell_seat(detail.id, detail.ticket_price, self.row, self.column, &buyer)
            .await;

        let mut form = self.form.lock().unwrap();
        match result {
            Ok(()) => {
                info!(
                    "Purchase of seat {}-{} for event {} confirmed",
                    self.row, self.column, self.event_id
                );
                form.state = PurchaseState::Succeeded;
            }
            Err(e) => {
                // buyer_name is left untouched so retry does not lose input
                error!("Purchase failed: {}", e);
                form.state = PurchaseState::Failed;
            }
        }
    }
}
