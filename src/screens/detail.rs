//! detail.rs
//!
//! State holder for the event detail screen: the event record, the sparse
//! seat list, the per-event sale history, and the single selected seat
//! coordinate. Seat reconciliation against the full grid happens here, on
//! top of the raw seat list, via `seating::SeatGrid`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use crate::models::{EventDetail, Sale, Seat};
use crate::screens::LoadState;
use crate::seating::SeatGrid;
use crate::services::events::EventsClient;

/// Everything the detail screen renders once loaded.
#[derive(Debug, Clone)]
pub struct DetailData {
    pub detail: EventDetail,
    /// Raw sparse seat list as returned by the server.
    pub seats: Vec<Seat>,
    /// Per-event sales, newest first. Empty when the history could not be
    /// fetched; the rest of the screen still renders.
    pub sales: Vec<Sale>,
}

pub struct EventDetailModel {
    client: Arc<EventsClient>,
    event_id: i32,
    state: Mutex<LoadState<DetailData>>,
    /// Transient (row, column) selection. May point at a coordinate with no
    /// server-side seat record; resolution synthesizes a virtual free seat.
    selected: Mutex<Option<(i32, i32)>>,
    /// In-place error from the last block attempt, kept apart from the load
    /// state so a failed block does not tear down the loaded screen.
    block_error: Mutex<Option<String>>,
    /// Monotonic refresh sequence. A refresh commits its result only if no
    /// newer refresh has started, so a stale response cannot overwrite a
    /// fresher one on rapid re-entry.
    refresh_seq: AtomicU64,
}

impl EventDetailModel {
    pub fn new(client: Arc<EventsClient>, event_id: i32) -> Self {
        Self {
            client,
            event_id,
            state: Mutex::new(LoadState::Loading),
            selected: Mutex::new(None),
            block_error: Mutex::new(None),
            refresh_seq: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> LoadState<DetailData> {
        self.state.lock().unwrap().clone()
    }

    pub fn selected(&self) -> Option<(i32, i32)> {
        *self.selected.lock().unwrap()
    }

    pub fn block_error(&self) -> Option<String> {
        self.block_error.lock().unwrap().clone()
    }

    /// Reconciled dense grid for rendering, or `None` before the first load.
    pub fn grid(&self) -> Option<SeatGrid> {
        match &*self.state.lock().unwrap() {
            LoadState::Ready(data) => Some(SeatGrid::reconcile(
                data.detail.seat_rows,
                data.detail.seat_columns,
                &data.seats,
            )),
            _ => None,
        }
    }

    /// Fetches the event record, its seats and its sale history.
    ///
    /// The event record is load-bearing: failure puts the screen in
    /// `Failed`. A seat payload that does not decode degrades to an empty
    /// seat list (the backend's seat format is known to be inconsistent),
    /// and any sale-history failure degrades to an empty history.
    pub async fn refresh(&self) {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let detail = match self.client.event_detail(self.event_id).await {
            Ok(detail) => detail,
            Err(e) => {
                error!("Failed to fetch detail for event {}: {}", self.event_id, e);
                self.commit(seq, LoadState::Failed(e.to_string()));
                return;
            }
        };

        let seats = match self.client.seats_for_event(self.event_id).await {
            Ok(seats) => seats,
            Err(e) if e.is_decode() => {
                warn!(
                    "Seat payload for event {} did not decode, defaulting to empty list: {}",
                    self.event_id, e
                );
                Vec::new()
            }
            Err(e) => {
                error!("Failed to fetch seats for event {}: {}", self.event_id, e);
                self.commit(seq, LoadState::Failed(e.to_string()));
                return;
            }
        };

        let sales = match self.client.sales_for_event(self.event_id).await {
            Ok(sales) => sales,
            Err(e) => {
                warn!("Failed to fetch sale history for event {}: {}", self.event_id, e);
                Vec::new()
            }
        };

        debug!(
            "Refreshed event {}: {} seats, {} sales",
            self.event_id,
            seats.len(),
            sales.len()
        );
        self.commit(seq, LoadState::Ready(DetailData { detail, seats, sales }));
    }

    // Last refresh to *start* wins; a completion from a superseded refresh
    // is discarded.
    fn commit(&self, seq: u64, value: LoadState<DetailData>) {
        if self.refresh_seq.load(Ordering::SeqCst) != seq {
            debug!("Discarding superseded refresh #{} for event {}", seq, self.event_id);
            return;
        }
        *self.state.lock().unwrap() = value;
    }

    /// Toggles the selected coordinate. Selecting the current selection
    /// clears it; seats that are not available are not selectable and the
    /// call is a no-op.
    pub fn toggle_seat(&self, row: i32, column: i32) {
        let selectable = match self.grid() {
            Some(grid) => grid.is_available(row, column),
            None => false,
        };
        if !selectable {
            return;
        }
        let mut selected = self.selected.lock().unwrap();
        *selected = if *selected == Some((row, column)) {
            None
        } else {
            Some((row, column))
        };
    }

    /// Blocks the currently selected seat ahead of purchase.
    ///
    /// The selection is resolved against the reconciled grid first, so the
    /// request always carries a concrete seat (virtual free if the server
    /// never materialized it). On success returns the event and seat for the
    /// purchase-confirmation screen; on failure records an in-place error
    /// and keeps the selection so the user can retry.
    pub async fn block_selected(&self) -> Option<(EventDetail, Seat)> {
        let (row, column) = (*self.selected.lock().unwrap())?;

        let (detail, seat) = match &*self.state.lock().unwrap() {
            LoadState::Ready(data) => {
                let grid = SeatGrid::reconcile(
                    data.detail.seat_rows,
                    data.detail.seat_columns,
                    &data.seats,
                );
                (data.detail.clone(), grid.resolve(row, column))
            }
            other => {
                error!(
                    "Block requested for event {} while screen is {:?}",
                    self.event_id,
                    std::mem::discriminant(other)
                );
                return None;
            }
        };

        *self.block_error.lock().unwrap() = None;

        match self.client.block_seat(self.event_id, &seat).await {
            Ok(()) => {
                info!(
                    "Seat {}-{} blocked for event {}",
                    seat.row, seat.column, self.event_id
                );
                Some((detail, seat))
            }
            Err(e) => {
                error!("Failed to block seat: {}", e);
                *self.block_error.lock().unwrap() =
                    Some("Error al bloquear el asiento. Inténtelo de nuevo.".to_string());
                None
            }
        }
    }
}
