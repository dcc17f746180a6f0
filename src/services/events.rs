//! events.rs
//!
//! Typed client for the events API. Every operation routes through
//! `TokenManager::execute`, so the retry-once-on-401/403 behavior applies
//! uniformly. GET requests carry a `_=<epoch millis>` query parameter to
//! defeat intermediary caching; the server ignores it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Event, EventDetail, Sale, Seat, SeatsResponse};
use crate::services::auth::TokenManager;

#[derive(Debug, Serialize)]
struct SeatRef {
    #[serde(rename = "fila")]
    row: i32,
    #[serde(rename = "columna")]
    column: i32,
}

// Single-seat requests still use the multi-seat wire shape: a one-element list.
#[derive(Debug, Serialize)]
struct BlockSeatsRequest {
    #[serde(rename = "eventoId")]
    event_id: i32,
    #[serde(rename = "asientos")]
    seats: Vec<SeatRef>,
}

#[derive(Debug, Serialize)]
struct SoldSeat {
    #[serde(rename = "fila")]
    row: i32,
    #[serde(rename = "columna")]
    column: i32,
    #[serde(rename = "persona")]
    buyer: String,
}

#[derive(Debug, Serialize)]
struct SellSeatsRequest {
    #[serde(rename = "eventoId")]
    event_id: i32,
    #[serde(rename = "fecha")]
    date: String,
    #[serde(rename = "precioVenta")]
    sale_price: f64,
    #[serde(rename = "asientos")]
    seats: Vec<SoldSeat>,
}

/// Client for the events backend.
#[derive(Clone)]
pub struct EventsClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<TokenManager>,
}

impl EventsClient {
    /// Builds the shared HTTP client and token manager from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let auth = Arc::new(TokenManager::new(
            http.clone(),
            config.base_url.clone(),
            config.client_secret.clone(),
        ));
        Ok(Self::new(http, config.base_url.clone(), auth))
    }

    pub fn new(http: reqwest::Client, base_url: impl Into<String>, auth: Arc<TokenManager>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            auth,
        }
    }

    // Cache-busting URL for GET endpoints. Regenerated per attempt, which is
    // fine: the server ignores the parameter.
    fn bust(&self, path: &str) -> String {
        format!("{}{}?_={}", self.base_url, path, Utc::now().timestamp_millis())
    }

    fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(ApiError::Decode)
    }

    /// Lists events in server order.
    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        let body = self
            .auth
            .execute(|| self.http.get(self.bust("/api/db/events/summary")))
            .await?;
        let events: Vec<Event> = Self::decode(&body)?;
        debug!("Fetched {} events", events.len());
        Ok(events)
    }

    /// Fetches the full record for one event. Unknown ids surface as
    /// `ApiError::Api` with the server's 404.
    pub async fn event_detail(&self, event_id: i32) -> Result<EventDetail, ApiError> {
        let body = self
            .auth
            .execute(|| self.http.get(self.bust(&format!("/api/db/events/{}", event_id))))
            .await?;
        Self::decode(&body)
    }

    /// Fetches the sparse seat list for an event. The list typically omits
    /// never-touched coordinates; see `seating::SeatGrid` for reconciliation
    /// against the full grid.
    pub async fn seats_for_event(&self, event_id: i32) -> Result<Vec<Seat>, ApiError> {
        let body = self
            .auth
            .execute(|| self.http.get(self.bust(&format!("/api/db/events/{}/seats", event_id))))
            .await?;
        let response: SeatsResponse = Self::decode(&body)?;
        Ok(response.seats)
    }

    /// Marks one seat "Bloqueado" ahead of a sale.
    pub async fn block_seat(&self, event_id: i32, seat: &Seat) -> Result<(), ApiError> {
        let request = BlockSeatsRequest {
            event_id,
            seats: vec![SeatRef { row: seat.row, column: seat.column }],
        };
        info!(
            "Blocking seat {}-{} for event {}",
            seat.row, seat.column, event_id
        );
        self.auth
            .execute(|| {
                self.http
                    .post(format!("{}/api/db/block-seats", self.base_url))
                    .json(&request)
            })
            .await?;
        Ok(())
    }

    /// Records the sale of one seat under the buyer's name. The sale
    /// timestamp is taken now, at confirmation time, not at block time.
    pub async fn sell_seat(
        &self,
        event_id: i32,
        price: f64,
        row: i32,
        column: i32,
        buyer: &str,
    ) -> Result<(), ApiError> {
        let request = SellSeatsRequest {
            event_id,
            date: Utc::now().to_rfc3339(),
            sale_price: price,
            seats: vec![SoldSeat { row, column, buyer: buyer.to_string() }],
        };
        info!(
            "Selling seat {}-{} of event {} to {}",
            row, column, event_id, buyer
        );
        self.auth
            .execute(|| {
                self.http
                    .post(format!("{}/api/db/sale-seats", self.base_url))
                    .json(&request)
            })
            .await?;
        Ok(())
    }

    /// Global sale history, deduplicated by sale id and sorted newest-first.
    /// The server has been observed to return duplicate rows.
    pub async fn sales(&self) -> Result<Vec<Sale>, ApiError> {
        let body = self
            .auth
            .execute(|| self.http.get(self.bust("/api/db/sales")))
            .await?;
        let sales: Vec<Sale> = Self::decode(&body)?;
        Ok(clean_sales(sales))
    }

    /// Sale history for one event, sorted newest-first.
    pub async fn sales_for_event(&self, event_id: i32) -> Result<Vec<Sale>, ApiError> {
        let body = self
            .auth
            .execute(|| self.http.get(self.bust(&format!("/api/db/sales/event/{}", event_id))))
            .await?;
        let mut sales: Vec<Sale> = Self::decode(&body)?;
        sales.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        Ok(sales)
    }
}

// Keep first occurrence per sale id, then order by timestamp descending.
fn clean_sales(sales: Vec<Sale>) -> Vec<Sale> {
    let mut seen = std::collections::HashSet::new();
    let mut cleaned: Vec<Sale> = sales
        .into_iter()
        .filter(|sale| seen.insert(sale.sale_id))
        .collect();
    cleaned.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
    cleaned
}
