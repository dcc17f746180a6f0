use serde::{Deserialize, Serialize};

/// Envelope returned by the per-event seats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatsResponse {
    #[serde(rename = "eventoId")]
    pub event_id: i32,
    #[serde(rename = "asientos")]
    pub seats: Vec<Seat>,
}

/// One grid cell's sale status. `id` is absent for seats the server never
/// materialized; the client synthesizes those as free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    #[serde(default)]
    pub id: Option<i64>,
    /// 1-based row.
    #[serde(rename = "fila")]
    pub row: i32,
    /// 1-based column.
    #[serde(rename = "columna")]
    pub column: i32,
    /// Server-defined free text: "libre", "Bloqueado", anything else is sold.
    #[serde(rename = "estado")]
    pub status: String,
}

impl Seat {
    /// A client-synthesized free seat for a coordinate the server omitted.
    pub fn virtual_free(row: i32, column: i32) -> Self {
        Seat {
            id: None,
            row,
            column,
            status: "libre".to_string(),
        }
    }
}
