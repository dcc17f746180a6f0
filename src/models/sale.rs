use serde::{Deserialize, Serialize};

/// A recorded purchase outcome. Created server-side by the sell operation;
/// the client only ever reads these. `sale_price` and `seat_count` are
/// meaningful only when `succeeded` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "ventaId")]
    pub sale_id: i32,
    #[serde(rename = "eventoId")]
    pub event_id: i32,
    /// ISO-8601 timestamp string; string comparison matches chronological order.
    #[serde(rename = "fechaVenta")]
    pub sold_at: String,
    #[serde(rename = "resultado")]
    pub succeeded: bool,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precioVenta")]
    pub sale_price: f64,
    #[serde(rename = "cantidadAsientos")]
    pub seat_count: i32,
}
