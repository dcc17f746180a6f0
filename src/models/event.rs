use serde::{Deserialize, Serialize};

// The wire format keeps the backend's Spanish field names; only the in-memory
// names are translated. Unknown fields are ignored on decode.

/// List-view projection of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumen")]
    pub summary: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    /// ISO-8601 date string as sent by the server.
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "imagen")]
    pub image_url: Option<String>,
    #[serde(rename = "precioEntrada")]
    pub ticket_price: f64,
    #[serde(rename = "eventoTipo")]
    pub event_type: Option<EventType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventType {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// Full event record. The grid dimensions here are authoritative for seat
/// reconciliation: every displayed seat lies in [1, seat_rows] x [1, seat_columns].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub id: i32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumen")]
    pub summary: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "imagen")]
    pub image_url: Option<String>,
    #[serde(rename = "filaAsientos")]
    pub seat_rows: i32,
    #[serde(rename = "columnAsientos")]
    pub seat_columns: i32,
    #[serde(rename = "precioEntrada")]
    pub ticket_price: f64,
    #[serde(rename = "eventoTipo")]
    pub event_type: Option<EventType>,
    #[serde(rename = "integrantes", default)]
    pub members: Vec<Member>,
}

/// Performer / lineup entry. `identification` may be blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "identificacion")]
    pub identification: String,
}
