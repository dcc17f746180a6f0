//! HTTP-level tests against a mock backend: token acquisition and the
//! retry-once-on-401 behavior, request-body shapes for block/sell, the
//! degraded paths for inconsistent payloads, and the full detail→purchase
//! flow driven through the screen models.

use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use boleteria::models::Seat;
use boleteria::screens::detail::EventDetailModel;
use boleteria::screens::purchase::{PurchaseModel, PurchaseState};
use boleteria::screens::LoadState;
use boleteria::{ApiError, EventsClient, TokenManager};

const SECRET: &str = "secreto-de-prueba";

fn client_for(server: &MockServer) -> Arc<EventsClient> {
    let http = reqwest::Client::new();
    let auth = Arc::new(TokenManager::new(http.clone(), server.uri(), SECRET));
    Arc::new(EventsClient::new(http, server.uri(), auth))
}

async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(body_json(json!({ "secret": SECRET })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(server)
        .await;
}

fn event_json(id: i32) -> serde_json::Value {
    json!({
        "id": id,
        "titulo": "Concierto de prueba",
        "resumen": "Resumen",
        "descripcion": "Descripción",
        "fecha": "2025-06-01T20:00:00",
        "imagen": null,
        "precioEntrada": 25.0,
        "eventoTipo": { "nombre": "Concierto", "descripcion": "Música en vivo" }
    })
}

fn event_detail_json(id: i32) -> serde_json::Value {
    json!({
        "id": id,
        "titulo": "Concierto de prueba",
        "resumen": "Resumen",
        "descripcion": "Descripción",
        "fecha": "2025-06-01T20:00:00",
        "direccion": "Calle Falsa 123",
        "imagen": null,
        "filaAsientos": 2,
        "columnAsientos": 3,
        "precioEntrada": 25.0,
        "eventoTipo": null,
        "integrantes": [
            { "nombre": "Ana", "apellido": "García", "identificacion": "" }
        ]
    })
}

fn sale_json(sale_id: i32, sold_at: &str) -> serde_json::Value {
    json!({
        "ventaId": sale_id,
        "eventoId": 7,
        "fechaVenta": sold_at,
        "resultado": true,
        "descripcion": "Venta registrada",
        "precioVenta": 25.0,
        "cantidadAsientos": 1
    })
}

#[tokio::test]
async fn lists_events_with_lazily_fetched_bearer_token() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/summary"))
        .and(header("authorization", "Bearer t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json(1), event_json(2)])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let events = client.events().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Concierto de prueba");

    // GET requests carry the cache-busting query parameter
    let requests = server.received_requests().await.unwrap();
    let summary = requests
        .iter()
        .find(|r| r.url.path() == "/api/db/events/summary")
        .unwrap();
    assert!(summary.url.query().unwrap_or_default().starts_with("_="));
}

#[tokio::test]
async fn retries_once_with_fresh_token_after_401() {
    let server = MockServer::start().await;

    // First token fetch yields a stale credential, the refetch a valid one.
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "stale" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "fresh" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/summary"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/events/summary"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let events = client.events().await.unwrap();
    assert_eq!(events.len(), 1);

    // exactly two data requests: the 401 and the single retry
    let data_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/db/events/summary")
        .count();
    assert_eq!(data_requests, 2);
}

#[tokio::test]
async fn surfaces_the_401_when_token_refresh_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "stale" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/summary"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token vencido"))
        .expect(1) // refresh failed, so no retry happens
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.events().await.unwrap_err();
    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "token vencido");
        }
        other => panic!("expected ApiError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn proceeds_unauthenticated_when_no_token_can_be_fetched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let events = client.events().await.unwrap();
    assert!(events.is_empty());

    let summary = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/api/db/events/summary")
        .unwrap();
    assert!(!summary.headers.contains_key("authorization"));
}

#[tokio::test]
async fn seats_decode_failure_degrades_to_empty_list_on_detail_screen() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail_json(7)))
        .mount(&server)
        .await;
    // inconsistent payload: asientos is not a list
    Mock::given(method("GET"))
        .and(path("/api/db/events/7/seats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "eventoId": 7, "asientos": "???" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/sales/event/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let model = EventDetailModel::new(client_for(&server), 7);
    model.refresh().await;

    match model.state() {
        LoadState::Ready(data) => {
            assert!(data.seats.is_empty());
            assert_eq!(data.detail.id, 7);
            // the full 2x3 grid still reconciles, all free
            let grid = model.grid().unwrap();
            assert_eq!(grid.seats().len(), 6);
        }
        other => panic!("expected Ready, got {:?}", other),
    }
}

#[tokio::test]
async fn sales_failure_degrades_to_empty_history_on_detail_screen() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail_json(7)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/events/7/seats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "eventoId": 7, "asientos": [] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/sales/event/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let model = EventDetailModel::new(client_for(&server), 7);
    model.refresh().await;

    match model.state() {
        LoadState::Ready(data) => assert!(data.sales.is_empty()),
        other => panic!("expected Ready, got {:?}", other),
    }
}

#[tokio::test]
async fn global_sales_are_deduplicated_and_sorted_newest_first() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/sales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sale_json(1, "2025-01-01T10:00:00"),
            sale_json(2, "2025-03-01T10:00:00"),
            sale_json(1, "2025-01-01T10:00:00"),
            sale_json(3, "2025-02-01T10:00:00"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sales = client.sales().await.unwrap();

    let ids: Vec<i32> = sales.iter().map(|s| s.sale_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert!(sales.windows(2).all(|w| w[0].sold_at >= w[1].sold_at));
}

#[tokio::test]
async fn block_wraps_single_seat_in_list_envelope() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("POST"))
        .and(path("/api/db/block-seats"))
        .and(body_json(json!({
            "eventoId": 7,
            "asientos": [{ "fila": 2, "columna": 3 }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let seat = Seat::virtual_free(2, 3);
    client.block_seat(7, &seat).await.unwrap();
}

#[tokio::test]
async fn blocking_then_selling_sends_buyer_and_ticket_price() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail_json(7)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/events/7/seats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "eventoId": 7, "asientos": [] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/sales/event/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/db/block-seats"))
        .and(body_json(json!({
            "eventoId": 7,
            "asientos": [{ "fila": 1, "columna": 1 }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    // fecha is taken at call time, so only the stable fields are pinned
    Mock::given(method("POST"))
        .and(path("/api/db/sale-seats"))
        .and(body_partial_json(json!({
            "eventoId": 7,
            "precioVenta": 25.0,
            "asientos": [{ "fila": 1, "columna": 1, "persona": "Ana" }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    // detail screen: select a never-materialized seat and block it
    let detail = EventDetailModel::new(client.clone(), 7);
    detail.refresh().await;
    detail.toggle_seat(1, 1);
    let (event, seat) = detail.block_selected().await.expect("block should succeed");
    assert_eq!(seat.id, None); // synthesized free seat
    assert_eq!(event.ticket_price, 25.0);

    // purchase screen: confirm under the buyer's name
    let purchase = PurchaseModel::new(client, event.id, seat.row, seat.column);
    purchase.load().await;
    purchase.set_buyer_name("Ana");
    purchase.confirm().await;
    assert_eq!(purchase.form().state, PurchaseState::Succeeded);
}

#[tokio::test]
async fn failed_block_keeps_selection_and_reports_in_place() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail_json(7)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/events/7/seats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "eventoId": 7, "asientos": [] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/db/sales/event/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/db/block-seats"))
        .respond_with(ResponseTemplate::new(409).set_body_string("asiento ocupado"))
        .mount(&server)
        .await;

    let model = EventDetailModel::new(client_for(&server), 7);
    model.refresh().await;
    model.toggle_seat(1, 2);

    assert!(model.block_selected().await.is_none());
    assert!(model.block_error().is_some());
    // screen stays usable and the selection survives for a retry
    assert!(model.state().is_ready());
    assert_eq!(model.selected(), Some((1, 2)));
}

#[tokio::test]
async fn failed_purchase_allows_retry_without_losing_buyer_name() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail_json(7)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/db/sale-seats"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/db/sale-seats"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let purchase = PurchaseModel::new(client_for(&server), 7, 1, 1);
    purchase.load().await;
    purchase.set_buyer_name("Ana");

    purchase.confirm().await;
    assert_eq!(purchase.form().state, PurchaseState::Failed);
    assert_eq!(purchase.form().buyer_name, "Ana");

    purchase.confirm().await;
    assert_eq!(purchase.form().state, PurchaseState::Succeeded);
}

#[tokio::test]
async fn unknown_event_surfaces_the_api_error() {
    let server = MockServer::start().await;
    mount_token(&server, "t-1").await;

    Mock::given(method("GET"))
        .and(path("/api/db/events/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("evento no encontrado"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.event_detail(999).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
