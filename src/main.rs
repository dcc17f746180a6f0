use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boleteria::{
    config::Config,
    screens::{detail::EventDetailModel, events::EventListModel, sales::SalesModel, LoadState},
    seating::SeatStatus,
    EventsClient,
};

// Terminal walk-through of the client: list the events, draw the first
// event's seat map and show the sale history. Stands in for the mobile UI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting boleteria client against {}", config.api.base_url);

    let client = Arc::new(EventsClient::from_config(&config.api).context("Failed to build HTTP client")?);

    let events = EventListModel::new(client.clone());
    events.refresh().await;

    let listed = match events.state() {
        LoadState::Ready(events) => events,
        LoadState::Failed(message) => anyhow::bail!("Could not list events: {}", message),
        LoadState::Loading => unreachable!("refresh has completed"),
    };

    println!("== Eventos ==");
    for event in &listed {
        println!(
            "#{} {} — {} (${:.2})",
            event.id, event.title, event.date, event.ticket_price
        );
    }

    if let Some(first) = listed.first() {
        let detail = EventDetailModel::new(client.clone(), first.id);
        detail.refresh().await;

        if let LoadState::Ready(data) = detail.state() {
            println!(
                "\n== {} — {} x {} asientos ==",
                data.detail.title, data.detail.seat_rows, data.detail.seat_columns
            );
            if let Some(grid) = detail.grid() {
                for row in grid.iter_rows() {
                    let line: String = row
                        .iter()
                        .map(|seat| match seat.classify() {
                            SeatStatus::Available => 'O',
                            SeatStatus::Blocked => 'B',
                            SeatStatus::Sold => 'X',
                        })
                        .collect();
                    println!("{}", line);
                }
            }
            if !data.sales.is_empty() {
                println!("\n== Ventas del evento ==");
                for sale in &data.sales {
                    println!(
                        "venta #{} {} — {}",
                        sale.sale_id,
                        if sale.succeeded { "exitosa" } else { "rechazada" },
                        sale.sold_at
                    );
                }
            }
        }
    }

    let sales = SalesModel::new(client);
    sales.load().await;
    if let LoadState::Ready(sales) = sales.state() {
        println!("\n== Historial de compras ==");
        for sale in sales {
            println!(
                "venta #{} evento {} {} — {}",
                sale.sale_id,
                sale.event_id,
                if sale.succeeded { "exitosa" } else { "rechazada" },
                sale.sold_at
            );
        }
    }

    Ok(())
}
