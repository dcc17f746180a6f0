pub mod config;
pub mod error;
pub mod models;
pub mod screens;
pub mod seating;
pub mod services;

pub use error::ApiError;
pub use seating::{SeatGrid, SeatStatus};
pub use services::auth::TokenManager;
pub use services::events::EventsClient;
