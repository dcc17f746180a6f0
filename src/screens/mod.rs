//! Per-screen state holders.
//!
//! Each screen owns one model that issues at most one network operation per
//! user action and publishes a tagged state for the UI to match on
//! exhaustively. State lives behind a mutex so a rendering loop can read it
//! while an operation is in flight; completions overwrite it last-write-wins.

pub mod detail;
pub mod events;
pub mod purchase;
pub mod sales;

/// Load lifecycle shared by the list-style screens.
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}
