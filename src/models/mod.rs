pub mod event;
pub mod sale;
pub mod seat;

pub use event::{Event, EventDetail, EventType, Member};
pub use sale::Sale;
pub use seat::{Seat, SeatsResponse};
