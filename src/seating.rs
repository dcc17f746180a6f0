//! seating.rs
//!
//! Sparse-to-dense seat reconciliation.
//!
//! The seats endpoint returns only the seats the server has ever touched;
//! the event's `seat_rows` x `seat_columns` capacity implies the full grid.
//! `SeatGrid::reconcile` merges the two, synthesizing a free seat for every
//! coordinate the server omitted. It is a pure function of its inputs so the
//! grid logic stays testable away from any rendering.

use std::collections::HashMap;
use tracing::warn;

use crate::models::Seat;

/// Display classification of a seat's free-text status.
///
/// Matching is whitespace-trimmed and case-insensitive: "libre" is free,
/// "bloqueado" is blocked, anything else counts as sold. Only `Available`
/// seats are selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    Available,
    Blocked,
    Sold,
}

impl SeatStatus {
    pub fn classify(status: &str) -> Self {
        let status = status.trim();
        if status.eq_ignore_ascii_case("libre") {
            SeatStatus::Available
        } else if status.eq_ignore_ascii_case("bloqueado") {
            SeatStatus::Blocked
        } else {
            SeatStatus::Sold
        }
    }

    pub fn is_available(self) -> bool {
        self == SeatStatus::Available
    }
}

impl Seat {
    pub fn classify(&self) -> SeatStatus {
        SeatStatus::classify(&self.status)
    }
}

/// Dense seat grid: exactly rows x columns seats in row-major order, every
/// coordinate in [1, rows] x [1, columns] present exactly once.
#[derive(Debug, Clone)]
pub struct SeatGrid {
    rows: i32,
    columns: i32,
    seats: Vec<Seat>,
}

impl SeatGrid {
    /// Merges the sparse server seat list against the full logical grid.
    ///
    /// Duplicate coordinates are last-write-wins, loudly: the server gives
    /// no uniqueness guarantee, so each duplicate is logged instead of
    /// silently picked. Out-of-range seats are dropped with a warning to
    /// keep the density invariant.
    pub fn reconcile(rows: i32, columns: i32, sparse: &[Seat]) -> SeatGrid {
        let rows = rows.max(0);
        let columns = columns.max(0);

        let mut by_coord: HashMap<(i32, i32), &Seat> = HashMap::with_capacity(sparse.len());
        for seat in sparse {
            if seat.row < 1 || seat.row > rows || seat.column < 1 || seat.column > columns {
                warn!(
                    "Dropping out-of-range seat {}-{} (grid is {}x{})",
                    seat.row, seat.column, rows, columns
                );
                continue;
            }
            if let Some(previous) = by_coord.insert((seat.row, seat.column), seat) {
                warn!(
                    "Duplicate seat entry at {}-{}: status '{}' overrides '{}'",
                    seat.row, seat.column, seat.status, previous.status
                );
            }
        }

        let mut seats = Vec::with_capacity((rows * columns) as usize);
        for row in 1..=rows {
            for column in 1..=columns {
                let seat = by_coord
                    .get(&(row, column))
                    .map(|s| (*s).clone())
                    .unwrap_or_else(|| Seat::virtual_free(row, column));
                seats.push(seat);
            }
        }

        SeatGrid { rows, columns, seats }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    /// All seats in row-major order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Rows of the grid, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Seat]> {
        self.seats.chunks(self.columns.max(1) as usize)
    }

    pub fn seat_at(&self, row: i32, column: i32) -> Option<&Seat> {
        if row < 1 || row > self.rows || column < 1 || column > self.columns {
            return None;
        }
        let index = (row - 1) * self.columns + (column - 1);
        self.seats.get(index as usize)
    }

    /// Resolves a coordinate to a concrete seat, synthesizing a virtual free
    /// seat for coordinates outside the reconciled grid. The block action
    /// operates on this resolved seat, never on a bare coordinate pair.
    pub fn resolve(&self, row: i32, column: i32) -> Seat {
        self.seat_at(row, column)
            .cloned()
            .unwrap_or_else(|| Seat::virtual_free(row, column))
    }

    pub fn is_available(&self, row: i32, column: i32) -> bool {
        self.seat_at(row, column)
            .map(|seat| seat.classify().is_available())
            .unwrap_or(false)
    }
}
