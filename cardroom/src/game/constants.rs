//! Table-wide constants.

/// Seats at a table. With 8 seats, a full deal consumes
/// 2 * 8 hole cards + 5 board cards = 21 of 52, so the deck
/// can never run dry.
pub const MAX_SEATS: usize = 8;

/// Hole cards dealt to each participant.
pub const HOLE_CARDS: usize = 2;

/// Community cards on a full board.
pub const BOARD_SIZE: usize = 5;

/// Cap on the per-room event log; oldest entries drop first.
pub const LOG_CAP: usize = 50;

/// Length of generated room codes.
pub const ROOM_CODE_LEN: usize = 5;

/// Longest accepted display name; longer input is truncated.
pub const MAX_NAME_LEN: usize = 16;
