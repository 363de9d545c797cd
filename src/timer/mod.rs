//! Practice session timer
//!
//! A per-user state machine that measures practice time either as a
//! stopwatch or from a manually entered value, and turns it into a new
//! practice session on save.

pub mod clock;
pub mod session_timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session_timer::{SessionTimer, TimerMode, TimerPhase, TimerSnapshot};
