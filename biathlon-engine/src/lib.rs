//! Biathlon Race Log Engine
//!
//! A library for replaying a chronologically ordered stream of timestamped
//! biathlon race events. It folds the stream into per-competitor state and
//! produces two artifacts: an annotated human-readable event log and a
//! final standings report.
//!
//! # Architecture
//!
//! The library owns all race semantics:
//! - Parses event records and the JSON race configuration
//! - Folds events through a single-pass state machine over an owned
//!   competitor table
//! - Ranks competitors and renders the final report under exact
//!   formatting rules
//!
//! The library does NOT:
//! - Read command-line arguments
//! - Decide where output files live or write them
//!
//! All of that is in the application layer (biathlon-cli).
//!
//! # Example Usage
//!
//! ```
//! use biathlon_engine::{ClockTime, Event, EventKind, RaceConfig, RaceController};
//!
//! let config = RaceConfig {
//!     laps: 1,
//!     lap_len: 3651,
//!     penalty_len: 50,
//!     firing_lines: 1,
//!     start: ClockTime::parse("09:30:00").unwrap(),
//!     start_delta: ClockTime::parse("00:00:30").unwrap(),
//! };
//!
//! let events = vec![
//!     Event::parse("[09:05:59.867] 1 1").unwrap(),
//!     Event::parse("[09:15:00.841] 2 1 09:30:00.000").unwrap(),
//!     Event::parse("[09:30:01.005] 4 1").unwrap(),
//! ];
//!
//! let mut controller = RaceController::new(config);
//! controller.process_events(&events);
//!
//! assert_eq!(controller.log_lines().len(), 3);
//! assert_eq!(events[2].kind, EventKind::Started);
//! println!("{}", controller.final_report());
//! ```

// Public modules
pub mod clock;
pub mod competitor;
pub mod config;
pub mod error;
pub mod event;
pub mod race;
pub mod report;

// Re-export main types for convenience
pub use clock::{format_duration, ClockTime};
pub use competitor::{Competitor, LapResult, Status};
pub use config::RaceConfig;
pub use error::{EngineError, Result};
pub use event::{Event, EventKind};
pub use race::RaceController;
pub use report::generate_final_report;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh controller holds no competitors
        let config = RaceConfig {
            laps: 1,
            lap_len: 3651,
            penalty_len: 50,
            firing_lines: 1,
            start: ClockTime::parse("09:30:00").unwrap(),
            start_delta: ClockTime::parse("00:00:30").unwrap(),
        };
        let controller = RaceController::new(config);
        assert!(controller.competitors().is_empty());
        assert!(controller.log_lines().is_empty());
    }
}
