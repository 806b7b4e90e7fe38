//! Per-competitor race state
//!
//! A competitor record is created on registration and mutated by the race
//! controller as events arrive; the report generator reads it afterwards.

use crate::clock::ClockTime;
use chrono::Duration;
use std::collections::BTreeSet;

/// Terminal outcome of a competitor's race
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    /// Still racing, or the stream ended before a terminal event
    #[default]
    InProgress,
    Finished,
    NotStarted,
    NotFinished,
}

impl Status {
    /// Label used for ranking and report rendering
    ///
    /// `InProgress` has no label; the report renders a total time in its
    /// place.
    pub fn label(&self) -> &'static str {
        match self {
            Status::InProgress => "",
            Status::Finished => "Finished",
            Status::NotStarted => "NotStarted",
            Status::NotFinished => "NotFinished",
        }
    }

    /// True once the competitor can no longer return to racing
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::InProgress)
    }
}

/// Timing for one completed main lap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapResult {
    /// Elapsed lap time
    pub duration: Duration,
    /// Average speed over the lap, meters per second
    pub speed: f64,
    /// Timestamp of the lap-ended event that closed this lap
    pub ended_at: ClockTime,
}

/// The mutable per-competitor record
///
/// Lap slots are pre-sized to the configured lap count and fill strictly
/// in lap order; an empty slot means the lap was never reached.
#[derive(Debug, Clone)]
pub struct Competitor {
    pub id: u32,
    pub registered_at: ClockTime,
    /// Start time assigned by the draw
    pub planned_start: Option<ClockTime>,
    /// Timestamp of the started event
    pub actual_start: Option<ClockTime>,
    /// 1-based index of the lap currently being run
    pub current_lap: u32,
    /// One slot per configured lap, filled as laps complete
    pub laps: Vec<Option<LapResult>>,
    /// Accumulated time across all penalty-loop visits
    pub penalty_time: Duration,
    /// Speed computed at the most recent penalty-loop exit
    pub penalty_speed: f64,
    /// Entry timestamp of the currently open penalty-loop visit
    pub penalty_entered_at: Option<ClockTime>,
    /// True once the competitor has entered the penalty loop at all
    pub visited_penalty: bool,
    pub hits: u32,
    pub shots: u32,
    /// Hits only count while this is set
    pub on_firing_range: bool,
    /// Firing-range indices this competitor has visited
    pub ranges_visited: BTreeSet<u32>,
    pub status: Status,
    /// Timestamp of the finish, once Finished
    pub finished_at: Option<ClockTime>,
    /// Reason reported with a cannot-continue event
    pub dnf_reason: String,
}

impl Competitor {
    /// Create a freshly registered competitor with `laps` empty lap slots
    pub fn new(id: u32, registered_at: ClockTime, laps: u32) -> Self {
        Self {
            id,
            registered_at,
            planned_start: None,
            actual_start: None,
            current_lap: 1,
            laps: vec![None; laps as usize],
            penalty_time: Duration::zero(),
            penalty_speed: 0.0,
            penalty_entered_at: None,
            visited_penalty: false,
            hits: 0,
            shots: 0,
            on_firing_range: false,
            ranges_visited: BTreeSet::new(),
            status: Status::default(),
            finished_at: None,
            dnf_reason: String::new(),
        }
    }

    /// Completed laps, in lap order
    pub fn completed_laps(&self) -> impl Iterator<Item = &LapResult> {
        self.laps.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_competitor_defaults() {
        let registered_at = ClockTime::parse("09:05:59.867").unwrap();
        let competitor = Competitor::new(7, registered_at, 3);

        assert_eq!(competitor.id, 7);
        assert_eq!(competitor.registered_at, registered_at);
        assert_eq!(competitor.current_lap, 1);
        assert_eq!(competitor.laps.len(), 3);
        assert!(competitor.laps.iter().all(Option::is_none));
        assert_eq!(competitor.status, Status::InProgress);
        assert!(!competitor.visited_penalty);
        assert_eq!(competitor.completed_laps().count(), 0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::InProgress.label(), "");
        assert_eq!(Status::Finished.label(), "Finished");
        assert_eq!(Status::NotStarted.label(), "NotStarted");
        assert_eq!(Status::NotFinished.label(), "NotFinished");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!Status::InProgress.is_terminal());
        assert!(Status::Finished.is_terminal());
        assert!(Status::NotStarted.is_terminal());
        assert!(Status::NotFinished.is_terminal());
    }
}
