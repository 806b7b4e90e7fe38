//! Race state machine
//!
//! Folds the ordered event stream into per-competitor state and accumulates
//! the annotated event log. One linear pass, single writer over an owned
//! competitor table; the report generator reads the final state afterwards.
//!
//! Every event yields exactly one log line up front. Semantic anomalies
//! (unregistered competitor, hit while off the range, penalty exit without
//! an entry) are absorbed as no-ops after that line is written.

use crate::clock::ClockTime;
use crate::competitor::{Competitor, LapResult, Status};
use crate::config::RaceConfig;
use crate::event::{Event, EventKind};
use crate::report;
use std::collections::BTreeMap;

/// Shots fired per firing-range visit; also the per-stage target count
const SHOTS_PER_VISIT: u32 = 5;

/// Drives the race: consumes events, owns all competitor state
pub struct RaceController {
    config: RaceConfig,
    competitors: BTreeMap<u32, Competitor>,
    log: Vec<String>,
}

impl RaceController {
    /// Create a controller for a race with the given parameters
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            competitors: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    /// Process the full event stream, then disqualify every competitor
    /// with an assigned start time who never actually started
    ///
    /// The sweep runs in ascending competitor ID so output is reproducible.
    pub fn process_events(&mut self, events: &[Event]) {
        for event in events {
            self.process_event(event);
        }

        let unstarted: Vec<u32> = self
            .competitors
            .values()
            .filter(|c| c.planned_start.is_some() && c.actual_start.is_none())
            .map(|c| c.id)
            .collect();
        for id in unstarted {
            log::debug!("Competitor {} never started, disqualifying", id);
            self.disqualify(id, None);
        }
    }

    /// Apply a single event: log it unconditionally, then dispatch
    pub fn process_event(&mut self, event: &Event) {
        self.log.push(event.log_line());

        match event.kind {
            EventKind::Registered => self.register(event),
            EventKind::StartTimeSet => self.set_planned_start(event),
            // Log only, no state change
            EventKind::OnStartLine => {}
            EventKind::Started => self.start(event),
            EventKind::OnFiringRange => {
                self.enter_firing_range(event.competitor, event.payload_number())
            }
            EventKind::TargetHit => self.record_hit(event.competitor),
            EventKind::LeftFiringRange => self.leave_firing_range(event.competitor),
            EventKind::EnteredPenalty => self.enter_penalty(event.competitor, event.time),
            EventKind::LeftPenalty => self.leave_penalty(event.competitor, event.time),
            EventKind::EndedLap => self.end_lap(event.competitor, event.time),
            EventKind::CannotContinue => self.cannot_continue(event.competitor, &event.payload),
            EventKind::Disqualified => self.disqualify(event.competitor, Some(event.time)),
            // Finish records are synthesized internally; an incoming one is
            // logged and otherwise ignored
            EventKind::Finished => {}
            EventKind::Unknown(code) => {
                log::warn!(
                    "Ignoring unknown event kind {} for competitor {}",
                    code,
                    event.competitor
                );
            }
        }
    }

    /// Annotated event log accumulated so far
    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    /// Joined log text, one line per entry
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }

    /// Final competitor states, keyed by competitor ID
    pub fn competitors(&self) -> &BTreeMap<u32, Competitor> {
        &self.competitors
    }

    /// Race parameters this controller runs under
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Render the final standings for the current state
    pub fn final_report(&self) -> String {
        report::generate_final_report(&self.competitors, &self.config)
    }

    fn register(&mut self, event: &Event) {
        log::debug!("Registering competitor {}", event.competitor);
        self.competitors.insert(
            event.competitor,
            Competitor::new(event.competitor, event.time, self.config.laps),
        );
    }

    /// Look up a competitor, absorbing events for unregistered IDs
    fn competitor_mut(&mut self, id: u32) -> Option<&mut Competitor> {
        let found = self.competitors.get_mut(&id);
        if found.is_none() {
            log::debug!("Ignoring event for unregistered competitor {}", id);
        }
        found
    }

    fn set_planned_start(&mut self, event: &Event) {
        let Some(competitor) = self.competitor_mut(event.competitor) else {
            return;
        };
        match ClockTime::parse(&event.payload) {
            Ok(time) => competitor.planned_start = Some(time),
            Err(_) => log::debug!(
                "Ignoring unparseable start time {:?} for competitor {}",
                event.payload,
                event.competitor
            ),
        }
    }

    fn start(&mut self, event: &Event) {
        let Some(competitor) = self.competitor_mut(event.competitor) else {
            return;
        };
        competitor.actual_start = Some(event.time);
    }

    fn enter_firing_range(&mut self, id: u32, range: u32) {
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        competitor.on_firing_range = true;
        competitor.ranges_visited.insert(range);
    }

    fn record_hit(&mut self, id: u32) {
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        // Hits only count while on the range; stray hit events are absorbed
        if competitor.on_firing_range {
            competitor.hits += 1;
        }
    }

    fn leave_firing_range(&mut self, id: u32) {
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        competitor.on_firing_range = false;
        // A visit is always a full magazine, independent of hits scored
        competitor.shots += SHOTS_PER_VISIT;
    }

    fn enter_penalty(&mut self, id: u32, time: ClockTime) {
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        competitor.penalty_entered_at = Some(time);
        competitor.visited_penalty = true;
    }

    fn leave_penalty(&mut self, id: u32, time: ClockTime) {
        let penalty_len = self.config.penalty_len;
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        let Some(entered_at) = competitor.penalty_entered_at.take() else {
            log::debug!("Competitor {} left the penalty loop without entering it", id);
            return;
        };

        competitor.penalty_time = competitor.penalty_time + time.since(entered_at);

        // Penalty distance is estimated, not measured: five targets per
        // stage completed so far, one loop per miss.
        let missed =
            i64::from(SHOTS_PER_VISIT * competitor.current_lap) - i64::from(competitor.hits);
        let seconds = competitor.penalty_time.num_milliseconds() as f64 / 1000.0;
        competitor.penalty_speed = if seconds > 0.0 {
            missed as f64 * f64::from(penalty_len) / seconds
        } else {
            0.0
        };
    }

    fn end_lap(&mut self, id: u32, time: ClockTime) {
        let lap_len = self.config.lap_len;
        let total_laps = self.config.laps;
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };

        // Lap 1 is timed from the planned start, later laps from the
        // previous lap's end.
        let lap_start = if competitor.current_lap == 1 {
            competitor.planned_start.unwrap_or_default()
        } else {
            competitor
                .laps
                .get(competitor.current_lap as usize - 2)
                .and_then(|slot| slot.as_ref())
                .map(|lap| lap.ended_at)
                .unwrap_or_default()
        };

        let duration = time.since(lap_start);
        let seconds = duration.num_milliseconds() as f64 / 1000.0;
        let speed = if seconds > 0.0 {
            f64::from(lap_len) / seconds
        } else {
            0.0
        };

        let slot = competitor.current_lap as usize - 1;
        if slot < competitor.laps.len() {
            competitor.laps[slot] = Some(LapResult {
                duration,
                speed,
                ended_at: time,
            });
        }

        competitor.current_lap += 1;
        if competitor.current_lap > total_laps {
            self.finish(id, time);
        }
    }

    /// Transition to Finished and append the synthesized log line
    ///
    /// Finishing happens at most once; lap events past the final lap leave
    /// the finish timestamp untouched.
    fn finish(&mut self, id: u32, time: ClockTime) {
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        if competitor.status == Status::Finished {
            return;
        }
        competitor.status = Status::Finished;
        competitor.finished_at = Some(time);

        self.log
            .push(Event::new(time, EventKind::Finished, id).log_line());
    }

    fn cannot_continue(&mut self, id: u32, reason: &str) {
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        competitor.status = Status::NotFinished;
        competitor.dnf_reason = reason.to_string();
    }

    /// Mark a competitor as never having started
    ///
    /// With no explicit timestamp (the end-of-stream sweep) the
    /// disqualification time is synthesized as the planned start plus the
    /// configured start interval, read as an offset from midnight.
    fn disqualify(&mut self, id: u32, time: Option<ClockTime>) {
        let start_delta = self.config.start_delta;
        let Some(competitor) = self.competitor_mut(id) else {
            return;
        };
        competitor.status = Status::NotStarted;

        let time = time.unwrap_or_else(|| {
            competitor
                .planned_start
                .unwrap_or_default()
                .offset_by(start_delta.as_offset())
        });

        self.log
            .push(Event::new(time, EventKind::Disqualified, id).log_line());
    }
}
