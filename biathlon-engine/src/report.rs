//! Final standings report
//!
//! Ranks the competitors and renders one line per competitor under exact,
//! order-sensitive formatting rules. Pure function of the final state; the
//! controller exposes it as [`crate::race::RaceController::final_report`].

use crate::clock::format_duration;
use crate::competitor::{Competitor, Status};
use crate::config::RaceConfig;
use chrono::Duration;
use std::collections::BTreeMap;

/// Render the final standings, one ranked line per competitor
///
/// Finished competitors come first, ordered by total elapsed time; the
/// rest follow grouped by status label. Competitor ID breaks every tie.
pub fn generate_final_report(
    competitors: &BTreeMap<u32, Competitor>,
    config: &RaceConfig,
) -> String {
    log::debug!(
        "Generating final report for {} competitors over {} laps",
        competitors.len(),
        config.laps
    );

    let mut ranked: Vec<&Competitor> = competitors.values().collect();
    ranked.sort_by_key(|competitor| rank_key(competitor));

    let mut out = String::new();
    for competitor in ranked {
        out.push_str(&format_line(competitor));
        out.push('\n');
    }
    out
}

/// Sort key: Finished first by total time, everyone else grouped by
/// status label, ascending competitor ID at every level
fn rank_key(competitor: &Competitor) -> (u8, &'static str, i64, u32) {
    match competitor.status {
        Status::Finished => (
            0,
            "",
            total_time(competitor).num_milliseconds(),
            competitor.id,
        ),
        status => (1, status.label(), 0, competitor.id),
    }
}

/// Total elapsed time used for ranking and for the leading report field
///
/// The finish-minus-planned-start delta plus the sum of completed lap
/// durations; lap time counts toward the total twice.
fn total_time(competitor: &Competitor) -> Duration {
    let end = competitor.finished_at.unwrap_or_default();
    let planned = competitor.planned_start.unwrap_or_default();
    let mut total = end.since(planned);
    for lap in competitor.completed_laps() {
        total = total + lap.duration;
    }
    total
}

fn format_line(competitor: &Competitor) -> String {
    let heading = match competitor.status {
        Status::InProgress | Status::Finished => {
            format!("[{}]", format_duration(total_time(competitor)))
        }
        status => format!("[{}]", status.label()),
    };

    let laps = competitor
        .laps
        .iter()
        .map(|slot| match slot {
            Some(lap) => format!(
                "{{{}, {:.3}}}",
                format_duration(lap.duration),
                truncate_speed(lap.speed)
            ),
            None => "{,}".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let penalty = if competitor.visited_penalty {
        format!(
            "{{{}, {:.3}}}",
            format_duration(competitor.penalty_time),
            truncate_speed(competitor.penalty_speed)
        )
    } else {
        "{,}".to_string()
    };

    format!(
        "{} {} [{}] {} {}/{}",
        heading, competitor.id, laps, penalty, competitor.hits, competitor.shots
    )
}

/// Truncate to three decimals; speeds are floored, never rounded
fn truncate_speed(speed: f64) -> f64 {
    (speed * 1000.0).floor() / 1000.0
}
