//! Event records and the event log wire format
//!
//! One record per line: `[HH:MM:SS.mmm] <kind> <competitor> [payload...]`.
//! Kinds are numeric codes on the wire; the payload is free-form text whose
//! meaning depends on the kind (a firing-range index, a target index, a
//! clock value, or a cannot-continue reason).

use crate::clock::ClockTime;
use crate::error::{EngineError, Result};
use std::fs;
use std::path::Path;

/// Closed set of race event kinds
///
/// Codes 1 through 11 arrive on the wire. Codes 32 and 33 are normally
/// synthesized by the race controller but are accepted as incoming records
/// too. Any other code is carried verbatim so it can be logged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Registered,
    StartTimeSet,
    OnStartLine,
    Started,
    OnFiringRange,
    TargetHit,
    LeftFiringRange,
    EnteredPenalty,
    LeftPenalty,
    EndedLap,
    CannotContinue,
    Disqualified,
    Finished,
    Unknown(u32),
}

impl EventKind {
    /// Map a wire code onto a kind; unrecognized codes are preserved
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => EventKind::Registered,
            2 => EventKind::StartTimeSet,
            3 => EventKind::OnStartLine,
            4 => EventKind::Started,
            5 => EventKind::OnFiringRange,
            6 => EventKind::TargetHit,
            7 => EventKind::LeftFiringRange,
            8 => EventKind::EnteredPenalty,
            9 => EventKind::LeftPenalty,
            10 => EventKind::EndedLap,
            11 => EventKind::CannotContinue,
            32 => EventKind::Disqualified,
            33 => EventKind::Finished,
            other => EventKind::Unknown(other),
        }
    }

    /// Numeric wire code of this kind
    pub fn code(&self) -> u32 {
        match self {
            EventKind::Registered => 1,
            EventKind::StartTimeSet => 2,
            EventKind::OnStartLine => 3,
            EventKind::Started => 4,
            EventKind::OnFiringRange => 5,
            EventKind::TargetHit => 6,
            EventKind::LeftFiringRange => 7,
            EventKind::EnteredPenalty => 8,
            EventKind::LeftPenalty => 9,
            EventKind::EndedLap => 10,
            EventKind::CannotContinue => 11,
            EventKind::Disqualified => 32,
            EventKind::Finished => 33,
            EventKind::Unknown(code) => *code,
        }
    }
}

/// A single timestamped race event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: ClockTime,
    pub kind: EventKind,
    pub competitor: u32,
    pub payload: String,
}

impl Event {
    /// Build an event with no payload
    pub fn new(time: ClockTime, kind: EventKind, competitor: u32) -> Self {
        Self {
            time,
            kind,
            competitor,
            payload: String::new(),
        }
    }

    /// Build an event carrying a payload
    pub fn with_payload(
        time: ClockTime,
        kind: EventKind,
        competitor: u32,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            time,
            kind,
            competitor,
            payload: payload.into(),
        }
    }

    /// Parse one event record line
    ///
    /// The timestamp must sit in square brackets and be exactly 12
    /// characters (`HH:MM:SS.mmm`); kind and competitor must be integers.
    /// Everything after the competitor is joined back into the payload.
    pub fn parse(line: &str) -> Result<Event> {
        let open = line.find('[');
        let close = line.find(']');
        let (open, close) = match (open, close) {
            (Some(open), Some(close)) if open < close => (open, close),
            _ => return Err(EngineError::EventFormat(line.to_string())),
        };

        let time_str = &line[open + 1..close];
        if time_str.len() != 12 {
            return Err(EngineError::EventTime(time_str.to_string()));
        }
        let time = ClockTime::parse(time_str)
            .map_err(|_| EngineError::EventTime(time_str.to_string()))?;

        let mut parts = line[close + 1..].split_whitespace();
        let kind_token = parts
            .next()
            .ok_or_else(|| EngineError::EventParts(line.to_string()))?;
        let competitor_token = parts
            .next()
            .ok_or_else(|| EngineError::EventParts(line.to_string()))?;

        let code: u32 = kind_token
            .parse()
            .map_err(|_| EngineError::EventId(kind_token.to_string()))?;
        let competitor: u32 = competitor_token
            .parse()
            .map_err(|_| EngineError::CompetitorId(competitor_token.to_string()))?;

        let payload = parts.collect::<Vec<_>>().join(" ");

        Ok(Event {
            time,
            kind: EventKind::from_code(code),
            competitor,
            payload,
        })
    }

    /// Payload read as a number, for kinds that carry an index
    ///
    /// Unparseable payloads read as zero, matching the zero-valued
    /// rendering of malformed data elsewhere.
    pub fn payload_number(&self) -> u32 {
        self.payload.parse().unwrap_or(0)
    }

    /// Human-readable sentence for the event log
    pub fn describe(&self) -> String {
        match self.kind {
            EventKind::Registered => format!("The competitor({}) registered", self.competitor),
            EventKind::StartTimeSet => format!(
                "The start time for the competitor({}) was set by a draw to {}",
                self.competitor, self.payload
            ),
            EventKind::OnStartLine => {
                format!("The competitor({}) is on the start line", self.competitor)
            }
            EventKind::Started => format!("The competitor({}) has started", self.competitor),
            EventKind::OnFiringRange => format!(
                "The competitor({}) is on the firing range({})",
                self.competitor,
                self.payload_number()
            ),
            EventKind::TargetHit => format!(
                "The target({}) has been hit by competitor({})",
                self.payload_number(),
                self.competitor
            ),
            EventKind::LeftFiringRange => {
                format!("The competitor({}) left the firing range", self.competitor)
            }
            EventKind::EnteredPenalty => {
                format!("The competitor({}) entered the penalty laps", self.competitor)
            }
            EventKind::LeftPenalty => {
                format!("The competitor({}) left the penalty laps", self.competitor)
            }
            EventKind::EndedLap => {
                format!("The competitor({}) ended the main lap", self.competitor)
            }
            EventKind::CannotContinue => format!(
                "The competitor({}) can`t continue: {}",
                self.competitor, self.payload
            ),
            EventKind::Disqualified => {
                format!("The competitor({}) is disqualified", self.competitor)
            }
            EventKind::Finished => format!("The competitor({}) has finished", self.competitor),
            EventKind::Unknown(code) => format!(
                "Unknown event: {} for competitor({}) with params: {}",
                code, self.competitor, self.payload
            ),
        }
    }

    /// Full log line, `[HH:MM:SS.mmm] <sentence>`
    pub fn log_line(&self) -> String {
        format!("[{}] {}", self.time, self.describe())
    }
}

/// Load an ordered event stream from a file
///
/// Blank lines are skipped. Loading is fail-fast: the first malformed
/// record aborts the whole load, reporting the offending line number.
pub fn load_from_file(path: &Path) -> Result<Vec<Event>> {
    log::info!("Loading events from {:?}", path);

    let data = fs::read_to_string(path)?;
    let mut events = Vec::new();
    for (index, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = Event::parse(line).map_err(|source| EngineError::EventRecord {
            line: index + 1,
            source: Box::new(source),
        })?;
        events.push(event);
    }

    log::info!("Loaded {} events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_without_payload() {
        let event = Event::parse("[09:05:59.867] 1 1").unwrap();
        assert_eq!(event.time.to_string(), "09:05:59.867");
        assert_eq!(event.kind, EventKind::Registered);
        assert_eq!(event.competitor, 1);
        assert!(event.payload.is_empty());
    }

    #[test]
    fn test_parse_with_payload() {
        let event = Event::parse("[09:15:00.841] 2 1 09:30:00.000").unwrap();
        assert_eq!(event.kind, EventKind::StartTimeSet);
        assert_eq!(event.payload, "09:30:00.000");
    }

    #[test]
    fn test_parse_joins_multi_token_payload() {
        let event = Event::parse("[09:59:03.872] 11 1 Lost in the forest").unwrap();
        assert_eq!(event.kind, EventKind::CannotContinue);
        assert_eq!(event.payload, "Lost in the forest");
    }

    #[test]
    fn test_parse_rejects_missing_brackets() {
        assert!(matches!(
            Event::parse("09:05:59.867 1 1"),
            Err(EngineError::EventFormat(_))
        ));
        assert!(matches!(
            Event::parse("]09:05:59.867[ 1 1"),
            Err(EngineError::EventFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_short_timestamp() {
        assert!(matches!(
            Event::parse("[09:05:59.86] 1 1"),
            Err(EngineError::EventTime(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_timestamp() {
        assert!(matches!(
            Event::parse("[99:05:59.867] 1 1"),
            Err(EngineError::EventTime(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(matches!(
            Event::parse("[09:05:59.867] 1"),
            Err(EngineError::EventParts(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_integer_tokens() {
        assert!(matches!(
            Event::parse("[09:05:59.867] x 1"),
            Err(EngineError::EventId(_))
        ));
        assert!(matches!(
            Event::parse("[09:05:59.867] 1 x"),
            Err(EngineError::CompetitorId(_))
        ));
    }

    #[test]
    fn test_kind_codes_round_trip() {
        for code in [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 32, 33, 99] {
            assert_eq!(EventKind::from_code(code).code(), code);
        }
        assert_eq!(EventKind::from_code(12), EventKind::Unknown(12));
    }

    #[test]
    fn test_describe_phrasing() {
        let time = ClockTime::parse("10:00:00.000").unwrap();

        let event = Event::new(time, EventKind::Registered, 3);
        assert_eq!(event.describe(), "The competitor(3) registered");

        let event = Event::with_payload(time, EventKind::StartTimeSet, 3, "10:15:00.000");
        assert_eq!(
            event.describe(),
            "The start time for the competitor(3) was set by a draw to 10:15:00.000"
        );

        let event = Event::with_payload(time, EventKind::TargetHit, 3, "4");
        assert_eq!(event.describe(), "The target(4) has been hit by competitor(3)");

        let event = Event::with_payload(time, EventKind::CannotContinue, 3, "Lost in the forest");
        assert_eq!(
            event.describe(),
            "The competitor(3) can`t continue: Lost in the forest"
        );

        let event = Event::with_payload(time, EventKind::Unknown(42), 3, "extra");
        assert_eq!(
            event.describe(),
            "Unknown event: 42 for competitor(3) with params: extra"
        );
    }

    #[test]
    fn test_log_line_carries_timestamp() {
        let time = ClockTime::parse("09:05:59.867").unwrap();
        let event = Event::new(time, EventKind::Registered, 1);
        assert_eq!(event.log_line(), "[09:05:59.867] The competitor(1) registered");
    }

    #[test]
    fn test_load_from_file_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[09:05:59.867] 1 1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  [09:15:00.841] 2 1 09:30:00.000  ").unwrap();

        let events = load_from_file(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::StartTimeSet);
    }

    #[test]
    fn test_load_from_file_fails_fast_with_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[09:05:59.867] 1 1").unwrap();
        writeln!(file, "not an event").unwrap();

        let err = load_from_file(file.path()).unwrap_err();
        match err {
            EngineError::EventRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
