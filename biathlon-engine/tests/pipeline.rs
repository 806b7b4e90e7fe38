//! End-to-end pipeline tests: configuration and event files in, exact log
//! and report text out.

use biathlon_engine::{event, RaceConfig, RaceController, Status};
use std::io::Write;

fn load_config(json: &str) -> RaceConfig {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    RaceConfig::load_from_file(file.path()).unwrap()
}

fn run(config_json: &str, event_lines: &str) -> RaceController {
    let config = load_config(config_json);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(event_lines.as_bytes()).unwrap();
    let events = event::load_from_file(file.path()).unwrap();

    let mut controller = RaceController::new(config);
    controller.process_events(&events);
    controller
}

#[test]
fn test_single_competitor_who_cannot_continue() {
    let controller = run(
        r#"{
            "laps": 2,
            "lapLen": 3651,
            "penaltyLen": 50,
            "firingLines": 1,
            "start": "09:30:00",
            "startDelta": "00:00:30"
        }"#,
        "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1
[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:34.650] 6 1 2
[09:49:35.937] 6 1 4
[09:49:37.364] 6 1 5
[09:49:38.339] 7 1
[09:49:55.915] 8 1
[09:51:48.391] 9 1
[09:59:03.872] 10 1
[09:59:03.872] 11 1 Lost in the forest
",
    );

    assert_eq!(
        controller.log_text(),
        "\
[09:05:59.867] The competitor(1) registered
[09:15:00.841] The start time for the competitor(1) was set by a draw to 09:30:00.000
[09:29:45.734] The competitor(1) is on the start line
[09:30:01.005] The competitor(1) has started
[09:49:31.659] The competitor(1) is on the firing range(1)
[09:49:33.123] The target(1) has been hit by competitor(1)
[09:49:34.650] The target(2) has been hit by competitor(1)
[09:49:35.937] The target(4) has been hit by competitor(1)
[09:49:37.364] The target(5) has been hit by competitor(1)
[09:49:38.339] The competitor(1) left the firing range
[09:49:55.915] The competitor(1) entered the penalty laps
[09:51:48.391] The competitor(1) left the penalty laps
[09:59:03.872] The competitor(1) ended the main lap
[09:59:03.872] The competitor(1) can`t continue: Lost in the forest"
    );

    let competitor = &controller.competitors()[&1];
    assert_eq!(competitor.status, Status::NotFinished);
    assert_eq!(competitor.hits, 4);
    assert_eq!(competitor.shots, 5);

    assert_eq!(
        controller.final_report(),
        "[NotFinished] 1 [{00:29:03.872, 2.093}, {,}] {00:01:52.476, 0.444} 4/5\n"
    );
}

#[test]
fn test_finisher_ranks_ahead_of_swept_competitor() {
    let controller = run(
        r#"{
            "laps": 1,
            "lapLen": 4000,
            "penaltyLen": 150,
            "firingLines": 1,
            "start": "10:00:00",
            "startDelta": "00:01:30"
        }"#,
        "\
[09:55:00.000] 1 1
[09:55:30.000] 1 2
[09:56:00.000] 2 1 10:05:00.000
[09:56:30.000] 2 2 10:06:30.000
[10:05:01.000] 4 1
[10:20:00.000] 10 1
",
    );

    let winner = &controller.competitors()[&1];
    assert_eq!(winner.status, Status::Finished);

    let swept = &controller.competitors()[&2];
    assert_eq!(swept.status, Status::NotStarted);

    // Six input events, one synthesized finish, one synthesized
    // disqualification from the sweep
    assert_eq!(controller.log_lines().len(), 8);
    assert_eq!(
        controller.log_lines()[6],
        "[10:20:00.000] The competitor(1) has finished"
    );
    assert_eq!(
        controller.log_lines()[7],
        "[10:08:00.000] The competitor(2) is disqualified"
    );

    // Total time for the winner double-counts the lap: 15 minutes from
    // planned start to finish, plus the 15-minute lap
    assert_eq!(
        controller.final_report(),
        "\
[00:30:00.000] 1 [{00:15:00.000, 4.444}] {,} 0/0
[NotStarted] 2 [{,}] {,} 0/0
"
    );
}

#[test]
fn test_malformed_event_file_aborts_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[09:05:59.867] 1 1\n[bogus] 2 1\n").unwrap();

    assert!(event::load_from_file(file.path()).is_err());
}
