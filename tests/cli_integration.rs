//! Integration tests for the `wt` CLI.
//!
//! Each test creates a temp dashboard directory, runs `wt` as a subprocess,
//! and verifies stdout, stderr and/or file contents. GitHub feeds stay
//! disabled so nothing touches the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Local, TimeDelta};
use pretty_assertions::assert_eq;

/// Path to the built `wt` binary.
fn wt_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_wt"))
}

/// Create a dashboard with local sources only.
fn create_test_dashboard(root: &Path) {
    let today = Local::now().date_naive();
    let old = today - TimeDelta::days(30);

    fs::write(
        root.join("worktrack.toml"),
        r#"[dashboard]
name = "Test Board"

[sources]
outline = "IDEAS.md"
checklist = "todo.md"
cron_status = "cron-status.json"

[github]
# feeds stay off in tests
enabled = false
owner = "someone"

[[github.repos]]
name = "tracker"
display_name = "Tracker"
"#,
    )
    .unwrap();

    fs::write(
        root.join("IDEAS.md"),
        format!(
            "\
# Ideas

## 💡 Ideas
- Sentiment tracker - score posts

## 🔬 Research
- [{today}] Explore calendar grids

## 🚧 In Progress
- [{today}] Burndown view

## ✅ Done
- [{today}] Ship board - kanban columns
- [{old}] Old release
"
        ),
    )
    .unwrap();

    fs::write(
        root.join("todo.md"),
        "\
- [x] (9:00) Standup
- [ ] [P2] Tidy notes
- [ ] [P0] Fix login
- [ ] (14:30) Review PR
",
    )
    .unwrap();

    fs::write(
        root.join("cron-status.json"),
        r#"{"jobs": {
            "early": {"name": "early-brief", "time": "00:00", "lastRun": "2026-01-29 00:00", "lastStatus": "ok"},
            "late": {"name": "late-digest", "time": "23:59"}
        }}"#,
    )
    .unwrap();
}

/// Run `wt` with the given args in the given directory, returning (stdout, stderr, success).
fn run_wt(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(wt_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wt");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `wt` expecting success, return stdout.
fn run_wt_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_wt(dir, args);
    if !success {
        panic!("wt {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    }
    stdout
}

/// Run `wt` expecting failure, return stderr.
fn run_wt_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_wt(dir, args);
    if success {
        panic!("wt {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn run_wt_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = args.to_vec();
    full.push("--json");
    let out = run_wt_ok(dir, &full);
    serde_json::from_str(&out).unwrap_or_else(|e| panic!("bad JSON from {:?}: {}\n{}", args, e, out))
}

fn titles(records: &serde_json::Value) -> Vec<String> {
    records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_working_dashboard() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("my-board");
    fs::create_dir(&dir).unwrap();

    let out = run_wt_ok(&dir, &["init"]);
    assert!(out.contains("Initialized dashboard: My Board"));
    for file in ["worktrack.toml", "IDEAS.md", "todo.md", "cron-status.json"] {
        assert!(dir.join(file).exists(), "{} missing", file);
    }

    let board = run_wt_ok(&dir, &["board"]);
    assert!(board.contains("== Backlog (1) =="));

    let err = run_wt_err(&dir, &["init"]);
    assert!(err.contains("already exists"));
}

#[test]
fn test_init_keeps_existing_sources() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("IDEAS.md"), "## Ideas\n- Mine\n").unwrap();

    let out = run_wt_ok(tmp.path(), &["init", "--name", "Mine"]);
    assert!(!out.contains("created IDEAS.md"));
    assert_eq!(fs::read_to_string(tmp.path().join("IDEAS.md")).unwrap(), "## Ideas\n- Mine\n");
}

#[test]
fn test_missing_config_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_wt_err(tmp.path(), &["board"]);
    assert!(err.starts_with("error: no worktrack.toml found"));
}

#[test]
fn test_project_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dash = tmp.path().join("dash");
    fs::create_dir(&dash).unwrap();
    create_test_dashboard(&dash);

    let out = run_wt_ok(tmp.path(), &["-C", "dash", "stats"]);
    assert!(out.contains("Total"));
}

#[test]
fn test_config_found_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());
    let nested = tmp.path().join("notes").join("2026");
    fs::create_dir_all(&nested).unwrap();

    let out = run_wt_ok(&nested, &["list"]);
    assert!(out.contains("Sentiment tracker"));
}

// ---------------------------------------------------------------------------
// Board views
// ---------------------------------------------------------------------------

#[test]
fn test_board_columns() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let out = run_wt_ok(tmp.path(), &["board"]);
    assert!(out.contains("== Backlog (1) =="));
    assert!(out.contains("== In Progress (2) =="));
    // the 30-day-old release is archived by default
    assert!(out.contains("== Done (1) =="));
    assert!(!out.contains("Old release"));

    let json = run_wt_json(tmp.path(), &["board", "--archived"]);
    let columns = json["columns"].as_array().unwrap();
    let stages: Vec<&str> = columns.iter().map(|c| c["stage"].as_str().unwrap()).collect();
    assert_eq!(stages, vec!["backlog", "in_progress", "done"]);
    assert_eq!(titles(&columns[2]["records"]), vec!["Ship board", "Old release"]);
}

#[test]
fn test_board_preview_edits() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let (out, err, ok) = run_wt(
        tmp.path(),
        &["board", "--move", "0", "done", "--delete", "2", "--add", "New card"],
    );
    assert!(ok, "{}", err);
    assert!(err.contains("preview only"));
    assert!(out.contains("== Done (2) =="));
    assert!(!out.contains("Burndown view"));
    assert!(out.contains("New card"));

    // nothing was written back
    let again = run_wt_ok(tmp.path(), &["board"]);
    assert!(again.contains("== Backlog (1) =="));
    assert!(!again.contains("New card"));
}

#[test]
fn test_board_move_unknown_id() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let err = run_wt_err(tmp.path(), &["board", "--move", "99", "done"]);
    assert!(err.contains("record not found: 99"));

    let err = run_wt_err(tmp.path(), &["board", "--move", "0", "someday"]);
    assert!(err.contains("unknown stage"));
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let research = run_wt_json(tmp.path(), &["list", "--type", "research"]);
    assert_eq!(titles(&research), vec!["Explore calendar grids"]);

    let done = run_wt_json(tmp.path(), &["list", "--stage", "done"]);
    assert_eq!(titles(&done), vec!["Ship board"]);

    let all_done = run_wt_json(tmp.path(), &["list", "--stage", "done", "--archived"]);
    assert_eq!(titles(&all_done), vec!["Ship board", "Old release"]);

    let search = run_wt_json(tmp.path(), &["list", "--search", "KANBAN"]);
    assert_eq!(titles(&search), vec!["Ship board"]);

    let out = run_wt_ok(tmp.path(), &["list", "--search", "nothing like this"]);
    assert_eq!(out.trim(), "no matching records");
}

#[test]
fn test_list_json_shape() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let json = run_wt_json(tmp.path(), &["list", "--stage", "backlog"]);
    let record = &json[0];
    assert_eq!(record["id"], 0);
    assert_eq!(record["title"], "Sentiment tracker");
    assert_eq!(record["description"], "score posts");
    assert_eq!(record["type"], "idea");
    assert_eq!(record["stage"], "backlog");
    assert!(record.get("date").is_none());
}

#[test]
fn test_calendar_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let today = Local::now().date_naive();
    let month = today.format("%Y-%m").to_string();
    let json = run_wt_json(tmp.path(), &["calendar", "--month", &month]);
    let days = json["days"].as_array().unwrap();
    let today_entry = days
        .iter()
        .find(|d| d["date"] == today.to_string())
        .expect("today has records");
    assert_eq!(
        titles(&today_entry["records"]),
        vec!["Explore calendar grids", "Burndown view", "Ship board"]
    );

    let err = run_wt_err(tmp.path(), &["calendar", "--month", "2026-13"]);
    assert!(err.contains("invalid month"));
}

#[test]
fn test_calendar_text_has_weekday_header() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let out = run_wt_ok(tmp.path(), &["calendar", "--month", "2026-02"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "February 2026");
    assert!(lines[1].starts_with("Sun"));
}

#[test]
fn test_burndown_and_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let series = run_wt_json(tmp.path(), &["burndown"]);
    let points = series.as_array().unwrap();
    assert_eq!(points.len(), 2);
    let last = &points[1];
    assert_eq!((last["total"].as_u64(), last["done"].as_u64(), last["remaining"].as_u64()), (Some(4), Some(2), Some(2)));

    let recent = run_wt_json(tmp.path(), &["burndown", "--days", "1"]);
    assert_eq!(recent.as_array().unwrap().len(), 1);

    let stats = run_wt_json(tmp.path(), &["stats"]);
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["in_progress"], 2);
    assert_eq!(stats["completion_percent"], 40);
}

// ---------------------------------------------------------------------------
// Checklist and feeds
// ---------------------------------------------------------------------------

#[test]
fn test_todo_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let out = run_wt_ok(tmp.path(), &["todo"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "1/4 done",
            "[ ] 14:30 Review PR",
            "[ ] Fix login [P0]",
            "[ ] Tidy notes [P2]",
            "[x]  9:00 Standup",
        ]
    );
}

#[test]
fn test_todo_toggle_preview() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let json = run_wt_json(tmp.path(), &["todo", "--toggle", "1", "--toggle", "3"]);
    assert_eq!(json["done"], 1);
    assert_eq!(json["total"], 4);
    let last = json["items"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["text"], "Fix login");
    assert_eq!(last["priority"], "P0");

    let err = run_wt_err(tmp.path(), &["todo", "--toggle", "9"]);
    assert!(err.contains("no checklist item '9'"));
}

#[test]
fn test_cron_listing() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let json = run_wt_json(tmp.path(), &["cron"]);
    let jobs = json.as_array().unwrap();
    let ids: Vec<&str> = jobs.iter().map(|j| j["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["early", "late"]);
    assert_eq!(jobs[0]["last_status"], "ok");

    let out = run_wt_ok(tmp.path(), &["cron"]);
    assert!(out.contains("early-brief"));
    assert!(out.contains("(last run 2026-01-29 00:00)"));
}

#[test]
fn test_disabled_github_feeds() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let err = run_wt_err(tmp.path(), &["commits"]);
    assert!(err.contains("commits feed is disabled"));
    let err = run_wt_err(tmp.path(), &["issues"]);
    assert!(err.contains("issues feed is disabled"));
}

#[test]
fn test_watch_once_reports_each_source() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let json = run_wt_json(tmp.path(), &["watch", "--once"]);
    assert_eq!(json["report"]["updated"], serde_json::json!(["outline", "checklist", "cron"]));
    assert_eq!(json["report"]["skipped"], serde_json::json!(["commits", "issues"]));
    assert_eq!(json["report"]["failed"], serde_json::json!([]));
    assert_eq!(json["board"]["total"], 5);
    assert_eq!(json["todo_done"], 1);

    let out = run_wt_ok(tmp.path(), &["watch", "--once"]);
    assert!(out.contains("updated outline, checklist, cron"));
    assert!(out.contains("skipped: commits, issues"));
}

#[test]
fn test_watch_once_survives_broken_source() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());
    fs::write(tmp.path().join("cron-status.json"), "{broken").unwrap();

    let json = run_wt_json(tmp.path(), &["watch", "--once"]);
    assert_eq!(json["report"]["updated"], serde_json::json!(["outline", "checklist"]));
    assert_eq!(json["report"]["failed"][0][0], "cron");
    assert_eq!(json["board"]["total"], 5);
}

// ---------------------------------------------------------------------------
// Repo management
// ---------------------------------------------------------------------------

#[test]
fn test_repo_add_list_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_dashboard(tmp.path());

    let out = run_wt_ok(tmp.path(), &["repo", "add", "notes", "--display-name", "Notes"]);
    assert!(out.contains("tracking notes"));

    let list = run_wt_json(tmp.path(), &["repo", "list"]);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["tracker", "notes"]);

    let err = run_wt_err(tmp.path(), &["repo", "add", "notes"]);
    assert!(err.contains("already tracked"));

    run_wt_ok(tmp.path(), &["repo", "rm", "tracker"]);
    let out = run_wt_ok(tmp.path(), &["repo"]);
    assert_eq!(out.trim(), "notes (Notes)");

    let config = fs::read_to_string(tmp.path().join("worktrack.toml")).unwrap();
    assert!(config.contains("# feeds stay off in tests"));

    let err = run_wt_err(tmp.path(), &["repo", "rm", "tracker"]);
    assert!(err.contains("not tracked"));
}
