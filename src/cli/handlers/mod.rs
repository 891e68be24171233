mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::refresh::{Dashboard, LiveSources, RefreshReport, Sources};
use crate::io::watcher::SourceWatcher;
use crate::model::config::{DashboardConfig, RepoConfig};
use crate::model::feed::IssueState;
use crate::model::record::{RecordId, Stage, TaskRecord};
use crate::ops::board::{self, Board};
use crate::ops::burndown::{board_stats, burndown};
use crate::ops::calendar::{group_by_date, month_grid};
use crate::ops::checklist;
use crate::ops::feeds::cron_slot;
use crate::ops::filter::{FilterParams, filter_records};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let start = start_dir(cli.project_dir.as_deref())?;

    match cli.command {
        // Init and repo management work on the config file alone
        Commands::Init(args) => cmd_init(args, &start),
        Commands::Repo(args) => cmd_repo(args, &start, json),

        cmd => {
            let ctx = Context::load(&start)?;
            match cmd {
                Commands::Board(args) => cmd_board(&ctx, args, json),
                Commands::List(args) => cmd_list(&ctx, args, json),
                Commands::Todo(args) => cmd_todo(&ctx, args, json),
                Commands::Calendar(args) => cmd_calendar(&ctx, args, json),
                Commands::Burndown(args) => cmd_burndown(&ctx, args, json),
                Commands::Stats => cmd_stats(&ctx, json),
                Commands::Commits => cmd_commits(&ctx, json),
                Commands::Issues(args) => cmd_issues(&ctx, args, json),
                Commands::Cron => cmd_cron(&ctx, json),
                Commands::Watch(args) => cmd_watch(&ctx, args, json),
                Commands::Init(_) | Commands::Repo(_) => unreachable!("handled above"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory to start config discovery from: `-C` or the working directory.
fn start_dir(project_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match project_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

/// A discovered dashboard: its config and live sources
struct Context {
    sources: LiveSources,
}

impl Context {
    fn load(start: &Path) -> Result<Context, Box<dyn std::error::Error>> {
        let root = config_io::discover_config(start)?;
        let (config, _doc) = config_io::read_config(&root)?;
        tracing::debug!(root = %root.display(), "loaded config");
        let sources = LiveSources::new(&root, config)?;
        Ok(Context { sources })
    }

    fn config(&self) -> &DashboardConfig {
        self.sources.config()
    }

    fn filter_params(&self, args: &FilterArgs) -> FilterParams {
        FilterParams {
            search: args.search.clone().unwrap_or_default(),
            stage: args.stage,
            classification: args.kind,
            show_archived: args.archived,
            archive_days: self.config().dashboard.archive_days,
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_record_id(s: &str) -> Result<RecordId, String> {
    s.parse()
        .map(RecordId)
        .map_err(|_| format!("invalid record id '{}'", s))
}

/// `YYYY-MM` to (year, month)
fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{}' (expected YYYY-MM)", s))?;
    Ok((date.year(), date.month()))
}

// ---------------------------------------------------------------------------
// Board views
// ---------------------------------------------------------------------------

/// Apply --move/--delete/--add to the loaded board. Returns true if
/// anything changed.
fn apply_previews(board: &mut Board, args: &BoardArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let mut changed = false;
    for pair in args.moves.chunks(2) {
        let [id, stage] = pair else {
            return Err("--move takes an id and a stage".into());
        };
        board.move_record(parse_record_id(id)?, stage.parse::<Stage>()?)?;
        changed = true;
    }
    for id in &args.delete {
        board.delete_record(RecordId(*id))?;
        changed = true;
    }
    if let Some(title) = &args.add {
        let id = board.add_record(title, None, args.add_type, args.add_stage)?;
        tracing::debug!(%id, "added preview card");
        changed = true;
    }
    Ok(changed)
}

fn cmd_board(ctx: &Context, args: BoardArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = Board::new(ctx.sources.outline()?);
    let previewed = apply_previews(&mut board, &args)?;

    let params = ctx.filter_params(&args.filter);
    let visible = filter_records(board.records(), &params, Local::now().naive_local());
    let columns = board::columns(&visible);

    if json {
        print_json(&board_to_json(&columns))?;
    } else {
        print_lines(&format_board(&columns));
        if previewed {
            eprintln!("(preview only: board changes are not saved)");
        }
    }
    Ok(())
}

fn cmd_list(ctx: &Context, args: FilterArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = ctx.sources.outline()?;
    let params = ctx.filter_params(&args);
    let visible = filter_records(&records, &params, Local::now().naive_local());

    if json {
        print_json(&visible)?;
    } else if visible.is_empty() {
        println!("no matching records");
    } else {
        let lines: Vec<String> = visible.iter().map(|r| format_record_line(r)).collect();
        print_lines(&lines);
    }
    Ok(())
}

fn cmd_calendar(ctx: &Context, args: CalendarArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (year, month) = match &args.month {
        Some(m) => parse_month(m)?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };
    let grid = month_grid(year, month).ok_or_else(|| format!("invalid month {}-{:02}", year, month))?;

    let records = ctx.sources.outline()?;
    let params = ctx.filter_params(&args.filter);
    let visible: Vec<&TaskRecord> = filter_records(&records, &params, Local::now().naive_local());
    let index = group_by_date(visible.iter().copied());

    if json {
        print_json(&calendar_to_json(&grid, &index))?;
    } else {
        print_lines(&format_calendar(&grid, &index));
    }
    Ok(())
}

fn cmd_burndown(ctx: &Context, args: BurndownArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = ctx.sources.outline()?;
    let series = burndown(&records);

    if json {
        let start = series.len().saturating_sub(args.days);
        print_json(&series[start..])?;
    } else {
        print_lines(&format_burndown(&series, args.days));
    }
    Ok(())
}

fn cmd_stats(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = ctx.sources.outline()?;
    let stats = board_stats(&records);

    if json {
        print_json(&stats_to_json(&stats))?;
    } else {
        print_lines(&format_stats(&stats));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

fn cmd_todo(ctx: &Context, args: TodoArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut items = ctx.sources.checklist()?;
    for id in &args.toggle {
        if !checklist::toggle(&mut items, id) {
            return Err(format!("no checklist item '{}'", id).into());
        }
    }

    let (done, total) = checklist::summary(&items);
    let sorted = checklist::sort_for_display(&items);

    if json {
        print_json(&TodoJson {
            done,
            total,
            items: sorted,
        })?;
    } else {
        print_lines(&format_checklist(&sorted, done, total));
        if !args.toggle.is_empty() {
            eprintln!("(preview only: checklist changes are not saved)");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

fn cmd_commits(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let commits = ctx.sources.commits()?;
    if json {
        print_json(&commits)?;
    } else if commits.is_empty() {
        println!("no commits");
    } else {
        print_lines(&format_commits(&commits));
    }
    Ok(())
}

fn cmd_issues(ctx: &Context, args: IssuesArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut repos = ctx.sources.issues()?;
    if let Some(name) = &args.repo {
        repos.retain(|r| &r.repo == name);
        if repos.is_empty() {
            return Err(format!("repository '{}' is not tracked", name).into());
        }
    }

    if json {
        if args.open {
            for repo in &mut repos {
                repo.issues.retain(|i| i.state == IssueState::Open);
            }
        }
        print_json(&repos)?;
    } else {
        print_lines(&format_issues(&repos, args.open));
    }
    Ok(())
}

fn cmd_cron(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = ctx.sources.cron()?;
    let now = Local::now().format("%H:%M").to_string();

    if json {
        let out: Vec<CronJobJson> = jobs
            .iter()
            .map(|job| CronJobJson {
                job,
                slot: cron_slot(job, &now),
            })
            .collect();
        print_json(&out)?;
    } else if jobs.is_empty() {
        println!("no scheduled jobs");
    } else {
        print_lines(&format_cron(&jobs, &now));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WatchTickJson<'a> {
    at: String,
    report: &'a RefreshReport,
    board: StatsJson,
    todo_done: usize,
    todo_total: usize,
    commits: usize,
    issues: usize,
    cron_jobs: usize,
}

fn print_tick(dash: &Dashboard, report: &RefreshReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let at = dash
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let stats = board_stats(dash.board.records());
    let (todo_done, todo_total) = checklist::summary(&dash.checklist);
    let issues: usize = dash.issues.iter().map(|r| r.issues.len()).sum();

    if json {
        let tick = WatchTickJson {
            at,
            report,
            board: stats_to_json(&stats),
            todo_done,
            todo_total,
            commits: dash.commits.len(),
            issues,
            cron_jobs: dash.cron.len(),
        };
        // One object per line so the stream can be piped
        println!("{}", serde_json::to_string(&tick)?);
    } else {
        print_lines(&format_refresh_report(report, &at));
        println!(
            "  board {} records ({}% done), todo {}/{}, {} commits, {} issues, {} jobs",
            stats.total,
            stats.completion_percent(),
            todo_done,
            todo_total,
            dash.commits.len(),
            issues,
            dash.cron.len()
        );
    }
    Ok(())
}

fn cmd_watch(ctx: &Context, args: WatchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let secs = args
        .interval
        .unwrap_or(ctx.config().dashboard.refresh_secs)
        .max(1);
    let interval = Duration::from_secs(secs);

    let mut dash = Dashboard::default();
    let report = dash.refresh(&ctx.sources);
    print_tick(&dash, &report, json)?;
    if args.once {
        return Ok(());
    }

    let watcher = match SourceWatcher::start(&ctx.sources.watched_paths()) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watching unavailable, refreshing on the timer only");
            None
        }
    };

    loop {
        let changed = match &watcher {
            Some(w) => w.wait(interval),
            None => {
                std::thread::sleep(interval);
                None
            }
        };
        if let Some(paths) = changed {
            tracing::info!(files = paths.len(), "source changed");
        }
        let report = dash.refresh(&ctx.sources);
        print_tick(&dash, &report, json)?;
    }
}

// ---------------------------------------------------------------------------
// Repo management
// ---------------------------------------------------------------------------

fn cmd_repo(args: RepoCmd, start: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root = config_io::discover_config(start)?;
    let (config, mut doc) = config_io::read_config(&root)?;

    match args.action.unwrap_or(RepoAction::List) {
        RepoAction::List => {
            if json {
                print_json(&config.github.repos)?;
            } else if config.github.repos.is_empty() {
                println!("no tracked repositories");
            } else {
                for repo in &config.github.repos {
                    if repo.display_name() == repo.name {
                        println!("{}", repo.name);
                    } else {
                        println!("{} ({})", repo.name, repo.display_name());
                    }
                }
            }
        }
        RepoAction::Add(add) => {
            let repo = RepoConfig {
                name: add.name,
                display_name: add.display_name,
            };
            if !config_io::add_repo(&mut doc, &repo) {
                return Err(format!("repository '{}' is already tracked", repo.name).into());
            }
            config_io::write_config(&root, &doc)?;
            println!("tracking {}", repo.name);
        }
        RepoAction::Rm(rm) => {
            if !config_io::remove_repo(&mut doc, &rm.name) {
                return Err(format!("repository '{}' is not tracked", rm.name).into());
            }
            config_io::write_config(&root, &doc)?;
            println!("stopped tracking {}", rm.name);
        }
    }
    Ok(())
}
