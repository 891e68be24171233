use clap::{Args, Parser, Subcommand};

use crate::model::record::{Classification, Stage};
use crate::ops::filter::Select;

#[derive(Parser)]
#[command(name = "wt", about = concat!("worktrack v", env!("CARGO_PKG_VERSION"), " - your work, one outline away"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different dashboard directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create worktrack.toml and sample sources in the current directory
    Init(InitArgs),
    /// Show the kanban board
    Board(BoardArgs),
    /// List records matching a filter
    List(FilterArgs),
    /// Show today's checklist
    Todo(TodoArgs),
    /// Show dated records on a month calendar
    Calendar(CalendarArgs),
    /// Show the cumulative completion series
    Burndown(BurndownArgs),
    /// Show board counts and completion
    Stats,
    /// Show recent commits
    Commits,
    /// Show issues of tracked repositories
    Issues(IssuesArgs),
    /// Show scheduled jobs and their last run
    Cron,
    /// Refresh periodically and on source changes
    Watch(WatchArgs),
    /// Manage tracked repositories
    Repo(RepoCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Dashboard name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// GitHub owner for commit and issue feeds
    #[arg(long)]
    pub owner: Option<String>,
    /// Overwrite an existing worktrack.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// View args
// ---------------------------------------------------------------------------

#[derive(Args, Clone)]
pub struct FilterArgs {
    /// Case-insensitive text in title or description
    #[arg(long, short)]
    pub search: Option<String>,
    /// Stage to show (all, backlog, in_progress, done)
    #[arg(long, default_value = "all")]
    pub stage: Select<Stage>,
    /// Record type to show (all, idea, research, build)
    #[arg(long = "type", default_value = "all")]
    pub kind: Select<Classification>,
    /// Include done records older than the archive window
    #[arg(long)]
    pub archived: bool,
}

#[derive(Args)]
pub struct BoardArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Preview moving a card: --move <ID> <STAGE> (repeatable, not saved)
    #[arg(long = "move", num_args = 2, value_names = ["ID", "STAGE"], action = clap::ArgAction::Append)]
    pub moves: Vec<String>,
    /// Preview removing a card by id (repeatable, not saved)
    #[arg(long)]
    pub delete: Vec<usize>,
    /// Preview adding a card with this title (not saved)
    #[arg(long)]
    pub add: Option<String>,
    /// Type of the added card
    #[arg(long, default_value = "idea", requires = "add")]
    pub add_type: Classification,
    /// Column of the added card
    #[arg(long, default_value = "backlog", requires = "add")]
    pub add_stage: Stage,
}

#[derive(Args)]
pub struct TodoArgs {
    /// Preview toggling items by id (repeatable, not saved)
    #[arg(long)]
    pub toggle: Vec<String>,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show, YYYY-MM (default: current month)
    #[arg(long)]
    pub month: Option<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct BurndownArgs {
    /// Number of most recent dates to chart
    #[arg(long, default_value_t = 14)]
    pub days: usize,
}

#[derive(Args)]
pub struct IssuesArgs {
    /// Only this repository
    #[arg(long)]
    pub repo: Option<String>,
    /// Hide closed issues
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (default: dashboard.refresh_secs)
    #[arg(long)]
    pub interval: Option<u64>,
    /// Refresh once, print the report, and exit
    #[arg(long)]
    pub once: bool,
}

// ---------------------------------------------------------------------------
// Repo management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RepoCmd {
    #[command(subcommand)]
    pub action: Option<RepoAction>,
}

#[derive(Subcommand)]
pub enum RepoAction {
    /// List tracked repositories (default)
    List,
    /// Track a repository's issues
    Add(RepoAddArgs),
    /// Stop tracking a repository
    Rm(RepoRmArgs),
}

#[derive(Args)]
pub struct RepoAddArgs {
    /// Repository name under the configured owner
    pub name: String,
    /// Name shown in issue listings
    #[arg(long)]
    pub display_name: Option<String>,
}

#[derive(Args)]
pub struct RepoRmArgs {
    /// Repository name
    pub name: String,
}
