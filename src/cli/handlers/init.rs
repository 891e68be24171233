use std::fs;
use std::path::Path;

use chrono::Local;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};

const CONFIG_TEMPLATE: &str = r###"[dashboard]
name = "Work Tracker"
# Seconds between refreshes in `wt watch`
refresh_secs = 300
# Done records dated more than this many days ago are hidden unless --archived
archive_days = 7

[sources]
# Markdown outline with "## <emoji> Section" headers; a .json path is read
# as a board export instead
outline = "IDEAS.md"
# Fetched when the local outline cannot be read
# outline_url = "https://raw.githubusercontent.com/<owner>/<repo>/main/IDEAS.md"
# Markdown checkboxes, or a JSON task list
checklist = "todo.md"
cron_status = "cron-status.json"

[github]
# Commits and issues are read from the public REST API without a token
enabled = false
owner = ""
# api_url = "https://api.github.com"
# commits_repo = "my-repo"
# commit_limit = 10
# issue_limit = 50

# --- Tracked repositories ---
# Add with: wt repo add <name> --display-name "Name"
#
# [[github.repos]]
# name = "my-repo"
# display_name = "My Repo"
"###;

const IDEAS_TEMPLATE: &str = "# Ideas

## 💡 Brainstorm
- Weekly review template - collect wins and blockers

## 🔬 Research
- [{today}] Compare calendar libraries

## 🚧 In Progress
- [{today}] Burndown view - cumulative done vs total

## ✅ Done
- [{today}] Set up worktrack - wt init
";

const TODO_TEMPLATE: &str = "# Today

- [ ] (9:30) Standup
- [ ] [P0] Review open issues
- [x] Write yesterday's notes
";

const CRON_TEMPLATE: &str = r#"{
  "jobs": {
    "morning": { "name": "morning-brief", "time": "08:00" },
    "evening": { "name": "evening-digest", "time": "18:00" }
  }
}
"#;

/// Infer a dashboard name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fill the config template. Values go through toml_edit so quoting is
/// always valid and the template comments survive.
fn render_config(name: &str, owner: Option<&str>) -> Result<String, toml_edit::TomlError> {
    let mut doc: toml_edit::DocumentMut = CONFIG_TEMPLATE.parse()?;
    doc["dashboard"]["name"] = toml_edit::value(name);
    if let Some(owner) = owner {
        doc["github"]["owner"] = toml_edit::value(owner);
        doc["github"]["enabled"] = toml_edit::value(true);
    }
    Ok(doc.to_string())
}

/// Write a sample file unless one already exists. Returns true if written.
fn write_sample(path: &Path, content: &str) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(format!("{} already exists (use --force to overwrite)", CONFIG_FILE).into());
    }

    if let Some(parent) = dir.parent()
        && let Ok(parent_root) = config_io::discover_config(parent)
    {
        eprintln!("Note: parent dashboard found at {}/", parent_root.display());
    }

    let name = args.name.unwrap_or_else(|| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Work Tracker".to_string())
    });

    let config = render_config(&name, args.owner.as_deref())?;
    config_io::atomic_write(&config_path, config.as_bytes())?;

    let today = Local::now().date_naive().to_string();
    let samples = [
        ("IDEAS.md", IDEAS_TEMPLATE.replace("{today}", &today)),
        ("todo.md", TODO_TEMPLATE.to_string()),
        ("cron-status.json", CRON_TEMPLATE.to_string()),
    ];

    println!("Initialized dashboard: {}", name);
    for (file, content) in &samples {
        if write_sample(&dir.join(file), content)? {
            println!("  created {}", file);
        }
    }

    Ok(())
}
