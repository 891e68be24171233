use std::sync::LazyLock;

use regex::Regex;

use crate::model::checklist::{ChecklistItem, Priority};

static CHECKBOX_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+\[([ x])\]\s+(.+)$").unwrap());
static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([0-9]{1,2}:[0-9]{2})\)").unwrap());
static PRIORITY_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(P[012])\]").unwrap());

/// Parse a checkbox list (`- [ ] text` / `- [x] text`) into checklist items.
///
/// An optional `(HH:MM)` token becomes the item's time and an optional
/// `[P0]`..`[P2]` token its priority; both are removed from the text.
/// Other lines are ignored.
pub fn parse_checklist(source: &str) -> Vec<ChecklistItem> {
    let mut items = Vec::new();

    for line in source.lines() {
        let Some(caps) = CHECKBOX_LINE.captures(line.trim_end()) else {
            continue;
        };
        let done = &caps[1] == "x";
        let raw = caps[2].trim();

        let time = TIME_TOKEN.captures(raw).map(|c| c[1].to_string());
        let priority = PRIORITY_TOKEN
            .captures(raw)
            .and_then(|c| Priority::from_tag(&c[1]));

        let text = TIME_TOKEN.replace(raw, "");
        let text = PRIORITY_TOKEN.replace(&text, "");

        items.push(ChecklistItem {
            id: (items.len() + 1).to_string(),
            text: text.trim().to_string(),
            done,
            time,
            priority,
        });
    }

    items
}
