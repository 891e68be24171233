use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::record::{Classification, RecordId, Stage, TaskRecord};

/// `[YYYY-MM-DD]` plus any whitespace after it
static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]{4}-[0-9]{2}-[0-9]{2})\]\s*").unwrap());

/// A section header keyword and what its bullets become
#[derive(Debug, Clone, Copy)]
pub struct SectionRule {
    pub keyword: &'static str,
    pub classification: Classification,
    pub stage: Stage,
}

/// Evaluated top to bottom, first match wins. `brainstorm` must stay ahead
/// of `idea`.
pub const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        keyword: "brainstorm",
        classification: Classification::Idea,
        stage: Stage::Backlog,
    },
    SectionRule {
        keyword: "idea",
        classification: Classification::Idea,
        stage: Stage::Backlog,
    },
    SectionRule {
        keyword: "backlog",
        classification: Classification::Idea,
        stage: Stage::Backlog,
    },
    SectionRule {
        keyword: "research",
        classification: Classification::Research,
        stage: Stage::InProgress,
    },
    SectionRule {
        keyword: "product",
        classification: Classification::Build,
        stage: Stage::InProgress,
    },
    SectionRule {
        keyword: "progress",
        classification: Classification::Build,
        stage: Stage::InProgress,
    },
    SectionRule {
        keyword: "done",
        classification: Classification::Build,
        stage: Stage::Done,
    },
    SectionRule {
        keyword: "complete",
        classification: Classification::Build,
        stage: Stage::Done,
    },
];

/// Words that mark a finished item as investigation work
const RESEARCH_KEYWORDS: &[&str] = &["research", "investigat", "explore", "调研", "研究"];

/// Find the rule for a `## ` header's text (case-insensitive substring match).
pub fn match_section(header: &str) -> Option<&'static SectionRule> {
    let lower = header.to_lowercase();
    SECTION_RULES.iter().find(|rule| lower.contains(rule.keyword))
}

/// Re-derive the classification of an item found in a done section from its
/// own text. Only done sections use this; every other section applies its
/// rule's classification unchanged.
pub fn infer_done_classification(text: &str) -> Classification {
    let lower = text.to_lowercase();
    if RESEARCH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Classification::Research
    } else {
        Classification::Build
    }
}

/// Parse an outline document into kanban records.
///
/// The document is a list of `## ` sections, each followed by `- ` bullets:
///
/// ```text
/// ## Brainstorm
/// - [2026-01-29] Sentiment tracker - score posts for signals
/// ## Done
/// - [2026-01-29] Half-hourly market digest
/// ```
///
/// Bullets before the first header or under an unrecognized header are
/// dropped, as are bullets whose title is empty. Never fails.
pub fn parse_outline(source: &str) -> Vec<TaskRecord> {
    let mut records = Vec::new();
    let mut current: Option<&'static SectionRule> = None;

    for line in source.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            current = match_section(header);
            continue;
        }

        let Some(item_text) = strip_bullet(line) else {
            continue;
        };
        let Some(rule) = current else {
            continue;
        };

        if let Some(record) = parse_bullet(item_text, rule, RecordId(records.len())) {
            records.push(record);
        }
    }

    records
}

/// Strip a leading `-` followed by whitespace. A bare `-` counts as an
/// empty bullet.
fn strip_bullet(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Decompose one bullet body: `[date] title - description`.
fn parse_bullet(text: &str, rule: &SectionRule, id: RecordId) -> Option<TaskRecord> {
    let (occurred_on, rest) = match DATE_TOKEN.captures(text) {
        Some(caps) => {
            let token = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok();
            let mut stripped = String::with_capacity(text.len());
            stripped.push_str(&text[..token.start]);
            stripped.push_str(&text[token.end..]);
            (date, stripped)
        }
        None => (None, text.to_string()),
    };

    let (title, description) = match rest.split_once(" - ") {
        Some((head, tail)) => (head.trim(), tail.trim()),
        None => (rest.trim(), ""),
    };
    if title.is_empty() {
        return None;
    }

    let classification = if rule.stage == Stage::Done {
        infer_done_classification(&rest)
    } else {
        rule.classification
    };

    Some(TaskRecord {
        id,
        title: title.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        classification,
        stage: rule.stage,
        occurred_on,
        external_ref: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_outline_sections() {
        let source = "\
# Ideas

## 🌊 Brainstorm (random chat)
- [2026-01-29] Sentiment tracker - score posts for trading signals

## 💡 Idea (worth exploring)

## 📋 Product (ready to build)
- [2026-01-29] Work Tracker - monitor plans and todos

## ✅ Done
- [2026-01-29] Half-hourly market digest
- [2026-01-29] GitHub repo cleanup (clawd + ashare)
";
        let records = parse_outline(source);
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].title, "Sentiment tracker");
        assert_eq!(
            records[0].description.as_deref(),
            Some("score posts for trading signals")
        );
        assert_eq!(records[0].stage, Stage::Backlog);
        assert_eq!(records[0].classification, Classification::Idea);

        assert_eq!(records[1].title, "Work Tracker");
        assert_eq!(records[1].stage, Stage::InProgress);
        assert_eq!(records[1].classification, Classification::Build);

        assert_eq!(records[2].stage, Stage::Done);
        assert_eq!(records[3].title, "GitHub repo cleanup (clawd + ashare)");
        assert_eq!(records[3].occurred_on, date(2026, 1, 29));
    }

    #[test]
    fn test_done_bullet_with_date_and_description() {
        let records = parse_outline("## Done\n- [2026-01-29] Foo - bar baz\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Foo");
        assert_eq!(records[0].description.as_deref(), Some("bar baz"));
        assert_eq!(records[0].occurred_on, date(2026, 1, 29));
    }

    #[test]
    fn test_bullet_without_delimiter() {
        let records = parse_outline("## Idea\n- Simple idea\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Simple idea");
        assert!(records[0].description.is_none());
        assert!(records[0].occurred_on.is_none());
    }

    #[test]
    fn test_empty_title_dropped() {
        let source = "## Idea\n- First\n-    \n- Second\n";
        let records = parse_outline(source);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "Second");
        assert_eq!(records[1].id, RecordId(1));
    }

    #[test]
    fn test_date_only_bullet_dropped() {
        let records = parse_outline("## Idea\n- [2026-01-01]\n- [2026-01-01]   \n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_multiple_delimiters_rejoined() {
        let records = parse_outline("## Idea\n- Title - part one - part two\n");
        assert_eq!(records[0].title, "Title");
        assert_eq!(
            records[0].description.as_deref(),
            Some("part one - part two")
        );
    }

    #[test]
    fn test_only_first_date_taken() {
        let records = parse_outline("## Idea\n- [2026-01-02] Plan [2026-03-04] review\n");
        assert_eq!(records[0].occurred_on, date(2026, 1, 2));
        assert_eq!(records[0].title, "Plan [2026-03-04] review");
    }

    #[test]
    fn test_date_in_middle_is_extracted() {
        let records = parse_outline("## Idea\n- Plan [2026-01-02] review\n");
        assert_eq!(records[0].occurred_on, date(2026, 1, 2));
        assert_eq!(records[0].title, "Plan review");
    }

    #[test]
    fn test_impossible_date_removed_without_value() {
        let records = parse_outline("## Idea\n- [2026-02-30] Leap mistake\n");
        assert_eq!(records[0].title, "Leap mistake");
        assert!(records[0].occurred_on.is_none());
    }

    #[test]
    fn test_non_ascii_digits_are_not_a_date() {
        let records = parse_outline("## Idea\n- [٢٠٢٦-٠١-٢٩] Plan\n");
        assert_eq!(records[0].title, "[٢٠٢٦-٠١-٢٩] Plan");
        assert!(records[0].occurred_on.is_none());
    }

    #[test]
    fn test_bullets_before_first_header_ignored() {
        let records = parse_outline("- orphan\n## Idea\n- kept\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "kept");
    }

    #[test]
    fn test_unknown_section_is_inert() {
        let source = "## Idea\n- one\n## Notes\n- ignored\n## Done\n- two\n";
        let records = parse_outline(source);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[test]
    fn test_brainstorm_takes_precedence_over_idea() {
        let rule = match_section("Brainstorm ideas").unwrap();
        assert_eq!(rule.keyword, "brainstorm");
        let rule = match_section("IDEAS").unwrap();
        assert_eq!(rule.keyword, "idea");
        assert!(match_section("Misc").is_none());
    }

    #[test]
    fn test_header_match_is_case_insensitive_substring() {
        assert_eq!(match_section("🔵 IN PROGRESS").unwrap().stage, Stage::InProgress);
        assert_eq!(match_section("Completed work").unwrap().stage, Stage::Done);
    }

    #[test]
    fn test_checkbox_bullets_are_plain_bullets() {
        let records = parse_outline("## Idea\n- [ ] Not a checkbox here\n- [x] Nor here\n");
        assert_eq!(records[0].title, "[ ] Not a checkbox here");
        assert_eq!(records[1].title, "[x] Nor here");
        assert_eq!(records[1].stage, Stage::Backlog);
    }

    #[test]
    fn test_done_section_infers_research() {
        let source = "\
## Done
- Researched broker APIs - compared three vendors
- Shipped digest
- Market check - 调研 data vendors
";
        let records = parse_outline(source);
        assert_eq!(records[0].classification, Classification::Research);
        assert_eq!(records[1].classification, Classification::Build);
        assert_eq!(records[2].classification, Classification::Research);
    }

    #[test]
    fn test_inference_not_applied_outside_done() {
        let records = parse_outline("## Idea\n- Research broker APIs\n");
        assert_eq!(records[0].classification, Classification::Idea);
    }

    #[test]
    fn test_infer_done_classification() {
        assert_eq!(
            infer_done_classification("Investigate latency spike"),
            Classification::Research
        );
        assert_eq!(
            infer_done_classification("Deploy dashboard"),
            Classification::Build
        );
    }

    #[test]
    fn test_dash_without_space_is_not_a_bullet() {
        let records = parse_outline("## Idea\n-not a bullet\n--- \n- real\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "real");
    }

    #[test]
    fn test_output_never_exceeds_bullet_count() {
        let inputs = [
            "",
            "## Idea\n",
            "## Idea\n-\n- \n-   \n",
            "## Done\n- a\n## ??\n- b\n- c\n",
            "no headers at all\n- x\n",
        ];
        for input in inputs {
            let bullets = input.lines().filter(|l| strip_bullet(l).is_some()).count();
            assert!(parse_outline(input).len() <= bullets, "input: {:?}", input);
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let records = parse_outline("## Idea\n- a\n- b\n## Done\n- c\n");
        let ids: Vec<_> = records.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
