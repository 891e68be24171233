pub mod checklist_parser;
pub mod json_sources;
pub mod outline_parser;

pub use checklist_parser::parse_checklist;
pub use json_sources::{parse_board_json, parse_cron_status, parse_task_list_json};
pub use outline_parser::{infer_done_classification, match_section, parse_outline};
