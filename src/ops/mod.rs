pub mod board;
pub mod burndown;
pub mod calendar;
pub mod checklist;
pub mod feeds;
pub mod filter;
