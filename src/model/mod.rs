pub mod record;
pub mod checklist;
pub mod feed;
pub mod config;

pub use record::*;
pub use checklist::*;
pub use feed::*;
pub use config::*;
