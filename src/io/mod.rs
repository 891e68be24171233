pub mod config_io;
pub mod github;
pub mod refresh;
pub mod source;
pub mod watcher;
