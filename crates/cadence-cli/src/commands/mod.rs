pub mod completions;
pub mod habit;
pub mod reminder;
pub mod watch;
