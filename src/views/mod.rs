pub mod counter;
pub mod log;

pub use counter::StatusCounter;
pub use log::{LogEntry, LogState, NotificationsLog};
