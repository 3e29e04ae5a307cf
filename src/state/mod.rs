pub mod card;
pub mod notifications;
pub mod timers;

pub use card::{Card, CardState};
pub use notifications::NotificationState;
pub use timers::{TimerId, TimerKind, TimerQueue};
