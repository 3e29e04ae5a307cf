use std::{
    collections::VecDeque,
    time::{Duration, SystemTime},
};

/// Number of commands kept for bug reports
pub const COMMAND_LOG_SIZE: usize = 16;

/// Commands older than this are left out of a report
const MAX_AGE: Duration = Duration::from_secs(10 * 60);

const IGNORED_COMMANDS: &[&str] = &[
    "show.bs.tooltip",
    "shown.bs.tooltip",
    "hide.bs.tooltip",
    "hidden.bs.tooltip",
    "editor:display-updated",
    "mousewheel",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct CommandEvent {
    name: String,
    target: String,
    count: u32,
    time: SystemTime,
}

/// Recent editor commands, repeats collapsed into a count
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    events: VecDeque<CommandEvent>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(COMMAND_LOG_SIZE),
        }
    }

    /// Record a dispatched command and the element it was dispatched on
    pub fn record(&mut self, name: &str, target: &str) {
        self.record_at(name, target, SystemTime::now());
    }

    pub fn record_at(&mut self, name: &str, target: &str, time: SystemTime) {
        if name.is_empty() || IGNORED_COMMANDS.contains(&name) {
            return;
        }

        if let Some(last) = self.events.back_mut() {
            if last.name == name {
                last.count += 1;
                last.time = time;
                return;
            }
        }

        if self.events.len() >= COMMAND_LOG_SIZE {
            self.events.pop_front();
        }
        self.events.push_back(CommandEvent {
            name: name.to_string(),
            target: target.to_string(),
            count: 1,
            time,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Fenced block listing the recent commands relative to `now`
    pub fn text(&self, now: SystemTime) -> String {
        let mut lines = vec!["```".to_string()];
        for event in &self.events {
            let Ok(age) = now.duration_since(event.time) else {
                continue;
            };
            if age >= MAX_AGE {
                continue;
            }
            lines.push(format!(
                "{} {} {} ({})",
                format_count(event.count),
                format_age(age),
                event.name,
                event.target
            ));
        }
        lines.push("```".to_string());
        lines.join("\n")
    }
}

fn format_count(count: u32) -> String {
    match count {
        0 | 1 => "    ".to_string(),
        2..=9 => format!("  {count}x"),
        _ => format!(" {count}x"),
    }
}

fn format_age(age: Duration) -> String {
    let minutes = age.as_secs() / 60;
    let tenths = (age.as_millis() % 60_000) / 100;
    format!("-{}:{:02}.{}", minutes, tenths / 10, tenths % 10)
}
