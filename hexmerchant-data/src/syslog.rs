use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

pub const SYSLOG_DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, IntoStaticStr)]
pub enum Priority {
    Debug,
    Info,
    Warn,
    Alert,
}

/// Receives every message the simulation wants to show to the player
pub trait Observer {
    fn message(&mut self, text: &str, priority: Priority);
}

/// Bounded message log, oldest messages are dropped first
#[derive(Debug, Clone)]
pub struct Syslog {
    fifo: VecDeque<(Priority, String)>,
    capacity: usize,
}

impl Default for Syslog {
    fn default() -> Self {
        Syslog::with_capacity(SYSLOG_DEFAULT_CAPACITY)
    }
}

impl Syslog {
    pub fn with_capacity(capacity: usize) -> Syslog {
        let capacity = capacity.max(1);
        Syslog {
            fifo: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Priority, String)> {
        self.fifo.iter()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.fifo.iter().any(|(_, msg)| msg.contains(text))
    }

    pub fn remove_all(&mut self) -> Vec<(Priority, String)> {
        self.fifo.drain(..).collect()
    }
}

impl Observer for Syslog {
    fn message(&mut self, text: &str, priority: Priority) {
        match priority {
            Priority::Debug => log::debug!("{text}"),
            Priority::Info => log::info!("{text}"),
            Priority::Warn | Priority::Alert => log::warn!("{text}"),
        }
        if self.fifo.len() == self.capacity {
            self.fifo.pop_front();
        }
        self.fifo.push_back((priority, text.to_string()));
    }
}

#[test]
fn test_syslog_fifo() {
    let mut syslog = Syslog::with_capacity(3);
    assert!(syslog.is_empty());

    syslog.message("first", Priority::Info);
    assert_eq!(syslog.remove_all(), vec![(Priority::Info, "first".to_string())]);
    assert!(syslog.is_empty());

    for n in 0..5 {
        syslog.message(&format!("msg {n}"), Priority::Warn);
        assert_eq!(syslog.len(), (n + 1).min(3));
    }
    assert!(syslog.contains("msg 4"));
    assert!(!syslog.contains("msg 1"));

    let all = syslog.remove_all();
    let texts: Vec<&str> = all.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(texts, vec!["msg 2", "msg 3", "msg 4"]);
}
