use chrono::{DateTime, Local};
use colored::*;
use std::fmt::Display;

pub use crate::{alert_entry, critical_entry, debug_entry, emergency_entry, error_entry, information_entry, notice_entry, warning_entry};

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Information,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    pub fn to_plain_string(&self) -> String {
        match self {
            LogLevel::Debug => "Debug      ".to_string(),
            LogLevel::Information => "Information".to_string(),
            LogLevel::Notice => "Notice     ".to_string(),
            LogLevel::Warning => "Warning    ".to_string(),
            LogLevel::Error => "Error      ".to_string(),
            LogLevel::Critical => "Critical   ".to_string(),
            LogLevel::Alert => "Alert      ".to_string(),
            LogLevel::Emergency => "Emergency  ".to_string(),
        }
    }

    pub fn to_colored_string(&self) -> ColoredString {
        match self {
            LogLevel::Debug => self.to_plain_string().bright_black(),
            LogLevel::Information => self.to_plain_string().bright_blue(),
            LogLevel::Notice => self.to_plain_string().bright_green(),
            LogLevel::Warning => self.to_plain_string().yellow(),
            LogLevel::Error => self.to_plain_string().bright_red(),
            LogLevel::Critical => self.to_plain_string().bright_yellow(),
            LogLevel::Alert => self.to_plain_string().red(),
            LogLevel::Emergency => self.to_plain_string().magenta(),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[derive(Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub position: String,
    pub message: String,
    pub debug_info: String,
}

impl LogEntry {
    pub fn new<T: Into<String>, U: Into<String>, V: Into<String>>(level: LogLevel, position: T, message: U, debug_info: V) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            position: position.into(),
            message: message.into(),
            debug_info: debug_info.into(),
        }
    }

    pub fn to_plain_string(&self) -> String {
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S");
        if self.debug_info.is_empty() {
            format!("{} [{}] {}: {}", timestamp, self.level.to_plain_string(), self.position, self.message)
        } else {
            format!("{} [{}] {}: {}\n{}", timestamp, self.level.to_plain_string(), self.position, self.message, self.debug_info)
        }
    }

    pub fn to_colored_string(&self) -> String {
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S");
        if self.debug_info.is_empty() {
            format!("{} [{}] {}: {}", timestamp, self.level.to_colored_string(), self.position, self.message)
        } else {
            format!("{} [{}] {}: {}\n{}", timestamp, self.level.to_colored_string(), self.position, self.message, self.debug_info)
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

pub fn logging_console(log_entry: LogEntry) {
    println!("{}", log_entry.to_colored_string());
}

#[macro_export]
macro_rules! debug_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Debug, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Debug, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! information_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Information, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Information, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! notice_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Notice, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Notice, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! warning_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Warning, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Warning, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! error_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Error, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Error, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! critical_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Critical, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Critical, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! alert_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Alert, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Alert, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}

#[macro_export]
macro_rules! emergency_entry {
    ($position:expr, $message:expr) => {
        LogEntry::new(LogLevel::Emergency, $position, $message, "")
    };
    ($position:expr, $message:expr, $debug_info:expr) => {
        LogEntry::new(LogLevel::Emergency, $position, $message, format!("{}:{} {}", file!(), line!(), $debug_info))
    };
}
