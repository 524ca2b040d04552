//! Timestamped operator output
//!
//! Every pipeline stage reports progress as `[YYYY-MM-DD HH:MM:SS] message`
//! lines on stdout, failures on stderr with the same stamp.

use chrono::Local;

/// Print a timestamped status line to stdout.
pub fn status(message: &str) {
    println!("[{}] {}", now(), message);
}

/// Print a timestamped warning/error line to stderr.
pub fn warn(message: &str) {
    eprintln!("[{}] {}", now(), message);
}

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
