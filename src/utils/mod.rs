//! Utility functions

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Milliseconds in a duration, as `f64`.
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Wall-clock stopwatch reporting milliseconds.
#[derive(Debug)]
pub struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    /// A stopwatch that is already running.
    pub fn started() -> Self {
        Self { started: Some(Instant::now()) }
    }

    /// Stop and return elapsed milliseconds; `0.0` once already stopped.
    pub fn stop(&mut self) -> f64 {
        self.started.take().map_or(0.0, |start| duration_ms(start.elapsed()))
    }
}

/// Run `f` and return its result with the elapsed milliseconds.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, duration_ms(start.elapsed()))
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stopwatch_stops_once() {
        let mut watch = Stopwatch::started();
        assert!(watch.stop() >= 0.0);
        assert_eq!(watch.stop(), 0.0);
    }

    #[test]
    fn duration_converts_to_milliseconds() {
        assert_eq!(duration_ms(Duration::from_millis(250)), 250.0);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("Logs/nested/run.jsonl");
        ensure_parent_dir(&path).expect("create parents");
        assert!(path.parent().expect("parent").is_dir());
        ensure_parent_dir(Path::new("bare.log")).expect("no parent");
    }
}
