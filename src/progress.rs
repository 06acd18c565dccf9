// src/progress.rs
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

/// A byte-level progress notification for one direction of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub direction: Direction,
    pub loaded: u64,
    /// `None` when the peer did not announce a length.
    pub total: Option<u64>,
}

/// Callback handed to a transport. Invoked synchronously for every chunk.
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

impl Progress {
    pub fn upload(loaded: u64, total: Option<u64>) -> Self {
        Self {
            direction: Direction::Upload,
            loaded,
            total,
        }
    }

    pub fn download(loaded: u64, total: Option<u64>) -> Self {
        Self {
            direction: Direction::Download,
            loaded,
            total,
        }
    }

    /// Human readable message, e.g. "Received 50 of 100 bytes".
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.direction {
            Direction::Upload => "Sent",
            Direction::Download => "Received",
        };
        match self.total {
            Some(total) => write!(f, "{} {} of {} bytes", verb, self.loaded, total),
            None => write!(f, "{} {} bytes", verb, self.loaded),
        }
    }
}
