use std::sync::Mutex;

/// Append-only sink for the live result feed. Rendering is external; the
/// controller only writes formatted lines into it.
pub trait ResultLog: Send + Sync {
    fn append(&self, line: &str);
}

/// In-memory feed, newest line first (the way the page renders it).
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ResultLog for MemoryLog {
    fn append(&self, line: &str) {
        self.lines.lock().unwrap().insert(0, line.to_string());
    }
}

/// Feed sink for the CLI binary. Lines get a receipt timestamp; event lines
/// also carry the backend's own detection timestamp.
pub struct ConsoleLog;

impl ResultLog for ConsoleLog {
    fn append(&self, line: &str) {
        println!("{} | {line}", chrono::Utc::now().format("%H:%M:%S"));
    }
}

/// The confirmation prompt surface. The controller drives it with plain
/// strings; showing, updating, and hiding the actual widget is external.
pub trait PromptScreen: Send + Sync {
    fn show_transcript(&self, transcript: &str);
    fn set_countdown(&self, secs: u32);
    fn clear(&self);
}

/// Discards all prompt rendering. Used by the headless binary.
pub struct NullScreen;

impl PromptScreen for NullScreen {
    fn show_transcript(&self, _transcript: &str) {}
    fn set_countdown(&self, _secs: u32) {}
    fn clear(&self) {}
}
