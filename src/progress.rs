//! Progress reporting for the batch driver.
//!
//! Drawing is best-effort: a failed write to stderr never affects the run.

use std::io::Write;

pub trait Progress {
    fn start(&mut self, total: usize);
    /// Advance by one completed item.
    fn tick(&mut self, label: &str);
    fn finish(&mut self);
}

/// Discards all updates.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _total: usize) {}
    fn tick(&mut self, _label: &str) {}
    fn finish(&mut self) {}
}

/// `[=====>    ] 50% label`, redrawn in place on stderr.
pub struct ConsoleProgress {
    width: usize,
    total: usize,
    current: usize,
}

impl ConsoleProgress {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            total: 0,
            current: 0,
        }
    }

    fn draw(&self, label: &str) {
        let line = render_bar(self.current, self.total, self.width);
        let mut stderr = std::io::stderr().lock();
        // Trailing spaces clear a longer label from the previous draw.
        write!(stderr, "\r{} {:<32}", line, label).ok();
        stderr.flush().ok();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new(40)
    }
}

impl Progress for ConsoleProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.current = 0;
        if total > 0 {
            self.draw("");
        }
    }

    fn tick(&mut self, label: &str) {
        self.current = (self.current + 1).min(self.total);
        self.draw(label);
    }

    fn finish(&mut self) {
        if self.total > 0 {
            writeln!(std::io::stderr()).ok();
        }
    }
}

pub fn render_bar(current: usize, total: usize, width: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        current.min(total) as f64 / total as f64
    };
    let percent = (ratio * 100.0).floor() as usize;
    let complete = (width as f64 * ratio).round() as usize;

    let bar: String = (0..width)
        .map(|i| {
            if i + 1 == complete && complete < width {
                '>'
            } else if i < complete {
                '='
            } else {
                ' '
            }
        })
        .collect();

    format!("[{}] {}%", bar, percent)
}
