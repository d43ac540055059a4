//! Progress bars counting decided cells while a batch of samples is solved

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Progress of one solve: cells decided out of cells total
#[derive(Clone, Debug, Default)]
struct FileState {
    name: String,
    decided: usize,
    cells: usize,
}

/// One bar per solve, plus a files bar for larger batches
///
/// Shows one bar per file for small batches. Past
/// [`MAX_INDIVIDUAL_PROGRESS_BARS`] files a batch bar is added and only the
/// most recent files keep individual bars.
pub struct ProgressManager {
    bars: MultiProgress,
    files_bar: Option<ProgressBar>,
    cell_bars: Vec<ProgressBar>,
    file_states: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static CELL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} cells [{bar:30.green/white}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
});

static FILES_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] samples {pos}/{len} [{bar:40.green/white}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Manager with no bars yet
    pub fn new() -> Self {
        Self {
            bars: MultiProgress::new(),
            files_bar: None,
            cell_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Create bars for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let bar = ProgressBar::new(file_count as u64).with_style(FILES_STYLE.clone());
            self.files_bar = Some(self.bars.add(bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0).with_style(CELL_STYLE.clone());
            self.cell_bars.push(self.bars.add(bar));
        }
    }

    /// Configure progress bar for a new file with `cells` cells to decide
    pub fn start_file(&mut self, index: usize, path: &Path, cells: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, FileState::default());
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = FileState {
                name,
                decided: 0,
                cells,
            };
        }
        self.update_bars();
    }

    /// Report how many cells are decided so far
    ///
    /// The count may go down after a backtrack.
    pub fn update_decided(&mut self, index: usize, decided: usize) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.decided = decided.min(state.cells);
        }
        self.update_bars();
    }

    /// Mark a solve as finished, filling its bar when it succeeded
    pub fn complete_file(&mut self, index: usize, solved: bool) {
        if let Some(bar) = &self.files_bar {
            bar.inc(1);
        }

        if let Some(state) = self.file_states.get_mut(index) {
            let mark = if solved { '✓' } else { '✗' };
            state.name = format!("{mark} {}", state.name);
            if solved {
                state.decided = state.cells;
            }
        }
        self.update_bars();
    }

    /// Remove every bar from the terminal
    pub fn finish(&self) {
        if let Some(bar) = &self.files_bar {
            bar.finish_with_message("Batch finished");
        }
        let _ = self.bars.clear();
    }

    /// Show the most recent files on the available bars
    fn update_bars(&self) {
        let active: Vec<&FileState> = self
            .file_states
            .iter()
            .filter(|state| !state.name.is_empty())
            .collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_index, state) in visible.iter().enumerate() {
            if let Some(bar) = self.cell_bars.get(bar_index) {
                bar.set_length(state.cells as u64);
                bar.set_position(state.decided as u64);
                let width = state.cells.to_string().len();
                bar.set_message(format!("{:>width$}/{}", state.decided, state.cells));
                bar.set_prefix(state.name.clone());
            }
        }

        for bar in self.cell_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message("");
            bar.set_prefix("");
        }
    }
}
