//! Command-line interface for batch solving PNG samples

use crate::algorithm::executor::{BacktrackType, Resolution, TilePropagator, TilePropagatorOptions};
use crate::analysis::overlapping::OverlappingModel;
use crate::io::configuration::{
    DEFAULT_BACKTRACK_DEPTH, DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SEED,
    DEFAULT_SYMMETRY, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, SolverError, invalid_path};
use crate::io::image::{Color, export_values_as_png, load_sample};
use crate::io::progress::ProgressManager;
use crate::spatial::topology::Topology;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "wavetile")]
#[command(
    author,
    version,
    about = "Generate images from PNG samples by constraint propagation"
)]
/// Command-line arguments for the solver
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Sample PNG, or a directory of samples
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output width in cells (implies square if height not specified)
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Output height in cells
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Side length of the patterns read from the sample
    #[arg(short = 'n', long, default_value_t = DEFAULT_PATTERN_SIZE)]
    pub pattern_size: usize,

    /// Number of rotations and reflections added per pattern (1..=8)
    #[arg(short = 'y', long, default_value_t = DEFAULT_SYMMETRY)]
    pub symmetry: usize,

    /// Treat the sample as wrapping around its edges
    #[arg(long)]
    pub periodic_input: bool,

    /// Make the output wrap around its edges
    #[arg(short, long)]
    pub periodic: bool,

    /// Checkpoints kept for backtracking (-1 = unlimited, 0 = disabled)
    #[arg(short, long, default_value_t = DEFAULT_BACKTRACK_DEPTH, allow_hyphen_values = true)]
    pub backtrack_depth: i32,

    /// Maximum number of decisions before giving up
    #[arg(long)]
    pub steps: Option<usize>,

    /// Hide progress bars and lower logging to warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Solve samples again even when a result already exists
    #[arg(long)]
    pub no_skip: bool,
}

impl Cli {
    /// Whether samples with an existing result are left alone
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Whether progress bars are drawn
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Output extent as (width, height)
    pub fn output_size(&self) -> (usize, usize) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(s), None) | (None, Some(s)) => (s, s),
            (None, None) => (DEFAULT_OUTPUT_SIZE, DEFAULT_OUTPUT_SIZE),
        }
    }

    /// Solver options derived from the arguments
    pub fn options(&self) -> TilePropagatorOptions<Color> {
        TilePropagatorOptions {
            backtrack_type: if self.backtrack_depth == 0 {
                BacktrackType::None
            } else {
                BacktrackType::Backtrack
            },
            backtrack_depth: self.backtrack_depth,
            seed: self.seed,
            step_limit: self.steps,
            ..TilePropagatorOptions::default()
        }
    }
}

/// Solves every sample named on the command line
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Processor for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Solve every selected sample and write its result next to it
    ///
    /// # Errors
    ///
    /// Returns an error if target validation fails, or if any file cannot be
    /// loaded, solved or written
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut outcome = Ok(());
        for (index, file) in files.iter().enumerate() {
            outcome = self.process_file(file, index);
            if outcome.is_err() {
                break;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        outcome
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_png(target) {
                return Err(invalid_path(target, "Target file must be a PNG image"));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|e| SolverError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if is_png(&path) && !is_output(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_path(target, "Target must be a PNG file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            info!(input = %input_path.display(), "Skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        let sample = load_sample(input_path)?;
        let model = OverlappingModel::create(
            &sample,
            self.cli.pattern_size,
            self.cli.periodic_input,
            self.cli.symmetry,
        )?;
        let (width, height) = self.cli.output_size();
        let topology = Topology::new(width, height, self.cli.periodic)?;
        let mut propagator = TilePropagator::new(&model, topology, self.cli.options())?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, width * height);
        }

        let status = match self.progress_manager.as_mut() {
            Some(pm) => propagator.run_with(|p| pm.update_decided(index, p.wave().decided_cells())),
            None => propagator.run(),
        };

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, status == Resolution::Decided);
        }

        if status != Resolution::Decided {
            return Err(SolverError::Unsolved {
                path: input_path.to_path_buf(),
                status,
                steps: propagator.steps(),
            });
        }

        export_values_as_png(&propagator.to_value_array(), 0, &output_path)?;
        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            patterns = model.patterns().len(),
            steps = propagator.steps(),
            backtracks = propagator.backtrack_count(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "Solved"
        );

        Ok(())
    }

    /// Output path for a sample: `<stem>_result.<ext>` next to it
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_path.extension().unwrap_or_default().to_string_lossy();
        input_path.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{extension}"))
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

fn is_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
