//! Tests for command-line parsing and batch file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use image::{ImageBuffer, Rgba};
    use std::path::{Path, PathBuf};
    use wavetile::algorithm::executor::BacktrackType;
    use wavetile::io::cli::{Cli, FileProcessor};
    use wavetile::io::configuration::{
        DEFAULT_BACKTRACK_DEPTH, DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SEED,
        DEFAULT_SYMMETRY,
    };
    use wavetile::io::error::SolverError;
    use wavetile::io::image::load_sample;

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn write_png(path: &Path, rows: &[&[[u8; 4]]]) {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len()) as u32;
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba(rows[y as usize][x as usize])
        });
        img.save(path).expect("write sample");
    }

    // Tests CLI parsing with only the required target
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["wavetile", "test.png"]);

        assert_eq!(cli.target, PathBuf::from("test.png"));
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.pattern_size, DEFAULT_PATTERN_SIZE);
        assert_eq!(cli.symmetry, DEFAULT_SYMMETRY);
        assert_eq!(cli.backtrack_depth, DEFAULT_BACKTRACK_DEPTH);
        assert_eq!(cli.output_size(), (DEFAULT_OUTPUT_SIZE, DEFAULT_OUTPUT_SIZE));
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
    }

    // Tests CLI parsing with all available arguments
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "wavetile",
            "input.png",
            "--seed",
            "123",
            "-w",
            "20",
            "-H",
            "10",
            "-n",
            "2",
            "-y",
            "4",
            "--periodic-input",
            "--periodic",
            "--backtrack-depth",
            "5",
            "--steps",
            "300",
            "--quiet",
            "--no-skip",
        ]);

        assert_eq!(cli.seed, 123);
        assert_eq!(cli.output_size(), (20, 10));
        assert_eq!(cli.pattern_size, 2);
        assert_eq!(cli.symmetry, 4);
        assert!(cli.periodic_input && cli.periodic);
        assert_eq!(cli.backtrack_depth, 5);
        assert_eq!(cli.steps, Some(300));
        assert!(!cli.should_show_progress());
        assert!(!cli.skip_existing());
    }

    // Tests a single extent gives a square output
    #[test]
    fn test_square_output_size() {
        let cli = Cli::parse_from(["wavetile", "a.png", "-H", "7"]);
        assert_eq!(cli.output_size(), (7, 7));
    }

    // Tests the backtrack flag maps onto solver options
    // Verified by removing allow_hyphen_values from the backtrack argument
    #[test]
    fn test_backtrack_options() {
        let unlimited = Cli::parse_from(["wavetile", "a.png", "-b", "-1"]).options();
        assert_eq!(unlimited.backtrack_depth, -1);
        assert_eq!(unlimited.backtrack_type, BacktrackType::Backtrack);

        let disabled = Cli::parse_from(["wavetile", "a.png", "-b", "0", "-s", "9"]).options();
        assert_eq!(disabled.backtrack_type, BacktrackType::None);
        assert_eq!(disabled.seed, 9);
    }

    #[test]
    fn test_output_path() {
        let output = FileProcessor::get_output_path(Path::new("dir/sample.png"));
        assert_eq!(output, PathBuf::from("dir/sample_result.png"));
    }

    // Tests a striped sample produces a striped result next to it
    // Verified by exporting before the solve finishes
    #[test]
    fn test_process_single_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("stripes.png");
        write_png(&input, &[&[BLACK, WHITE], &[BLACK, WHITE]]);

        let cli = Cli::parse_from([
            "wavetile",
            input.to_str().expect("utf-8 path"),
            "--periodic-input",
            "-n",
            "2",
            "-y",
            "1",
            "-w",
            "6",
            "-H",
            "4",
            "-q",
        ]);
        FileProcessor::new(cli).process().expect("solves");

        let output = load_sample(&dir.path().join("stripes_result.png")).expect("output exists");
        assert_eq!(output.dim(), (4, 6));
        for y in 0..4 {
            for x in 0..5 {
                assert_ne!(output.get((y, x)), output.get((y, x + 1)));
            }
        }
    }

    // Tests directories skip earlier results and outputs that already exist
    #[test]
    fn test_process_directory_skips_results() {
        let dir = tempfile::tempdir().expect("temp dir");
        write_png(&dir.path().join("a.png"), &[&[BLACK, WHITE], &[BLACK, WHITE]]);
        let target = dir.path().to_str().expect("utf-8 path");
        let args = ["wavetile", target, "--periodic-input", "-n", "2", "-y", "1", "-w", "4", "-q"];

        FileProcessor::new(Cli::parse_from(args))
            .process()
            .expect("solves");
        assert!(dir.path().join("a_result.png").exists());

        FileProcessor::new(Cli::parse_from(args))
            .process()
            .expect("nothing left to do");
        assert!(!dir.path().join("a_result_result.png").exists());
    }

    // Tests a single target with an existing result is left alone
    // Verified by processing the file even when its output exists
    #[test]
    fn test_existing_output_skipped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("b.png");
        let output = dir.path().join("b_result.png");
        write_png(&input, &[&[BLACK, WHITE], &[BLACK, WHITE]]);
        std::fs::write(&output, "earlier result").expect("write file");

        let target = input.to_str().expect("utf-8 path");
        FileProcessor::new(Cli::parse_from(["wavetile", target, "-n", "2", "-w", "4"]))
            .process()
            .expect("nothing to do");
        assert_eq!(
            std::fs::read_to_string(&output).expect("output kept"),
            "earlier result"
        );
    }

    // Tests an exhausted step budget is reported as an error
    // Verified by exporting unsolved grids
    #[test]
    fn test_step_budget_reports_unsolved() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("noise.png");
        write_png(&input, &[&[BLACK, WHITE], &[WHITE, WHITE]]);

        let cli = Cli::parse_from([
            "wavetile",
            input.to_str().expect("utf-8 path"),
            "-n",
            "1",
            "-w",
            "4",
            "--steps",
            "1",
            "-q",
        ]);
        let result = FileProcessor::new(cli).process();
        assert!(matches!(result, Err(SolverError::Unsolved { steps: 1, .. })));
        assert!(!dir.path().join("noise_result.png").exists());
    }

    #[test]
    fn test_rejects_non_png_target() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "plain text").expect("write file");

        let cli = Cli::parse_from(["wavetile", input.to_str().expect("utf-8 path"), "-q"]);
        assert!(matches!(
            FileProcessor::new(cli).process(),
            Err(SolverError::InvalidParameter {
                parameter: "path",
                ..
            })
        ));

        let missing = dir.path().join("missing");
        let cli = Cli::parse_from(["wavetile", missing.to_str().expect("utf-8 path"), "-q"]);
        assert!(FileProcessor::new(cli).process().is_err());
    }
}
