//! Integration tests for the batch run

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use svg_iconset::batch::{BatchObserver, RasterJob, RasterOutcome, RasterizerError};
use svg_iconset::{
    BatchConfig, BatchError, BatchRasterizer, BatchReport, ConfigError, Rasterizer,
    RasterizerConfig, SizeSet, SizeSpec, VectorDocument,
};

/// Writes a fake PNG whose content depends only on the SVG it receives, and
/// keeps a copy of every intermediate document
#[derive(Default)]
struct RecordingRasterizer {
    jobs: RefCell<Vec<RasterJob>>,
    documents: RefCell<Vec<String>>,
    failing: Vec<u32>,
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(&self, job: &RasterJob) -> Result<RasterOutcome, RasterizerError> {
        let svg = fs::read_to_string(&job.input).expect("intermediate SVG should exist");
        self.jobs.borrow_mut().push(job.clone());
        self.documents.borrow_mut().push(svg.clone());

        if self.failing.contains(&job.width) {
            return Ok(RasterOutcome {
                exit_code: Some(1),
                stderr: format!("cannot render {}", job.width),
            });
        }
        let png = format!("PNG {}x{}\n{}", job.width, job.height, svg);
        fs::write(&job.output, png).expect("output directory should exist");
        Ok(RasterOutcome::success())
    }
}

#[derive(Debug, Default, PartialEq)]
struct EventLog {
    events: Vec<String>,
}

impl BatchObserver for EventLog {
    fn run_started(&mut self, total: usize) {
        self.events.push(format!("start {}", total));
    }

    fn size_started(&mut self, size: SizeSpec) {
        self.events.push(format!("size {}", size));
    }

    fn artifact_generated(&mut self, _size: SizeSpec, path: &Path) {
        let name = path.file_name().unwrap().to_string_lossy();
        self.events.push(format!("generated {}", name));
    }

    fn size_failed(&mut self, size: SizeSpec, _error: &BatchError) {
        self.events.push(format!("failed {}", size));
    }

    fn run_finished(&mut self, report: &BatchReport) {
        self.events.push(format!("finished {}/{}", report.generated.len(), report.failed.len()));
    }
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn sizes(pixels: &[u32]) -> SizeSet {
    SizeSet::new(pixels.iter().copied()).unwrap()
}

#[test]
fn test_every_size_produces_an_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icons");
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(&out)
        .with_sizes(sizes(&[16, 24, 32, 48, 64, 96, 128, 256, 512, 1024]));

    let report = BatchRasterizer::new(config, RecordingRasterizer::default())
        .run(&mut EventLog::default())
        .expect("batch should succeed");

    assert!(report.is_success());
    for size in [16, 24, 32, 48, 64, 96, 128, 256, 512, 1024] {
        let artifact = out.join(format!("{0}x{0}.png", size));
        assert!(artifact.is_file(), "missing {}", artifact.display());
    }
    assert_eq!(report.generated.len(), 10);
}

#[test]
fn test_small_and_large_from_square_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[1024, 16]));
    let batch = BatchRasterizer::new(config, RecordingRasterizer::default());

    let report = batch.run(&mut EventLog::default()).unwrap();

    let names: Vec<String> = report
        .generated
        .iter()
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["16x16.png", "1024x1024.png"]);

    let documents = batch.rasterizer().documents.borrow();
    let first = VectorDocument::parse(&documents[0]).unwrap();
    assert_eq!(first.root.width(), Some("16"));
    assert_eq!(first.root.height(), Some("16"));
    assert_eq!(first.root.view_box(), Some("0 0 512 512"));

    let jobs = batch.rasterizer().jobs.borrow();
    assert_eq!((jobs[1].width, jobs[1].height), (1024, 1024));
    assert_eq!(jobs[0].input, jobs[1].input);
}

#[test]
fn test_existing_viewbox_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("banner-with-viewbox.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[32]));
    let batch = BatchRasterizer::new(config, RecordingRasterizer::default());
    batch.run(&mut EventLog::default()).unwrap();

    let documents = batch.rasterizer().documents.borrow();
    let doc = VectorDocument::parse(&documents[0]).unwrap();
    assert_eq!(doc.root.view_box(), Some("0 0 640 320"));
    assert_eq!(doc.root.width(), Some("32"));
}

#[test]
fn test_body_and_prolog_reach_rasterizer_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[64]));
    let batch = BatchRasterizer::new(config, RecordingRasterizer::default());
    batch.run(&mut EventLog::default()).unwrap();

    let original = VectorDocument::from_file(&fixture("play-button.svg")).unwrap();
    let documents = batch.rasterizer().documents.borrow();
    let rewritten = VectorDocument::parse(&documents[0]).unwrap();
    assert_eq!(rewritten.prolog, original.prolog);
    assert_eq!(rewritten.body, original.body);
}

#[test]
fn test_temp_file_removed_after_success() {
    let dir = tempfile::tempdir().unwrap();
    let temp_path = dir.path().join("scratch").join("resized.svg");
    fs::create_dir_all(temp_path.parent().unwrap()).unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path().join("out"))
        .with_temp_path(&temp_path)
        .with_sizes(sizes(&[16, 32]));

    let batch = BatchRasterizer::new(config, RecordingRasterizer::default());
    batch.run(&mut EventLog::default()).unwrap();

    assert!(!temp_path.exists());
    assert!(batch
        .rasterizer()
        .jobs
        .borrow()
        .iter()
        .all(|job| job.input == temp_path));
}

#[test]
fn test_rerun_overwrites_with_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[48]));
    let artifact = config.artifact_path(SizeSpec::new(48).unwrap());

    BatchRasterizer::new(config.clone(), RecordingRasterizer::default())
        .run(&mut EventLog::default())
        .unwrap();
    let first = fs::read(&artifact).unwrap();

    fs::write(&artifact, b"stale").unwrap();
    BatchRasterizer::new(config, RecordingRasterizer::default())
        .run(&mut EventLog::default())
        .unwrap();
    assert_eq!(fs::read(&artifact).unwrap(), first);
}

#[test]
fn test_observer_sees_events_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[32, 16]));
    let mut log = EventLog::default();
    BatchRasterizer::new(config, RecordingRasterizer::default())
        .run(&mut log)
        .unwrap();

    assert_eq!(
        log.events,
        vec![
            "start 2",
            "size 16",
            "generated 16x16.png",
            "size 32",
            "generated 32x32.png",
            "finished 2/0",
        ]
    );
}

#[test]
fn test_rasterizer_failure_aborts_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[16, 32, 64]));
    let rasterizer = RecordingRasterizer {
        failing: vec![32],
        ..Default::default()
    };

    let mut log = EventLog::default();
    let err = BatchRasterizer::new(config, rasterizer)
        .run(&mut log)
        .unwrap_err();

    match err {
        BatchError::Rasterize {
            size,
            exit_code,
            stderr,
        } => {
            assert_eq!(size.get(), 32);
            assert_eq!(exit_code, Some(1));
            assert_eq!(stderr, "cannot render 32");
        }
        other => panic!("unexpected error {:?}", other),
    }
    // Earlier sizes stay on disk, later ones are never attempted
    assert!(dir.path().join("16x16.png").is_file());
    assert!(!dir.path().join("64x64.png").exists());
    assert!(!dir.path().join("temp_resized.svg").exists());
    assert_eq!(log.events.last().map(String::as_str), Some("size 32"));
}

#[test]
fn test_keep_going_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[16, 32, 64]))
        .with_keep_going(true);
    let rasterizer = RecordingRasterizer {
        failing: vec![32],
        ..Default::default()
    };

    let mut log = EventLog::default();
    let report = BatchRasterizer::new(config, rasterizer)
        .run(&mut log)
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.generated.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].size.get(), 32);
    assert!(report.failed[0].reason.contains("cannot render 32"));
    assert!(log.events.contains(&"failed 32".to_string()));
    assert_eq!(log.events.last().map(String::as_str), Some("finished 2/1"));
    assert!(dir.path().join("64x64.png").is_file());
}

#[test]
fn test_missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig::new(dir.path().join("nope.svg")).with_output_dir(dir.path());
    let batch = BatchRasterizer::new(config, RecordingRasterizer::default());

    let err = batch.run(&mut EventLog::default()).unwrap_err();
    assert!(matches!(err, BatchError::Document(_)));
    assert!(err.diagnostic().is_none());
    assert!(batch.rasterizer().jobs.borrow().is_empty());
}

#[test]
fn test_unparsable_source_reports_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.svg");
    fs::write(&source, "<svg width=\"16\" height=16>").unwrap();
    let config = BatchConfig::new(&source).with_output_dir(dir.path());

    let err = BatchRasterizer::new(config, RecordingRasterizer::default())
        .run(&mut EventLog::default())
        .unwrap_err();
    let diagnostic = err.diagnostic().expect("parse errors carry a diagnostic");
    assert!(diagnostic.contains("broken.svg"));
}

#[test]
fn test_output_dir_creation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();
    let config = BatchConfig::new(fixture("play-button.svg")).with_output_dir(blocker.join("icons"));

    let err = BatchRasterizer::new(config, RecordingRasterizer::default())
        .run(&mut EventLog::default())
        .unwrap_err();
    assert!(matches!(err, BatchError::CreateOutputDir { .. }));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_output_dir_with_external_rasterizer() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join(OsStr::from_bytes(b"icons-\xff"));
    // sh -c '<script>' receives `-w W -h H -o OUT IN` as $0..$6
    let rasterizer = RasterizerConfig::new("sh").with_args(["-c", r#"cp "$6" "$5""#]);
    let config = BatchConfig::new(fixture("play-button.svg"))
        .with_output_dir(&out)
        .with_sizes(sizes(&[16]))
        .with_rasterizer(rasterizer);

    let report = BatchRasterizer::from_config(config)
        .run(&mut EventLog::default())
        .expect("batch should succeed");

    assert_eq!(report.generated[0].path, out.join("16x16.png"));
    let png = fs::read_to_string(out.join("16x16.png")).unwrap();
    assert!(png.contains(r#"width="16" height="16""#));
    assert!(!out.join("temp_resized.svg").exists());
}

#[test]
fn test_temp_path_on_source_leaves_source_intact() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("temp_resized.svg");
    fs::copy(fixture("play-button.svg"), &source).unwrap();
    let original = fs::read(&source).unwrap();
    let config = BatchConfig::new(&source)
        .with_output_dir(dir.path())
        .with_sizes(sizes(&[16]));
    let batch = BatchRasterizer::new(config, RecordingRasterizer::default());

    let err = batch.run(&mut EventLog::default()).unwrap_err();

    assert!(matches!(err, BatchError::Config(ConfigError::TempPathIsSource(_))));
    assert_eq!(fs::read(&source).unwrap(), original);
    assert!(batch.rasterizer().jobs.borrow().is_empty());
}
