//! Kept in its own test binary because it changes the working directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use winners_circle_report::revenue_chart::{HEIGHT_PX, REVENUE_CHART_FILE, WIDTH_PX};

/// Restores the previous working directory when dropped.
struct WorkingDir {
    previous: PathBuf,
}

impl WorkingDir {
    fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().expect("current dir");
        env::set_current_dir(dir).expect("enter temp dir");
        Self { previous }
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

#[test]
fn default_chart_lands_in_the_working_directory_and_is_replaced() {
    let dir = tempfile::tempdir().expect("temp dir");
    let _cwd = WorkingDir::enter(dir.path());
    fs::write(REVENUE_CHART_FILE, b"stale").expect("seed stale chart");

    let first = winners_circle_report::render_revenue_chart().expect("first render");
    assert_eq!(first, Path::new(REVENUE_CHART_FILE));
    let first_bytes = fs::read(dir.path().join(REVENUE_CHART_FILE)).expect("read chart");
    assert!(first_bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    let decoded = image::load_from_memory(&first_bytes)
        .expect("decode png")
        .to_rgb8();
    assert_eq!(decoded.dimensions(), (WIDTH_PX, HEIGHT_PX));

    let second = winners_circle_report::render_revenue_chart().expect("second render");
    assert_eq!(second, first);
    let second_bytes = fs::read(dir.path().join(REVENUE_CHART_FILE)).expect("read chart again");
    assert_eq!(second_bytes, first_bytes);
    assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 1);
}
