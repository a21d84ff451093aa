mod common;

use std::fs::File;
use std::time::{Duration, SystemTime};

use common::{fast_settings, PageScript, ScriptedPage};
use sanctions_check::services::{EvidenceCapture, SearchSession};

#[tokio::test]
async fn capture_saves_dated_png_for_subject() {
    let dir = tempfile::tempdir().unwrap();
    let capture = EvidenceCapture::new(dir.path().join("capturas"));
    let (page, log) = ScriptedPage::new(PageScript::default());
    let mut session = SearchSession::new(page, fast_settings(1));

    let path = capture.capture(&mut session, 1045, None).await.unwrap();

    assert!(path.exists());
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.ends_with("_1045.png"), "{}", file_name);
    assert_eq!(log.lock().unwrap().screenshots, vec![path.clone()]);
    assert_eq!(capture.list_captures().await.unwrap(), vec![path]);
}

#[tokio::test]
async fn capture_failure_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let capture = EvidenceCapture::new(dir.path());
    let (page, _log) = ScriptedPage::new(PageScript {
        fail_screenshot: true,
        ..PageScript::default()
    });
    let mut session = SearchSession::new(page, fast_settings(1));

    assert!(capture.capture(&mut session, 7, Some("detalle")).await.is_none());
    assert!(capture.list_captures().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_ignores_other_files_and_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = EvidenceCapture::new(dir.path().join("no-such-dir"));
    assert!(missing.list_captures().await.unwrap().is_empty());

    std::fs::write(dir.path().join("20220728_2.png"), b"png").unwrap();
    std::fs::write(dir.path().join("20220728_1.png"), b"png").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"txt").unwrap();

    let capture = EvidenceCapture::new(dir.path());
    let names: Vec<String> = capture
        .list_captures()
        .await
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["20220728_1.png", "20220728_2.png"]);
}

#[tokio::test]
async fn prune_removes_only_expired_captures() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("20200101_1.png");
    let fresh = dir.path().join("20220728_2.png");
    std::fs::write(&old, b"png").unwrap();
    std::fs::write(&fresh, b"png").unwrap();

    let ten_days_ago = SystemTime::now() - Duration::from_secs(10 * 24 * 60 * 60);
    File::options()
        .write(true)
        .open(&old)
        .unwrap()
        .set_modified(ten_days_ago)
        .unwrap();

    let capture = EvidenceCapture::new(dir.path());
    assert_eq!(capture.prune_older_than(7).await.unwrap(), 1);

    assert!(!old.exists());
    assert!(fresh.exists());
}
