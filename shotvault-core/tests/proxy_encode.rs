#![cfg(unix)]

mod support;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use shotvault_core::error::PublishError;
use shotvault_core::proxy::ProxyEncoder;
use shotvault_core::publish::{PublishOrchestrator, PublishRequest};

use support::{table, write_frames};

/// Writes an executable stand-in for ffmpeg. It records its arguments to
/// `record` and touches its last argument (the output path), mimicking a
/// successful encode.
fn stub_transcoder(dir: &Path, record: &Path) -> PathBuf {
    let script = dir.join("ffmpeg-stub");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"{}\"\nfor last; do :; done\ntouch \"$last\"\n",
            record.display()
        ),
    )
    .expect("write stub");
    let mut perms = fs::metadata(&script).expect("stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");
    script
}

fn failing_transcoder(dir: &Path) -> PathBuf {
    let script = dir.join("ffmpeg-fail");
    fs::write(&script, "#!/bin/sh\necho 'boom: unknown filter' >&2\nexit 1\n")
        .expect("write stub");
    let mut perms = fs::metadata(&script).expect("stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");
    script
}

fn request(original: &Path) -> PublishRequest {
    PublishRequest {
        shot_code: "SHOT0010".to_string(),
        task_name: "compositing".to_string(),
        original_path: original.to_str().expect("utf-8 path").to_string(),
        proxy_path: None,
        auto_proxy: true,
    }
}

#[tokio::test]
async fn auto_proxy_invokes_the_transcoder_and_records_the_movie() {
    let out = tempfile::tempdir().expect("tempdir");
    let renders = tempfile::tempdir().expect("tempdir");
    let scratch = tempfile::tempdir().expect("tempdir");
    let first = write_frames(renders.path(), "shotA", 1, 3, 4, "exr");

    let record = scratch.path().join("args.txt");
    let stub = stub_transcoder(scratch.path(), &record);

    let table = table(out.path());
    let orchestrator = PublishOrchestrator::with_encoder(
        &table,
        ProxyEncoder::new(stub.to_str().expect("utf-8 path")),
    );

    let result = orchestrator.publish(&request(&first)).await.expect("publish");

    let expected = out
        .path()
        .join("SHOT/SHOT0010/publish/comp/v001/SHOT0010_comp_v001.mp4");
    assert_eq!(result.movie_path.as_deref(), Some(expected.as_path()));
    assert_eq!(result.mime_type, "video/mp4");
    assert!(expected.exists());

    let args: Vec<String> = fs::read_to_string(&record)
        .expect("read recorded args")
        .lines()
        .map(str::to_string)
        .collect();
    assert!(args.contains(&"-framerate".to_string()));
    assert!(args.contains(&"24".to_string()));
    assert!(args.contains(&"-start_number".to_string()));
    assert!(args.contains(&"1".to_string()));
    assert!(args.contains(&"libx264".to_string()));
    let pattern = renders.path().join("shotA.%04d.exr");
    assert!(args.contains(&pattern.to_str().unwrap().to_string()));
    assert_eq!(args.last().map(String::as_str), expected.to_str());
}

#[tokio::test]
async fn transcoder_failure_surfaces_its_diagnostics() {
    let out = tempfile::tempdir().expect("tempdir");
    let renders = tempfile::tempdir().expect("tempdir");
    let scratch = tempfile::tempdir().expect("tempdir");
    let first = write_frames(renders.path(), "shotA", 1, 2, 4, "exr");

    let stub = failing_transcoder(scratch.path());
    let table = table(out.path());
    let orchestrator = PublishOrchestrator::with_encoder(
        &table,
        ProxyEncoder::new(stub.to_str().expect("utf-8 path")),
    );

    let err = orchestrator.publish(&request(&first)).await.unwrap_err();
    match err {
        PublishError::ProxyGeneration(diagnostics) => {
            assert!(diagnostics.contains("boom: unknown filter"));
        }
        other => panic!("expected ProxyGeneration, got {other:?}"),
    }
}

#[tokio::test]
async fn hung_transcoder_times_out() {
    let out = tempfile::tempdir().expect("tempdir");
    let renders = tempfile::tempdir().expect("tempdir");
    let scratch = tempfile::tempdir().expect("tempdir");
    let first = write_frames(renders.path(), "shotA", 1, 2, 4, "exr");

    let script = scratch.path().join("ffmpeg-hang");
    fs::write(&script, "#!/bin/sh\nsleep 30\n").expect("write stub");
    let mut perms = fs::metadata(&script).expect("stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");

    let table = table(out.path());
    let encoder = ProxyEncoder::new(script.to_str().expect("utf-8 path"))
        .with_timeout(Duration::from_millis(200));
    let orchestrator = PublishOrchestrator::with_encoder(&table, encoder);

    let err = orchestrator.publish(&request(&first)).await.unwrap_err();
    match err {
        PublishError::ProxyGeneration(diagnostics) => {
            assert!(diagnostics.contains("did not finish"));
        }
        other => panic!("expected ProxyGeneration, got {other:?}"),
    }
}
