use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("lightbox_cli")?;
    cmd.env("MOCK_API_CLIENT", "1");
    cmd.env("HOME", home.path());
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn lightbox_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lightbox command-line client"));
    Ok(())
}

#[test]
fn lightbox_cli_lists_folders() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .arg("folders")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/home/alice/Pictures/2023/Summer (id: d1, 4 photos)",
        ))
        .stdout(predicate::str::contains("id: d2, 0 photos, importing"));
    Ok(())
}

#[test]
fn lightbox_cli_add_and_delete_folder() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .args(["add-folder", "/srv/photos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Folder added: /srv/photos (id: d3)"));
    cli(&home)?
        .args(["delete-folder", "/srv/photos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Folder removed: /srv/photos"));
    Ok(())
}

#[test]
fn lightbox_cli_filters_photos_by_tag() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .args(["photos", "/home/alice/Pictures/2023/Summer", "--tag", "dog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p1 - beach.jpg"))
        .stdout(predicate::str::contains("p3 - forest.jpg"))
        .stdout(predicate::str::contains("city.jpg").not())
        .stdout(predicate::str::contains("2 photos"))
        .stdout(predicate::str::contains("Tags: Car, Cat, Dog, Sea, Tree"));
    Ok(())
}

#[test]
fn lightbox_cli_faces_largest_cluster_first() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let output = cli(&home)?.arg("faces").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("d1: 6 faces"));
    let c2 = stdout.find("c2 (3)").ok_or("missing c2")?;
    let c3 = stdout.find("c3 (2)").ok_or("missing c3")?;
    let c1 = stdout.find("c1 (1)").ok_or("missing c1")?;
    assert!(c2 < c3 && c3 < c1);
    Ok(())
}

#[test]
fn lightbox_cli_faces_filters_by_folder_path() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .args(["faces", "--dir", "/home/alice/Pictures/2023/Summer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("d1: 6 faces"));
    cli(&home)?
        .args(["faces", "--dir", "d1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No UUID found for path: d1"));
    Ok(())
}

#[test]
fn lightbox_cli_metadata() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .args(["metadata", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FUJIFILM X100V"))
        .stdout(predicate::str::contains("6240 × 4160"))
        .stdout(predicate::str::contains("f/2  1/500s  ISO 160  23mm"));
    Ok(())
}

#[test]
fn lightbox_cli_metadata_requires_ids() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?.arg("metadata").assert().failure();
    Ok(())
}

#[test]
fn lightbox_cli_watch_prints_events() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home)?
        .arg("watch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Preview generation started"))
        .stdout(predicate::str::contains("Progress: 50%"))
        .stdout(predicate::str::contains("Preview generation finished"))
        .stdout(predicate::str::contains("Event stream closed"));
    Ok(())
}

#[test]
fn lightbox_cli_reports_unreachable_backend() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let mut cmd = Command::cargo_bin("lightbox_cli")?;
    cmd.env_remove("MOCK_API_CLIENT");
    cmd.env("HOME", home.path());
    cmd.args(["--backend-url", "http://127.0.0.1:9", "folders"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Request"));
    Ok(())
}
