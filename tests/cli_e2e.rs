#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn pimedia_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("pimedia"));
    cmd.env("NO_COLOR", "1")
        .env_remove("PIMEDIA_STORAGE_DIR")
        .env_remove("PIMEDIA_TRASH_DIR")
        .env_remove("PIMEDIA_METADATA_FILE")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(temp.path().join("storage"))
        .arg("--config")
        .arg(temp.path().join("missing.toml"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

fn local_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn init_creates_the_storage() {
    let temp = TempDir::new().unwrap();
    pimedia_cmd(&temp).arg("init").assert().success();

    let storage = temp.path().join("storage");
    assert!(storage.join(".trash").is_dir());
    assert_eq!(
        fs::read_to_string(storage.join(".metadata.json")).unwrap(),
        "[]"
    );

    pimedia_cmd(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn full_lifecycle_through_the_binary() {
    let temp = TempDir::new().unwrap();
    let beach = local_file(temp.path(), "beach.jpg", b"sand");

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "mkdir", "My Files", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Folder created: Trip"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "add", "My Files/Trip"])
        .arg(&beach)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Trip/beach.jpg"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "fav", "Trip/beach.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now favorite"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "ls", "--favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip/beach.jpg"))
        .stdout(predicate::str::contains("★"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "trash", "Trip/beach.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Trip/beach.jpg -> ../.trash/alice/beach.jpg",
        ));

    let listing = stdout_of(pimedia_cmd(&temp).args(["--owner", "alice", "ls", "--trash", "--json"]));
    let items: serde_json::Value = serde_json::from_str(&listing).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "../.trash/alice/beach.jpg");
    assert_eq!(items[0]["logicalPath"], "Trash");
    assert_eq!(items[0]["originalLogicalPath"], "My Files/Trip");
    assert_eq!(items[0]["isFavorite"], true);

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "restore", "../.trash/alice/beach.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> Trip/beach.jpg"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "locate", "My Files/Trip", "beach.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("beach.jpg"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "purge", "Trip/beach.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: Trip/beach.jpg"));

    let listing = stdout_of(pimedia_cmd(&temp).args(["--owner", "alice", "ls", "--json"]));
    let items: serde_json::Value = serde_json::from_str(&listing).unwrap();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["kind"], "folder");
}

#[test]
fn partial_failure_exits_non_zero_but_processes_the_rest() {
    let temp = TempDir::new().unwrap();
    let photo = local_file(temp.path(), "a.jpg", b"x");
    pimedia_cmd(&temp)
        .args(["--owner", "alice", "add", "My Files"])
        .arg(&photo)
        .assert()
        .success();

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "trash", "ghost.jpg", "a.jpg"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Could not trash ghost.jpg"))
        .stdout(predicate::str::contains("Moved to trash: a.jpg"));

    assert!(temp
        .path()
        .join("storage/.trash/alice/a.jpg")
        .is_file());
}

#[test]
fn owner_commands_require_an_owner() {
    let temp = TempDir::new().unwrap();
    pimedia_cmd(&temp)
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--owner is required"));
}

#[test]
fn traversal_is_rejected() {
    let temp = TempDir::new().unwrap();
    pimedia_cmd(&temp)
        .args(["--owner", "alice", "locate", "My Files/../bob", "secret.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn doctor_adopts_orphans() {
    let temp = TempDir::new().unwrap();
    pimedia_cmd(&temp).arg("init").assert().success();
    let trash = temp.path().join("storage/.trash/alice");
    fs::create_dir_all(&trash).unwrap();
    fs::write(trash.join("lost.jpg"), b"x").unwrap();

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "doctor"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("../.trash/alice/lost.jpg"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "doctor", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed"));

    pimedia_cmd(&temp)
        .args(["--owner", "alice", "ls", "--trash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lost.jpg"));
}
