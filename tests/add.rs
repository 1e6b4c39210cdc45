mod common;

use common::cli;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn add_contact() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    cli(&store)
        .args([
            "add",
            "--name",
            "Alice",
            "--phone",
            "08031234567",
            "--email",
            "alice@example.com",
            "--tag",
            "work",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact added successfully"));

    // Confirm newly added contact exist
    cli(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice").and(predicate::str::contains("alice@example.com")));

    // Same email in another case is a duplicate
    cli(&store)
        .args(["add", "--name", "Alice Two", "--email", "ALICE@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A contact with the same email already exists",
        ));

    // Same name (any case) and same phone is a duplicate
    cli(&store)
        .args(["add", "--name", "alice", "--phone", "08031234567"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("same name and phone"));

    // Same name with a different phone is fine
    cli(&store)
        .args(["add", "--name", "Alice", "--phone", "08030000000"])
        .assert()
        .success();

    Ok(())
}

#[test]
fn invalid_inputs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    cli(&store)
        .args(["add", "--name", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed: Name is required"));

    cli(&store)
        .args(["add", "--name", "Bob", "--email", "foo@bar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));

    cli(&store)
        .args(["add", "--name", "Bob", "--reminder", "whenever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized reminder date"));

    cli(&store)
        .env("STORAGE_CHOICE", "txt")
        .args(["add", "--name", "Bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a recognized storage medium"));

    Ok(())
}

#[test]
fn requires_a_signed_in_user() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    cli(&store)
        .env_remove("ROLODEX_USER")
        .args(["add", "--name", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not authenticated"));

    cli(&store)
        .env("ROLODEX_USER", "  ")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not authenticated"));

    assert!(!store.exists());
    Ok(())
}

#[test]
fn show_includes_avatar() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    let output = cli(&store)
        .args(["add", "--name", "Alice", "--avatar", "https://img.example.com/alice.png"])
        .output()?;
    let id = common::added_id(&output.stdout);

    cli(&store)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Avatar: https://img.example.com/alice.png"));

    Ok(())
}

#[test]
fn corrupt_store_is_a_storage_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");
    std::fs::write(&store, "[1,2,3]")?;

    for args in [vec!["list"], vec!["add", "--name", "Alice"]] {
        cli(&store)
            .args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Storage error: malformed store"));
    }

    Ok(())
}
