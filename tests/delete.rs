mod common;

use common::{added_id, cli, memory_manager};
use predicates::prelude::*;
use rusty_contacts::prelude::{AppError, NewContact};
use tempfile::tempdir;

#[test]
fn deleting_contacts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    // Attempt to delete non existing contact
    cli(&store)
        .args(["delete", "no-such-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact Not found"));

    let output = cli(&store)
        .args(["add", "--name", "Patricia", "--phone", "08066809241"])
        .output()?;
    let patricia = added_id(&output.stdout);

    cli(&store)
        .args(["add", "--name", "Diane", "--phone", "08064879199"])
        .assert()
        .success();

    cli(&store)
        .args(["show", &patricia])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Patricia"));

    cli(&store)
        .args(["delete", &patricia])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact deleted successfully"));

    cli(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Diane").and(predicate::str::contains("Patricia").not()));

    // Second delete of the same id
    cli(&store)
        .args(["delete", &patricia])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact Not found"));

    cli(&store)
        .args(["show", &patricia])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact Not found"));

    Ok(())
}

#[test]
fn delete_is_final_and_scoped_to_owner() -> Result<(), AppError> {
    let store = memory_manager();
    let ann = store.create("u1", NewContact::new("Ann").with_email("ann@x.com"))?;

    // another user cannot remove it
    assert!(store.delete("u2", &ann.id).unwrap_err().is_not_found());

    store.delete("u1", &ann.id)?;
    assert!(store.get("u1", &ann.id).unwrap_err().is_not_found());
    assert!(store.list("u1")?.iter().all(|c| c.id != ann.id));
    assert!(store.delete("u1", &ann.id).unwrap_err().is_not_found());

    // the email is free again once the contact is gone
    store.create("u1", NewContact::new("Ann again").with_email("ann@x.com"))?;
    Ok(())
}
