#![allow(dead_code)]

use assert_cmd::Command;
use rusty_contacts::prelude::{ContactManager, MemoryStorage};
use std::path::Path;

pub const USER: &str = "user_1718000000000_k3j9x2p1q";

/// The binary pointed at an isolated JSON store and signed in as `USER`.
pub fn cli(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rusty-contacts").expect("binary built");
    cmd.env("STORAGE_CHOICE", "json")
        .env("JSON_STORAGE_PATH", store)
        .env("CSV_DIALECT", "legacy")
        .env("ROLODEX_USER", USER)
        .env_remove("REMOTE_STORAGE_URL");
    cmd
}

/// Pulls the id out of "Contact added successfully (id: ...)".
pub fn added_id(stdout: &[u8]) -> String {
    let out = String::from_utf8_lossy(stdout);
    out.split("(id: ")
        .nth(1)
        .and_then(|rest| rest.split(')').next())
        .expect("add prints the new id")
        .to_string()
}

pub fn memory_manager() -> ContactManager {
    ContactManager::new(Box::new(MemoryStorage::new()))
}
