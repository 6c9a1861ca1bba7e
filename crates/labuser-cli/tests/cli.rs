//! Command-line behaviour of the `labuser` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl bob@laptop";

struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self { temp: TempDir::new().unwrap() }
    }

    fn out(&self) -> PathBuf {
        self.temp.path().join("users")
    }

    fn handoff(&self) -> PathBuf {
        self.temp.path().join("handoff.txt")
    }

    fn labuser(&self) -> Command {
        let mut cmd = Command::cargo_bin("labuser").unwrap();
        cmd.env_remove("RUST_LOG")
            .env_remove("LABUSER_OUTPUT_DIR")
            .env_remove("LABUSER_LOG_LEVEL")
            .env("LABUSER_HANDOFF_PATH", self.handoff())
            .env("LABUSER_BCRYPT_COST", "4")
            .arg("--config")
            .arg(self.temp.path().join("absent.yml"))
            .arg("--output-dir")
            .arg(self.out());
        cmd
    }

    fn add(&self, name: &str) -> assert_cmd::assert::Assert {
        self.labuser()
            .args(["add", "--username", name, "--ssh-key", KEY, "--password-stdin"])
            .write_stdin("S3cret!\n")
            .assert()
    }
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn add_generates_playbook() {
    let sandbox = Sandbox::new();

    sandbox
        .add("bob")
        .success()
        .stdout(predicate::str::contains("Generated playbook:").and(predicate::str::contains("bob.yml")));

    let text = read(sandbox.out().join("bob.yml"));
    assert!(text.starts_with(
        "---\n\n- name: Create new user with password and SSH key on Linux Support Lab hosts\n  hosts: all\n"
    ));
    assert!(text.contains("new_user_password: $2b$04$"));
    assert!(!text.contains("S3cret!"));
    assert_eq!(read(sandbox.handoff()), "bob.yml");
}

#[test]
fn duplicate_add_fails() {
    let sandbox = Sandbox::new();
    sandbox.add("bob").success();
    std::fs::write(sandbox.handoff(), "earlier.yml").unwrap();

    sandbox
        .add("bob")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("already exists")));

    assert_eq!(read(sandbox.handoff()), "earlier.yml");
}

#[test]
fn remove_generates_playbook() {
    let sandbox = Sandbox::new();

    sandbox
        .labuser()
        .args(["remove", "--username", "bob", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("remove_bob.yml"));

    let text = read(sandbox.out().join("remove_bob.yml"));
    assert!(text.starts_with(
        "---\n\n- name: Remove user and home directory from Linux Support Lab hosts\n"
    ));
    assert!(text.contains("  vars:\n    username: bob\n"));
    assert_eq!(read(sandbox.handoff()), "remove_bob.yml");
}

#[test]
fn add_reads_key_from_file() {
    let sandbox = Sandbox::new();
    let key_file = sandbox.temp.path().join("id_ed25519.pub");
    std::fs::write(&key_file, format!("{}\n", KEY)).unwrap();

    sandbox
        .labuser()
        .args(["add", "--username", "carol", "--password-stdin", "--ssh-key-file"])
        .arg(&key_file)
        .write_stdin("hunter22\n")
        .assert()
        .success();

    assert!(read(sandbox.out().join("carol.yml")).contains("bob@laptop"));
}

#[test]
fn invalid_inputs_are_rejected() {
    let sandbox = Sandbox::new();

    sandbox
        .labuser()
        .args(["add", "--username", "Bob Smith", "--ssh-key", KEY, "--password-stdin"])
        .write_stdin("S3cret!\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username"));

    sandbox
        .labuser()
        .args(["add", "--username", "bob", "--ssh-key", "ssh-ed25519 AAAA x'; rm -rf /", "--password-stdin"])
        .write_stdin("S3cret!\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid SSH public key"));

    sandbox
        .labuser()
        .args(["add", "--username", "bob", "--ssh-key", KEY, "--password-stdin"])
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Password cannot be empty"));

    assert!(!sandbox.out().join("bob.yml").exists());
    assert!(!sandbox.handoff().exists());
}

#[test]
fn invalid_config_value_is_reported() {
    let sandbox = Sandbox::new();

    sandbox
        .labuser()
        .env("LABUSER_BCRYPT_COST", "three")
        .args(["remove", "--username", "bob", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LABUSER_BCRYPT_COST must be an integer"));
}
