//! Interactive prompts.
//!
//! Each prompt loops until the answer is acceptable. Recoverable problems
//! are reported on stderr and the question is asked again.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};
use labuser_provision::{confirm_secret, validate_public_key, validate_secret, RequestValidator};
use labuser_types::{Operation, PlaybookStore, PublicKey, Username};
use std::fmt::Display;
use std::io::BufRead;
use zeroize::{Zeroize, Zeroizing};

fn retry(problem: impl Display) {
    eprintln!("{} {}", "!".yellow().bold(), problem);
}

/// Ask for a username that has no add playbook yet.
pub fn new_username<S: PlaybookStore>(validator: &RequestValidator<S>) -> Result<Username> {
    loop {
        let raw: String = Input::new()
            .with_prompt("Enter the new username")
            .interact_text()?;

        let identity = match Username::new(&raw) {
            Ok(identity) => identity,
            Err(e) => {
                retry(e);
                continue;
            }
        };

        match validator.validate(&identity, Operation::Add) {
            Ok(()) => return Ok(identity),
            Err(e) if e.is_recoverable() => retry(e),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Ask for the username to remove.
pub fn existing_username() -> Result<Username> {
    loop {
        let raw: String = Input::new()
            .with_prompt("Enter the username to remove")
            .interact_text()?;

        match Username::new(&raw) {
            Ok(identity) => return Ok(identity),
            Err(e) => retry(e),
        }
    }
}

/// Ask for a password twice until both entries match.
pub fn new_password() -> Result<String> {
    loop {
        let mut secret = Zeroizing::new(
            Password::new()
                .with_prompt("Enter the password for the new user")
                .interact()?,
        );
        if let Err(e) = validate_secret(&secret) {
            retry(e);
            continue;
        }

        let confirmation = Zeroizing::new(
            Password::new()
                .with_prompt("Confirm the password")
                .interact()?,
        );

        match confirm_secret(&secret, &confirmation) {
            Ok(()) => return Ok(std::mem::take(&mut *secret)),
            Err(e) => retry(e),
        }
    }
}

/// Read the password from the first line of stdin.
pub fn password_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let mut secret = Zeroizing::new(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string());
    line.zeroize();

    validate_secret(&secret)?;
    Ok(std::mem::take(&mut *secret))
}

/// Ask for an SSH public key line.
pub fn public_key() -> Result<PublicKey> {
    loop {
        let raw: String = Input::new()
            .with_prompt("Paste the user's public SSH key")
            .interact_text()?;

        match validate_public_key(&raw) {
            Ok(key) => return Ok(key),
            Err(e) => retry(e),
        }
    }
}

/// Yes/no question defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()?)
}
