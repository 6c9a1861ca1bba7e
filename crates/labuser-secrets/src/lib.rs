//! # labuser Secrets
//!
//! Turns plaintext passwords into salted, crypt-style hashes that can be
//! embedded in a playbook and handed to the remote account mechanism as a
//! pre-hashed password.
//!
//! The plaintext never leaves this crate: callers get back a
//! [`Credential`](labuser_types::Credential) holding only the hash and salt.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hasher;

pub use hasher::BcryptHasher;
