//! # labuser playbook
//!
//! Turns a provisioning request into Ansible playbook text:
//! - Playbook model (document, steps, parameters)
//! - Builder mapping add and remove requests onto fixed step sequences
//! - Rendering to block YAML wrapped as a single-play list

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod render;
pub mod types;

pub use builder::{placeholder, PlaybookBuilder, PlaybookSettings};
pub use render::{render, serialize_document, unwrap_document, wrap, RenderedPlaybook};
pub use types::{ParamValue, PlaybookDocument, Step};
