//! Rendering: generic YAML serialization, then wrapping the body as the single
//! entry of a play list.
//!
//! `serialize_document` knows nothing about the list the runner expects, and
//! `wrap` knows nothing about YAML beyond line indentation.

use super::types::{ParamValue, PlaybookDocument};
use labuser_types::{LabUserError, Operation, Result};
use std::fmt;
use tracing::debug;

/// First line of every rendered playbook.
pub const DOCUMENT_START: &str = "---";

/// Indentation added to every body line.
pub const INDENT: &str = "  ";

const TEMPLATE_DELIMITERS: [&str; 3] = ["{{", "{%", "{#"];

/// A playbook ready to be written to disk.
///
/// Only [`render`] produces this type, and nothing accepts it as input, so a
/// rendered document cannot be wrapped a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPlaybook {
    operation: Operation,
    text: String,
}

impl RenderedPlaybook {
    /// Variant the playbook was built for.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Full document text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for RenderedPlaybook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Serialize and wrap `document`.
///
/// Takes the document by value: once rendered it is gone.
pub fn render(document: PlaybookDocument) -> Result<RenderedPlaybook> {
    let body = serialize_document(&document)?;
    let text = wrap(&body, document.operation.title())?;

    debug!(
        operation = %document.operation,
        bytes = text.len(),
        "Rendered playbook"
    );

    Ok(RenderedPlaybook {
        operation: document.operation,
        text,
    })
}

/// Serialize `document` as a block-style YAML mapping.
///
/// Fails with `Serialization` when a value cannot be represented safely.
pub fn serialize_document(document: &PlaybookDocument) -> Result<String> {
    check_representable(document)?;

    serde_yaml::to_string(document)
        .map_err(|e| LabUserError::Serialization(format!("Failed to serialize playbook: {}", e)))
}

/// Nest `body` under a `- name: <title>` list entry.
///
/// Produces the document start marker, a blank line, the title line, then
/// every body line indented by [`INDENT`].
pub fn wrap(body: &str, title: &str) -> Result<String> {
    if body.starts_with(DOCUMENT_START) {
        return Err(LabUserError::Serialization(
            "Document is already wrapped".to_string(),
        ));
    }
    if title.is_empty() || title.contains('\n') {
        return Err(LabUserError::Serialization(format!(
            "Invalid play title: {:?}",
            title
        )));
    }

    let mut text = String::with_capacity(body.len() * 2 + title.len() + 16);
    text.push_str(DOCUMENT_START);
    text.push_str("\n\n- name: ");
    text.push_str(title);
    text.push('\n');

    for line in body.lines() {
        text.push_str(INDENT);
        text.push_str(line);
        text.push('\n');
    }

    Ok(text)
}

/// Strip the wrapper added by [`wrap`], returning the bare body.
pub fn unwrap_document(text: &str) -> Result<String> {
    let header = format!("{}\n\n- name: ", DOCUMENT_START);
    let rest = text
        .strip_prefix(header.as_str())
        .ok_or_else(|| LabUserError::Serialization("Missing playbook header".to_string()))?;
    let (_title, body) = rest
        .split_once('\n')
        .ok_or_else(|| LabUserError::Serialization("Missing playbook body".to_string()))?;

    let mut unwrapped = String::with_capacity(body.len());
    for (number, line) in body.lines().enumerate() {
        let line = line.strip_prefix(INDENT).ok_or_else(|| {
            LabUserError::Serialization(format!(
                "Body line {} is not indented: {:?}",
                number + 1,
                line
            ))
        })?;
        unwrapped.push_str(line);
        unwrapped.push('\n');
    }

    Ok(unwrapped)
}

// Values must stay on one line, and variables must not smuggle in template
// syntax the runner would evaluate.
fn check_representable(document: &PlaybookDocument) -> Result<()> {
    for (name, value) in &document.variables {
        reject_control_chars(&format!("variable '{}'", name), value)?;

        if let Some(delimiter) = TEMPLATE_DELIMITERS.iter().find(|d| value.contains(**d)) {
            return Err(LabUserError::Serialization(format!(
                "Variable '{}' contains template delimiter '{}'",
                name, delimiter
            )));
        }
    }

    for step in &document.steps {
        reject_control_chars("task name", &step.description)?;

        for (key, value) in &step.parameters {
            if let ParamValue::Text(text) = value {
                reject_control_chars(&format!("parameter '{}' of '{}'", key, step.description), text)?;
            }
        }
    }

    Ok(())
}

fn reject_control_chars(what: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| c.is_control()) {
        Some(c) => Err(LabUserError::Serialization(format!(
            "{} contains control character {:?}",
            what, c
        ))),
        None => Ok(()),
    }
}
