//! In-memory playbook model.

use indexmap::IndexMap;
use labuser_types::{ActionKind, Operation};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

/// Value of a step parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Text, possibly containing `{{ var }}` placeholders
    Text(String),
    /// Boolean switch such as `append`
    Flag(bool),
}

impl ParamValue {
    /// Text content, if this is a text parameter.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            ParamValue::Flag(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

/// One declarative task in a playbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Human readable task name
    pub description: String,
    /// What the task does
    pub action: ActionKind,
    /// Module parameters, in emission order
    pub parameters: IndexMap<String, ParamValue>,
}

impl Step {
    /// Create a step with no parameters.
    pub fn new(description: impl Into<String>, action: ActionKind) -> Self {
        Self {
            description: description.into(),
            action,
            parameters: IndexMap::new(),
        }
    }

    /// Add a parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }
}

// Emitted as `{name, <module>: {...}}`. Free-form modules take their command
// as the module value and the rest of the parameters under `args`.
impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let module = self.action.module();

        let Some(free_form) = self.action.free_form_param() else {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("name", &self.description)?;
            map.serialize_entry(module, &self.parameters)?;
            return map.end();
        };

        let command = self.parameters.get(free_form).ok_or_else(|| {
            S::Error::custom(format!(
                "step '{}' is missing its '{}' parameter",
                self.description, free_form
            ))
        })?;
        let args: IndexMap<&str, &ParamValue> = self
            .parameters
            .iter()
            .filter(|(key, _)| key.as_str() != free_form)
            .map(|(key, value)| (key.as_str(), value))
            .collect();

        let mut map = serializer.serialize_map(Some(if args.is_empty() { 2 } else { 3 }))?;
        map.serialize_entry("name", &self.description)?;
        map.serialize_entry(module, command)?;
        if !args.is_empty() {
            map.serialize_entry("args", &args)?;
        }
        map.end()
    }
}

/// A complete playbook: one play against every host, run with privilege
/// escalation.
///
/// Field order is emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybookDocument {
    /// Variant this document was built for; not part of the output
    #[serde(skip)]
    pub operation: Operation,

    /// Host pattern the play targets
    #[serde(rename = "hosts")]
    pub target_scope: String,

    /// Whether tasks run with privilege escalation
    #[serde(rename = "become")]
    pub elevate: bool,

    /// Values referenced by `{{ name }}` placeholders in the steps
    #[serde(rename = "vars")]
    pub variables: IndexMap<String, String>,

    /// Ordered tasks
    #[serde(rename = "tasks")]
    pub steps: Vec<Step>,
}

impl PlaybookDocument {
    /// Host pattern every generated playbook targets.
    pub const ALL_HOSTS: &'static str = "all";

    /// Empty document for `operation`, targeting all hosts with escalation.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            target_scope: Self::ALL_HOSTS.to_string(),
            elevate: true,
            variables: IndexMap::new(),
            steps: Vec::new(),
        }
    }

    /// Add a variable.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Append a step.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Actions of every step, in order.
    pub fn actions(&self) -> Vec<ActionKind> {
        self.steps.iter().map(|s| s.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_serializes_module_parameters() {
        let step = Step::new("Remove user", ActionKind::RemoveUser)
            .param("name", "{{ username }}")
            .param("state", "absent");

        let yaml = serde_yaml::to_string(&step).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["name"].as_str(), Some("Remove user"));
        assert_eq!(value["user"]["name"].as_str(), Some("{{ username }}"));
        assert_eq!(value["user"]["state"].as_str(), Some("absent"));
        assert!(yaml.starts_with("name: Remove user\n"));
    }

    #[test]
    fn test_free_form_step_uses_args() {
        let step = Step::new("Append key", ActionKind::AppendAuthorizedKey)
            .param("cmd", "echo hi >> /tmp/out")
            .param("creates", "/tmp/out");

        let value: serde_yaml::Value =
            serde_yaml::from_str(&serde_yaml::to_string(&step).unwrap()).unwrap();

        assert_eq!(value["shell"].as_str(), Some("echo hi >> /tmp/out"));
        assert_eq!(value["args"]["creates"].as_str(), Some("/tmp/out"));
        assert!(value["args"].get("cmd").is_none());
    }

    #[test]
    fn test_free_form_step_without_command_fails() {
        let step = Step::new("Broken", ActionKind::AppendAuthorizedKey).param("creates", "/x");
        assert!(serde_yaml::to_string(&step).is_err());
    }

    #[test]
    fn test_flag_parameter_is_boolean() {
        let step = Step::new("Create", ActionKind::CreateUser).param("append", true);
        let value: serde_yaml::Value =
            serde_yaml::from_str(&serde_yaml::to_string(&step).unwrap()).unwrap();
        assert_eq!(value["user"]["append"].as_bool(), Some(true));
    }
}
