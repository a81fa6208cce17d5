use anyhow::Result;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    command: String,
    #[serde(default)]
    expect: Option<String>,
}

/// One console command and, optionally, a line its output must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScriptStep {
    pub command: String,
    pub expect: Option<String>,
}

impl CommandScriptStep {
    /// Whether `lines` satisfy this step's expectation.
    pub fn check(&self, lines: &[String]) -> bool {
        match &self.expect {
            Some(expected) => lines.iter().any(|line| line.contains(expected.as_str())),
            None => true,
        }
    }
}

/// Scripted console session.
///
/// Scripts are a JSON list of `{command, expect?}` steps, executed in file order.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        for step in file.steps {
            let command = step.command.trim().to_string();
            if command.is_empty() {
                anyhow::bail!("command script contains an empty command");
            }
            let expect = step.expect.filter(|expected| !expected.is_empty());
            pending.push_back(CommandScriptStep { command, expect });
        }

        Ok(Self { pending })
    }

    /// Next step, if any remain.
    pub fn next_step(&mut self) -> Option<CommandScriptStep> {
        self.pending.pop_front()
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_script_rejects_empty_commands() {
        let json = r#"{
            "steps": [
                {"command": "load"},
                {"command": "   "}
            ]
        }"#;
        let err = CommandScriptPlayer::from_str(json).unwrap_err();
        assert!(
            err.to_string().contains("empty command"),
            "unexpected error: {err:#}"
        );
        assert!(CommandScriptPlayer::from_str(r#"{"steps": []}"#).is_err());
    }

    #[test]
    fn command_script_yields_steps_in_order() {
        let json = r#"{
            "steps": [
                {"command": " load ", "expect": "Loaded"},
                {"command": "assign m1 1", "expect": ""},
                {"command": "slots"}
            ]
        }"#;
        let mut script = CommandScriptPlayer::from_str(json).expect("script should parse");

        let first = script.next_step().unwrap();
        assert_eq!(first.command, "load");
        assert!(first.check(&["Loaded 3 items in 4 categories".to_string()]));
        assert!(!first.check(&["Error: Could not load the item catalog".to_string()]));

        let second = script.next_step().unwrap();
        assert_eq!(second.expect, None);
        assert!(second.check(&[]));

        assert_eq!(script.next_step().unwrap().command, "slots");
        assert!(script.is_finished());
        assert!(script.next_step().is_none());
    }
}
