//! Optional source formatting before a diff.
//!
//! Running the project formatter first makes textual noise even smaller. It
//! is best-effort: a missing tool or a failing run is logged and ignored, and
//! the file is diffed as it is.

use std::path::Path;
use std::process::Command;
use tracing::debug;

/// An external formatter invoked as `<program> <args...> <file>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formatter {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["rescript".to_string(), "format".to_string()],
        }
    }
}

impl Formatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a command line such as `["npx", "rescript", "format"]`.
    ///
    /// Returns `None` for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.is_empty() {
            return None;
        }
        Some(Self::new(program.as_str(), args.to_vec()))
    }

    /// Format `path` in place. Returns whether the formatter succeeded.
    pub fn format_in_place(&self, path: &Path) -> bool {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                debug!(path = %path.display(), program = %self.program, "formatted");
                true
            }
            Ok(output) => {
                debug!(
                    path = %path.display(),
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "formatter failed"
                );
                false
            }
            Err(e) => {
                debug!(program = %self.program, error = %e, "formatter could not start");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let formatter = Formatter::default();
        assert_eq!(formatter.program, "npx");
        assert_eq!(formatter.args, vec!["rescript", "format"]);
    }

    #[test]
    fn test_from_command() {
        let command = vec!["rescript".to_string(), "format".to_string()];
        let formatter = Formatter::from_command(&command).unwrap();
        assert_eq!(formatter.program, "rescript");
        assert_eq!(formatter.args, vec!["format"]);

        assert!(Formatter::from_command(&[]).is_none());
        assert!(Formatter::from_command(&[String::new()]).is_none());
    }

    #[test]
    fn test_missing_program_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.res");
        std::fs::write(&path, "let a = 1\n").unwrap();

        let formatter = Formatter::new("resdiff-no-such-formatter", vec![]);
        assert!(!formatter.format_in_place(&path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "let a = 1\n");
    }
}
