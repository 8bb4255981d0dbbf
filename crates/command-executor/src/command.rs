//! A program invocation ready to be launched

use async_process::Command as AsyncCommand;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Program, arguments, environment and working directory of one process
///
/// Methods consume and return `self` so a command reads as one expression:
///
/// ```
/// use command_executor::Command;
///
/// let cmd = Command::new("go").args(["test", "./..."]).current_dir("/src/app");
/// assert_eq!(cmd.command_line(), "go test ./...");
/// ```
///
/// The working directory travels with the command. Launching never changes
/// the working directory of the host process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    current_dir: Option<PathBuf>,
}

impl Command {
    /// Command running `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments in order
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable on top of the inherited environment
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Run the process in `dir`
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Extra environment variables
    pub fn envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Working directory, if one was set
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Program and arguments joined by single spaces
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn to_async(&self) -> AsyncCommand {
        let mut cmd = AsyncCommand::new(&self.program);
        cmd.args(&self.args).envs(&self.env);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let cmd = Command::new("go").args(["build", "-v", "./cmd"]);
        assert_eq!(cmd.command_line(), "go build -v ./cmd");
        assert_eq!(Command::new("make").command_line(), "make");
    }

    #[test]
    fn test_empty_args_are_kept() {
        let cmd = Command::new("git").args(["commit", "-m", ""]);
        assert_eq!(cmd.arguments(), ["commit", "-m", ""]);
        assert_eq!(cmd.command_line(), "git commit -m ");
    }

    #[test]
    fn test_env_and_dir() {
        let cmd = Command::new("pdflatex")
            .arg("paper.tex")
            .env("TEXINPUTS", "./styles:")
            .current_dir("/docs");

        assert_eq!(cmd.program(), "pdflatex");
        assert_eq!(cmd.envs().get("TEXINPUTS").map(String::as_str), Some("./styles:"));
        assert_eq!(cmd.working_dir(), Some(Path::new("/docs")));
        assert_eq!(cmd.clone(), cmd);
    }
}
