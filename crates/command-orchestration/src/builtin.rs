//! Compiled-in standard commands
//!
//! User commands with the same name replace these in place; see
//! [`merge`](crate::registry::merge).

use crate::command::{CommandDefinition, ProcessStep};

const FILE_DIR: &str = "{FileDirPath}";

fn cmd(
    name: &str,
    description: &str,
    executable: &str,
    args: &[&str],
    dir: Option<&str>,
    wait: bool,
) -> CommandDefinition {
    let mut def = CommandDefinition::new(name, ProcessStep::new(executable, args.iter().copied()))
        .with_description(description)
        .waiting(wait);
    if let Some(dir) = dir {
        def = def.in_dir(dir);
    }
    def
}

fn go(name: &str, description: &str, args: &[&str], dir: &str, wait: bool) -> CommandDefinition {
    cmd(name, description, "go", args, Some(dir), wait).with_languages(["Go"])
}

/// The standard command set, in display order
pub fn builtin_commands() -> Vec<CommandDefinition> {
    vec![
        cmd("Run Proj", "run RunExec executable set in project", "{RunExec}", &[], None, false),
        // Go
        cmd("Imports Go File", "run goimports on file", "goimports", &["-w", "{FilePath}"], Some(FILE_DIR), true)
            .with_languages(["Go"]),
        cmd("Fmt Go File", "run go fmt on file", "gofmt", &["-w", "{FilePath}"], Some(FILE_DIR), true)
            .with_languages(["Go"]),
        go("Build Go File", "run go build to build in current dir", &["build", "-v", FILE_DIR], FILE_DIR, false),
        go("Build Go Proj", "run go build for project BuildDir", &["build", "-v", "{BuildDir}"], "{BuildDir}", false),
        go("Test Go", "run go test in current dir", &["test", "-v", FILE_DIR], FILE_DIR, false),
        go("Vet Go", "run go vet in current dir", &["vet", FILE_DIR], FILE_DIR, false),
        // Git
        cmd("Adds Git", "git add file", "git", &["add", "{FilePath}"], Some(FILE_DIR), true),
        cmd("Status Git", "git status", "git", &["status", FILE_DIR], Some(FILE_DIR), true),
        cmd("Log Git", "git log", "git", &["log", FILE_DIR], Some(FILE_DIR), false),
        // The message prompt is answered before the run, so it must wait
        cmd("Commit Git", "git commit", "git", &["commit", "-am", "{PromptString1}"], Some(FILE_DIR), true),
        cmd("Pull Git", "git pull", "git", &["pull"], None, true),
        cmd("Push Git", "git push", "git", &["push"], None, true),
        // SVN
        cmd("Adds SVN", "svn add file", "svn", &["add", "{FilePath}"], Some(FILE_DIR), true),
        cmd("Status SVN", "svn status", "svn", &["status", FILE_DIR], Some(FILE_DIR), true),
        cmd("Info SVN", "svn info", "svn", &["info", FILE_DIR], Some(FILE_DIR), true),
        cmd("Log SVN", "svn log", "svn", &["log", "-v", FILE_DIR], Some(FILE_DIR), false),
        cmd("Commit SVN", "svn commit", "svn", &["commit", "-m", "{PromptString1}"], Some(FILE_DIR), true),
        cmd("Update SVN", "svn update", "svn", &["update"], None, true),
        // LaTeX
        cmd(
            "LaTeX PDF File",
            "run PDFLaTeX on file",
            "pdflatex",
            &["-file-line-error", "-interaction=nonstopmode", "{FilePath}"],
            Some(FILE_DIR),
            false,
        )
        .with_languages(["LaTeX"]),
        // Misc
        cmd("List Dir", "list current dir", "ls", &["-la"], Some(FILE_DIR), false),
        cmd("Echo prompt", "echo string prompt 1", "echo", &["{PromptString1}"], Some(FILE_DIR), false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique_and_runnable() {
        let commands = builtin_commands();
        let names: HashSet<_> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), commands.len());
        assert!(commands.iter().all(CommandDefinition::is_runnable));
        assert!(commands.iter().all(|c| c.name.trim() == c.name));
    }

    #[test]
    fn test_commit_commands_prompt_and_wait() {
        for cmd in builtin_commands().iter().filter(|c| c.name.starts_with("Commit")) {
            assert!(cmd.wait, "{} should wait", cmd.name);
            assert!(cmd.prompts().contains("PromptString1"));
        }
    }

    #[test]
    fn test_go_commands_tagged() {
        let commands = builtin_commands();
        let go: Vec<_> = commands.iter().filter(|c| c.name.contains("Go")).collect();
        assert_eq!(go.len(), 6);
        assert!(go.iter().all(|c| c.languages == vec!["Go".to_string()]));
    }
}
