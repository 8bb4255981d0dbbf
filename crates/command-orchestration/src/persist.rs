//! JSON persistence of command lists

use crate::command::CommandDefinition;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the user's command overrides
pub const COMMANDS_FILE_NAME: &str = "command_prefs.json";

/// Application directory inside the user config dir
const APP_DIR: &str = "devrun";

/// Read a JSON array of commands
pub fn load_commands(path: impl AsRef<Path>) -> Result<Vec<CommandDefinition>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let commands: Vec<CommandDefinition> = serde_json::from_str(&content).map_err(Error::Decode)?;
    debug!(path = %path.display(), count = commands.len(), "loaded commands");
    Ok(commands)
}

/// Write commands as a pretty-printed JSON array, creating parent directories
pub fn save_commands(path: impl AsRef<Path>, commands: &[CommandDefinition]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(commands).map_err(Error::Encode)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = commands.len(), "saved commands");
    Ok(())
}

/// Default location of the user's command overrides
pub fn default_commands_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(COMMANDS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ProcessStep;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(COMMANDS_FILE_NAME);
        let commands = vec![
            CommandDefinition::new("Build", ProcessStep::new("make", ["all"])).waiting(true),
            CommandDefinition::new("List Dir", ProcessStep::new("ls", ["-la"])).in_dir("{FileDirPath}"),
        ];

        save_commands(&path, &commands).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"), "expected pretty output: {}", text);

        assert_eq!(load_commands(&path).unwrap(), commands);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_commands(dir.path().join("none.json")).unwrap_err();
        assert!(matches!(missing, Error::Io { .. }));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(load_commands(&bad).unwrap_err(), Error::Decode(_)));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = default_commands_path() {
            assert!(path.ends_with(Path::new(APP_DIR).join(COMMANDS_FILE_NAME)));
        }
    }
}
