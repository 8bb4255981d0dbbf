//! Debugger session parameters

use serde::{Deserialize, Serialize};

/// How much detail the debugger reports about variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarParams {
    /// Dereference pointers automatically; can return very large values
    pub follow_pointers: bool,
    /// How far to recurse into nested types
    pub max_recurse: i32,
    /// Maximum bytes read from a string
    pub max_string_len: i32,
    /// Maximum elements read from an array, slice or map
    pub max_array_values: i32,
    /// Maximum struct fields read; -1 reads all
    pub max_struct_fields: i32,
}

impl VarParams {
    /// Settings for listing all local variables
    pub const LIST: VarParams = VarParams {
        follow_pointers: false,
        max_recurse: 4,
        max_string_len: 100,
        max_array_values: 10,
        max_struct_fields: -1,
    };

    /// Settings for fetching one variable in full
    pub const GET: VarParams = VarParams {
        follow_pointers: false,
        max_recurse: 10,
        max_string_len: 1024,
        max_array_values: 1024,
        max_struct_fields: -1,
    };
}

impl Default for VarParams {
    fn default() -> Self {
        Self::LIST
    }
}

/// How the debugger attaches to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DebugMode {
    /// Build and run an executable
    #[default]
    Exec,
    /// Build and run tests
    Test,
    /// Attach to a running process
    Attach,
}

/// Overall debugger parameters
///
/// Mode and pid are chosen per session and are not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugParams {
    /// How to start the session
    #[serde(skip)]
    pub mode: DebugMode,
    /// Process to attach to in [`DebugMode::Attach`]
    #[serde(skip)]
    pub pid: u64,
    /// Extra arguments for the debugger
    pub args: Vec<String>,
    /// Detail when listing variables
    pub var_list: VarParams,
    /// Detail when fetching a single variable
    pub get_var: VarParams,
}

impl Default for DebugParams {
    fn default() -> Self {
        Self {
            mode: DebugMode::Exec,
            pid: 0,
            args: Vec::new(),
            var_list: VarParams::LIST,
            get_var: VarParams::GET,
        }
    }
}

impl DebugParams {
    /// Parameters for attaching to `pid`
    pub fn attach(pid: u64) -> Self {
        Self {
            mode: DebugMode::Attach,
            pid,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DebugParams::default();
        assert_eq!(params.var_list.max_recurse, 4);
        assert_eq!(params.var_list.max_string_len, 100);
        assert_eq!(params.var_list.max_array_values, 10);
        assert_eq!(params.get_var.max_recurse, 10);
        assert_eq!(params.get_var.max_array_values, 1024);
        assert_eq!(params.get_var.max_struct_fields, -1);
        assert!(!params.get_var.follow_pointers);
    }

    #[test]
    fn test_mode_and_pid_not_persisted() {
        let params = DebugParams::attach(4242);
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("pid").is_none());
        assert!(json.get("mode").is_none());

        let back: DebugParams = serde_json::from_value(json).unwrap();
        assert_eq!(back.mode, DebugMode::Exec);
        assert_eq!(back.pid, 0);
        assert_eq!(back.get_var, VarParams::GET);
    }
}
