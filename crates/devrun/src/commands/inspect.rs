use anyhow::{Context, Result};
use debug_model::{VarParams, Variable};
use std::path::Path;
use std::process::ExitCode;

/// Default per-node length bound for rendered values
const DEFAULT_MAX_LEN: usize = 1024;

pub fn run(path: &Path, multiline: bool, depth: Option<usize>, max_len: Option<usize>, info: bool) -> Result<ExitCode> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let var: Variable = serde_json::from_str(&content).context("Failed to parse variable JSON")?;

    if !var.is_consistent() {
        tracing::warn!(name = %var.name, kind = ?var.kind, "variable contents do not match its kind");
    }

    if info {
        println!("{}", var.type_info(true));
        return Ok(ExitCode::SUCCESS);
    }

    let depth = depth.unwrap_or(VarParams::LIST.max_recurse.max(0) as usize);
    let max_len = max_len.unwrap_or(DEFAULT_MAX_LEN);
    println!("{} = {}", var.name, var.value_string(multiline, 0, depth, max_len, true));
    Ok(ExitCode::SUCCESS)
}
