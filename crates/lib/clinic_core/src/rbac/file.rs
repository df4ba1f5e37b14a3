//! Policy file persistence.
//!
//! Casbin-style CSV, one rule per line:
//!
//! ```text
//! p, admin, /v1/dentists/{id}, PUT
//! p, secretary, /v1/services/{id}, (PUT)|(DELETE)
//! ```
//!
//! Lines starting with `#` are comments. Rows with a type other than `p`
//! are skipped.

use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::{info, warn};

use super::{PolicyError, PolicyRule, PolicyTable};

/// Read rules from `path`. A missing file is an empty rule set.
pub fn load_policy_file(path: &Path) -> Result<Vec<PolicyRule>, PolicyError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_path(path)?;

    let mut rules = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match record.get(0) {
            Some("p") => {}
            other => {
                warn!(line, kind = ?other, "skipping non-policy row");
                continue;
            }
        }
        if record.len() != 4 {
            return Err(PolicyError::Malformed {
                line,
                reason: format!("expected 4 fields, found {}", record.len()),
            });
        }
        rules.push(PolicyRule::new(record[1].parse()?, &record[2], &record[3]));
    }
    Ok(rules)
}

/// Write `rules` to `path`, replacing its contents.
pub fn save_policy_file<'a>(
    path: &Path,
    rules: impl IntoIterator<Item = &'a PolicyRule>,
) -> Result<(), PolicyError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    for rule in rules {
        writer.write_record(["p", rule.role.as_str(), rule.path.as_str(), rule.method.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Merge `registered` into the rules already persisted at `path` and write
/// the union back. Persisted rules keep their position ahead of new ones.
pub fn sync_policy_file(path: &Path, registered: &PolicyTable) -> Result<PolicyTable, PolicyError> {
    let mut table: PolicyTable = load_policy_file(path)?.into_iter().collect();
    let persisted = table.len();
    let added = table.extend(registered.rules().iter().cloned());
    save_policy_file(path, table.rules())?;
    info!(path = %path.display(), persisted, added, "policy file synced");
    Ok(table)
}
