//! Parser for `vagrant status --machine-readable`

use std::collections::BTreeSet;

use vagrant_inventory_core::Hostname;

use crate::error::VagrantError;

/// Machines whose `state` row reads `running`
///
/// Each line is `timestamp,target,type,data...`.
///
/// # Errors
/// [`VagrantError::StatusParse`] for a non-blank line with fewer than four
/// fields.
pub fn parse_running_hosts(output: &str) -> Result<BTreeSet<Hostname>, VagrantError> {
    let mut hosts = BTreeSet::new();

    for (idx, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.splitn(5, ',').collect();
        let [_, target, kind, data, ..] = fields.as_slice() else {
            return Err(VagrantError::StatusParse {
                line: idx + 1,
                content: line.to_string(),
            });
        };

        if *kind == "state" && *data == "running" {
            hosts.insert((*target).to_string());
        }
    }

    Ok(hosts)
}
