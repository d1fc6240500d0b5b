//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{PackageLocation, Process, Task};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S UTC";

impl PrettyPrint for Task {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.guid.len().max(30));

        let mut lines = vec![
            format!("Task: {}", self.guid),
            divider,
            format!("Name:           {}", self.name),
            format!("State:          {}", self.state),
            format!("Sequence:       {}", self.sequence_id),
        ];

        if !self.command.is_empty() {
            lines.push(format!("Command:        {}", self.command));
        }

        if !self.droplet_guid.is_empty() {
            lines.push(format!("Droplet:        {}", self.droplet_guid));
        }

        lines.push(format!(
            "Quota:          {} MB memory, {} MB disk",
            self.memory_in_mb, self.disk_in_mb
        ));

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format(TIMESTAMP)));
        }

        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", updated.format(TIMESTAMP)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Process {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.guid.len().max(30));

        let mut lines = vec![
            format!("Process: {}", self.guid),
            divider,
            format!("Type:           {}", self.process_type),
            format!("Instances:      {}", self.instances),
            format!(
                "Quota:          {} MB memory, {} MB disk",
                self.memory_in_mb, self.disk_in_mb
            ),
            format!("Health Check:   {}", self.health_check.check_type),
        ];

        if let Some(ref command) = self.command {
            lines.push(format!("Command:        {}", command));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for PackageLocation {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.guid.len().max(30));

        [
            format!("Package: {}", self.guid),
            divider,
            format!("Download:       {}", self.download_href),
        ]
        .join("\n")
    }
}
