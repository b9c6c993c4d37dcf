//! Batch run reports
//!
//! Outcomes collected by a batch run and the text printed for them.

use std::path::PathBuf;

/// What happened to one document in a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Rewritten (or, in a dry run, would be)
    Migrated {
        moved: Vec<String>,
        inferred: Vec<String>,
    },
    /// Already migrated; left untouched
    Unchanged,
    /// Rejected by the migrator or unreadable; left untouched
    Skipped { reason: String },
}

/// Outcome for one document, keyed by its skill directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Skill directory relative to the store root
    pub relative: PathBuf,
    pub outcome: DocumentOutcome,
}

/// Outcomes of a batch run in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub dry_run: bool,
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn changed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Migrated { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped { .. }))
    }

    pub fn total(&self) -> usize {
        self.documents.len()
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.outcome)).count()
    }
}

/// Format a batch report, one line per document plus a summary line
///
/// # Arguments
/// * `report` - Batch report from a store run
///
/// # Returns
/// Report text ready to print
pub fn format_report(report: &BatchReport) -> String {
    let mut result = String::new();

    for doc in &report.documents {
        let path = doc.relative.display();
        match &doc.outcome {
            DocumentOutcome::Migrated { moved, inferred } => {
                let label = if report.dry_run {
                    "WOULD CHANGE"
                } else {
                    "MIGRATED"
                };
                result.push_str(&format!("  {}: {}", label, path));
                let mut details = Vec::new();
                if !moved.is_empty() {
                    details.push(format!("moved: {}", moved.join(", ")));
                }
                if !inferred.is_empty() {
                    details.push(format!("inferred: {}", inferred.join(", ")));
                }
                if !details.is_empty() {
                    result.push_str(&format!(" ({})", details.join("; ")));
                }
                result.push('\n');
            }
            DocumentOutcome::Unchanged => {
                result.push_str(&format!("  NO CHANGE: {}\n", path));
            }
            DocumentOutcome::Skipped { reason } => {
                result.push_str(&format!("  SKIP ({}): {}\n", reason, path));
            }
        }
    }

    result.push_str(&format!(
        "\n{}/{} skills migrated.\n",
        report.changed(),
        report.total()
    ));
    result
}
