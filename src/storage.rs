//! Skill document storage
//!
//! A skill tree is laid out as `<root>/<namespace>/<skill>/SKILL.md`. The
//! store finds those documents, reads and writes them, and runs a migrator
//! across all of them, one document at a time.

use crate::migration::{InferenceContext, Migrator};
use crate::report::{BatchReport, DocumentOutcome, DocumentReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of a skill document
pub const SKILL_FILE: &str = "SKILL.md";

/// File-based store of skill documents
pub struct SkillStore {
    root: PathBuf,
    file_name: String,
}

impl SkillStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file_name: SKILL_FILE.to_string(),
        }
    }

    /// Use a document file name other than `SKILL.md`
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find skill directories that contain a document
    ///
    /// Scans `<root>/<namespace>/<skill>/` two levels deep. Directories whose
    /// names start with `.` are skipped.
    ///
    /// # Returns
    /// Skill directories relative to the root, sorted
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for namespace in sub_dirs(&self.root)? {
            for skill in sub_dirs(&namespace)? {
                if skill.join(&self.file_name).is_file() {
                    let relative = skill.strip_prefix(&self.root).with_context(|| {
                        format!("{} is outside {}", skill.display(), self.root.display())
                    })?;
                    found.push(relative.to_path_buf());
                }
            }
        }
        found.sort();
        Ok(found)
    }

    /// Path of the document in a skill directory
    pub fn document_path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative).join(&self.file_name)
    }

    pub fn load(&self, relative: &Path) -> Result<String> {
        let path = self.document_path(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn save(&self, relative: &Path, text: &str) -> Result<()> {
        let path = self.document_path(relative);
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Migrate every discovered document
    ///
    /// Rejected or unreadable documents are reported as skipped and left
    /// as they are; the run continues with the next document. Documents are
    /// written only when their text changed and `dry_run` is off.
    ///
    /// # Arguments
    /// * `migrator` - Migrator to apply
    /// * `dry_run` - Report what would change without writing
    /// * `source` - Source coordinate used to infer missing source fields
    pub fn migrate_all(
        &self,
        migrator: &Migrator,
        dry_run: bool,
        source: Option<&str>,
    ) -> Result<BatchReport> {
        let mut report = BatchReport {
            dry_run,
            documents: Vec::new(),
        };

        for relative in self.discover()? {
            let outcome = self.migrate_one(migrator, &relative, dry_run, source)?;
            report.documents.push(DocumentReport { relative, outcome });
        }

        info!(
            changed = report.changed(),
            unchanged = report.unchanged(),
            skipped = report.skipped(),
            dry_run,
            "batch migration finished"
        );
        Ok(report)
    }

    fn migrate_one(
        &self,
        migrator: &Migrator,
        relative: &Path,
        dry_run: bool,
        source: Option<&str>,
    ) -> Result<DocumentOutcome> {
        let text = match self.load(relative) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %relative.display(), "skipping unreadable document: {e:#}");
                return Ok(DocumentOutcome::Skipped {
                    reason: "unreadable".to_string(),
                });
            }
        };

        let mut context = InferenceContext::from_relative_path(relative);
        if let Some(source) = source {
            context = context.with_source(source);
        }

        let migration = match migrator.migrate(&text, &context) {
            Ok(migration) => migration,
            Err(e) => {
                warn!(path = %relative.display(), "skipping document: {e}");
                return Ok(DocumentOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
        };

        if !migration.changed {
            debug!(path = %relative.display(), "already migrated");
            return Ok(DocumentOutcome::Unchanged);
        }

        if !dry_run {
            self.save(relative, &migration.text)?;
        }
        info!(
            path = %relative.display(),
            moved = ?migration.moved,
            inferred = ?migration.inferred,
            dry_run,
            "migrated"
        );
        Ok(DocumentOutcome::Migrated {
            moved: migration.moved,
            inferred: migration.inferred,
        })
    }
}

/// Immediate subdirectories of `dir`, hidden ones excluded
fn sub_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_skill(root: &Path, relative: &str, text: &str) {
        let dir = root.join(relative);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SKILL_FILE), text).unwrap();
    }

    #[test]
    fn test_discover_sorted_and_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        write_skill(temp_dir.path(), "bob/zeta", "---\n---\n");
        write_skill(temp_dir.path(), "alice/alpha", "---\n---\n");
        write_skill(temp_dir.path(), ".git/hooks", "---\n---\n");
        fs::create_dir_all(temp_dir.path().join("alice/empty")).unwrap();

        let store = SkillStore::new(temp_dir.path());
        let found = store.discover().unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("alice/alpha"), PathBuf::from("bob/zeta")]
        );
    }

    #[test]
    fn test_discover_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = SkillStore::new(temp_dir.path().join("missing"));
        assert!(store.discover().is_err());
    }

    #[test]
    fn test_load_and_save() {
        let temp_dir = TempDir::new().unwrap();
        write_skill(temp_dir.path(), "alice/demo", "---\nname: demo\n---\n");

        let store = SkillStore::new(temp_dir.path());
        let relative = Path::new("alice/demo");
        assert_eq!(store.load(relative).unwrap(), "---\nname: demo\n---\n");

        store.save(relative, "---\nname: other\n---\n").unwrap();
        assert_eq!(store.load(relative).unwrap(), "---\nname: other\n---\n");
    }

    #[test]
    fn test_custom_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("alice/demo");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README.md"), "---\n---\n").unwrap();

        let store = SkillStore::new(temp_dir.path()).with_file_name("README.md");
        assert_eq!(store.discover().unwrap(), vec![PathBuf::from("alice/demo")]);
    }
}
