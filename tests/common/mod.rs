//! Common test utilities for integration tests

#![allow(dead_code)]

use frontmatter_migrate::{InferenceContext, Migration, MigrationConfig, Migrator};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Context for a skill named `pdf-merge-tool-extra` curated by `alice`
pub fn test_context() -> InferenceContext {
    InferenceContext::new("pdf-merge-tool-extra").with_namespace("alice")
}

/// Migrate with the default configuration, panicking on rejection
pub fn migrate_default(text: &str) -> Migration {
    Migrator::default()
        .migrate(text, &test_context())
        .unwrap()
}

/// Migrate with a custom configuration, panicking on rejection
pub fn migrate_with(config: MigrationConfig, text: &str) -> Migration {
    Migrator::new(config)
        .unwrap()
        .migrate(text, &test_context())
        .unwrap()
}

/// Number of lines in `text`
pub fn line_count(text: &str) -> usize {
    text.split_inclusive('\n').count()
}

/// Create a skills tree in a temporary directory
///
/// Each entry is `(relative skill directory, SKILL.md content)`.
pub fn create_skill_tree(skills: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (relative, text) in skills {
        write_skill(temp_dir.path(), relative, text);
    }
    temp_dir
}

pub fn write_skill(root: &Path, relative: &str, text: &str) {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("SKILL.md"), text).unwrap();
}

pub fn read_skill(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative).join("SKILL.md")).unwrap()
}
