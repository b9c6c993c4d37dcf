//! Frontmatter Migration Library
//!
//! This library moves top-level frontmatter fields of Markdown documents
//! (`author`, `repo`, `tags`, ...) under a nested `metadata:` block, leaving
//! every other byte of the document untouched: comments, quoting, key
//! order, block scalars and the body all survive as written.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Migration Layer**: `migration` module - Line-oriented text surgery on one document
//! - **Document Layer**: `document` and `validation` modules - Splitting and structural checks
//! - **Persistence Layer**: `storage` and `report` modules - Discovery, batch rewrite of `SKILL.md` files and the run report
//!
//! # Example
//!
//! ```
//! use frontmatter_migrate::{InferenceContext, Migrator};
//!
//! let text = "---\nname: pdf-merge-tool-extra\nauthor: bob\n---\nBody\n";
//! let context = InferenceContext::new("pdf-merge-tool-extra").with_namespace("alice");
//!
//! let migration = Migrator::default().migrate(text, &context).unwrap();
//! assert!(migration.changed);
//! assert_eq!(
//!     migration.text,
//!     "---\nname: pdf-merge-tool-extra\nmetadata:\n  author: bob\n  tags: [pdf, merge, tool, curated]\n---\nBody\n"
//! );
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod formatting;
pub mod migration;
pub mod report;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::{ConflictPolicy, FieldSpec, Inference, MigrationConfig, SequenceStyle};
pub use document::Document;
pub use error::{MigrateError, MigrateResult};
pub use migration::{InferenceContext, InferredValue, Migration, Migrator, derive_tags, migrate};
pub use report::{BatchReport, DocumentOutcome, DocumentReport, format_report};
pub use storage::SkillStore;
