//! Frontmatter migration
//!
//! Moves configured top-level fields of a frontmatter block under a nested
//! key without reformatting anything else. The block is treated as text,
//! not as data: lines are classified, target fields are cut out with their
//! continuation lines, and the block is stitched back together with the
//! relocated lines spliced into the nested sub-block.
//!
//! ## Pipeline
//!
//! 1. **classify**: tag each line as a top-level key line or a continuation
//! 2. **extract**: group lines into fields and partition out the targets
//! 3. **infer**: fill in target fields missing from both locations
//! 4. **reassemble**: splice moved and inferred lines into the sub-block
//! 5. **migrate**: drive the above for one document and verify the result
//!
//! ## Example
//!
//! ```text
//! ---                                ---
//! name: pdf-merge-tool-extra         name: pdf-merge-tool-extra
//! author: bob               ─────►   metadata:
//! ---                                  author: bob
//!                                      tags: [pdf, merge, tool, curated]
//!                                    ---
//! ```

mod classify;
mod extract;
mod infer;
mod migrate;
mod reassemble;

pub use classify::{FieldGroup, Line, classify_block, classify_line, group_fields};
pub use extract::{Extraction, extract_fields};
pub use infer::{InferenceContext, InferredField, InferredValue, derive_tags, infer_missing};
pub use migrate::{Migration, Migrator, migrate};
pub use reassemble::{Reassembler, SubBlockLayout, clear_null_header, reindent, splice_inline};
