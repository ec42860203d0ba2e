//! tka11y-migrate: codemod engine for migrating Tk GUI code to
//! accessible tkaria11y widgets.
//!
//! # Architecture
//!
//! The engine is deliberately lexical, not syntactic: it locates widget
//! construction call sites inside arbitrary source text and splices in an
//! `accessible_name=` keyword argument, preserving every other byte. No
//! Python parser is involved; the only structural reasoning is delimiter
//! depth and string-literal tracking in [`scan`]. That keeps rewriting
//! robust on messy or partially invalid input, at the cost of line-local
//! guarantees only.
//!
//! Layers, leaf-first: [`scan`] (top-level separator search) ->
//! [`matcher`] (call-site location) -> [`inject`] (keyword-argument
//! splicing) -> [`rewrite`] (line and file orchestration plus import
//! synthesis). [`rewrite_source`] is the single engine entry point: a
//! pure function from file text to rewritten text, which is what makes
//! batch, dry-run, and interactive driver modes possible without
//! re-entering the engine.
//!
//! # Guarantees
//!
//! - Idempotent: rewriting already-rewritten text is a no-op
//! - Minimal diff: unmatched lines come back byte-identical
//! - Degrades safely: unbalanced or unterminated call sites are skipped,
//!   never corrupted
//!
//! # Example
//!
//! ```
//! use tka11y_migrate::{rewrite_source, RenameTable};
//!
//! let table = RenameTable::builtin();
//! let out = rewrite_source("Button(parent, text=\"Submit\")\n", &table);
//! assert_eq!(
//!     out.text,
//!     "from tkaria11y.widgets import AccessibleButton\n\
//!      AccessibleButton(parent, accessible_name=\"Submit\", text=\"Submit\")\n"
//! );
//! ```

pub mod apply;
pub mod audit;
pub mod config;
pub mod inject;
pub mod matcher;
pub mod rewrite;
pub mod scan;
pub mod table;

// Re-exports
pub use apply::{write_rewritten, ApplyError, WriteOutcome};
pub use audit::{audit_source, Category, Diagnostic, Severity};
pub use config::{load_from_path, load_from_str, ConfigError, TableConfig};
pub use rewrite::{
    migration_summary, rewrite_line, rewrite_source, rewrite_source_with, FileTransform,
    MigrationSummary, RewriteOptions,
};
pub use scan::{find_top_level_separator, matching_close_paren};
pub use table::{RenameEntry, RenameTable};
