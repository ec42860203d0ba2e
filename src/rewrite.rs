//! Line- and file-level rewriting orchestration.
//!
//! The engine entry point is [`rewrite_source`]: a pure function from
//! (file text, renaming table) to a [`FileTransform`]. Nothing here
//! touches the file system; persisting results is the driver's job.

use std::collections::BTreeSet;

use crate::inject;
use crate::matcher;
use crate::scan;
use crate::table::RenameTable;

/// Comment appended when a widget needs an accessible name but no
/// display-text literal exists to infer one from. Opt-in.
const TODO_COMMENT: &str = "# TODO: Add accessible_name parameter";

/// Rewriting knobs beyond the renaming table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// Append a TODO comment to lines where a label-requiring widget has
    /// no display text to infer an accessible name from.
    pub include_todos: bool,
}

/// The result of rewriting one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransform {
    /// Complete rewritten text. Identical to the input when nothing matched.
    pub text: String,
    /// Target names introduced by renaming, deduplicated and sorted.
    pub introduced: BTreeSet<String>,
    /// Whether an import of the destination library already existed
    /// before rewriting.
    pub import_was_present: bool,
}

impl FileTransform {
    /// Whether the rewrite changed anything.
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Rewrite a single line: rename every matched call site and inject
/// accessible names where a display-text literal allows it.
///
/// Table entries are processed in table order, matches left-to-right
/// within the line; every replacement operates on the progressively
/// rewritten text, so offsets are never reused across mutations. A call
/// already rewritten to a target name matches no source key, which is
/// what makes a second pass a no-op.
///
/// Returns the rewritten line and the target names introduced on it.
pub fn rewrite_line(
    line: &str,
    table: &RenameTable,
    options: RewriteOptions,
) -> (String, Vec<String>) {
    let mut text = line.to_string();
    let mut introduced = Vec::new();

    for entry in table.entries() {
        let mut from = 0;
        while let Some(site) = matcher::find_call(&text, from, &entry.source) {
            text.replace_range(site.start..site.name_end, &entry.target);
            introduced.push(entry.target.clone());

            // Offsets after the rename shift by the name-length delta.
            let open_paren =
                site.open_paren + entry.target.len() - (site.name_end - site.start);

            if inject::label_required(&entry.target)
                && !inject::has_label_keyword(&text, open_paren, table.label_keyword())
            {
                match inject::find_display_text(&text, open_paren) {
                    Some(label) => {
                        text = inject::inject_label(
                            &text,
                            open_paren,
                            &label,
                            table.label_keyword(),
                        );
                    }
                    None if options.include_todos && !text.contains(TODO_COMMENT) => {
                        text = format!("{}  {}", text.trim_end(), TODO_COMMENT);
                    }
                    None => {}
                }
            }

            from = site.start + entry.target.len();
        }
    }

    (text, introduced)
}

/// Rewrite the complete text of one file. See [`rewrite_source_with`].
pub fn rewrite_source(content: &str, table: &RenameTable) -> FileTransform {
    rewrite_source_with(content, table, RewriteOptions::default())
}

/// Rewrite the complete text of one file: every line through
/// [`rewrite_line`], then a synthesized import declaration when renaming
/// introduced target names and the file did not already import the
/// destination library.
///
/// Running the result through this function again produces no further
/// changes.
pub fn rewrite_source_with(
    content: &str,
    table: &RenameTable,
    options: RewriteOptions,
) -> FileTransform {
    let import_was_present = has_destination_import(content, table);

    let mut introduced = BTreeSet::new();
    let mut lines: Vec<String> = Vec::new();
    for line in content.split('\n') {
        let (rewritten, names) = rewrite_line(line, table, options);
        introduced.extend(names);
        lines.push(rewritten);
    }

    if !introduced.is_empty() && !import_was_present {
        let insert_at = import_insertion_index(&lines);
        for (offset, import_line) in import_declaration(&introduced, table).enumerate() {
            lines.insert(insert_at + offset, import_line);
        }
    }

    FileTransform {
        text: lines.join("\n"),
        introduced,
        import_was_present,
    }
}

/// Whether the file already imports the destination library, in either
/// of the two declaration shapes the original tool recognized.
fn has_destination_import(content: &str, table: &RenameTable) -> bool {
    let from_import = format!("from {} import", table.import_module());
    let root = table.import_module().split('.').next().unwrap_or_default();
    let plain_import = format!("import {root}");

    content
        .split('\n')
        .any(|line| line.contains(&from_import) || line.contains(&plain_import))
}

/// Maximum import line width before switching to the parenthesized
/// multi-line form.
const IMPORT_WRAP_COLUMN: usize = 88;

/// Build the import declaration covering exactly the introduced names.
/// Yields one line in the common case, or a parenthesized multi-line
/// form when the single line would run past the wrap column.
fn import_declaration<'a>(
    names: &'a BTreeSet<String>,
    table: &RenameTable,
) -> impl Iterator<Item = String> + 'a {
    let head = format!("from {} import ", table.import_module());
    let joined: Vec<&str> = names.iter().map(String::as_str).collect();

    let single = format!("{head}{}", joined.join(", "));
    let lines = if single.len() <= IMPORT_WRAP_COLUMN {
        vec![single]
    } else {
        let mut out = Vec::new();
        let mut current = format!("{head}({}", joined[0]);
        for name in &joined[1..] {
            let candidate = format!("{current}, {name}");
            if candidate.len() > IMPORT_WRAP_COLUMN - 3 {
                out.push(format!("{current},"));
                current = format!("    {name}");
            } else {
                current = candidate;
            }
        }
        out.push(current);
        out.push(")".to_string());
        out
    };

    lines.into_iter()
}

fn is_import_line(stripped: &str) -> bool {
    stripped.starts_with("import ") || stripped.starts_with("from ")
}

fn references_gui_toolkit(stripped: &str) -> bool {
    // `customtkinter` contains `tkinter`, so two substrings cover all three
    // toolkits.
    stripped.contains("tkinter") || stripped.contains("ttk")
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Choose the line index at which to insert the synthesized import:
/// immediately after the last contiguous block of import declarations
/// that reference the legacy GUI toolkit, else after the last contiguous
/// block of imports in general, else the top of the file. Imports inside
/// `try:` blocks do not count as declaration lines.
fn import_insertion_index(lines: &[String]) -> usize {
    fn close_block(
        end: Option<usize>,
        has_gui: bool,
        last: &mut Option<usize>,
        gui: &mut Option<usize>,
    ) {
        if let Some(end) = end {
            *last = Some(end);
            if has_gui {
                *gui = Some(end);
            }
        }
    }

    let mut in_try = false;
    let mut try_indent = 0;

    // End index (exclusive) of the block currently being accumulated,
    // plus the ends of the last block seen and of the last GUI block.
    let mut block_end: Option<usize> = None;
    let mut block_has_gui = false;
    let mut last_block_end: Option<usize> = None;
    let mut last_gui_block_end: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        let stripped = line.trim();

        if stripped.starts_with("try:") {
            in_try = true;
            try_indent = indent_width(line);
        } else if in_try && !stripped.is_empty() && indent_width(line) <= try_indent {
            in_try = false;
        }

        if !in_try && is_import_line(stripped) {
            block_has_gui = block_has_gui || references_gui_toolkit(stripped);
            block_end = Some(idx + 1);
        } else {
            close_block(
                block_end.take(),
                block_has_gui,
                &mut last_block_end,
                &mut last_gui_block_end,
            );
            block_has_gui = false;
        }
    }
    close_block(
        block_end,
        block_has_gui,
        &mut last_block_end,
        &mut last_gui_block_end,
    );

    last_gui_block_end.or(last_block_end).unwrap_or(0)
}

/// Per-file change report shown in interactive and dry-run modes.
#[derive(Debug, Clone, Default)]
pub struct MigrationSummary {
    /// (source name, call-site count) for every table entry that matched,
    /// in table order.
    pub widget_counts: Vec<(String, usize)>,
    /// Total matched call sites.
    pub total_widgets: usize,
    /// Lines that differ between original and rewritten text.
    pub lines_changed: usize,
    /// Whether rewriting added the destination import.
    pub import_added: bool,
}

/// Summarize the changes between a file's original and rewritten text.
pub fn migration_summary(
    original: &str,
    transform: &FileTransform,
    table: &RenameTable,
) -> MigrationSummary {
    let mut widget_counts = Vec::new();
    let mut total = 0;

    for entry in table.entries() {
        let mut count = 0;
        for line in original.split('\n') {
            let mut from = 0;
            while let Some(site) = matcher::find_call(line, from, &entry.source) {
                count += 1;
                from = site.name_end;
            }
        }
        if count > 0 {
            widget_counts.push((entry.source.clone(), count));
            total += count;
        }
    }

    let lines_changed = original
        .split('\n')
        .zip(transform.text.split('\n'))
        .filter(|(old, new)| old != new)
        .count();

    MigrationSummary {
        widget_counts,
        total_widgets: total,
        lines_changed,
        import_added: !transform.import_was_present && !transform.introduced.is_empty(),
    }
}
