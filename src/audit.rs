//! Accessibility audit checks.
//!
//! A lexical checker that consumes raw source text and emits diagnostic
//! records. It shares no state with the rewriting engine: the audit never
//! edits anything, and the engine never consults it.

use crate::inject;
use crate::matcher;
use crate::table::RenameTable;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One audit finding.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// 0-based column (byte offset into the line).
    pub column: usize,
    pub message: String,
    pub code: &'static str,
    pub severity: Severity,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Aria,
    Keyboard,
    Focus,
    Color,
    TextAlternatives,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Aria => write!(f, "aria"),
            Category::Keyboard => write!(f, "keyboard"),
            Category::Focus => write!(f, "focus"),
            Category::Color => write!(f, "color"),
            Category::TextAlternatives => write!(f, "text-alternatives"),
        }
    }
}

/// Mouse-only binding events that need a keyboard equivalent.
const MOUSE_ONLY_EVENTS: &[&str] = &["<Button-1>", "<Double-Button-1>", "<ButtonRelease-1>"];

/// Binding events that indicate keyboard support is present.
const KEYBOARD_EVENTS: &[&str] = &["<Key", "<Return>", "<space>", "<Tab>", "<FocusIn>"];

/// How far around a mouse binding to look for a keyboard one.
const KEYBOARD_SEARCH_RADIUS: usize = 10;

/// Focus-grabbing calls that need an event or initialization context.
const FOCUS_CALLS: &[&str] = &[".focus_set()", ".focus_force()", ".focus()"];

/// Function-name fragments that mark a legitimate focus context:
/// event handlers, construction/setup paths, and tests.
const FOCUS_CONTEXT_NAMES: &[&str] = &[
    "event", "click", "key", "handler", "callback", "init", "setup", "main", "test",
];

/// How far back/ahead of a focus call to look for its context. Contexts
/// mostly precede the call (the enclosing `def`), so the window is
/// asymmetric.
const FOCUS_SEARCH_BACK: usize = 10;
const FOCUS_SEARCH_AHEAD: usize = 2;

/// Color words that, paired with a presentation word, suggest
/// color-coded information.
const COLOR_WORDS: &[&str] = &["red", "green", "blue", "yellow", "orange", "purple", "pink"];
const COLOR_PAIR_WORDS: &[&str] = &["text", "color", "background"];

/// Keyword assignments that show the information is also carried as text.
const TEXT_INDICATOR_KEYWORDS: &[&str] = &[
    "text",
    "message",
    "label",
    "accessible_description",
    "accessible_name",
    "tooltip",
    "status",
];

/// How far around a color-coded line to look for a text indicator.
const TEXT_INDICATOR_SEARCH_RADIUS: usize = 3;

/// Image or icon constructs that need a text alternative.
const IMAGE_CONSTRUCTORS: &[&str] = &["PhotoImage(", "BitmapImage("];
const IMAGE_KEYWORDS: &[&str] = &["image", "icon", "bitmap"];

/// Keyword assignments that count as a text alternative.
const ALT_TEXT_KEYWORDS: &[&str] = &["accessible_description", "accessible_name", "alt", "tooltip"];

/// How far around an image reference to look for a text alternative.
const ALT_TEXT_SEARCH_RADIUS: usize = 5;

/// Run every audit check over one file's text.
///
/// `table` supplies the accessible widget names and the label keyword the
/// aria check looks for; pass [`RenameTable::builtin`] for the stock set.
pub fn audit_source(file: &Path, content: &str, table: &RenameTable) -> Vec<Diagnostic> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut diagnostics = Vec::new();

    check_missing_accessible_name(file, &lines, table, &mut diagnostics);
    check_mouse_only_bindings(file, &lines, &mut diagnostics);
    check_focus_management(file, &lines, &mut diagnostics);
    check_color_only_info(file, &lines, &mut diagnostics);
    check_text_alternatives(file, &lines, &mut diagnostics);

    diagnostics
}

/// A001: an accessible widget that should carry a label is constructed
/// without the label keyword on its line.
fn check_missing_accessible_name(
    file: &Path,
    lines: &[&str],
    table: &RenameTable,
    out: &mut Vec<Diagnostic>,
) {
    // Several table entries can share a target (`tk.Button` and `Button`
    // both map to `AccessibleButton`), so dedupe before scanning.
    let targets: std::collections::BTreeSet<&str> = table
        .entries()
        .iter()
        .map(|entry| entry.target.as_str())
        .filter(|target| inject::label_required(target))
        .collect();

    for (idx, line) in lines.iter().enumerate() {
        for target in &targets {
            let mut from = 0;
            while let Some(site) = matcher::find_call(line, from, target) {
                if !inject::has_label_keyword(line, site.open_paren, table.label_keyword()) {
                    out.push(Diagnostic {
                        file: file.to_path_buf(),
                        line: idx + 1,
                        column: site.start,
                        message: format!(
                            "Widget {} missing {} parameter",
                            target,
                            table.label_keyword()
                        ),
                        code: "A001",
                        severity: Severity::Warning,
                        category: Category::Aria,
                    });
                }
                from = site.name_end;
            }
        }
    }
}

/// A002: a mouse-only event binding with no keyboard binding nearby.
fn check_mouse_only_bindings(file: &Path, lines: &[&str], out: &mut Vec<Diagnostic>) {
    for (idx, line) in lines.iter().enumerate() {
        if !line.contains(".bind(") {
            continue;
        }
        let Some(column) = MOUSE_ONLY_EVENTS
            .iter()
            .find_map(|event| line.find(event))
        else {
            continue;
        };

        let nearby = neighborhood(lines, idx, KEYBOARD_SEARCH_RADIUS);
        let has_keyboard = nearby
            .iter()
            .any(|near| KEYBOARD_EVENTS.iter().any(|event| near.contains(event)));

        if !has_keyboard {
            out.push(Diagnostic {
                file: file.to_path_buf(),
                line: idx + 1,
                column,
                message: "Mouse-only event handler without keyboard equivalent".to_string(),
                code: "A002",
                severity: Severity::Warning,
                category: Category::Keyboard,
            });
        }
    }
}

/// A003: a focus-grabbing call with no event or initialization context
/// nearby.
fn check_focus_management(file: &Path, lines: &[&str], out: &mut Vec<Diagnostic>) {
    for (idx, line) in lines.iter().enumerate() {
        let Some(column) = FOCUS_CALLS.iter().find_map(|call| line.find(call)) else {
            continue;
        };

        let start = idx.saturating_sub(FOCUS_SEARCH_BACK);
        let end = (idx + FOCUS_SEARCH_AHEAD + 1).min(lines.len());
        let has_context = lines[start..end].iter().any(|near| is_focus_context(near));

        if !has_context {
            out.push(Diagnostic {
                file: file.to_path_buf(),
                line: idx + 1,
                column,
                message: "Focus call outside of an event or initialization context"
                    .to_string(),
                code: "A003",
                severity: Severity::Info,
                category: Category::Focus,
            });
        }
    }
}

/// Whether a line establishes a context in which grabbing focus is
/// expected: an event-binding call, a handler/constructor/test function
/// definition, or a comment announcing intentional focus placement.
fn is_focus_context(line: &str) -> bool {
    if line.contains(".bind(") {
        return true;
    }

    let lower = line.to_ascii_lowercase();
    if let Some(rest) = lower.trim_start().strip_prefix("def ") {
        let name: String = rest
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .collect();
        return FOCUS_CONTEXT_NAMES.iter().any(|kw| name.contains(kw));
    }

    if let Some((_, comment)) = lower.split_once('#') {
        return comment.contains("focus");
    }

    false
}

/// A004: a line that color-codes information (status colors, color-word
/// phrasing) with no text indicator nearby.
fn check_color_only_info(file: &Path, lines: &[&str], out: &mut Vec<Diagnostic>) {
    for (idx, line) in lines.iter().enumerate() {
        let lower = line.to_ascii_lowercase();
        if !is_color_coded(&lower) {
            continue;
        }

        let nearby = neighborhood(lines, idx, TEXT_INDICATOR_SEARCH_RADIUS);
        let has_text = nearby.iter().any(|near| {
            TEXT_INDICATOR_KEYWORDS
                .iter()
                .any(|kw| has_assignment(near, kw))
        });

        if !has_text {
            out.push(Diagnostic {
                file: file.to_path_buf(),
                line: idx + 1,
                column: 0,
                message: "Information may be conveyed by color only".to_string(),
                code: "A004",
                severity: Severity::Warning,
                category: Category::Color,
            });
        }
    }
}

/// The color-coding patterns A004 looks for, over a lowercased line:
/// a status color bound to `bg=`/`fg=`, `color=` paired with an
/// error/success mention, or a color word directly modifying a
/// presentation word ("red text", "green background").
fn is_color_coded(lower: &str) -> bool {
    if has_quoted_value(lower, "bg", "red") || has_quoted_value(lower, "fg", "green") {
        return true;
    }
    if (has_quoted_value(lower, "color", "red") && lower.contains("error"))
        || (has_quoted_value(lower, "color", "green") && lower.contains("success"))
    {
        return true;
    }

    COLOR_WORDS.iter().any(|color| {
        let mut search_at = 0;
        while let Some(rel) = lower[search_at..].find(color) {
            let start = search_at + rel;
            let end = start + color.len();

            let bounded_before = lower[..start]
                .chars()
                .next_back()
                .map_or(true, |ch| !ch.is_ascii_alphanumeric() && ch != '_');

            if bounded_before {
                let rest = lower[end..].trim_start_matches([' ', '\t']);
                if rest.len() < lower.len() - end
                    && COLOR_PAIR_WORDS.iter().any(|word| rest.starts_with(word))
                {
                    return true;
                }
            }
            search_at = end;
        }
        false
    })
}

/// Whether `lower` binds `key` to the quoted literal `value`, allowing
/// whitespace around `=`.
fn has_quoted_value(lower: &str, key: &str, value: &str) -> bool {
    let mut search_at = 0;
    while let Some(rel) = lower[search_at..].find(key) {
        let start = search_at + rel;
        let end = start + key.len();

        let bounded_before = lower[..start]
            .chars()
            .next_back()
            .map_or(true, |ch| !ch.is_ascii_alphanumeric() && ch != '_');

        if bounded_before {
            let rest = lower[end..].trim_start_matches([' ', '\t']);
            if let Some(rest) = rest.strip_prefix('=') {
                let rest = rest.trim_start_matches([' ', '\t']);
                let quoted = rest
                    .strip_prefix('"')
                    .map(|r| (r, '"'))
                    .or_else(|| rest.strip_prefix('\'').map(|r| (r, '\'')));
                if let Some((rest, quote)) = quoted {
                    if rest
                        .strip_prefix(value)
                        .is_some_and(|after| after.starts_with(quote))
                    {
                        return true;
                    }
                }
            }
        }
        search_at = end;
    }
    false
}

/// A005: an image or icon without a text alternative nearby.
fn check_text_alternatives(file: &Path, lines: &[&str], out: &mut Vec<Diagnostic>) {
    for (idx, line) in lines.iter().enumerate() {
        let has_image = IMAGE_CONSTRUCTORS.iter().any(|pat| line.contains(pat))
            || IMAGE_KEYWORDS.iter().any(|kw| has_assignment(line, kw));
        if !has_image {
            continue;
        }

        let nearby = neighborhood(lines, idx, ALT_TEXT_SEARCH_RADIUS);
        let has_alt = nearby.iter().any(|near| {
            ALT_TEXT_KEYWORDS.iter().any(|kw| has_assignment(near, kw))
        });

        if !has_alt {
            out.push(Diagnostic {
                file: file.to_path_buf(),
                line: idx + 1,
                column: 0,
                message: "Image or icon without text alternative".to_string(),
                code: "A005",
                severity: Severity::Warning,
                category: Category::TextAlternatives,
            });
        }
    }
}

/// The lines within `radius` of `idx`, inclusive of `idx` itself.
fn neighborhood<'a>(lines: &'a [&'a str], idx: usize, radius: usize) -> &'a [&'a str] {
    let start = idx.saturating_sub(radius);
    let end = (idx + radius + 1).min(lines.len());
    &lines[start..end]
}

/// Whether `line` contains `keyword` as a whole word followed by optional
/// whitespace and `=` (but not `==`).
fn has_assignment(line: &str, keyword: &str) -> bool {
    let mut search_at = 0;
    while let Some(rel) = line[search_at..].find(keyword) {
        let start = search_at + rel;
        let end = start + keyword.len();

        let boundary_before = line[..start]
            .chars()
            .next_back()
            .map_or(true, |ch| !ch.is_ascii_alphanumeric() && ch != '_');

        if boundary_before {
            let rest = line[end..].trim_start_matches([' ', '\t']);
            if rest.starts_with('=') && !rest.starts_with("==") {
                return true;
            }
        }
        search_at = end;
    }
    false
}
