//! Keyword-argument injection for matched call sites.
//!
//! Given a renamed call site, decides whether and where to splice an
//! `accessible_name="..."` assignment into the argument list, using the
//! delimiter scanner to stay clear of nested structure and string
//! literals. If no safe insertion point exists the line is returned
//! untouched.

use crate::scan;

/// Keyword arguments whose quoted value counts as display text.
const DISPLAY_KEYWORDS: &[&str] = &["text", "label", "title"];

/// Widget kinds that should carry an accessible name. Matched by
/// substring against the target name, so `AccessibleTTKButton` and
/// `AccessibleCTKButton` are both covered by `Button`.
const LABEL_REQUIRED: &[&str] = &[
    "Button",
    "Checkbutton",
    "Radiobutton",
    "Scale",
    "Entry",
    "Listbox",
    "Menu",
    "Menubutton",
    "CTKCheckBox",
    "CTKSlider",
    "CTKComboBox",
];

/// Whether a widget with this target name should receive an injected
/// accessible name. Display-only widgets (frames, labels, canvases) are
/// left alone.
pub fn label_required(target_name: &str) -> bool {
    LABEL_REQUIRED.iter().any(|kind| target_name.contains(kind))
}

/// Extract the display-text literal from the call whose argument list
/// opens at `open_paren`.
///
/// Only top-level arguments are considered: the argument span is bounded
/// by the call's own closing paren and split at top-level commas, so a
/// display literal belonging to a nested call is never claimed by the
/// wrapping call. Returns `None` for unbalanced calls.
pub fn find_display_text(line: &str, open_paren: usize) -> Option<String> {
    let close = scan::matching_close_paren(line, open_paren)?;
    let args = &line[open_paren + 1..close];

    let mut at = 0;
    loop {
        let end = scan::find_top_level_separator(args, at).unwrap_or(args.len());
        if let Some(text) = display_literal(&args[at..end]) {
            return Some(text);
        }
        if end >= args.len() {
            return None;
        }
        at = end + 1;
    }
}

/// Parse one argument slice as `keyword = "literal"` for a display
/// keyword; returns the literal's contents.
fn display_literal(arg: &str) -> Option<String> {
    let arg = arg.trim();
    for keyword in DISPLAY_KEYWORDS {
        let Some(rest) = arg.strip_prefix(keyword) else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();

        let mut chars = rest.chars();
        match chars.next() {
            Some('"') | Some('\'') => {}
            _ => continue,
        }
        let value = chars.as_str();
        // Same shape the original tool accepted: the literal ends at the
        // next quote of either kind, with no quotes inside.
        let end = value.find(['"', '\''])?;
        return Some(value[..end].to_string());
    }
    None
}

/// Whether the call's text span already binds the label keyword.
///
/// A literal substring test, so a keyword name appearing inside an
/// unrelated string can over-trigger. Accepted limitation.
pub fn has_label_keyword(line: &str, open_paren: usize, keyword: &str) -> bool {
    let span = match scan::matching_close_paren(line, open_paren) {
        Some(close) => &line[open_paren..=close],
        None => &line[open_paren..],
    };
    span.contains(&format!("{keyword}="))
}

/// Splice `keyword="label"` into the call opening at `open_paren`.
///
/// Insertion policy:
/// 1. empty argument list: directly after the opening paren;
/// 2. at least one top-level comma: just after the first one, as the
///    second argument slot (after the parent/owner reference);
/// 3. exactly one argument: just before the call's closing paren.
///
/// Unbalanced calls have no safe insertion point and come back unchanged.
pub fn inject_label(line: &str, open_paren: usize, label: &str, keyword: &str) -> String {
    let Some(close) = scan::matching_close_paren(line, open_paren) else {
        return line.to_string();
    };

    let args = &line[open_paren + 1..close];
    if args.trim().is_empty() {
        let insert_at = open_paren + 1;
        return format!(
            "{}{keyword}=\"{label}\"{}",
            &line[..insert_at],
            &line[insert_at..]
        );
    }

    // Search for the first top-level comma within the call span only.
    match scan::find_top_level_separator(&line[..close], open_paren + 1) {
        Some(comma) => {
            let insert_at = comma + 1;
            format!(
                "{} {keyword}=\"{label}\",{}",
                &line[..insert_at],
                &line[insert_at..]
            )
        }
        None => {
            // Single argument: insert before the rightmost closing paren
            // of the call span, which is the span's own closer.
            format!(
                "{}, {keyword}=\"{label}\"{}",
                &line[..close],
                &line[close..]
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_required_for_interactive_widgets() {
        assert!(label_required("AccessibleButton"));
        assert!(label_required("AccessibleTTKButton"));
        assert!(label_required("AccessibleCTKComboBox"));
        assert!(label_required("AccessibleEntry"));
    }

    #[test]
    fn label_not_required_for_display_widgets() {
        assert!(!label_required("AccessibleFrame"));
        assert!(!label_required("AccessibleLabel"));
        assert!(!label_required("AccessibleCanvas"));
    }

    #[test]
    fn display_text_from_text_keyword() {
        let line = "AccessibleButton(parent, text=\"Submit\")";
        assert_eq!(
            find_display_text(line, 16),
            Some("Submit".to_string())
        );
    }

    #[test]
    fn display_text_from_label_and_title() {
        let line = "CTkButton(parent, label='Go')";
        assert_eq!(find_display_text(line, 9), Some("Go".to_string()));

        let line = "Toplevel(root, title=\"Settings\")";
        assert_eq!(find_display_text(line, 8), Some("Settings".to_string()));
    }

    #[test]
    fn display_text_with_spaces_around_equals() {
        let line = "Button(parent, text = \"OK\")";
        assert_eq!(find_display_text(line, 6), Some("OK".to_string()));
    }

    #[test]
    fn nested_display_text_not_claimed_by_outer_call() {
        let line = "Frame(Button(parent, text=\"Go\"))";
        assert_eq!(find_display_text(line, 5), None);
        assert_eq!(find_display_text(line, 12), Some("Go".to_string()));
    }

    #[test]
    fn non_literal_display_value_rejected() {
        let line = "Button(parent, text=some_var)";
        assert_eq!(find_display_text(line, 6), None);
    }

    #[test]
    fn longer_keyword_not_mistaken_for_display_keyword() {
        let line = "Button(parent, texture=\"wood\")";
        assert_eq!(find_display_text(line, 6), None);
    }

    #[test]
    fn unbalanced_call_yields_no_display_text() {
        let line = "Button(parent, text=\"Go\"";
        assert_eq!(find_display_text(line, 6), None);
    }

    #[test]
    fn existing_keyword_detected() {
        let line = "AccessibleButton(parent, accessible_name=\"x\", text=\"x\")";
        assert!(has_label_keyword(line, 16, "accessible_name"));

        let line = "AccessibleButton(parent, text=\"x\")";
        assert!(!has_label_keyword(line, 16, "accessible_name"));
    }

    #[test]
    fn inject_into_empty_argument_list() {
        let line = "AccessibleButton()";
        assert_eq!(
            inject_label(line, 16, "OK", "accessible_name"),
            "AccessibleButton(accessible_name=\"OK\")"
        );
    }

    #[test]
    fn inject_after_first_argument() {
        let line = "AccessibleButton(parent, text=\"Submit\")";
        assert_eq!(
            inject_label(line, 16, "Submit", "accessible_name"),
            "AccessibleButton(parent, accessible_name=\"Submit\", text=\"Submit\")"
        );
    }

    #[test]
    fn inject_with_single_argument() {
        let line = "AccessibleButton(text=\"Hi\")";
        assert_eq!(
            inject_label(line, 16, "Hi", "accessible_name"),
            "AccessibleButton(text=\"Hi\", accessible_name=\"Hi\")"
        );
    }

    #[test]
    fn inject_skips_comma_inside_nested_structure() {
        let line = "AccessibleButton(frames[0], text=\"Go\")";
        assert_eq!(
            inject_label(line, 16, "Go", "accessible_name"),
            "AccessibleButton(frames[0], accessible_name=\"Go\", text=\"Go\")"
        );
    }

    #[test]
    fn inject_leaves_unbalanced_call_untouched() {
        let line = "AccessibleButton(parent, text=\"Go\"";
        assert_eq!(inject_label(line, 16, "Go", "accessible_name"), line);
    }

    #[test]
    fn inject_not_confused_by_trailing_call_on_line() {
        let line = "AccessibleButton(text=\"A\"); helper(x, y)";
        assert_eq!(
            inject_label(line, 16, "A", "accessible_name"),
            "AccessibleButton(text=\"A\", accessible_name=\"A\"); helper(x, y)"
        );
    }
}
