//! Call-site matching: locating `Name(` occurrences on a line.
//!
//! A match requires the name to stand alone as a whole identifier (for
//! qualified names, the segment before the dot too) and to be followed by
//! an opening paren, with optional whitespace in between. Pure inspection;
//! mutation happens in the rewriter.

/// A matched widget-construction call site on one line. Transient: offsets
/// are only valid until the line is next mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Byte offset where the matched name begins.
    pub start: usize,
    /// Byte offset just past the matched name.
    pub name_end: usize,
    /// Byte offset of the `(` opening the argument list.
    pub open_paren: usize,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Whether `line[start..start + name.len()]` is a whole-identifier
/// occurrence: no identifier character or dot-qualification abutting
/// either side. `x.Button(` must not match a bare `Button` entry, and
/// `MyButton(` must not match `Button`.
fn is_whole_match(line: &str, start: usize, name_len: usize) -> bool {
    let before = line[..start].chars().next_back();
    if let Some(ch) = before {
        if is_ident_char(ch) || ch == '.' {
            return false;
        }
    }
    let after = line[start + name_len..].chars().next();
    if let Some(ch) = after {
        if is_ident_char(ch) {
            return false;
        }
    }
    true
}

/// Find the first call site for `name` at or after byte offset `from`.
///
/// Returns `None` when the name never occurs as a whole identifier
/// followed by optional ASCII whitespace and `(`.
pub fn find_call(line: &str, from: usize, name: &str) -> Option<CallSite> {
    debug_assert!(!name.is_empty());

    let mut search_at = from;
    while search_at <= line.len() {
        let rel = line[search_at..].find(name)?;
        let start = search_at + rel;
        let name_end = start + name.len();

        if is_whole_match(line, start, name.len()) {
            // Optional whitespace, then the opening paren.
            let rest = &line[name_end..];
            let trimmed = rest.trim_start_matches([' ', '\t']);
            if trimmed.starts_with('(') {
                let open_paren = name_end + (rest.len() - trimmed.len());
                return Some(CallSite {
                    start,
                    name_end,
                    open_paren,
                });
            }
        }

        // Not a call site here; resume just past this occurrence.
        search_at = start + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_simple_call() {
        let site = find_call("b = Button(parent)", 0, "Button").unwrap();
        assert_eq!(site.start, 4);
        assert_eq!(site.name_end, 10);
        assert_eq!(site.open_paren, 10);
    }

    #[test]
    fn matches_qualified_call() {
        let site = find_call("b = tk.Button(parent)", 0, "tk.Button").unwrap();
        assert_eq!(site.start, 4);
        assert_eq!(site.open_paren, 13);
    }

    #[test]
    fn whitespace_before_paren_allowed() {
        let site = find_call("Button (parent)", 0, "Button").unwrap();
        assert_eq!(site.open_paren, 7);
    }

    #[test]
    fn substring_of_longer_identifier_rejected() {
        assert_eq!(find_call("MyButton(parent)", 0, "Button"), None);
        assert_eq!(find_call("Buttons(parent)", 0, "Button"), None);
    }

    #[test]
    fn qualified_prefix_rejected_for_bare_name() {
        // `tk.Button(` is a match for the `tk.Button` entry, not `Button`.
        assert_eq!(find_call("tk.Button(parent)", 0, "Button"), None);
    }

    #[test]
    fn name_without_call_rejected() {
        assert_eq!(find_call("Button = get_widget()", 0, "Button"), None);
    }

    #[test]
    fn skips_false_match_then_finds_real_one() {
        let line = "x = MyButton(1) or Button(parent)";
        let site = find_call(line, 0, "Button").unwrap();
        assert_eq!(&line[site.start..site.name_end], "Button");
        assert_eq!(site.start, 19);
    }

    #[test]
    fn from_offset_respected() {
        let line = "Button(a); Button(b)";
        let site = find_call(line, 1, "Button").unwrap();
        assert_eq!(site.start, 11);
    }
}
