//! Lexical delimiter scanning.
//!
//! The only primitive in this crate that understands "structure": a single
//! left-to-right pass tracking bracket depth and string-literal state.
//! Every higher layer (matcher, injector, rewriter) delegates here instead
//! of re-implementing bracket/quote logic.

/// Tracks nesting depth across the three bracket kinds plus string state.
///
/// Depth counters are clamped at zero on underflow so unbalanced input
/// degrades to "no separator found" instead of corrupting later decisions.
#[derive(Debug, Default, Clone, Copy)]
struct LexState {
    round: u32,
    square: u32,
    curly: u32,
    /// The quote character that opened the current string literal, if any.
    string_open: Option<char>,
}

impl LexState {
    fn at_top_level(&self) -> bool {
        self.round == 0 && self.square == 0 && self.curly == 0 && self.string_open.is_none()
    }

    /// Advance over one character. `prev` is the preceding character, used
    /// to detect backslash-escaped quotes. The lookbehind is a single
    /// character, so a quote following a doubled backslash is misread as
    /// escaped; the scan then reports nothing rather than a wrong offset.
    fn step(&mut self, ch: char, prev: Option<char>) {
        if let Some(open) = self.string_open {
            if (ch == '"' || ch == '\'') && ch == open && prev != Some('\\') {
                self.string_open = None;
            }
            // Everything else inside a string is inert.
            return;
        }

        match ch {
            '"' | '\'' if prev != Some('\\') => self.string_open = Some(ch),
            '(' => self.round += 1,
            ')' => self.round = self.round.saturating_sub(1),
            '[' => self.square += 1,
            ']' => self.square = self.square.saturating_sub(1),
            '{' => self.curly += 1,
            '}' => self.curly = self.curly.saturating_sub(1),
            _ => {}
        }
    }
}

/// Find the first comma at bracket depth zero and outside any string
/// literal, scanning from byte offset `start`.
///
/// The caller guarantees `start` is not inside a string literal that opened
/// before `start`. Returns `None` when no top-level comma exists, including
/// for unbalanced input that never returns to depth zero.
pub fn find_top_level_separator(text: &str, start: usize) -> Option<usize> {
    let mut state = LexState::default();
    let mut prev = None;

    for (idx, ch) in text[start..].char_indices() {
        if ch == ',' && state.at_top_level() {
            return Some(start + idx);
        }
        state.step(ch, prev);
        prev = Some(ch);
    }

    None
}

/// Find the `)` that closes the `(` at byte offset `open`.
///
/// Uses the same string-aware depth walk as [`find_top_level_separator`].
/// Returns `None` when the paren is never closed on this text, which
/// callers treat as "no safe span, leave the line alone".
pub fn matching_close_paren(text: &str, open: usize) -> Option<usize> {
    debug_assert_eq!(text[open..].chars().next(), Some('('));

    let mut state = LexState::default();
    let mut prev = None;

    for (idx, ch) in text[open..].char_indices() {
        // The closing paren for our opener is the one that would take the
        // round counter from 1 back to 0.
        if ch == ')' && state.string_open.is_none() && state.round == 1 {
            return Some(open + idx);
        }
        state.step(ch, prev);
        prev = Some(ch);
    }

    None
}
