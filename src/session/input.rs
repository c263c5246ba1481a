#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Clear,
}

/// Single-line text field holding the filter query. The cursor is a char
/// index, always within `0..=value.chars().count()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    value: String,
    cursor: usize,
}

impl FilterInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(index, _)| index)
    }

    /// Applies one edit and reports whether the text changed.
    pub fn apply(&mut self, edit: InputEdit) -> bool {
        match edit {
            InputEdit::Insert(ch) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, ch);
                self.cursor += 1;
                true
            }
            InputEdit::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            InputEdit::Delete => {
                if self.cursor >= self.char_len() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            InputEdit::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            InputEdit::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                false
            }
            InputEdit::Home => {
                self.cursor = 0;
                false
            }
            InputEdit::End => {
                self.cursor = self.char_len();
                false
            }
            InputEdit::Clear => {
                let changed = !self.value.is_empty();
                self.value.clear();
                self.cursor = 0;
                changed
            }
        }
    }

    /// Text before the cursor, the char under it, and the text after it.
    pub fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let at = self.byte_index(self.cursor);
        let (before, rest) = self.value.split_at(at);
        let mut chars = rest.chars();
        match chars.next() {
            Some(ch) => (before, Some(ch), chars.as_str()),
            None => (before, None, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> FilterInput {
        let mut input = FilterInput::default();
        for ch in text.chars() {
            input.apply(InputEdit::Insert(ch));
        }
        input
    }

    #[test]
    fn insert_and_backspace_track_the_cursor() {
        let mut input = typed("prod");
        assert_eq!(input.value(), "prod");
        assert_eq!(input.cursor(), 4);

        assert!(input.apply(InputEdit::Backspace));
        assert_eq!(input.value(), "pro");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn cursor_moves_report_no_text_change() {
        let mut input = typed("ab");
        assert!(!input.apply(InputEdit::Left));
        assert!(!input.apply(InputEdit::Home));
        assert!(!input.apply(InputEdit::Backspace));
        assert!(input.apply(InputEdit::Insert('x')));
        assert_eq!(input.value(), "xab");
        assert!(!input.apply(InputEdit::End));
        assert!(!input.apply(InputEdit::Delete));
        assert!(!input.apply(InputEdit::Right));
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut input = typed("dév");
        input.apply(InputEdit::Home);
        input.apply(InputEdit::Right);
        assert!(input.apply(InputEdit::Delete));
        assert_eq!(input.value(), "dv");
        assert_eq!(input.split_at_cursor(), ("d", Some('v'), ""));
    }

    #[test]
    fn clear_only_changes_non_empty_text() {
        let mut input = FilterInput::default();
        assert!(!input.apply(InputEdit::Clear));
        let mut input = typed("stage");
        assert!(input.apply(InputEdit::Clear));
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }
}
