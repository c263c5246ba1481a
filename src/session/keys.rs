use super::input::InputEdit;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const SCRIPT_KEYS_ENV: &str = "AWS_PROFILE_SWITCHER_SCRIPT_KEYS";

const VALID_SCRIPT_TOKENS: &str =
    "up,down,pageup,pagedown,left,right,home,end,backspace,delete,enter,esc,ctrl-c,ctrl-u,space,comma,<char>,text=<chars>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Cancel,
    Confirm,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Edit(InputEdit),
}

pub fn session_action_from_key(key: KeyEvent) -> Option<SessionAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(SessionAction::Cancel),
            KeyCode::Char('u') => Some(SessionAction::Edit(InputEdit::Clear)),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(SessionAction::Cancel),
        KeyCode::Enter => Some(SessionAction::Confirm),
        KeyCode::Up => Some(SessionAction::MoveUp),
        KeyCode::Down => Some(SessionAction::MoveDown),
        KeyCode::PageUp => Some(SessionAction::PageUp),
        KeyCode::PageDown => Some(SessionAction::PageDown),
        KeyCode::Left => Some(SessionAction::Edit(InputEdit::Left)),
        KeyCode::Right => Some(SessionAction::Edit(InputEdit::Right)),
        KeyCode::Home => Some(SessionAction::Edit(InputEdit::Home)),
        KeyCode::End => Some(SessionAction::Edit(InputEdit::End)),
        KeyCode::Backspace => Some(SessionAction::Edit(InputEdit::Backspace)),
        KeyCode::Delete => Some(SessionAction::Edit(InputEdit::Delete)),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(SessionAction::Edit(InputEdit::Insert(ch)))
        }
        _ => None,
    }
}

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Parses a comma-separated key script such as `text=prod,down,enter`.
pub fn parse_scripted_keys(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(text) = token.strip_prefix("text=") {
            keys.extend(text.chars().map(|ch| plain(KeyCode::Char(ch))));
            continue;
        }
        let mut chars = token.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            keys.push(plain(KeyCode::Char(ch)));
            continue;
        }
        let key = match token.to_ascii_lowercase().as_str() {
            "up" => plain(KeyCode::Up),
            "down" => plain(KeyCode::Down),
            "pageup" => plain(KeyCode::PageUp),
            "pagedown" => plain(KeyCode::PageDown),
            "left" => plain(KeyCode::Left),
            "right" => plain(KeyCode::Right),
            "home" => plain(KeyCode::Home),
            "end" => plain(KeyCode::End),
            "backspace" => plain(KeyCode::Backspace),
            "delete" => plain(KeyCode::Delete),
            "enter" => plain(KeyCode::Enter),
            "esc" => plain(KeyCode::Esc),
            "space" => plain(KeyCode::Char(' ')),
            "comma" => plain(KeyCode::Char(',')),
            "ctrl-c" => KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            "ctrl-u" => KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            other => {
                return Err(format!(
                    "invalid {SCRIPT_KEYS_ENV} token `{other}`; valid tokens: {VALID_SCRIPT_TOKENS}"
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn exit_keys_map_to_cancel_and_confirm() {
        assert_eq!(
            session_action_from_key(key_event(KeyCode::Esc)),
            Some(SessionAction::Cancel)
        );
        assert_eq!(
            session_action_from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(SessionAction::Cancel)
        );
        assert_eq!(
            session_action_from_key(key_event(KeyCode::Enter)),
            Some(SessionAction::Confirm)
        );
    }

    #[test]
    fn typing_keys_become_input_edits() {
        assert_eq!(
            session_action_from_key(key_event(KeyCode::Char('w'))),
            Some(SessionAction::Edit(InputEdit::Insert('w')))
        );
        assert_eq!(
            session_action_from_key(KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT)),
            Some(SessionAction::Edit(InputEdit::Insert('W')))
        );
        assert_eq!(
            session_action_from_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(SessionAction::Edit(InputEdit::Clear))
        );
        assert_eq!(
            session_action_from_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = key_event(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(session_action_from_key(key), None);
    }

    #[test]
    fn scripted_keys_expand_text_and_named_tokens() {
        let keys = parse_scripted_keys("text=ab, down ,space,ctrl-c").expect("parse script");
        let codes = keys.iter().map(|key| key.code).collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![
                KeyCode::Char('a'),
                KeyCode::Char('b'),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Char('c'),
            ]
        );
        assert!(keys[4].modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn scripted_keys_reject_unknown_tokens() {
        let err = parse_scripted_keys("down,launch").expect_err("invalid token");
        assert!(err.contains("`launch`"));
        assert!(err.contains(SCRIPT_KEYS_ENV));
    }
}
