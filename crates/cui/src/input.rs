use crate::app::FocusPane;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    CloseHelp,
    NextFocus,
    PrevFocus,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Flip,
    Redraw,
    Type(char),
    Backspace,
    Submit,
    HistoryPrev,
    HistoryNext,
    ClearInput,
}

/// Keys mean different things on the board and in the console: the console
/// swallows printable characters.
pub fn map_key(key: KeyEvent, focus: FocusPane) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputAction::Quit,
            KeyCode::Char('u') if focus == FocusPane::Console => InputAction::ClearInput,
            _ => InputAction::None,
        };
    }
    match key.code {
        KeyCode::Tab => return InputAction::NextFocus,
        KeyCode::BackTab => return InputAction::PrevFocus,
        _ => {}
    }
    match focus {
        FocusPane::Console => map_console_key(key),
        FocusPane::Board | FocusPane::Events => map_board_key(key),
    }
}

fn map_console_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Enter => InputAction::Submit,
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::Esc => InputAction::ClearInput,
        KeyCode::Up => InputAction::HistoryPrev,
        KeyCode::Down => InputAction::HistoryNext,
        KeyCode::Char(ch) => InputAction::Type(ch),
        _ => InputAction::None,
    }
}

fn map_board_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::CloseHelp,
        KeyCode::Up | KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => InputAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => InputAction::MoveRight,
        KeyCode::Enter | KeyCode::Char(' ') => InputAction::Flip,
        KeyCode::Char('d') => InputAction::Redraw,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_board_keys() {
        assert_eq!(map_key(key(KeyCode::Char(' ')), FocusPane::Board), InputAction::Flip);
        assert_eq!(map_key(key(KeyCode::Char('h')), FocusPane::Board), InputAction::MoveLeft);
        assert_eq!(map_key(key(KeyCode::Char('q')), FocusPane::Board), InputAction::Quit);
    }

    #[test]
    fn console_swallows_letters() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), FocusPane::Console),
            InputAction::Type('q')
        );
        assert_eq!(map_key(key(KeyCode::Enter), FocusPane::Console), InputAction::Submit);
        assert_eq!(map_key(key(KeyCode::Up), FocusPane::Console), InputAction::HistoryPrev);
    }

    #[test]
    fn focus_and_quit_work_everywhere() {
        for focus in [FocusPane::Board, FocusPane::Console, FocusPane::Events] {
            assert_eq!(map_key(key(KeyCode::Tab), focus), InputAction::NextFocus);
            assert_eq!(
                map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), focus),
                InputAction::Quit
            );
        }
    }
}
