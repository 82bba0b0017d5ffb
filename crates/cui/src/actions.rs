use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::CloseHelp => app.show_help = false,
        InputAction::NextFocus => app.cycle_focus(true),
        InputAction::PrevFocus => app.cycle_focus(false),
        InputAction::MoveUp => app.move_cursor(-1, 0),
        InputAction::MoveDown => app.move_cursor(1, 0),
        InputAction::MoveLeft => app.move_cursor(0, -1),
        InputAction::MoveRight => app.move_cursor(0, 1),
        InputAction::Flip => app.flip_at_cursor(),
        InputAction::Redraw => app.redraw_graph(),
        InputAction::Type(ch) => app.type_char(ch),
        InputAction::Backspace => app.backspace(),
        InputAction::Submit => app.submit_console(),
        InputAction::HistoryPrev => app.history_prev(),
        InputAction::HistoryNext => app.history_next(),
        InputAction::ClearInput => app.clear_input(),
    }
}
