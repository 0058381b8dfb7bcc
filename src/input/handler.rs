use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the game controller
    Intent(Intent),
    /// Leave immediately, whatever the game state
    Exit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Exit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Intent(Intent::MoveUp),
            KeyCode::Down => KeyAction::Intent(Intent::MoveDown),
            KeyCode::Left => KeyAction::Intent(Intent::MoveLeft),
            KeyCode::Right => KeyAction::Intent(Intent::MoveRight),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Intent(Intent::MoveUp),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Intent(Intent::MoveDown),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Intent(Intent::MoveLeft),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Intent(Intent::MoveRight),

            // Controls
            KeyCode::Enter => KeyAction::Intent(Intent::Start),
            KeyCode::Char(' ') => KeyAction::Intent(Intent::ResumeOrStart),
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Intent(Intent::PauseToggle),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Intent(Intent::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Intent(Intent::Quit),
            KeyCode::Esc => KeyAction::Exit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            KeyAction::Intent(Intent::MoveUp)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            KeyAction::Intent(Intent::MoveDown)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Intent(Intent::MoveLeft)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            KeyAction::Intent(Intent::MoveRight)
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            KeyAction::Intent(Intent::MoveUp)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            KeyAction::Intent(Intent::MoveLeft)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('s'))),
            KeyAction::Intent(Intent::MoveDown)
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(d_upper),
            KeyAction::Intent(Intent::MoveRight)
        );
    }

    #[test]
    fn test_control_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter)),
            KeyAction::Intent(Intent::Start)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char(' '))),
            KeyAction::Intent(Intent::ResumeOrStart)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('p'))),
            KeyAction::Intent(Intent::PauseToggle)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('R'))),
            KeyAction::Intent(Intent::Restart)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q'))),
            KeyAction::Intent(Intent::Quit)
        );
    }

    #[test]
    fn test_exit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Exit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Exit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x'))),
            KeyAction::None
        );
    }
}
