use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode};

use crate::domain::{FHVConfig, FHVError, Message};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &FHVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, _model: &Model) -> Result<Option<Message>, FHVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    return Ok(self.handle_key(key));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp),
            KeyCode::PageDown => Some(Message::ScrollPageDown),
            KeyCode::PageUp => Some(Message::ScrollPageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::ScrollTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::ScrollBottom),
            KeyCode::Char('f') => Some(Message::ToggleFloating),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
