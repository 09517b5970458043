use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;

#[derive(Debug)]
pub enum FHVError {
    IoError(Error),
    PathExpansion(String),
    LoggingFailed(String),
}

impl From<Error> for FHVError {
    fn from(err: Error) -> Self {
        FHVError::IoError(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    Exit,
    ScrollDown,
    ScrollUp,
    ScrollPageDown,
    ScrollPageUp,
    ScrollTop,
    ScrollBottom,
    ToggleFloating,
    Help,
    Resize(usize, usize),
}

#[derive(Debug, Clone, Setters)]
pub struct FHVConfig {
    pub event_poll_time: u64,
    pub scroll_step: usize,
    pub status_message_timeout: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for FHVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            scroll_step: 1,
            status_message_timeout: 5,
            log_file: None,
        }
    }
}

pub const HELP_TEXT: &str = "
 j / Down      scroll down one line
 k / Up        scroll up one line
 PageDown      scroll down one page
 PageUp        scroll up one page
 g / Home      jump to the top
 G / End       jump to the bottom
 f             attach / detach floating headers
 h / ?         toggle this help
 Esc           close this popup
 q             quit
";
