mod display;
mod script;
mod terminal;

pub use display::{DisplayError, TerminalDisplay, status_line};
pub use script::{ClickScript, ParseError};
pub use terminal::run_interactive_terminal;
