pub(crate) mod command;
pub(crate) mod control;
pub(crate) mod ui;

pub use self::command::{
    Args, ClockArgs, Command, ImageArgs, Link, LogLevel, OutputFormat, SessionSettings,
    SetVariableArgs, StaticTextArgs, TextArgs, WindowsArgs,
};
