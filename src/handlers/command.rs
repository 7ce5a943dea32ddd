use crate::protocol::{CommandCode, SaveMode};

use super::{
    Clock, Division, Image, ScrollingText, SetVariable, StaticText,
    control::{encode_exit, encode_persistence},
};

/// Every command the controller understands.
///
/// Each variant holds already validated fields, so encoding cannot fail.
/// Payload length is checked when the payload is framed.
#[derive(Debug, Clone, Eq, PartialEq, derive_more::From)]
pub enum SignCommand {
    Division(Division),
    ScrollingText(ScrollingText),
    StaticText(StaticText),
    Image(Image),
    Clock(Clock),
    SetVariable(SetVariable),
    Persistence(SaveMode),
    #[from(ignore)]
    Exit,
}

impl SignCommand {
    /// Returns the opcode placed in the first payload byte.
    ///
    /// ```
    /// use cpower::{CommandCode, SaveMode, SignCommand};
    ///
    /// assert_eq!(CommandCode::Save, SignCommand::Persistence(SaveMode::Reset).opcode());
    /// assert_eq!(CommandCode::Exit, SignCommand::Exit.opcode());
    /// ```
    #[must_use]
    pub fn opcode(&self) -> CommandCode {
        match self {
            Self::Division(_) => CommandCode::Division,
            Self::ScrollingText(_) => CommandCode::Text,
            Self::StaticText(_) => CommandCode::StaticText,
            Self::Image(_) => CommandCode::Image,
            Self::Clock(_) => CommandCode::Clock,
            Self::SetVariable(_) => CommandCode::SetVariable,
            Self::Persistence(_) => CommandCode::Save,
            Self::Exit => CommandCode::Exit,
        }
    }

    /// Encodes the unescaped payload.
    ///
    /// ```
    /// use cpower::SignCommand;
    ///
    /// assert_eq!(vec![0x06], SignCommand::Exit.encode());
    /// ```
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Division(division) => division.encode(),
            Self::ScrollingText(text) => text.encode(),
            Self::StaticText(text) => text.encode(),
            Self::Image(image) => image.encode(),
            Self::Clock(clock) => clock.encode(),
            Self::SetVariable(variable) => variable.encode(),
            Self::Persistence(mode) => encode_persistence(*mode),
            Self::Exit => encode_exit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::handlers::{FormattedText, Window, WindowIndex};

    use super::*;

    #[test]
    fn payload_starts_with_opcode() {
        let commands: Vec<SignCommand> = vec![
            Division::new(vec![Window::new(0, 0, 64, 16)])
                .expect("layout should build")
                .into(),
            ScrollingText::new(WindowIndex::default(), FormattedText::default()).into(),
            Clock::builder().window(WindowIndex::default()).build().into(),
            SetVariable::new(vec![1]).into(),
            SaveMode::Save.into(),
            SignCommand::Exit,
        ];
        for command in commands {
            assert_eq!(command.opcode().as_raw(), command.encode()[0]);
        }
    }
}
