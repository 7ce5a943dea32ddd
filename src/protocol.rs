use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::handlers::ValidationError;

/// Command opcodes carried in the first payload byte.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display)]
pub enum CommandCode {
    /// Window layout (division) definition. Fields are big-endian.
    #[strum(to_string = "division")]
    Division,
    /// Scrolling formatted text.
    #[strum(to_string = "text")]
    Text,
    /// Image placement.
    #[strum(to_string = "image")]
    Image,
    /// Static positioned text.
    #[strum(to_string = "static_text")]
    StaticText,
    /// Clock display.
    #[strum(to_string = "clock")]
    Clock,
    /// Leave the current show.
    #[strum(to_string = "exit")]
    Exit,
    /// Save or reset the stored programme.
    #[strum(to_string = "save")]
    Save,
    /// Reserved: single-packet play.
    #[strum(to_string = "play_single")]
    PlaySingle,
    /// Reserved: multi-packet play.
    #[strum(to_string = "play_double")]
    PlayDouble,
    /// Set a controller variable.
    #[strum(to_string = "set_variable")]
    SetVariable,
    /// Reserved: play with variable substitution.
    #[strum(to_string = "play_set_variable")]
    PlaySetVariable,
}

impl CommandCode {
    /// Returns the raw opcode byte.
    ///
    /// ```
    /// use cpower::CommandCode;
    ///
    /// assert_eq!(1, CommandCode::Division.as_raw());
    /// assert_eq!(7, CommandCode::Save.as_raw());
    /// ```
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Division => 1,
            Self::Text => 2,
            Self::Image => 3,
            Self::StaticText => 4,
            Self::Clock => 5,
            Self::Exit => 6,
            Self::Save => 7,
            Self::PlaySingle => 8,
            Self::PlayDouble => 9,
            Self::SetVariable => 10,
            Self::PlaySetVariable => 11,
        }
    }

    /// Looks up the opcode carried in a payload's first byte.
    #[must_use]
    pub fn from_raw(value: u8) -> Option<Self> {
        Self::iter().find(|code| code.as_raw() == value)
    }
}

/// Transition effect used when text enters a window.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, EnumIter, Display, clap::ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Effect {
    None,
    OpenLeft,
    OpenRight,
    OpenHorizontal,
    OpenVertical,
    Shutter,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    ScrollUp,
    #[default]
    ScrollLeft,
    ScrollRight,
}

impl Effect {
    /// Returns the raw effect byte.
    ///
    /// ```
    /// use cpower::Effect;
    ///
    /// assert_eq!(0, Effect::None.as_raw());
    /// assert_eq!(11, Effect::ScrollLeft.as_raw());
    /// ```
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::OpenLeft => 1,
            Self::OpenRight => 2,
            Self::OpenHorizontal => 3,
            Self::OpenVertical => 4,
            Self::Shutter => 5,
            Self::MoveLeft => 6,
            Self::MoveRight => 7,
            Self::MoveUp => 8,
            Self::MoveDown => 9,
            Self::ScrollUp => 10,
            Self::ScrollLeft => 11,
            Self::ScrollRight => 12,
        }
    }
}

/// Horizontal text alignment inside a window.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, EnumIter, Display, clap::ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Left,
    Centre,
    Right,
}

impl Alignment {
    /// Returns the raw alignment byte.
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Centre => 1,
            Self::Right => 2,
        }
    }
}

/// Palette colour used by formatted text.
///
/// Bit 0 drives the red LEDs, bit 1 green and bit 2 blue, so mixed colours are
/// the bitwise union of the primaries.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display, clap::ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum Colour {
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    White,
}

impl Colour {
    /// Returns the raw palette value (`1..=7`).
    ///
    /// ```
    /// use cpower::Colour;
    ///
    /// assert_eq!(1, Colour::Red.as_raw());
    /// assert_eq!(7, Colour::White.as_raw());
    /// ```
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Purple => 5,
            Self::Cyan => 6,
            Self::White => 7,
        }
    }
}

impl TryFrom<u8> for Colour {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Red),
            2 => Ok(Self::Green),
            3 => Ok(Self::Yellow),
            4 => Ok(Self::Blue),
            5 => Ok(Self::Purple),
            6 => Ok(Self::Cyan),
            7 => Ok(Self::White),
            _ => Err(ValidationError::InvalidColour { value }),
        }
    }
}

/// Encoding of the image bytes carried by an image command.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ImageFormat {
    /// Inline GIF data.
    #[default]
    Gif,
    /// Reference to a GIF stored on the controller.
    GifReference,
    /// Reference to an image package stored on the controller.
    PackageReference,
    /// Simple uncompressed bitmap.
    Simple,
}

impl ImageFormat {
    /// Returns the raw image format byte.
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Gif => 1,
            Self::GifReference => 2,
            Self::PackageReference => 3,
            Self::Simple => 4,
        }
    }
}

/// Calendar system used by the clock command.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, EnumIter, Display, clap::ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Calendar {
    #[default]
    Gregorian,
    Lunar,
    Chinese,
    LunarSolar,
}

impl Calendar {
    /// Returns the raw calendar byte.
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Gregorian => 0,
            Self::Lunar => 1,
            Self::Chinese => 2,
            Self::LunarSolar => 3,
        }
    }
}

/// Persistence action carried by the save command.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SaveMode {
    /// Persist the current programme to controller flash.
    Save,
    /// Reset the controller programme.
    Reset,
}

impl SaveMode {
    /// Returns the raw save-mode byte.
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Save => 0,
            Self::Reset => 1,
        }
    }
}
