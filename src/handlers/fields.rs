use thiserror::Error;

const MAX_WINDOW_INDEX: u8 = 7;
const MAX_TEXT_FONT_SIZE: u8 = 15;
const MAX_CLOCK_FONT_SIZE: u8 = 7;

/// Errors returned when a command field is outside its wire range.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ValidationError {
    /// Window index is outside `0..=7`.
    #[error("invalid window {value}; windows are numbered 0..=7")]
    InvalidWindow { value: u32 },
    /// Unit address does not fit in one byte.
    #[error("invalid unit id {value}; unit ids are 0..=255 (255 broadcasts)")]
    InvalidUnitId { value: u32 },
    /// Palette colour is outside `1..=7`.
    #[error("invalid colour {value}; palette colours are 1..=7")]
    InvalidColour { value: u8 },
    /// Font size code is outside the range accepted by the command.
    #[error("invalid font size {value}; supported sizes are 0..={max}")]
    InvalidFontSize { value: u8, max: u8 },
    /// Text contains a character the controller cannot render.
    #[error("text contains non-ASCII character {character:?}")]
    NonAsciiText { character: char },
    /// A window layout must define between 1 and 255 windows.
    #[error("window layout must contain 1..=255 windows, got {count}")]
    InvalidWindowCount { count: usize },
}

/// Display region selector in the inclusive range `0..=7`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct WindowIndex(u8);

impl WindowIndex {
    /// Creates a validated window index.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is outside `0..=7`.
    ///
    /// ```
    /// use cpower::WindowIndex;
    ///
    /// let window = WindowIndex::new(3)?;
    /// assert_eq!(3, window.value());
    /// assert!(WindowIndex::new(8).is_err());
    /// # Ok::<(), cpower::ValidationError>(())
    /// ```
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        Self::try_from(u32::from(value))
    }

    /// Returns the raw window byte.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for WindowIndex {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(window) if window <= MAX_WINDOW_INDEX => Ok(Self(window)),
            _ => Err(ValidationError::InvalidWindow { value }),
        }
    }
}

/// Controller address. `0xFF` addresses every unit on the link.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, derive_more::Display, derive_more::From)]
#[display("{_0}")]
pub struct UnitId(u8);

impl UnitId {
    /// Broadcast address accepted by every controller.
    pub const BROADCAST: Self = Self(0xFF);

    /// Creates a unit id from a raw byte.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw unit byte.
    ///
    /// ```
    /// use cpower::UnitId;
    ///
    /// assert_eq!(0xFF, UnitId::BROADCAST.value());
    /// ```
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::BROADCAST
    }
}

impl TryFrom<u32> for UnitId {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_overflow| ValidationError::InvalidUnitId { value })
    }
}

/// Font size code used by formatted text (`0..=15`).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct FontSize(u8);

impl FontSize {
    /// Creates a validated formatted-text font size.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is above 15.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > MAX_TEXT_FONT_SIZE {
            return Err(ValidationError::InvalidFontSize {
                value,
                max: MAX_TEXT_FONT_SIZE,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw size code.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Font size code used by the clock command (`0..=7`).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct ClockFontSize(u8);

impl ClockFontSize {
    /// Creates a validated clock font size.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is above 7.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > MAX_CLOCK_FONT_SIZE {
            return Err(ValidationError::InvalidFontSize {
                value,
                max: MAX_CLOCK_FONT_SIZE,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw size code.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// 8-bit RGB intensities used by static text and clock commands.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Full-intensity white.
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);

    /// Creates an RGB value.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) const fn bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Plain text the controller font can render.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct AsciiText(String);

impl AsciiText {
    /// Returns the text bytes as sent on the wire.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<&str> for AsciiText {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ascii_bytes(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for AsciiText {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ascii_bytes(&value)?;
        Ok(Self(value))
    }
}

/// Returns the bytes of `text`, rejecting anything outside ASCII.
pub(crate) fn ascii_bytes(text: &str) -> Result<&[u8], ValidationError> {
    match text.chars().find(|character| !character.is_ascii()) {
        Some(character) => Err(ValidationError::NonAsciiText { character }),
        None => Ok(text.as_bytes()),
    }
}
