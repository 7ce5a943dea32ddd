use bon::Builder;

use crate::protocol::{Alignment, Colour, CommandCode, Effect};

use super::{AsciiText, FontSize, Rgb, ValidationError, WindowIndex, fields::ascii_bytes};

const DEFAULT_SPEED: u8 = 30;
const DEFAULT_STAY_TIME: u16 = 2;
const SCROLLING_TEXT_TRAILER: [u8; 3] = [0x00, 0x00, 0x00];
const STATIC_TEXT_MODE_SIMPLE: u8 = 1;

/// Encodes `text` as controller formatted text.
///
/// Every character becomes `colour_size, 0x00, character`, where the colour
/// occupies the high nibble and the size code the low nibble.
///
/// # Errors
///
/// Returns an error when `text` contains non-ASCII characters.
///
/// ```
/// use cpower::{Colour, FontSize, format_text};
///
/// let bytes = format_text("Hi", Colour::Red, FontSize::default())?;
/// assert_eq!(vec![0x10, 0x00, b'H', 0x10, 0x00, b'i'], bytes);
/// # Ok::<(), cpower::ValidationError>(())
/// ```
pub fn format_text(text: &str, colour: Colour, size: FontSize) -> Result<Vec<u8>, ValidationError> {
    let characters = ascii_bytes(text)?;
    let colour_size = (colour.as_raw() << 4) ^ size.value();

    let mut formatted = Vec::with_capacity(characters.len() * 3);
    for &character in characters {
        formatted.extend_from_slice(&[colour_size, 0x00, character]);
    }
    Ok(formatted)
}

/// Formatted text made of one or more differently styled runs.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FormattedText {
    bytes: Vec<u8>,
}

impl FormattedText {
    /// Creates formatted text from a single styled run.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` contains non-ASCII characters.
    pub fn styled(text: &str, colour: Colour, size: FontSize) -> Result<Self, ValidationError> {
        Self::default().then(text, colour, size)
    }

    /// Appends another styled run.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` contains non-ASCII characters.
    ///
    /// ```
    /// use cpower::{Colour, FontSize, FormattedText};
    ///
    /// let size = FontSize::default();
    /// let text = FormattedText::styled("Hello", Colour::Red, size)?
    ///     .then(" World!", Colour::Green, size)?;
    /// assert_eq!(12, text.char_count());
    /// # Ok::<(), cpower::ValidationError>(())
    /// ```
    pub fn then(mut self, text: &str, colour: Colour, size: FontSize) -> Result<Self, ValidationError> {
        self.bytes.extend(format_text(text, colour, size)?);
        Ok(self)
    }

    /// Number of characters across all runs.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.bytes.len() / 3
    }

    /// Encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Scrolling text shown in one window.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScrollingText {
    window: WindowIndex,
    text: FormattedText,
    effect: Effect,
    alignment: Alignment,
    speed: u8,
    stay_time: u16,
}

impl ScrollingText {
    /// Creates scrolling text that scrolls left at the default speed.
    #[must_use]
    pub fn new(window: WindowIndex, text: FormattedText) -> Self {
        Self {
            window,
            text,
            effect: Effect::default(),
            alignment: Alignment::default(),
            speed: DEFAULT_SPEED,
            stay_time: DEFAULT_STAY_TIME,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    /// Overrides how long the text stays once it has entered.
    #[must_use]
    pub fn with_stay_time(mut self, stay_time: u16) -> Self {
        self.stay_time = stay_time;
        self
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let text = self.text.as_bytes();
        let mut payload = Vec::with_capacity(7 + text.len() + SCROLLING_TEXT_TRAILER.len());
        payload.extend_from_slice(&[
            CommandCode::Text.as_raw(),
            self.window.value(),
            self.effect.as_raw(),
            self.alignment.as_raw(),
            self.speed,
        ]);
        payload.extend_from_slice(&self.stay_time.to_le_bytes());
        payload.extend_from_slice(text);
        payload.extend_from_slice(&SCROLLING_TEXT_TRAILER);
        payload
    }
}

/// Plain text drawn at a fixed position.
#[derive(Debug, Clone, Eq, PartialEq, Builder)]
pub struct StaticText {
    window: WindowIndex,
    text: AsciiText,
    #[builder(default)]
    alignment: Alignment,
    #[builder(default)]
    x: u16,
    #[builder(default)]
    y: u16,
    #[builder(default = 64)]
    width: u16,
    #[builder(default = 16)]
    height: u16,
    #[builder(default = 1)]
    font_size: u8,
    #[builder(default)]
    colour: Rgb,
}

impl StaticText {
    pub(crate) fn encode(&self) -> Vec<u8> {
        let text = self.text.as_bytes();
        let mut payload = Vec::with_capacity(19 + text.len());
        payload.extend_from_slice(&[
            CommandCode::StaticText.as_raw(),
            self.window.value(),
            STATIC_TEXT_MODE_SIMPLE,
            self.alignment.as_raw(),
        ]);
        for field in [self.x, self.y, self.width, self.height] {
            payload.extend_from_slice(&field.to_le_bytes());
        }
        payload.push(self.font_size);
        payload.extend_from_slice(&self.colour.bytes());
        payload.extend_from_slice(text);
        payload.push(0x00);
        payload
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn window(value: u8) -> WindowIndex {
        WindowIndex::new(value).expect("test window should be valid")
    }

    #[test]
    fn format_text_encodes_three_bytes_per_character() {
        let bytes = format_text("Hi", Colour::Red, FontSize::default())
            .expect("ascii text should format");
        assert_eq!(vec![0x10, 0x00, b'H', 0x10, 0x00, b'i'], bytes);
    }

    #[rstest]
    #[case(Colour::Red, 0, 0x10)]
    #[case(Colour::White, 0, 0x70)]
    #[case(Colour::Green, 3, 0x23)]
    #[case(Colour::Cyan, 15, 0x6F)]
    fn format_text_packs_colour_and_size(
        #[case] colour: Colour,
        #[case] size: u8,
        #[case] expected: u8,
    ) {
        let size = FontSize::new(size).expect("test size should be valid");
        let bytes = format_text("A", colour, size).expect("ascii text should format");
        assert_eq!(vec![expected, 0x00, b'A'], bytes);
    }

    #[test]
    fn format_text_rejects_non_ascii() {
        assert_matches!(
            format_text("\u{263A}", Colour::Red, FontSize::default()),
            Err(ValidationError::NonAsciiText { character: '\u{263A}' })
        );
    }

    #[test]
    fn formatted_text_concatenates_runs() {
        let size = FontSize::default();
        let text = FormattedText::styled("A", Colour::Red, size)
            .and_then(|text| text.then("B", Colour::Green, size))
            .expect("runs should format");
        assert_eq!(&[0x10, 0x00, b'A', 0x20, 0x00, b'B'], text.as_bytes());
        assert_eq!(2, text.char_count());
    }

    #[test]
    fn scrolling_text_uses_default_layout() {
        let text = FormattedText::styled("Hi", Colour::Red, FontSize::default())
            .expect("text should format");
        let payload = ScrollingText::new(window(0), text).encode();
        assert_eq!(
            vec![
                0x02, 0x00, 0x0B, 0x00, 0x1E, 0x02, 0x00, 0x10, 0x00, b'H', 0x10, 0x00, b'i',
                0x00, 0x00, 0x00,
            ],
            payload
        );
    }

    #[test]
    fn scrolling_text_encodes_overrides_little_endian() {
        let payload = ScrollingText::new(window(5), FormattedText::default())
            .with_effect(Effect::Shutter)
            .with_alignment(Alignment::Right)
            .with_speed(4)
            .with_stay_time(0x0102)
            .encode();
        assert_eq!(vec![0x02, 0x05, 0x05, 0x02, 0x04, 0x02, 0x01, 0x00, 0x00, 0x00], payload);
    }

    #[test]
    fn static_text_uses_default_geometry() {
        let payload = StaticText::builder()
            .window(window(1))
            .text(AsciiText::try_from("OK").expect("ascii text should construct"))
            .build()
            .encode();
        assert_eq!(
            vec![
                0x04, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x10, 0x00, 0x01,
                0x00, 0x00, 0x00, b'O', b'K', 0x00,
            ],
            payload
        );
    }

    #[test]
    fn static_text_encodes_position_and_colour() {
        let payload = StaticText::builder()
            .window(window(2))
            .text(AsciiText::default())
            .alignment(Alignment::Centre)
            .x(0x0102)
            .y(8)
            .width(128)
            .height(0x0100)
            .font_size(3)
            .colour(Rgb::new(0xFF, 0x80, 0x00))
            .build()
            .encode();
        assert_eq!(
            vec![
                0x04, 0x02, 0x01, 0x01, 0x02, 0x01, 0x08, 0x00, 0x80, 0x00, 0x00, 0x01, 0x03,
                0xFF, 0x80, 0x00, 0x00,
            ],
            payload
        );
    }
}
