use bon::Builder;

use crate::protocol::{Calendar, CommandCode};

use super::{AsciiText, ClockFontSize, Rgb, WindowIndex};

/// How the clock renders the time and date.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ClockFormat {
    pub hour_24: bool,
    pub four_digit_year: bool,
    pub multiline: bool,
}

impl Default for ClockFormat {
    fn default() -> Self {
        Self {
            hour_24: true,
            four_digit_year: true,
            multiline: true,
        }
    }
}

impl ClockFormat {
    /// Packs the format flags. Bit 1 is set for a two-digit year.
    ///
    /// ```
    /// use cpower::ClockFormat;
    ///
    /// assert_eq!(0b101, ClockFormat::default().bits());
    /// ```
    #[must_use]
    pub const fn bits(self) -> u8 {
        (self.hour_24 as u8) | ((!self.four_digit_year as u8) << 1) | ((self.multiline as u8) << 2)
    }
}

/// Which clock fields are shown.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClockContent {
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
    pub week: bool,
    pub pointer: bool,
}

impl Default for ClockContent {
    fn default() -> Self {
        Self {
            year: true,
            month: true,
            day: true,
            hour: true,
            minute: true,
            second: true,
            week: false,
            pointer: false,
        }
    }
}

impl ClockContent {
    /// Packs the content flags, year in bit 0 through pointer in bit 7.
    #[must_use]
    pub const fn bits(self) -> u8 {
        let flags = [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.week,
            self.pointer,
        ];
        let mut bits = 0;
        let mut index = 0;
        while index < flags.len() {
            bits |= (flags[index] as u8) << index;
            index += 1;
        }
        bits
    }
}

/// Clock shown in one window, optionally followed by a caption.
#[derive(Debug, Clone, Eq, PartialEq, Builder)]
pub struct Clock {
    window: WindowIndex,
    #[builder(default = 5000)]
    stay_time: u16,
    #[builder(default)]
    calendar: Calendar,
    #[builder(default)]
    format: ClockFormat,
    #[builder(default)]
    content: ClockContent,
    #[builder(default)]
    font_size: ClockFontSize,
    #[builder(default = Rgb::WHITE)]
    colour: Rgb,
    #[builder(default)]
    text: AsciiText,
}

impl Clock {
    pub(crate) fn encode(&self) -> Vec<u8> {
        let text = self.text.as_bytes();
        let mut payload = Vec::with_capacity(13 + text.len());
        payload.extend_from_slice(&[CommandCode::Clock.as_raw(), self.window.value()]);
        payload.extend_from_slice(&self.stay_time.to_le_bytes());
        payload.extend_from_slice(&[
            self.calendar.as_raw(),
            self.format.bits(),
            self.content.bits(),
            self.font_size.value(),
        ]);
        payload.extend_from_slice(&self.colour.bytes());
        payload.extend_from_slice(text);
        payload.push(0x00);
        payload
    }
}
