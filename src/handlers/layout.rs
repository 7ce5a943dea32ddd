use crate::protocol::CommandCode;

use super::ValidationError;

const MAX_WINDOWS: usize = u8::MAX as usize;

/// Pixel geometry of one display window.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Window {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Window {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Window layout for the whole sign.
///
/// Window `i` of the layout is addressed as window index `i` by later commands.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Division {
    windows: Vec<Window>,
}

impl Division {
    /// Creates a validated window layout.
    ///
    /// # Errors
    ///
    /// Returns an error unless the layout has between 1 and 255 windows.
    ///
    /// ```
    /// use cpower::{Division, Window};
    ///
    /// let layout = Division::new(vec![Window::new(0, 0, 64, 8), Window::new(0, 8, 64, 8)])?;
    /// assert_eq!(2, layout.windows().len());
    /// assert!(Division::new(Vec::new()).is_err());
    /// # Ok::<(), cpower::ValidationError>(())
    /// ```
    pub fn new(windows: Vec<Window>) -> Result<Self, ValidationError> {
        if windows.is_empty() || windows.len() > MAX_WINDOWS {
            return Err(ValidationError::InvalidWindowCount {
                count: windows.len(),
            });
        }
        Ok(Self { windows })
    }

    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    // The only big-endian command on the wire.
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(2 + self.windows.len() * 8);
        payload.push(CommandCode::Division.as_raw());
        #[allow(clippy::cast_possible_truncation)]
        payload.push(self.windows.len() as u8);
        for window in &self.windows {
            for field in [window.x, window.y, window.width, window.height] {
                payload.extend_from_slice(&field.to_be_bytes());
            }
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn single_window_is_big_endian() {
        let layout = Division::new(vec![Window::new(0, 0, 64, 8)]).expect("layout should build");
        assert_eq!(
            vec![0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x08],
            layout.encode()
        );
    }

    #[test]
    fn windows_are_encoded_in_order() {
        let layout = Division::new(vec![
            Window::new(0, 0, 0x0102, 8),
            Window::new(0x0300, 8, 64, 8),
        ])
        .expect("layout should build");
        assert_eq!(
            vec![
                0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x08, 0x03, 0x00, 0x00,
                0x08, 0x00, 0x40, 0x00, 0x08,
            ],
            layout.encode()
        );
    }

    #[test]
    fn window_count_must_fit_in_one_byte() {
        assert_matches!(
            Division::new(Vec::new()),
            Err(ValidationError::InvalidWindowCount { count: 0 })
        );
        assert!(Division::new(vec![Window::default(); 255]).is_ok());
        assert_matches!(
            Division::new(vec![Window::default(); 256]),
            Err(ValidationError::InvalidWindowCount { count: 256 })
        );
    }
}
