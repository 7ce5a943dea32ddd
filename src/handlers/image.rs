use bon::Builder;

use crate::media::GifImage;
use crate::protocol::{CommandCode, ImageFormat};

use super::WindowIndex;

const IMAGE_MODE_DRAW: u8 = 0;

/// Image placed in a window.
///
/// ```
/// use cpower::{GifImage, Image, WindowIndex};
///
/// # fn demo(gif: GifImage) -> Result<(), cpower::ValidationError> {
/// let image = Image::builder()
///     .window(WindowIndex::new(1)?)
///     .image(gif)
///     .x(4)
///     .build();
/// assert_eq!(30, image.speed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Builder)]
pub struct Image {
    window: WindowIndex,
    image: GifImage,
    #[builder(default = 30)]
    speed: u8,
    #[builder(default = 2)]
    stay_time: u16,
    #[builder(default)]
    format: ImageFormat,
    #[builder(default)]
    x: u16,
    #[builder(default)]
    y: u16,
}

impl Image {
    #[must_use]
    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let bytes = self.image.as_bytes();
        let mut payload = Vec::with_capacity(11 + bytes.len());
        payload.extend_from_slice(&[
            CommandCode::Image.as_raw(),
            self.window.value(),
            IMAGE_MODE_DRAW,
            self.speed,
        ]);
        payload.extend_from_slice(&self.stay_time.to_le_bytes());
        payload.push(self.format.as_raw());
        payload.extend_from_slice(&self.x.to_le_bytes());
        payload.extend_from_slice(&self.y.to_le_bytes());
        payload.extend_from_slice(bytes);
        payload
    }
}
