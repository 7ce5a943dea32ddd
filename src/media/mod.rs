mod gif_image;

pub use self::gif_image::{GifImage, GifImageError};
