use embedded_raster::{Bitmap, Color};

/// Color mode reported to the image server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::IntoStaticStr, strum_macros::Display,
)]
pub enum ColorMode {
    /// Black and white
    #[strum(serialize = "BW")]
    Bw,
    /// 4 shades of grey
    #[default]
    #[strum(serialize = "4G")]
    Grey4,
}

/// Panel geometry and the colors used for two-color images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayProfile {
    pub width: u16,
    pub height: u16,
    pub white: Color,
    pub black: Color,
}

impl DisplayProfile {
    pub const fn new(width: u16, height: u16) -> Self {
        DisplayProfile {
            width,
            height,
            white: Color::WHITE,
            black: Color::BLACK,
        }
    }
}

pub trait Display {
    fn profile(&self) -> DisplayProfile;

    /// Starts a refresh showing `bitmap`.
    fn show(&mut self, bitmap: Bitmap);

    /// Whether the last refresh is still running.
    fn is_busy(&mut self) -> bool;
}

/// Shows `bitmap` and waits for the panel to finish.
pub fn present(display: &mut impl Display, bitmap: Bitmap) {
    log::debug!(
        "Presenting {}x{} bitmap with {} colors",
        bitmap.width(),
        bitmap.height(),
        bitmap.color_count()
    );
    display.show(bitmap);
    while display.is_busy() {
        core::hint::spin_loop();
    }
}
