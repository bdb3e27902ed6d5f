use std::{
    convert::Infallible,
    path::{Path, PathBuf},
};

use embedded_graphics::{
    Drawable, Pixel,
    image::Image,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, OriginDimensions, Point, Size},
};
use log::{error, info};
use paperframe_core::{
    display::{Display, DisplayProfile},
    raster::Bitmap,
};

/// Simulated e-paper panel, shown in a window and/or written to a PNG.
pub struct HostDisplay {
    profile: DisplayProfile,
    window: Option<MinifbWindow>,
    output: Option<PathBuf>,
}

impl HostDisplay {
    pub fn new(profile: DisplayProfile, window: bool, output: Option<PathBuf>) -> Self {
        let window = window.then(|| MinifbWindow::new(profile.width as usize, profile.height as usize));
        HostDisplay {
            profile,
            window,
            output,
        }
    }

    /// Keeps the window open until it is closed or Escape is pressed.
    pub fn wait_for_close(&mut self) {
        if let Some(window) = self.window.as_mut() {
            while window.is_open() {
                window.window.update();
            }
        }
    }

    fn save_png(&self, bitmap: &Bitmap, path: &Path) {
        let image = image::RgbImage::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
            let color = bitmap.color_at(x as usize, y as usize).unwrap_or_default();
            image::Rgb([color.red(), color.green(), color.blue()])
        });
        match image.save(path) {
            Ok(()) => info!("Wrote {:?}", path),
            Err(e) => error!("Failed to write {:?}: {}", path, e),
        }
    }
}

impl Display for HostDisplay {
    fn profile(&self) -> DisplayProfile {
        self.profile
    }

    fn show(&mut self, bitmap: Bitmap) {
        info!(
            "Refreshing {}x{} panel with a {}x{} image",
            self.profile.width,
            self.profile.height,
            bitmap.width(),
            bitmap.height()
        );
        if let Some(path) = &self.output {
            self.save_png(&bitmap, path);
        }
        if let Some(window) = self.window.as_mut() {
            window.clear(Rgb888::WHITE).ok();
            Image::new(&bitmap, Point::zero()).draw(window).ok();
            window.update_display();
        }
    }

    fn is_busy(&mut self) -> bool {
        false
    }
}

pub struct MinifbWindow {
    width: usize,
    height: usize,
    buffer: Vec<u32>,
    window: minifb::Window,
}

impl MinifbWindow {
    fn new(width: usize, height: usize) -> Self {
        let options = minifb::WindowOptions {
            borderless: false,
            title: true,
            resize: true,
            scale: minifb::Scale::X2,
            ..minifb::WindowOptions::default()
        };
        let mut window = minifb::Window::new("Paperframe", width, height, options)
            .unwrap_or_else(|e| {
                panic!("Unable to open window: {}", e);
            });
        window.set_target_fps(5);

        MinifbWindow {
            width,
            height,
            buffer: vec![0xFFFFFFFF; width * height],
            window,
        }
    }

    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    fn update_display(&mut self) {
        if let Err(e) = self
            .window
            .update_with_buffer(&self.buffer, self.width, self.height)
        {
            error!("Failed to update window: {}", e);
        }
    }
}

impl OriginDimensions for MinifbWindow {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for MinifbWindow {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as usize, point.y as usize);
            if x >= self.width || y >= self.height {
                continue;
            }
            self.buffer[y * self.width + x] = 0xFF000000
                | (color.r() as u32) << 16
                | (color.g() as u32) << 8
                | color.b() as u32;
        }
        Ok(())
    }
}
