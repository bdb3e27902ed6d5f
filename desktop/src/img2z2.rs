use argh::FromArgs;
use embedded_raster::{FormatTag, rle};
use image::DynamicImage;

#[derive(FromArgs)]
/// Conversion options
struct Args {
    /// input image path
    #[argh(option, short = 'i')]
    input_path: String,

    /// output Z2 body path
    #[argh(option, short = 'o')]
    output_path: String,

    /// luma below which a pixel is black
    #[argh(option, short = 't', default = "128")]
    threshold: u8,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let image = image::open(&args.input_path).expect("Failed to open input image");
    let (width, height) = (image.width(), image.height());
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        panic!("Input image is too large (max {}x{})", u16::MAX, u16::MAX);
    }

    let body = encode_z2(image, args.threshold);
    std::fs::write(&args.output_path, &body).expect("Failed to write Z2 file");
    log::info!(
        "Wrote {} bytes, replay with --body {} -x {} -y {}",
        body.len(),
        args.output_path,
        width,
        height
    );
}

/// Thresholds `img` to white (0) and black (1) and run-length encodes it.
fn encode_z2(img: DynamicImage, threshold: u8) -> Vec<u8> {
    let image = img.into_luma8();
    let pixels: Vec<u8> = image
        .pixels()
        .map(|pixel| if pixel[0] < threshold { 1 } else { 0 })
        .collect();

    let tag: &'static str = FormatTag::Z2.into();
    let mut body = tag.as_bytes().to_vec();
    body.extend(rle::encode(&pixels));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_raster::{DecodeOptions, decode};

    #[test]
    fn test_encode_z2() {
        let image = image::GrayImage::from_fn(70, 2, |x, _| image::Luma([if x < 3 { 0 } else { 255 }]));
        let body = encode_z2(DynamicImage::ImageLuma8(image), 128);
        assert_eq!(&body[..2], b"Z2");

        let bitmap = decode(body.as_slice(), &DecodeOptions::new(70, 2))
            .unwrap()
            .into_bitmap();
        assert_eq!(bitmap.pixel(0, 0), Some(1));
        assert_eq!(bitmap.pixel(2, 1), Some(1));
        assert_eq!(bitmap.pixel(3, 1), Some(0));
        assert_eq!(bitmap.pixel(69, 0), Some(0));
    }
}
