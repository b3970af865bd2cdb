//! Writing rendered images to disk.

use crate::{color_to_rgb, ImageBuffer, RenderError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `image` as an ASCII PPM (P3), one pixel per line, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb(image.get(x, y));
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    writer.flush()
}

impl ImageBuffer {
    /// Save to `path`.
    ///
    /// `.ppm` is written as plain-text PPM; any other extension goes
    /// through the `image` crate, which picks the encoder from the
    /// extension (PNG, JPEG, ...).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let file = File::create(path)?;
            write_ppm(self, BufWriter::new(file))?;
        } else {
            let rgb = image::RgbImage::from_fn(self.width, self.height, |x, y| {
                image::Rgb(color_to_rgb(self.get(x, y)))
            });
            rgb.save(path)?;
        }

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn two_by_two() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 0, Color::new(0.0, 1.0, 0.0));
        image.set(0, 1, Color::new(0.0, 0.0, 1.0));
        image.set(1, 1, Color::splat(0.25));
        image
    }

    #[test]
    fn test_write_ppm_layout() {
        let mut bytes = Vec::new();
        write_ppm(&two_by_two(), &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        // sqrt(0.25) = 0.5 encodes to round(127.5) = 128
        let expected = "P3\n2 2\n255\n255 0 0\n0 255 0\n0 0 255\n128 128 128\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_save_ppm_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        two_by_two().save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("P3\n2 2\n255\n"));
        assert_eq!(text.lines().count(), 3 + 4);
    }

    #[test]
    fn test_save_png_roundtrips_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = two_by_two();
        image.save(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.into_raw(), image.to_rgb8());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ppm");
        assert!(matches!(two_by_two().save(&path), Err(RenderError::Io(_))));
    }
}
