use std::path::Path;

use image::{Rgb, RgbImage};

use super::avi::uncompressed_avi;

/// Write `<stem>.jpg` plus a two-frame uncompressed `<stem>.avi` into `dir`.
pub fn write_sample(dir: &Path, stem: &str, shade: u8) {
    std::fs::create_dir_all(dir).expect("create sample dir");
    RgbImage::from_pixel(12, 8, Rgb([shade, 40, 200]))
        .save(dir.join(format!("{stem}.jpg")))
        .expect("write still");
    let frames = [
        RgbImage::from_pixel(6, 4, Rgb([shade, 120, 10])),
        RgbImage::from_pixel(6, 4, Rgb([10, shade, 120])),
    ];
    std::fs::write(dir.join(format!("{stem}.avi")), uncompressed_avi(&frames, 15))
        .expect("write clip");
}
