use std::time::Duration;

use egui::ColorImage;
use image::{RgbImage, imageops, imageops::FilterType};

use super::PaneSize;
use crate::media::DecodedClip;

/// Composed `still | clip` frames ready to upload as textures.
pub struct FrameBuffer {
    pub frames: Vec<ColorImage>,
    pub frame_interval: Duration,
    pub pane: PaneSize,
}

impl FrameBuffer {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&ColorImage> {
        self.frames.get(index)
    }
}

/// Scale the still once and every clip frame to `pane`, placing them side by side.
pub fn compose_frames(
    still: &RgbImage,
    clip: &DecodedClip,
    pane: PaneSize,
    frame_interval: Duration,
) -> FrameBuffer {
    let left = scale(still, pane);
    let frames = clip
        .frames
        .iter()
        .map(|frame| side_by_side(&left, &scale(frame, pane)))
        .collect();
    FrameBuffer {
        frames,
        frame_interval,
        pane,
    }
}

fn scale(image: &RgbImage, pane: PaneSize) -> RgbImage {
    if image.dimensions() == (pane.width, pane.height) {
        return image.clone();
    }
    imageops::resize(image, pane.width, pane.height, FilterType::CatmullRom)
}

fn side_by_side(left: &RgbImage, right: &RgbImage) -> ColorImage {
    let height = left.height();
    let mut canvas = RgbImage::new(left.width() + right.width(), height);
    imageops::replace(&mut canvas, left, 0, 0);
    imageops::replace(&mut canvas, right, i64::from(left.width()), 0);
    ColorImage::from_rgb(
        [canvas.width() as usize, canvas.height() as usize],
        canvas.as_raw(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;
    use image::Rgb;

    #[test]
    fn frames_pair_still_and_clip_at_pane_size() {
        let still = RgbImage::from_pixel(40, 30, Rgb([255, 0, 0]));
        let clip = DecodedClip {
            frames: vec![
                RgbImage::from_pixel(8, 8, Rgb([0, 0, 255])),
                RgbImage::from_pixel(8, 8, Rgb([0, 255, 0])),
            ],
            fps: 30.0,
        };
        let buffer = compose_frames(&still, &clip, PaneSize::new(20, 10), Duration::from_millis(33));

        assert_eq!(buffer.len(), 2);
        let first = buffer.frame(0).unwrap();
        assert_eq!(first.size, [40, 10]);
        assert!(close(first.pixels[5 * 40 + 2], [255, 0, 0]));
        assert!(close(first.pixels[5 * 40 + 30], [0, 0, 255]));
        let second = buffer.frame(1).unwrap();
        assert!(close(second.pixels[5 * 40 + 30], [0, 255, 0]));
    }

    fn close(pixel: Color32, rgb: [u8; 3]) -> bool {
        let actual = [pixel.r(), pixel.g(), pixel.b()];
        actual.iter().zip(rgb).all(|(a, b)| a.abs_diff(b) <= 2)
    }
}
