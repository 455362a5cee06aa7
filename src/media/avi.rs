//! Minimal RIFF `AVI ` demuxer for the first video stream.
//!
//! Only the pieces needed to replay a clip are read: `avih`, the video
//! stream's `strh`/`strf`, and that stream's frame chunks inside `movi`.

use image::{ImageFormat, RgbImage};
use thiserror::Error;

use super::mjpeg;

const LIST: &[u8; 4] = b"LIST";

/// Structural and frame-level problems in an AVI file.
#[derive(Debug, Error)]
pub enum AviError {
    #[error("Not a RIFF AVI file")]
    NotAvi,
    #[error("No video stream header found")]
    MissingVideoStream,
    #[error("Unsupported video codec {0}")]
    UnsupportedCodec(String),
    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("Clip contains no video frames")]
    NoFrames,
    #[error("Frame {index} is {actual} bytes, expected at least {expected}")]
    ShortFrame {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Frame {index} failed to decode: {source}")]
    Frame {
        index: usize,
        source: image::ImageError,
    },
}

/// How the frame chunks of the video stream are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    /// Motion-JPEG: each chunk is a JPEG image.
    Mjpeg,
    /// Uncompressed DIB rows in BGR(A) order.
    Rgb { bits: u16 },
}

#[derive(Debug, Default, Clone, Copy)]
struct MainHeader {
    micros_per_frame: u32,
}

#[derive(Debug, Clone, Copy)]
struct StreamFormat {
    width: i32,
    height: i32,
    bit_count: u16,
    compression: [u8; 4],
}

#[derive(Debug, Clone, Copy)]
struct VideoStream {
    number: usize,
    scale: u32,
    rate: u32,
    format: StreamFormat,
}

/// A parsed clip borrowing its frame chunks from the file bytes.
#[derive(Debug)]
pub(crate) struct AviClip<'a> {
    main: MainHeader,
    stream: VideoStream,
    codec: VideoCodec,
    frames: Vec<&'a [u8]>,
}

struct Chunk<'a> {
    id: [u8; 4],
    body: &'a [u8],
}

/// Iterates sibling chunks; a truncated final chunk is clamped to what is present.
struct Chunks<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Chunks<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.data.get(self.offset..self.offset.checked_add(8)?)?;
        let id = fourcc(&header[0..4]);
        let size = read_u32(header, 4) as usize;
        let start = self.offset + 8;
        let end = start.saturating_add(size).min(self.data.len());
        self.offset = start.saturating_add(size).saturating_add(size % 2);
        Some(Chunk {
            id,
            body: &self.data[start..end],
        })
    }
}

impl<'a> Chunk<'a> {
    /// List type and children when this is a `LIST` chunk.
    fn as_list(&self) -> Option<([u8; 4], Chunks<'a>)> {
        if &self.id != LIST || self.body.len() < 4 {
            return None;
        }
        Some((fourcc(&self.body[0..4]), Chunks::new(&self.body[4..])))
    }
}

pub(crate) fn parse(bytes: &[u8]) -> Result<AviClip<'_>, AviError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"AVI " {
        return Err(AviError::NotAvi);
    }
    let declared = read_u32(bytes, 4) as usize;
    let end = declared.saturating_add(8).min(bytes.len());

    let mut main = MainHeader::default();
    let mut stream = None;
    let mut movi = None;
    for chunk in Chunks::new(&bytes[12..end]) {
        match chunk.as_list() {
            Some((kind, children)) if &kind == b"hdrl" => {
                read_header_list(children, &mut main, &mut stream);
            }
            Some((kind, _)) if &kind == b"movi" => movi = Some(&chunk.body[4..]),
            _ => {}
        }
    }

    let stream = stream.ok_or(AviError::MissingVideoStream)?;
    let format = stream.format;
    if format.width == 0 || format.height == 0 {
        return Err(AviError::InvalidDimensions {
            width: format.width,
            height: format.height,
        });
    }
    let codec = codec_for(&format)?;
    let mut frames = Vec::new();
    if let Some(movi) = movi {
        collect_frames(Chunks::new(movi), &stream_prefix(stream.number), &mut frames);
    }
    if frames.is_empty() {
        return Err(AviError::NoFrames);
    }
    Ok(AviClip {
        main,
        stream,
        codec,
        frames,
    })
}

fn read_header_list(
    children: Chunks<'_>,
    main: &mut MainHeader,
    stream: &mut Option<VideoStream>,
) {
    let mut stream_number = 0usize;
    for child in children {
        if &child.id == b"avih" && child.body.len() >= 4 {
            main.micros_per_frame = read_u32(child.body, 0);
            continue;
        }
        let Some((kind, stream_chunks)) = child.as_list() else {
            continue;
        };
        if &kind != b"strl" {
            continue;
        }
        if stream.is_none() {
            *stream = read_stream_list(stream_chunks, stream_number);
        }
        stream_number += 1;
    }
}

fn read_stream_list(chunks: Chunks<'_>, number: usize) -> Option<VideoStream> {
    let mut rates = None;
    let mut format = None;
    for chunk in chunks {
        match &chunk.id {
            b"strh" if chunk.body.len() >= 28 => {
                if &chunk.body[0..4] != b"vids" {
                    return None;
                }
                rates = Some((read_u32(chunk.body, 20), read_u32(chunk.body, 24)));
            }
            b"strf" if chunk.body.len() >= 20 => {
                format = Some(StreamFormat {
                    width: read_i32(chunk.body, 4),
                    height: read_i32(chunk.body, 8),
                    bit_count: read_u16(chunk.body, 14),
                    compression: fourcc(&chunk.body[16..20]),
                });
            }
            _ => {}
        }
    }
    let (scale, rate) = rates?;
    Some(VideoStream {
        number,
        scale,
        rate,
        format: format?,
    })
}

fn codec_for(format: &StreamFormat) -> Result<VideoCodec, AviError> {
    let compression = format.compression;
    if compression == [0; 4] || &compression == b"DIB " {
        return match format.bit_count {
            24 | 32 => Ok(VideoCodec::Rgb {
                bits: format.bit_count,
            }),
            bits => Err(AviError::UnsupportedCodec(format!("RGB{bits}"))),
        };
    }
    if compression.eq_ignore_ascii_case(b"MJPG") {
        return Ok(VideoCodec::Mjpeg);
    }
    Err(AviError::UnsupportedCodec(
        String::from_utf8_lossy(&compression).trim().to_string(),
    ))
}

fn stream_prefix(number: usize) -> [u8; 2] {
    let digits = format!("{:02}", number % 100);
    let bytes = digits.as_bytes();
    [bytes[0], bytes[1]]
}

fn collect_frames<'a>(chunks: Chunks<'a>, prefix: &[u8; 2], frames: &mut Vec<&'a [u8]>) {
    for chunk in chunks {
        if let Some((_, children)) = chunk.as_list() {
            collect_frames(children, prefix, frames);
            continue;
        }
        let is_video = &chunk.id[0..2] == prefix && matches!(&chunk.id[2..4], b"dc" | b"db");
        if is_video && !chunk.body.is_empty() {
            frames.push(chunk.body);
        }
    }
}

impl AviClip<'_> {
    pub(crate) fn codec(&self) -> VideoCodec {
        self.codec
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (
            self.stream.format.width.unsigned_abs(),
            self.stream.format.height.unsigned_abs(),
        )
    }

    /// Playback rate from the stream header, falling back to `avih`.
    pub(crate) fn fps(&self) -> f64 {
        if self.stream.rate > 0 && self.stream.scale > 0 {
            return f64::from(self.stream.rate) / f64::from(self.stream.scale);
        }
        if self.main.micros_per_frame > 0 {
            return 1_000_000.0 / f64::from(self.main.micros_per_frame);
        }
        0.0
    }

    pub(crate) fn decode_frames(&self) -> Result<Vec<RgbImage>, AviError> {
        self.frames
            .iter()
            .enumerate()
            .map(|(index, data)| self.decode_frame(index, data))
            .collect()
    }

    fn decode_frame(&self, index: usize, data: &[u8]) -> Result<RgbImage, AviError> {
        match self.codec {
            VideoCodec::Mjpeg => {
                let jpeg = mjpeg::with_huffman_tables(data);
                image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)
                    .map(|image| image.to_rgb8())
                    .map_err(|source| AviError::Frame { index, source })
            }
            VideoCodec::Rgb { bits } => self.decode_dib(index, data, bits),
        }
    }

    fn decode_dib(&self, index: usize, data: &[u8], bits: u16) -> Result<RgbImage, AviError> {
        let (width, height) = self.dimensions();
        let bytes_per_pixel = usize::from(bits / 8);
        let format = self.stream.format;
        let invalid = || AviError::InvalidDimensions {
            width: format.width,
            height: format.height,
        };
        let stride = (width as usize)
            .checked_mul(usize::from(bits))
            .ok_or_else(invalid)?
            .div_ceil(32)
            * 4;
        let expected = stride.checked_mul(height as usize).ok_or_else(invalid)?;
        if data.len() < expected {
            return Err(AviError::ShortFrame {
                index,
                expected,
                actual: data.len(),
            });
        }
        let bottom_up = format.height > 0;
        let mut image = RgbImage::new(width, height);
        for y in 0..height {
            let source_row = (if bottom_up { height - 1 - y } else { y }) as usize;
            let row = &data[source_row * stride..source_row * stride + stride];
            for x in 0..width {
                let px = &row[x as usize * bytes_per_pixel..];
                image.put_pixel(x, y, image::Rgb([px[2], px[1], px[0]]));
            }
        }
        Ok(image)
    }
}

fn fourcc(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(fourcc(&bytes[offset..offset + 4]))
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(fourcc(&bytes[offset..offset + 4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::test_avi::{self, AviLayout};
    use image::Rgb;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    #[test]
    fn reads_uncompressed_frames_and_rate() {
        let mut first = solid(3, 2, [10, 20, 30]);
        first.put_pixel(0, 0, Rgb([255, 0, 0]));
        let bytes = test_avi::uncompressed_avi(&[first.clone(), solid(3, 2, [1, 2, 3])], 25);

        let clip = parse(&bytes).unwrap();
        assert_eq!(clip.codec(), VideoCodec::Rgb { bits: 24 });
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.dimensions(), (3, 2));
        assert!((clip.fps() - 25.0).abs() < f64::EPSILON);

        let frames = clip.decode_frames().unwrap();
        assert_eq!(frames[0], first);
        assert_eq!(frames[1].get_pixel(2, 1), &Rgb([1, 2, 3]));
    }

    #[test]
    fn decodes_mjpeg_frames() {
        let frame = solid(16, 8, [120, 120, 120]);
        let bytes = test_avi::mjpeg_avi(&[frame.clone(), frame], 30, false);
        let clip = parse(&bytes).unwrap();
        assert_eq!(clip.codec(), VideoCodec::Mjpeg);
        let frames = clip.decode_frames().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].dimensions(), (16, 8));
        let px = frames[0].get_pixel(4, 4);
        assert!(px.0.iter().all(|&channel| channel.abs_diff(120) < 8));
    }

    #[test]
    fn decodes_mjpeg_frames_without_huffman_tables() {
        let frame = solid(16, 16, [60, 60, 60]);
        let bytes = test_avi::mjpeg_avi(&[frame], 30, true);
        let frames = parse(&bytes).unwrap().decode_frames().unwrap();
        assert_eq!(frames[0].dimensions(), (16, 16));
    }

    #[test]
    fn skips_dropped_frames_and_other_streams() {
        let layout = AviLayout {
            width: 2,
            height: 2,
            rate: 10,
            scale: 1,
            micros_per_frame: 0,
            compression: [0; 4],
            bit_count: 24,
        };
        let frame = test_avi::dib_bytes(&solid(2, 2, [5, 5, 5]));
        let chunks = vec![
            (*b"00dc", frame.clone()),
            (*b"00dc", Vec::new()),
            (*b"01wb", vec![1, 2, 3]),
            (*b"00db", frame),
        ];
        let bytes = test_avi::build(&layout, &chunks);
        assert_eq!(parse(&bytes).unwrap().frame_count(), 2);
    }

    #[test]
    fn rate_falls_back_to_main_header() {
        let layout = AviLayout {
            width: 2,
            height: 2,
            rate: 0,
            scale: 0,
            micros_per_frame: 40_000,
            compression: [0; 4],
            bit_count: 24,
        };
        let frame = test_avi::dib_bytes(&solid(2, 2, [5, 5, 5]));
        let bytes = test_avi::build(&layout, &[(*b"00dc", frame)]);
        assert!((parse(&bytes).unwrap().fps() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_unknown_codecs_and_non_avi_input() {
        let layout = AviLayout {
            width: 2,
            height: 2,
            rate: 30,
            scale: 1,
            micros_per_frame: 0,
            compression: *b"XVID",
            bit_count: 24,
        };
        let bytes = test_avi::build(&layout, &[(*b"00dc", vec![0; 12])]);
        assert!(matches!(
            parse(&bytes),
            Err(AviError::UnsupportedCodec(name)) if name == "XVID"
        ));
        assert!(matches!(parse(b"RIFF\0\0\0\0WAVE"), Err(AviError::NotAvi)));
    }

    #[test]
    fn clip_without_frames_is_rejected() {
        let layout = AviLayout {
            width: 2,
            height: 2,
            rate: 30,
            scale: 1,
            micros_per_frame: 0,
            compression: [0; 4],
            bit_count: 24,
        };
        let bytes = test_avi::build(&layout, &[]);
        assert!(matches!(parse(&bytes), Err(AviError::NoFrames)));
    }

    #[test]
    fn short_frame_is_an_error() {
        let layout = AviLayout {
            width: 4,
            height: 4,
            rate: 30,
            scale: 1,
            micros_per_frame: 0,
            compression: [0; 4],
            bit_count: 24,
        };
        let bytes = test_avi::build(&layout, &[(*b"00dc", vec![0; 10])]);
        let clip = parse(&bytes).unwrap();
        assert!(matches!(
            clip.decode_frames(),
            Err(AviError::ShortFrame { index: 0, expected: 48, actual: 10 })
        ));
    }

    #[test]
    fn oversized_header_dimensions_are_rejected() {
        let layout = AviLayout {
            width: i32::MIN,
            height: i32::MIN,
            rate: 30,
            scale: 1,
            micros_per_frame: 0,
            compression: [0; 4],
            bit_count: 32,
        };
        let bytes = test_avi::build(&layout, &[(*b"00dc", vec![0; 4])]);
        let clip = parse(&bytes).unwrap();
        assert!(matches!(
            clip.decode_frames(),
            Err(AviError::InvalidDimensions {
                width: i32::MIN,
                height: i32::MIN
            })
        ));
    }
}
