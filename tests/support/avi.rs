//! Builders for small AVI files shared by unit and integration tests.

use image::{ImageFormat, RgbImage};
use std::io::Cursor;

pub struct AviLayout {
    pub width: i32,
    pub height: i32,
    pub rate: u32,
    pub scale: u32,
    pub micros_per_frame: u32,
    pub compression: [u8; 4],
    pub bit_count: u16,
}

pub fn uncompressed_avi(frames: &[RgbImage], fps: u32) -> Vec<u8> {
    let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((1, 1));
    let layout = AviLayout {
        width: width as i32,
        height: height as i32,
        rate: fps,
        scale: 1,
        micros_per_frame: 1_000_000 / fps.max(1),
        compression: [0; 4],
        bit_count: 24,
    };
    let chunks: Vec<_> = frames.iter().map(|f| (*b"00db", dib_bytes(f))).collect();
    build(&layout, &chunks)
}

pub fn mjpeg_avi(frames: &[RgbImage], fps: u32, strip_tables: bool) -> Vec<u8> {
    let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((1, 1));
    let layout = AviLayout {
        width: width as i32,
        height: height as i32,
        rate: fps,
        scale: 1,
        micros_per_frame: 1_000_000 / fps.max(1),
        compression: *b"MJPG",
        bit_count: 24,
    };
    let chunks: Vec<_> = frames
        .iter()
        .map(|frame| {
            let mut cursor = Cursor::new(Vec::new());
            frame.write_to(&mut cursor, ImageFormat::Jpeg).unwrap();
            let jpeg = cursor.into_inner();
            let jpeg = if strip_tables {
                strip_huffman_tables(&jpeg)
            } else {
                jpeg
            };
            (*b"00dc", jpeg)
        })
        .collect();
    build(&layout, &chunks)
}

/// Bottom-up BGR rows padded to four bytes.
pub fn dib_bytes(frame: &RgbImage) -> Vec<u8> {
    let (width, height) = frame.dimensions();
    let stride = (width as usize * 3).div_ceil(4) * 4;
    let mut out = vec![0u8; stride * height as usize];
    for y in 0..height {
        let row = (height - 1 - y) as usize * stride;
        for x in 0..width {
            let [r, g, b] = frame.get_pixel(x, y).0;
            let at = row + x as usize * 3;
            out[at..at + 3].copy_from_slice(&[b, g, r]);
        }
    }
    out
}

pub fn build(layout: &AviLayout, frames: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut avih = Vec::new();
    for value in [layout.micros_per_frame, 0, 0, 0x10, frames.len() as u32, 0, 1, 0] {
        avih.extend_from_slice(&value.to_le_bytes());
    }
    avih.extend_from_slice(&layout.width.to_le_bytes());
    avih.extend_from_slice(&layout.height.to_le_bytes());
    avih.extend_from_slice(&[0; 16]);

    let mut strh = b"vids".to_vec();
    strh.extend_from_slice(&layout.compression);
    strh.extend_from_slice(&[0; 12]);
    for value in [layout.scale, layout.rate, 0, frames.len() as u32, 0, 0, 0] {
        strh.extend_from_slice(&value.to_le_bytes());
    }
    strh.extend_from_slice(&[0; 8]);

    let mut strf = Vec::new();
    strf.extend_from_slice(&40u32.to_le_bytes());
    strf.extend_from_slice(&layout.width.to_le_bytes());
    strf.extend_from_slice(&layout.height.to_le_bytes());
    strf.extend_from_slice(&1u16.to_le_bytes());
    strf.extend_from_slice(&layout.bit_count.to_le_bytes());
    strf.extend_from_slice(&layout.compression);
    strf.extend_from_slice(&[0; 20]);

    let strl = list(b"strl", &[chunk(b"strh", &strh), chunk(b"strf", &strf)].concat());
    let hdrl = list(b"hdrl", &[chunk(b"avih", &avih), strl].concat());
    let movi_body: Vec<u8> = frames
        .iter()
        .flat_map(|(id, data)| chunk(id, data))
        .collect();
    let movi = list(b"movi", &movi_body);

    let mut body = b"AVI ".to_vec();
    body.extend_from_slice(&hdrl);
    body.extend_from_slice(&movi);
    let mut riff = b"RIFF".to_vec();
    riff.extend_from_slice(&(body.len() as u32).to_le_bytes());
    riff.extend_from_slice(&body);
    riff
}

fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn list(kind: &[u8; 4], children: &[u8]) -> Vec<u8> {
    let mut body = kind.to_vec();
    body.extend_from_slice(children);
    chunk(b"LIST", &body)
}

/// Drop every DHT segment, mimicking what capture hardware writes.
pub fn strip_huffman_tables(jpeg: &[u8]) -> Vec<u8> {
    const DHT: u8 = 0xc4;
    const SOS: u8 = 0xda;
    let mut out = jpeg[..2].to_vec();
    let mut pos = 2;
    while pos + 4 <= jpeg.len() {
        let marker = jpeg[pos + 1];
        if marker == SOS {
            out.extend_from_slice(&jpeg[pos..]);
            return out;
        }
        let length = usize::from(u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]));
        if marker != DHT {
            out.extend_from_slice(&jpeg[pos..pos + 2 + length]);
        }
        pos += 2 + length;
    }
    out
}
