//! Motion-JPEG video in an AVI container.
//!
//! Every frame is an independent baseline JPEG stored as a `00dc` chunk of the `movi`
//! list, followed by an `idx1` index marking each chunk as a keyframe.

use std::path::Path;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, error, info, instrument};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::RenderedFrame;
use crate::light_field::output::writer::SequenceWriter;

const AVIF_HASINDEX: u32 = 0x10;
const AVIIF_KEYFRAME: u32 = 0x10;
/// Time base of the stream header, frames per `RATE_SCALE` seconds.
const RATE_SCALE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct MjpegAviWriter {
    pub fps: f32,
    /// JPEG quality, 1-100
    pub quality: u8,
}

impl Default for MjpegAviWriter {
    fn default() -> Self {
        Self {
            fps: 30.0,
            quality: 90,
        }
    }
}

impl MjpegAviWriter {
    pub fn new(fps: f32) -> Self {
        Self {
            fps,
            ..Default::default()
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    fn encode_jpeg(&self, frame: &RenderedFrame) -> Result<Vec<u8>> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode(
                frame.image.as_raw(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| LightFieldError::EncodeError(e.to_string()))?;
        Ok(jpeg)
    }

    /// Encodes the whole AVI file into memory.
    pub fn encode(&self, frames: &[RenderedFrame]) -> Result<Vec<u8>> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(LightFieldError::EncodeError(format!(
                "invalid frame rate {}",
                self.fps
            )));
        }
        let Some(first) = frames.first() else {
            return Err(LightFieldError::EmptySequence("no frames to encode".to_string()));
        };

        let expected = first.dimensions();
        let (width, height) = expected;
        // The stream header stores the frame rectangle as 16-bit values.
        let (rect_width, rect_height) = u16::try_from(width)
            .ok()
            .zip(u16::try_from(height).ok())
            .ok_or(LightFieldError::InvalidDimensions(width, height))?;
        let image_size = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(LightFieldError::InvalidDimensions(width, height))?;

        let mut jpegs = Vec::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            if frame.dimensions() != expected {
                return Err(LightFieldError::FrameSizeMismatch {
                    index,
                    expected,
                    got: frame.dimensions(),
                });
            }
            jpegs.push(self.encode_jpeg(frame)?);
        }
        debug!(frames = jpegs.len(), "Encoded JPEG frames");

        let frame_count = u32::try_from(jpegs.len())
            .map_err(|_| LightFieldError::EncodeError("too many frames for AVI".to_string()))?;
        let max_chunk = jpegs.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let micros_per_frame = (1_000_000.0 / self.fps).round() as u32;
        let rate = (self.fps * RATE_SCALE as f32).round() as u32;

        let mut avih = Vec::with_capacity(56);
        for value in [
            micros_per_frame,
            max_chunk.saturating_mul(self.fps.ceil() as u32),
            0,
            AVIF_HASINDEX,
            frame_count,
            0,
            1,
            max_chunk,
            width,
            height,
            0,
            0,
            0,
            0,
        ] {
            push_u32(&mut avih, value);
        }

        let mut strh = Vec::with_capacity(56);
        strh.extend_from_slice(b"vids");
        strh.extend_from_slice(b"MJPG");
        // Priority and language share the second slot as two u16 zeros.
        for value in [0, 0, 0, RATE_SCALE, rate, 0, frame_count, max_chunk, u32::MAX, 0] {
            push_u32(&mut strh, value);
        }
        for value in [0u16, 0, rect_width, rect_height] {
            strh.extend_from_slice(&value.to_le_bytes());
        }

        let mut strf = Vec::with_capacity(40);
        push_u32(&mut strf, 40);
        push_u32(&mut strf, width);
        push_u32(&mut strf, height);
        strf.extend_from_slice(&1u16.to_le_bytes());
        strf.extend_from_slice(&24u16.to_le_bytes());
        strf.extend_from_slice(b"MJPG");
        for value in [image_size, 0, 0, 0, 0] {
            push_u32(&mut strf, value);
        }

        let strl = list(b"strl", &[chunk(b"strh", &strh), chunk(b"strf", &strf)]);
        let hdrl = list(b"hdrl", &[chunk(b"avih", &avih), strl]);

        // idx1 offsets are relative to the `movi` fourcc.
        let mut movi_chunks = Vec::with_capacity(jpegs.len());
        let mut idx1 = Vec::with_capacity(jpegs.len() * 16);
        let mut offset = 4u32;
        for jpeg in &jpegs {
            let data_chunk = chunk(b"00dc", jpeg);
            idx1.extend_from_slice(b"00dc");
            push_u32(&mut idx1, AVIIF_KEYFRAME);
            push_u32(&mut idx1, offset);
            push_u32(&mut idx1, jpeg.len() as u32);
            offset += data_chunk.len() as u32;
            movi_chunks.push(data_chunk);
        }
        let movi = list(b"movi", &movi_chunks);

        let mut body = Vec::new();
        body.extend_from_slice(b"AVI ");
        body.extend_from_slice(&hdrl);
        body.extend_from_slice(&movi);
        body.extend_from_slice(&chunk(b"idx1", &idx1));

        let riff_size = u32::try_from(body.len())
            .map_err(|_| LightFieldError::EncodeError("AVI exceeds 4 GiB".to_string()))?;
        let mut riff = Vec::with_capacity(body.len() + 8);
        riff.extend_from_slice(b"RIFF");
        push_u32(&mut riff, riff_size);
        riff.extend_from_slice(&body);
        Ok(riff)
    }
}

impl SequenceWriter for MjpegAviWriter {
    #[instrument(skip(self, frames), fields(frames = frames.len(), fps = self.fps))]
    fn write_sequence(&self, frames: &[RenderedFrame], path: &Path) -> Result<()> {
        let data = {
            let _span = tracing::info_span!("encode_avi").entered();
            self.encode(frames)?
        };

        std::fs::write(path, &data).map_err(|e| {
            error!(output = %path.display(), "Cannot create video: {}", e);
            LightFieldError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;

        info!(output = %path.display(), bytes = data.len(), "Video written");
        Ok(())
    }
}

fn push_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

/// RIFF chunk with its payload padded to an even length.
fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.extend_from_slice(id);
    push_u32(&mut out, payload.len() as u32);
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn list(kind: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(kind);
    for child in children {
        payload.extend_from_slice(child);
    }
    chunk(b"LIST", &payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn frame(width: u32, height: u32, shade: u8) -> RenderedFrame {
        RenderedFrame {
            image: RgbImage::from_pixel(width, height, Rgb([shade, 255 - shade, 64])),
            frame_id: 0,
            alpha: 0.0,
            aperture: 1.0,
        }
    }

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    fn find(data: &[u8], needle: &[u8], from: usize) -> Option<usize> {
        data[from..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|p| p + from)
    }

    #[test]
    fn test_avi_header_fields() {
        let frames = vec![frame(32, 16, 10), frame(32, 16, 120), frame(32, 16, 250)];
        let data = MjpegAviWriter::new(25.0).encode(&frames).unwrap();

        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(read_u32(&data, 4) as usize, data.len() - 8);
        assert_eq!(&data[8..12], b"AVI ");
        assert_eq!(&data[12..16], b"LIST");
        assert_eq!(&data[20..24], b"hdrl");
        assert_eq!(&data[24..28], b"avih");
        assert_eq!(read_u32(&data, 28), 56);
        assert_eq!(read_u32(&data, 32), 40_000);
        assert_eq!(read_u32(&data, 48), 3);
        assert_eq!(read_u32(&data, 64), 32);
        assert_eq!(read_u32(&data, 68), 16);

        let strh = find(&data, b"strh", 0).unwrap();
        assert_eq!(&data[strh + 8..strh + 12], b"vids");
        assert_eq!(&data[strh + 12..strh + 16], b"MJPG");
        assert_eq!(read_u32(&data, strh + 8 + 20), RATE_SCALE);
        assert_eq!(read_u32(&data, strh + 8 + 24), 25_000);
    }

    #[test]
    fn test_index_points_at_decodable_jpegs() {
        let frames = vec![frame(24, 12, 30), frame(24, 12, 200)];
        let data = MjpegAviWriter::new(10.0).encode(&frames).unwrap();

        let movi = find(&data, b"movi", 0).unwrap();
        let idx1 = find(&data, b"idx1", movi).unwrap();
        assert_eq!(read_u32(&data, idx1 + 4), 32);

        for entry in 0..2 {
            let base = idx1 + 8 + entry * 16;
            assert_eq!(&data[base..base + 4], b"00dc");
            assert_eq!(read_u32(&data, base + 4), AVIIF_KEYFRAME);
            let chunk_start = movi + read_u32(&data, base + 8) as usize;
            let size = read_u32(&data, base + 12) as usize;
            assert_eq!(&data[chunk_start..chunk_start + 4], b"00dc");
            assert_eq!(read_u32(&data, chunk_start + 4) as usize, size);

            let jpeg = &data[chunk_start + 8..chunk_start + 8 + size];
            let decoded = image::load_from_memory(jpeg).unwrap().to_rgb8();
            assert_eq!(decoded.dimensions(), (24, 12));
        }
    }

    #[test]
    fn test_frame_size_must_match_first_frame() {
        let frames = vec![frame(8, 8, 0), frame(8, 8, 0), frame(8, 4, 0)];
        assert!(matches!(
            MjpegAviWriter::default().encode(&frames),
            Err(LightFieldError::FrameSizeMismatch { index: 2, expected: (8, 8), got: (8, 4) })
        ));
    }

    #[test]
    fn test_frame_wider_than_stream_header_rejected() {
        let frames = vec![frame(65_536, 1, 0)];
        assert!(matches!(
            MjpegAviWriter::default().encode(&frames),
            Err(LightFieldError::InvalidDimensions(65_536, 1))
        ));
    }

    #[test]
    fn test_frame_rect_and_image_size_in_headers() {
        let data = MjpegAviWriter::default().encode(&[frame(40, 20, 0)]).unwrap();
        let strh = find(&data, b"strh", 0).unwrap();
        let rect = strh + 8 + 48;
        assert_eq!(u16::from_le_bytes([data[rect + 4], data[rect + 5]]), 40);
        assert_eq!(u16::from_le_bytes([data[rect + 6], data[rect + 7]]), 20);

        let strf = find(&data, b"strf", 0).unwrap();
        assert_eq!(read_u32(&data, strf + 8 + 20), 40 * 20 * 3);
    }

    #[test]
    fn test_empty_and_invalid_rate_rejected() {
        assert!(matches!(
            MjpegAviWriter::default().encode(&[]),
            Err(LightFieldError::EmptySequence(_))
        ));
        assert!(matches!(
            MjpegAviWriter::new(0.0).encode(&[frame(8, 8, 0)]),
            Err(LightFieldError::EncodeError(_))
        ));
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.avi");
        assert!(matches!(
            MjpegAviWriter::default().write_sequence(&[frame(8, 8, 0)], &path),
            Err(LightFieldError::OutputWriteError(_))
        ));
    }

    #[test]
    fn test_write_sequence_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rack.avi");
        MjpegAviWriter::new(12.0)
            .with_quality(75)
            .write_sequence(&[frame(16, 16, 0), frame(16, 16, 90)], &path)
            .unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[8..12], b"AVI ");
    }
}
