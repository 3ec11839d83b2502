//! LSB steganography for video.
//!
//! Only the blue channel carries data: one bit per pixel per frame, frames in
//! order, pixels in raster order. Frames are pulled from a [`FrameSource`] one
//! at a time and pushed to a [`FrameSink`], so the whole video is never held
//! in memory.
//!
//! Because the source is a forward-only cursor, the total capacity is only
//! known up front when the source reports a frame count. When it does not,
//! running out of frames is detected at end of stream, after frames have
//! already been written. Output produced on that path is unusable and callers
//! must discard it.
//!
//! Files are decoded and written through FFmpeg (see [`ffmpeg`]).

pub mod ffmpeg;

use std::path::Path;

use super::bits::{self, DELIMITER_LEN};
use super::{validate, CarrierDescriptor, StegoError};

pub use self::ffmpeg::{FfmpegSink, FfmpegSource};

/// Bytes per pixel in a [`VideoFrame`].
pub const BYTES_PER_PIXEL: usize = 3;

/// Offset of the blue value inside a BGR pixel.
const BLUE: usize = 0;

/// Stream parameters copied from the input to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Frame rate numerator (frames per `fps_den` seconds).
    pub fps_num: u32,
    pub fps_den: u32,
    /// Frame count, if the container declares it.
    pub frame_count: Option<u64>,
}

impl VideoInfo {
    /// Frame rate used when the input does not report one.
    pub const DEFAULT_FPS: u32 = 25;

    /// Capacity descriptor, if the frame count is known.
    pub fn descriptor(&self) -> Option<CarrierDescriptor> {
        self.frame_count.map(|frame_count| CarrierDescriptor::Video {
            frame_count,
            width: self.width,
            height: self.height,
        })
    }
}

/// A decoded frame: packed BGR, 8 bits per channel, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl VideoFrame {
    /// Wraps packed BGR bytes; `data` must hold exactly `width * height * 3` bytes.
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Result<Self, StegoError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(StegoError::VideoLoad(format!(
                "frame holds {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed BGR bytes, top row first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels, which is also the number of slots.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Writes bits into the blue plane in raster order; returns how many were used.
    fn embed_blue(&mut self, bits: &[bool]) -> usize {
        let mut used = 0;
        for (pixel, &bit) in self.data.chunks_exact_mut(BYTES_PER_PIXEL).zip(bits) {
            pixel[BLUE] = (pixel[BLUE] & !1) | u8::from(bit);
            used += 1;
        }
        used
    }

    /// Appends the blue LSB of every pixel to `out`.
    fn scan_blue(&self, out: &mut Vec<bool>) {
        out.extend(
            self.data
                .chunks_exact(BYTES_PER_PIXEL)
                .map(|pixel| pixel[BLUE] & 1 == 1),
        );
    }
}

/// Sequential frame cursor.
pub trait FrameSource {
    /// Stream parameters.
    fn info(&self) -> VideoInfo;

    /// Returns the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, StegoError>;
}

/// Consumer of frames in output order.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &VideoFrame) -> Result<(), StegoError>;
}

impl FrameSink for Vec<VideoFrame> {
    fn write_frame(&mut self, frame: &VideoFrame) -> Result<(), StegoError> {
        self.push(frame.clone());
        Ok(())
    }
}

/// Outcome of a successful embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Frames written to the sink.
    pub frames_written: u64,
    /// Frames whose blue plane was modified.
    pub frames_used: u64,
    /// Bits written, delimiter included.
    pub bits_written: usize,
}

/// Video steganography handler.
pub struct VideoStego;

impl VideoStego {
    /// Streams `source` into `sink`, hiding `payload` in the blue channel.
    ///
    /// Every frame of the source is written, modified or not. If the source
    /// declares its frame count the capacity is checked before anything is
    /// written; otherwise [`StegoError::InsufficientCapacity`] can be returned
    /// after the sink has received every frame.
    pub fn embed<S, W>(
        source: &mut S,
        sink: &mut W,
        payload: &[u8],
    ) -> Result<EmbedReport, StegoError>
    where
        S: FrameSource + ?Sized,
        W: FrameSink + ?Sized,
    {
        let frame_bits = bits::encode(payload);
        let info = source.info();
        if let Some(descriptor) = info.descriptor() {
            validate(descriptor.capacity(), frame_bits.len())?;
        }

        let mut bit_index = 0;
        let mut frames_written = 0u64;
        let mut frames_used = 0u64;
        let mut seen_capacity = 0usize;

        while let Some(mut frame) = source.next_frame()? {
            seen_capacity = seen_capacity.saturating_add(frame.pixel_count());
            if bit_index < frame_bits.len() {
                bit_index += frame.embed_blue(&frame_bits[bit_index..]);
                frames_used += 1;
                log::trace!(
                    "frame {}: {}/{} bits embedded",
                    frames_written,
                    bit_index,
                    frame_bits.len()
                );
            }
            sink.write_frame(&frame)?;
            frames_written += 1;
        }

        if bit_index < frame_bits.len() {
            log::warn!(
                "video ran out of frames after {} of {} bits; output is incomplete",
                bit_index,
                frame_bits.len()
            );
            return Err(StegoError::InsufficientCapacity {
                needed: frame_bits.len(),
                capacity: seen_capacity,
            });
        }

        log::debug!(
            "embedded {} bits across {} of {} frames",
            frame_bits.len(),
            frames_used,
            frames_written
        );
        Ok(EmbedReport {
            frames_written,
            frames_used,
            bits_written: frame_bits.len(),
        })
    }

    /// Reads frames until the delimiter shows up and returns the payload.
    pub fn extract<S>(source: &mut S) -> Result<Vec<u8>, StegoError>
    where
        S: FrameSource + ?Sized,
    {
        let mut scanned = Vec::new();
        let mut frames_read = 0u64;

        while let Some(frame) = source.next_frame()? {
            let appended_at = scanned.len();
            frame.scan_blue(&mut scanned);
            frames_read += 1;

            if scanned.len() >= DELIMITER_LEN {
                if let Some(end) = bits::find_delimiter_in_tail(&scanned, appended_at) {
                    log::debug!("delimiter found after {} frames", frames_read);
                    return Ok(bits::decode(&scanned[..bits::payload_end(end)]));
                }
            }
        }

        Err(StegoError::NoDelimiterFound)
    }

    /// Counts the slots of a source, reading it to the end if it does not
    /// declare a frame count.
    pub fn descriptor<S>(source: &mut S) -> Result<CarrierDescriptor, StegoError>
    where
        S: FrameSource + ?Sized,
    {
        let info = source.info();
        if let Some(descriptor) = info.descriptor() {
            return Ok(descriptor);
        }

        let mut frame_count = 0u64;
        while source.next_frame()?.is_some() {
            frame_count += 1;
        }
        Ok(CarrierDescriptor::Video {
            frame_count,
            width: info.width,
            height: info.height,
        })
    }

    /// Opens any video file FFmpeg can decode as a frame source.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn FrameSource>, StegoError> {
        Ok(Box::new(FfmpegSource::open(path)?))
    }

    /// Embeds `payload` from the video at `input` into an AVI at `output`.
    ///
    /// If embedding fails after the output was created (late capacity check,
    /// decode or mux error) the partial file is removed before the error is
    /// returned.
    pub fn embed_file<P: AsRef<Path>, Q: AsRef<Path>>(
        input: P,
        output: Q,
        payload: &[u8],
    ) -> Result<EmbedReport, StegoError> {
        let mut source = Self::open(input)?;
        let info = source.info();
        if let Some(descriptor) = info.descriptor() {
            validate(descriptor.capacity(), bits::frame_len(payload.len()))?;
        }

        let output = output.as_ref();
        let mut sink = FfmpegSink::create(output, &info)?;
        let result = Self::embed(source.as_mut(), &mut sink, payload);
        let finished = sink.finish();

        match (result, finished) {
            (Ok(report), Ok(())) => Ok(report),
            (Err(e), _) | (Ok(_), Err(e)) => {
                if let Err(remove_err) = std::fs::remove_file(output) {
                    log::warn!("could not remove {}: {}", output.display(), remove_err);
                }
                Err(e)
            }
        }
    }

    /// Extracts the payload from the video at `path`.
    pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, StegoError> {
        let mut source = Self::open(path)?;
        Self::extract(source.as_mut())
    }
}
