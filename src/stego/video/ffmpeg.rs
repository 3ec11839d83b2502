//! FFmpeg-backed frame source and sink.
//!
//! The source decodes the best video stream of any file FFmpeg can open and
//! converts each frame to packed BGR24. The sink always writes a single
//! `rawvideo` BGR24 stream into an AVI container, so every pixel value,
//! including its LSB, survives unchanged.

use std::path::Path;

use ffmpeg_next as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as ScalingContext, flag::Flags};
use ffmpeg::util::frame::video::Video;
use ffmpeg::Rational;

use super::{FrameSink, FrameSource, VideoFrame, VideoInfo, BYTES_PER_PIXEL};
use crate::stego::StegoError;

/// Container written by [`FfmpegSink`].
pub const OUTPUT_FORMAT: &str = "avi";

/// Codec of the output stream: uncompressed frames, stored as-is.
pub const OUTPUT_CODEC: ffmpeg::codec::Id = ffmpeg::codec::Id::RAWVIDEO;

/// Pixel layout of the output stream; matches [`VideoFrame`].
pub const OUTPUT_PIXEL: Pixel = Pixel::BGR24;

fn load_err(e: ffmpeg::Error) -> StegoError {
    StegoError::VideoLoad(e.to_string())
}

fn save_err(e: ffmpeg::Error) -> StegoError {
    StegoError::VideoSave(e.to_string())
}

fn is_again(e: &ffmpeg::Error) -> bool {
    matches!(e, ffmpeg::Error::Other { errno } if *errno == ffmpeg::util::error::EAGAIN)
}

/// Copies `height` rows of `row_len` bytes between buffers with different strides.
fn copy_rows(src: &[u8], src_stride: usize, dst: &mut [u8], dst_stride: usize, row_len: usize) {
    for (src_row, dst_row) in src.chunks(src_stride).zip(dst.chunks_mut(dst_stride)) {
        dst_row[..row_len].copy_from_slice(&src_row[..row_len]);
    }
}

/// Sequential decoder over one video stream.
pub struct FfmpegSource {
    input: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::Video,
    scaler: ScalingContext,
    stream_index: usize,
    info: VideoInfo,
    eof_sent: bool,
}

impl FfmpegSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        ffmpeg::init().map_err(load_err)?;
        let input = ffmpeg::format::input(path.as_ref()).map_err(load_err)?;

        let (stream_index, rate, frames, decoder) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or_else(|| StegoError::VideoLoad("no video stream".to_string()))?;
            let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
                .map_err(load_err)?;
            let decoder = context.decoder().video().map_err(load_err)?;
            (stream.index(), stream.avg_frame_rate(), stream.frames(), decoder)
        };

        if decoder.format() == Pixel::None || decoder.width() == 0 || decoder.height() == 0 {
            return Err(StegoError::VideoLoad("missing codec parameters".to_string()));
        }

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            OUTPUT_PIXEL,
            decoder.width(),
            decoder.height(),
            Flags::POINT,
        )
        .map_err(load_err)?;

        let (fps_num, fps_den) = if rate.numerator() > 0 && rate.denominator() > 0 {
            (rate.numerator() as u32, rate.denominator() as u32)
        } else {
            (VideoInfo::DEFAULT_FPS, 1)
        };

        // Zero means the container does not know.
        let frame_count = u64::try_from(frames).ok().filter(|&n| n > 0);

        let info = VideoInfo {
            width: decoder.width(),
            height: decoder.height(),
            fps_num,
            fps_den,
            frame_count,
        };
        log::debug!(
            "opened {}: {}x{} {:?} at {}/{} fps, {:?} frames",
            path.as_ref().display(),
            info.width,
            info.height,
            decoder.format(),
            fps_num,
            fps_den,
            frame_count
        );

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            info,
            eof_sent: false,
        })
    }

    fn convert(&mut self, decoded: &Video) -> Result<VideoFrame, StegoError> {
        let mut bgr = Video::empty();
        self.scaler.run(decoded, &mut bgr).map_err(load_err)?;

        let row_len = self.info.width as usize * BYTES_PER_PIXEL;
        let mut data = vec![0u8; row_len * self.info.height as usize];
        copy_rows(bgr.data(0), bgr.stride(0), &mut data, row_len, row_len);
        VideoFrame::from_bgr(self.info.width, self.info.height, data)
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn next_frame(&mut self) -> Result<Option<VideoFrame>, StegoError> {
        loop {
            let mut decoded = Video::empty();
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => return self.convert(&decoded).map(Some),
                Err(ffmpeg::Error::Eof) => return Ok(None),
                Err(e) if is_again(&e) => {}
                Err(e) => return Err(load_err(e)),
            }

            if self.eof_sent {
                return Ok(None);
            }

            let next = self
                .input
                .packets()
                .next()
                .map(|(stream, packet)| (stream.index(), packet));
            match next {
                Some((index, packet)) if index == self.stream_index => {
                    self.decoder.send_packet(&packet).map_err(load_err)?;
                }
                Some(_) => {}
                None => {
                    self.decoder.send_eof().map_err(load_err)?;
                    self.eof_sent = true;
                }
            }
        }
    }
}

/// Muxer writing frames as uncompressed BGR24 into an AVI file.
///
/// Call [`FfmpegSink::finish`] after the last frame; without it the file has
/// no trailer.
pub struct FfmpegSink {
    output: ffmpeg::format::context::Output,
    encoder: ffmpeg::codec::encoder::Video,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    width: u32,
    height: u32,
    frame_index: i64,
}

impl FfmpegSink {
    /// Creates `path` and writes the container header.
    pub fn create<P: AsRef<Path>>(path: P, info: &VideoInfo) -> Result<Self, StegoError> {
        ffmpeg::init().map_err(save_err)?;
        if info.width == 0 || info.height == 0 {
            return Err(StegoError::VideoSave(format!(
                "invalid frame size {}x{}",
                info.width, info.height
            )));
        }
        let (fps_num, fps_den) = match (i32::try_from(info.fps_num), i32::try_from(info.fps_den)) {
            (Ok(num), Ok(den)) if num > 0 && den > 0 => (num, den),
            _ => (VideoInfo::DEFAULT_FPS as i32, 1),
        };
        let frame_rate = Rational::new(fps_num, fps_den);
        let encoder_time_base = frame_rate.invert();

        let mut output =
            ffmpeg::format::output_as(path.as_ref(), OUTPUT_FORMAT).map_err(save_err)?;
        let codec = ffmpeg::encoder::find(OUTPUT_CODEC)
            .ok_or_else(|| StegoError::VideoSave("rawvideo encoder not available".to_string()))?;

        let mut encoder = ffmpeg::codec::Context::new_with_codec(codec)
            .encoder()
            .video()
            .map_err(save_err)?;
        encoder.set_width(info.width);
        encoder.set_height(info.height);
        encoder.set_format(OUTPUT_PIXEL);
        encoder.set_frame_rate(Some(frame_rate));
        encoder.set_time_base(encoder_time_base);
        let encoder = encoder
            .open_with(ffmpeg::Dictionary::new())
            .map_err(save_err)?;

        let stream_index = {
            let mut stream = output.add_stream(codec).map_err(save_err)?;
            stream.set_parameters(&encoder);
            stream.set_time_base(encoder_time_base);
            stream.index()
        };
        output.write_header().map_err(save_err)?;

        // The muxer may pick its own time base while writing the header.
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .unwrap_or(encoder_time_base);

        log::debug!(
            "writing {} {}x{} at {}/{} fps to {}",
            OUTPUT_FORMAT,
            info.width,
            info.height,
            fps_num,
            fps_den,
            path.as_ref().display()
        );

        Ok(Self {
            output,
            encoder,
            stream_index,
            encoder_time_base,
            stream_time_base,
            width: info.width,
            height: info.height,
            frame_index: 0,
        })
    }

    /// Moves every packet the encoder has ready into the container.
    fn drain(&mut self) -> Result<(), StegoError> {
        let mut packet = ffmpeg::Packet::empty();
        loop {
            match self.encoder.receive_packet(&mut packet) {
                Ok(()) => {
                    packet.set_stream(self.stream_index);
                    packet.set_position(-1);
                    packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
                    packet
                        .write_interleaved(&mut self.output)
                        .map_err(save_err)?;
                }
                Err(ffmpeg::Error::Eof) => return Ok(()),
                Err(e) if is_again(&e) => return Ok(()),
                Err(e) => return Err(save_err(e)),
            }
        }
    }

    /// Flushes the encoder and writes the container trailer.
    pub fn finish(mut self) -> Result<(), StegoError> {
        self.encoder.send_eof().map_err(save_err)?;
        self.drain()?;
        self.output.write_trailer().map_err(save_err)
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &VideoFrame) -> Result<(), StegoError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(StegoError::VideoSave(format!(
                "frame is {}x{}, stream is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }

        let mut out = Video::new(OUTPUT_PIXEL, self.width, self.height);
        let row_len = self.width as usize * BYTES_PER_PIXEL;
        let stride = out.stride(0);
        copy_rows(frame.data(), row_len, out.data_mut(0), stride, row_len);
        out.set_pts(Some(self.frame_index));
        self.frame_index += 1;

        self.encoder.send_frame(&out).map_err(save_err)?;
        self.drain()
    }
}
