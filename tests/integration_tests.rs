//! Integration tests for HideNseek
//!
//! These exercise the carriers through real files: PNG/JPEG images, WAV
//! audio and AVI video written to a temporary directory.

use hidenseek::stego::video::{
    FfmpegSink, FfmpegSource, FrameSink, FrameSource, VideoFrame, VideoInfo,
};
use hidenseek::stego::{
    bits, AudioStego, ImageStego, LsbCarrier, NestConfig, NestedImage, VideoStego,
};
use hidenseek::{decrypt_message, encrypt_message, CryptoError, StegoError};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
use tempfile::tempdir;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 0x81])
    }))
}

fn write_wav(path: &std::path::Path, channels: u16, sample_count: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..sample_count {
        writer.write_sample(((i * 37) % 2000) as i16 - 1000).unwrap();
    }
    writer.finalize().unwrap();
}

/// Bytes with no run of 16 zero bits and no trailing `0x00`.
const BINARY_PAYLOAD: [u8; 12] = [
    0xFF, 0x81, 0x7E, 0x00, 0xC3, 0x01, 0x80, 0x3C, 0xA5, 0x5A, 0x10, 0x08,
];

fn write_video(path: &std::path::Path, frames: usize, width: u32, height: u32) -> Vec<VideoFrame> {
    let info = VideoInfo {
        width,
        height,
        fps_num: 24,
        fps_den: 1,
        frame_count: None,
    };
    let frames: Vec<VideoFrame> = (0..frames)
        .map(|n| {
            let data = (0..(width * height) as usize)
                .flat_map(|i| {
                    [((i + n) % 128) as u8 * 2 + 1, (i % 256) as u8, (n % 256) as u8]
                })
                .collect();
            VideoFrame::from_bgr(width, height, data).unwrap()
        })
        .collect();

    let mut sink = FfmpegSink::create(path, &info).unwrap();
    for frame in &frames {
        sink.write_frame(frame).unwrap();
    }
    sink.finish().unwrap();
    frames
}

/// "HI" needs 32 bits; an 11x1 image has 33 slots.
#[test]
fn test_hi_roundtrip_through_png_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("stego.png");

    let mut stego = ImageStego::from_image(gradient(11, 1));
    stego.hide(b"HI").unwrap();
    stego.save(&out).unwrap();

    let loaded = ImageStego::from_file(&out).unwrap();
    assert_eq!(loaded.reveal().unwrap(), b"HI");
}

#[test]
fn test_hi_into_three_pixels_fails() {
    let mut stego = ImageStego::from_image(gradient(3, 1));
    assert!(matches!(
        stego.hide(b"HI"),
        Err(StegoError::InsufficientCapacity { .. })
    ));
}

#[test]
fn test_never_embedded_image_has_no_message() {
    let stego = ImageStego::from_image(gradient(30, 30));
    assert!(matches!(stego.reveal(), Err(StegoError::NoDelimiterFound)));
}

#[test]
fn test_jpeg_cover_becomes_png() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.jpg");
    let out = dir.path().join("stego.png");
    gradient(64, 64).save_with_format(&cover, ImageFormat::Jpeg).unwrap();

    let mut stego = ImageStego::from_file(&cover).unwrap();
    stego.hide(b"from a jpeg").unwrap();
    stego.save(&out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let revealed = ImageStego::from_bytes(&bytes).unwrap().reveal().unwrap();
    assert_eq!(revealed, b"from a jpeg");
}

#[test]
fn test_encrypted_message_in_image() {
    let token = encrypt_message("the eagle has landed", "hunter2").unwrap();

    let mut stego = ImageStego::from_image(gradient(100, 100));
    stego.hide(token.as_bytes()).unwrap();
    let png = stego.to_png_bytes().unwrap();

    let hidden = ImageStego::from_bytes(&png).unwrap().reveal().unwrap();
    let hidden = String::from_utf8(hidden).unwrap();
    assert_eq!(hidden, token);
    assert_eq!(decrypt_message(&hidden, "hunter2").unwrap(), "the eagle has landed");
    assert!(matches!(
        decrypt_message(&hidden, "hunter3"),
        Err(CryptoError::WrongPasswordOrCorrupted)
    ));
}

#[test]
fn test_stereo_wav_roundtrip_preserves_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_wav(&input, 2, 4000);

    let original = AudioStego::from_file(&input).unwrap();
    let mut stego = AudioStego::from_file(&input).unwrap();
    stego.hide(b"stereo secret").unwrap();
    stego.save(&output).unwrap();

    let loaded = AudioStego::from_file(&output).unwrap();
    assert_eq!(loaded.spec(), original.spec());
    assert_eq!(loaded.samples().len(), original.samples().len());
    assert_eq!(loaded.reveal().unwrap(), b"stereo secret");

    let used = bits::frame_len(13);
    assert_eq!(loaded.samples()[used..], original.samples()[used..]);
}

#[test]
fn test_binary_payload_in_wav() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_wav(&input, 1, 500);
    assert!(!bits::collides(&BINARY_PAYLOAD));

    let mut stego = AudioStego::from_file(&input).unwrap();
    stego.hide(&BINARY_PAYLOAD).unwrap();
    stego.save(&output).unwrap();

    assert_eq!(AudioStego::from_file(&output).unwrap().reveal().unwrap(), BINARY_PAYLOAD);
}

#[test]
fn test_wav_too_short() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("short.wav");
    write_wav(&input, 1, 20);

    let mut stego = AudioStego::from_file(&input).unwrap();
    assert!(matches!(
        stego.hide(b"HI"),
        Err(StegoError::InsufficientCapacity {
            needed: 32,
            capacity: 20
        })
    ));
}

#[test]
fn test_8_bit_wav_is_unsupported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("8bit.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&input, spec).unwrap();
    for i in 0..100i8 {
        writer.write_sample(i).unwrap();
    }
    writer.finalize().unwrap();

    assert!(matches!(
        AudioStego::from_file(&input),
        Err(StegoError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_video_file_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.avi");
    let output = dir.path().join("out.avi");
    let frames = write_video(&input, 5, 16, 8);

    // 128 slots per frame; 30 bytes need 256 bits, so two frames carry data.
    let message = b"thirty bytes of video payload!";
    let report = VideoStego::embed_file(&input, &output, message).unwrap();
    assert_eq!(report.frames_written, 5);
    assert_eq!(report.frames_used, 2);

    assert_eq!(VideoStego::extract_file(&output).unwrap(), message);

    let mut reader = FfmpegSource::open(&output).unwrap();
    let info = reader.info();
    assert_eq!((info.width, info.height, info.fps_num, info.fps_den), (16, 8, 24, 1));
    assert_eq!(info.frame_count, Some(5));

    let mut written = Vec::new();
    while let Some(frame) = reader.next_frame().unwrap() {
        written.push(frame);
    }
    // Untouched frames are copied verbatim; green and red never change.
    assert_eq!(written[2..], frames[2..]);
    for (a, b) in written.iter().zip(&frames) {
        for (pa, pb) in a.data().chunks(3).zip(b.data().chunks(3)) {
            assert_eq!(pa[1..], pb[1..]);
        }
    }
}

#[test]
fn test_video_too_small_leaves_no_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tiny.avi");
    let output = dir.path().join("out.avi");
    write_video(&input, 1, 4, 4);

    let result = VideoStego::embed_file(&input, &output, b"far too long for sixteen slots");
    assert!(matches!(
        result,
        Err(StegoError::InsufficientCapacity { capacity: 16, .. })
    ));
    assert!(!output.exists());
}

#[test]
fn test_binary_payload_in_video() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.avi");
    let output = dir.path().join("out.avi");
    write_video(&input, 4, 6, 5);

    VideoStego::embed_file(&input, &output, &BINARY_PAYLOAD).unwrap();
    assert_eq!(VideoStego::extract_file(&output).unwrap(), BINARY_PAYLOAD);
}

#[test]
fn test_clean_video_has_no_message() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("clean.avi");
    write_video(&input, 3, 8, 8);

    assert!(matches!(
        VideoStego::extract_file(&input),
        Err(StegoError::NoDelimiterFound)
    ));
}

#[test]
fn test_unreadable_video_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("clip.mp4");
    let output = dir.path().join("out.avi");
    std::fs::write(&input, b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00").unwrap();

    assert!(matches!(
        VideoStego::open(&input),
        Err(StegoError::VideoLoad(_))
    ));
    assert!(VideoStego::embed_file(&input, &output, b"x").is_err());
    assert!(!output.exists());
}

#[test]
fn test_nested_image_through_files() {
    let dir = tempdir().unwrap();
    let cover_path = dir.path().join("cover.png");
    let stego_path = dir.path().join("stego.png");
    let revealed_path = dir.path().join("revealed.png");

    gradient(120, 120).save(&cover_path).unwrap();
    let secret = DynamicImage::ImageRgba8(ImageBuffer::from_fn(300, 200, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8, 255])
    }));

    let mut cover = ImageStego::from_file(&cover_path).unwrap();
    let nested = NestedImage::embed(&mut cover, &secret, &NestConfig::default()).unwrap();
    cover.save(&stego_path).unwrap();

    let stego = ImageStego::from_file(&stego_path).unwrap();
    let png = NestedImage::extract(&stego).unwrap();
    std::fs::write(&revealed_path, &png).unwrap();

    let revealed = image::open(&revealed_path).unwrap();
    assert_eq!((revealed.width(), revealed.height()), nested.dimensions());
    assert!(nested.dimensions().0 <= 300 && nested.dimensions().1 <= 200);
}

#[test]
fn test_frame_sink_for_vec_collects_frames() {
    let frame = VideoFrame::from_bgr(1, 1, vec![1, 2, 3]).unwrap();
    let mut sink: Vec<VideoFrame> = Vec::new();
    sink.write_frame(&frame).unwrap();
    assert_eq!(sink, vec![frame]);
}
