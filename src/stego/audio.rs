//! LSB steganography for audio files.
//!
//! Hides data in the least significant bits of audio samples.
//! Supports WAV files with 16-bit integer PCM only.
//!
//! Samples are used in storage order, so for multi-channel audio the bits
//! alternate between channels exactly as the frames are interleaved.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use super::{CarrierDescriptor, LsbCarrier, StegoError};

/// Audio steganography handler.
pub struct AudioStego {
    /// Audio specification (sample rate, channels, etc.)
    spec: WavSpec,
    /// Audio samples (16-bit signed integers)
    samples: Vec<i16>,
}

impl AudioStego {
    /// Creates a new AudioStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let reader = WavReader::open(path).map_err(|e| StegoError::AudioLoad(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates a new AudioStego from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| StegoError::AudioLoad(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates AudioStego from a WavReader.
    fn from_reader<R: Read>(reader: WavReader<R>) -> Result<Self, StegoError> {
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(StegoError::UnsupportedFormat(format!(
                "only 16-bit PCM WAV is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StegoError::AudioLoad(e.to_string()))?;

        Ok(Self { spec, samples })
    }

    /// Creates AudioStego from raw interleaved samples.
    pub fn from_samples(spec: WavSpec, samples: Vec<i16>) -> Result<Self, StegoError> {
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(StegoError::UnsupportedFormat(format!(
                "only 16-bit PCM is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }
        Ok(Self { spec, samples })
    }

    /// Returns the capacity descriptor of this cover.
    pub fn descriptor(&self) -> CarrierDescriptor {
        CarrierDescriptor::Audio {
            sample_count: self.samples.len(),
        }
    }

    /// Saves the audio to a WAV file with the original parameters.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let writer = WavWriter::create(path, self.spec)
            .map_err(|e| StegoError::AudioSave(e.to_string()))?;
        self.write_samples(writer)
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        {
            let writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)
                .map_err(|e| StegoError::AudioSave(e.to_string()))?;
            self.write_samples(writer)?;
        }
        Ok(bytes)
    }

    fn write_samples<W: Write + Seek>(&self, mut writer: WavWriter<W>) -> Result<(), StegoError> {
        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| StegoError::AudioSave(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| StegoError::AudioSave(e.to_string()))
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Returns the samples in storage order.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

impl LsbCarrier for AudioStego {
    fn capacity(&self) -> usize {
        self.samples.len()
    }

    fn embed_bits(&mut self, bits: &[bool]) {
        for (sample, &bit) in self.samples.iter_mut().zip(bits) {
            *sample = (*sample & !1) | i16::from(bit);
        }
    }

    fn scan(&self) -> Vec<bool> {
        self.samples.iter().map(|s| s & 1 == 1).collect()
    }
}

#[cfg(test)]
fn test_spec(channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Creates a simple test audio: an A4 sine wave.
#[cfg(test)]
fn create_test_audio(sample_count: usize, channels: u16) -> AudioStego {
    let samples: Vec<i16> = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 16000.0) as i16
        })
        .collect();

    AudioStego {
        spec: test_spec(channels),
        samples,
    }
}
