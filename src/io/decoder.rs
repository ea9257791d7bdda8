//! Audio decoding using Symphonia
//!
//! Turns any container/codec Symphonia understands (WAV, MP3, AAC in MP4/MOV,
//! FLAC, ...) into the mono 16-bit buffer the fingerprinting pipeline reads.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as PcmBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AlignError;
use crate::io::sample_buffer::SampleBuffer;
use crate::preprocessing::channel_mixer::downmix_interleaved;

/// Decode the first audio track of a media file to mono PCM
///
/// # Arguments
///
/// * `path` - Path to an audio or video file
///
/// # Returns
///
/// Mono `SampleBuffer` at the track's native sample rate
///
/// # Errors
///
/// Returns `AlignError::IoError` if the file cannot be opened and
/// `AlignError::DecodingError` if it has no decodable audio track.
pub fn decode_audio(path: impl AsRef<Path>) -> Result<SampleBuffer, AlignError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AlignError::DecodingError(format!(
                "No supported audio track found in {}",
                path.display()
            ))
        })?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        AlignError::DecodingError(format!("Unknown sample rate in {}", path.display()))
    })?;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut mono: Vec<i16> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count();

                let mut pcm = PcmBuffer::<i16>::new(decoded.capacity() as u64, spec);
                pcm.copy_interleaved_ref(decoded);
                mono.extend(downmix_interleaved(pcm.samples(), channels)?);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped, the rest of the stream is still usable
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz from {}",
        mono.len(),
        sample_rate,
        path.display()
    );

    Ok(SampleBuffer::new(mono, sample_rate))
}

/// Read a 16-bit PCM WAV file into a mono sample buffer
///
/// Multi-channel files are down-mixed.
///
/// # Errors
///
/// Returns `AlignError::DecodingError` for non-16-bit or float WAV data.
pub fn read_wav(path: impl AsRef<Path>) -> Result<SampleBuffer, AlignError> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(AlignError::DecodingError(format!(
            "Expected 16-bit integer PCM in {}, got {} bit {:?}",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let interleaved = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;
    let mono = downmix_interleaved(&interleaved, spec.channels as usize)?;

    Ok(SampleBuffer::new(mono, spec.sample_rate))
}

/// Write a mono sample buffer as a 16-bit PCM WAV file
pub fn write_wav(path: impl AsRef<Path>, buffer: &SampleBuffer) -> Result<(), AlignError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(sample_rate: u32, len: usize) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 12000.0) as i16
            })
            .collect()
    }

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let buffer = SampleBuffer::new(tone(8000, 4000), 8000);

        write_wav(&path, &buffer).unwrap();
        let read_back = read_wav(&path).unwrap();
        assert_eq!(read_back, buffer);
    }

    #[test]
    fn test_decode_wav_with_symphonia() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..2205i16 {
            writer.write_sample(i).unwrap();
            writer.write_sample(i + 2).unwrap();
        }
        writer.finalize().unwrap();

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.sample_rate(), 22050);
        assert_eq!(decoded.len(), 2205);
        assert_eq!(decoded.samples()[10], 11);
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_audio("/definitely/not/here.wav");
        assert!(matches!(result, Err(AlignError::IoError(_))));
    }
}
