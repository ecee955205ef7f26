use crate::error::{AudioError, AudioResult};
use crate::format::{AudioData, SourceEncoding};
use std::path::Path;

/// Read a source file into interleaved `f32` samples.
pub fn read_audio(path: &Path, encoding: SourceEncoding) -> AudioResult<AudioData> {
    match encoding {
        SourceEncoding::Container => read_container(path),
        SourceEncoding::Pcm16 { sample_rate } => {
            let bytes = std::fs::read(path)?;
            Ok(mono(decode_pcm16_le(&bytes), sample_rate))
        }
        SourceEncoding::MuLaw { sample_rate } => {
            let bytes = std::fs::read(path)?;
            let samples = bytes.iter().map(|&b| i16_to_f32(mulaw_to_linear(b))).collect();
            Ok(mono(samples, sample_rate))
        }
        SourceEncoding::ALaw { sample_rate } => {
            let bytes = std::fs::read(path)?;
            let samples = bytes.iter().map(|&b| i16_to_f32(alaw_to_linear(b))).collect();
            Ok(mono(samples, sample_rate))
        }
    }
}

fn mono(samples: Vec<f32>, sample_rate: u32) -> AudioData {
    AudioData {
        samples,
        sample_rate,
        channels: 1,
    }
}

fn i16_to_f32(v: i16) -> f32 {
    v as f32 / i16::MAX as f32
}

/// `.wav` goes through hound, anything else is probed by symphonia.
fn read_container(path: &Path) -> AudioResult<AudioData> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext == "wav" {
        read_wav(path)
    } else {
        decode_with_symphonia(path, &ext)
    }
}

fn decode_with_symphonia(path: &Path, ext: &str) -> AudioResult<AudioData> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let decode_error = |e: SymphoniaError| AudioError::AudioDecodeError(e.to_string());

    let file = std::fs::File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if !ext.is_empty() {
        hint.with_extension(ext);
    }

    let mut reader = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_error)?
        .format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::AudioDecodeError("no audio track found".into()))?;
    let track_id = track.id;
    let mut audio = AudioData {
        samples: Vec::new(),
        sample_rate: track.codec_params.sample_rate.unwrap_or(0),
        channels: track.codec_params.channels.map(|c| c.count()).unwrap_or(0),
    };
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(decode_error)?;

    // Reallocated whenever a packet holds more frames than the current buffer.
    let mut buffer: Option<(SampleBuffer<f32>, u64)> = None;
    let mut signal: Option<(u32, usize)> = None;
    let mut corrupt = 0usize;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                corrupt += 1;
                log::debug!("skipping corrupt packet in {}: {reason}", path.display());
                continue;
            }
            Err(e) => return Err(decode_error(e)),
        };

        let spec = *decoded.spec();
        let layout = (spec.rate, spec.channels.count());
        match signal {
            None => signal = Some(layout),
            Some(first) if first != layout => {
                return Err(AudioError::AudioDecodeError(format!(
                    "signal changed mid-stream from {} Hz/{} ch to {} Hz/{} ch",
                    first.0, first.1, layout.0, layout.1
                )));
            }
            Some(_) => {}
        }

        let frames = decoded.capacity() as u64;
        if buffer
            .as_ref()
            .is_none_or(|(_, capacity)| *capacity < frames)
        {
            buffer = Some((SampleBuffer::new(frames, spec), frames));
        }
        if let Some((sample_buffer, _)) = buffer.as_mut() {
            sample_buffer.copy_interleaved_ref(decoded);
            audio.samples.extend_from_slice(sample_buffer.samples());
        }
    }

    if audio.samples.is_empty() && corrupt > 0 {
        return Err(AudioError::AudioDecodeError(format!(
            "none of the {corrupt} packets in {} could be decoded",
            path.display()
        )));
    }
    if let Some((sample_rate, channels)) = signal {
        audio.sample_rate = sample_rate;
        audio.channels = channels;
    }
    Ok(audio)
}

fn read_wav(path: &Path) -> AudioResult<AudioData> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, bits @ 8..=32) => {
            let full_scale = ((1i64 << (bits - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => {
            return Err(AudioError::UnsupportedWavFormat(format!(
                "{bits}-bit {format:?} samples"
            )));
        }
    };

    Ok(AudioData {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels as usize,
    })
}

fn decode_pcm16_le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16_to_f32(i16::from_le_bytes([pair[0], pair[1]])))
        .collect()
}

/// G.711 mu-law to 16-bit linear PCM.
fn mulaw_to_linear(byte: u8) -> i16 {
    let u = !byte;
    let exponent = (u >> 4) & 0x07;
    let mantissa = (u & 0x0F) as i32;
    let magnitude = (((mantissa << 3) + 0x84) << exponent) - 0x84;
    if u & 0x80 != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

/// G.711 A-law to 16-bit linear PCM.
fn alaw_to_linear(byte: u8) -> i16 {
    let a = byte ^ 0x55;
    let exponent = ((a >> 4) & 0x07) as i32;
    let mantissa = (a & 0x0F) as i32;
    let magnitude = match exponent {
        0 => (mantissa << 4) + 8,
        _ => ((mantissa << 4) + 0x108) << (exponent - 1),
    };
    // sign bit set means positive in A-law
    if a & 0x80 != 0 {
        magnitude as i16
    } else {
        -magnitude as i16
    }
}
