use crate::error::{AudioError, AudioResult};
use crate::format::{AudioData, ConvertSettings};

/// Peak level, in dBFS below full scale, that normalization aims for.
pub const DEFAULT_HEADROOM_DB: f32 = 0.1;

/// Remix, resample and optionally normalize decoded audio to the target settings.
pub fn apply_target_config(
    audio: AudioData,
    target: &ConvertSettings,
    headroom_db: f32,
) -> AudioResult<AudioData> {
    let AudioData {
        mut samples,
        sample_rate: input_sample_rate,
        channels: input_channels,
    } = audio;

    if target.channels != input_channels {
        samples = remix(&samples, input_channels, target.channels)?;
    }

    let channel_count = target.channels.max(1);

    if input_sample_rate != target.sample_rate {
        samples = resample_interleaved(
            &samples,
            channel_count,
            input_sample_rate,
            target.sample_rate,
        );
    }

    if target.normalize {
        normalize_audio(&mut samples, headroom_db);
    }

    Ok(AudioData {
        samples,
        sample_rate: target.sample_rate,
        channels: channel_count,
    })
}

fn remix(samples: &[f32], input: usize, target: usize) -> AudioResult<Vec<f32>> {
    match (input, target) {
        (i, 1) if i > 1 => Ok(downmix_to_mono(samples, i)),
        (1, t) if t > 1 => Ok(upmix_mono(samples, t)),
        _ => Err(AudioError::UnsupportedChannelLayout { input, target }),
    }
}

/// Average each frame; a trailing partial frame is dropped.
fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    let scale = 1.0 / channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

fn upmix_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    samples
        .iter()
        .flat_map(|&s| std::iter::repeat_n(s, channels))
        .collect()
}

/// Linear interpolation between neighbouring frames. Positions past the last
/// frame hold its value.
fn resample_interleaved(
    samples: &[f32],
    channels: usize,
    from_rate: u32,
    to_rate: u32,
) -> Vec<f32> {
    let frame_count = samples.len() / channels;
    if frame_count == 0 {
        return Vec::new();
    }
    if from_rate == to_rate {
        return samples[..frame_count * channels].to_vec();
    }

    let frame = |index: usize| {
        let index = index.min(frame_count - 1);
        &samples[index * channels..(index + 1) * channels]
    };

    let step = from_rate as f64 / to_rate as f64;
    let out_frames = (frame_count as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;
    let mut out = Vec::with_capacity(out_frames * channels);

    for i in 0..out_frames {
        let position = i as f64 * step;
        let index = position as usize;
        let frac = position.fract() as f32;
        let (current, next) = (frame(index), frame(index + 1));
        out.extend(current.iter().zip(next).map(|(a, b)| a + (b - a) * frac));
    }

    out
}

/// Scale so the loudest sample sits `headroom_db` below full scale. Silence is left alone.
fn normalize_audio(samples: &mut [f32], headroom_db: f32) {
    let max_val = samples.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));

    if max_val > 1e-5 {
        let target_peak = 10f32.powf(-headroom_db.abs() / 20.0);
        let scale = target_peak / max_val;
        for sample in samples.iter_mut() {
            *sample *= scale;
        }
    }
}
