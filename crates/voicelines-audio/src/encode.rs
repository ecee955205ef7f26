use crate::error::{AudioError, AudioResult};
use crate::format::{AudioData, TargetFormat};
use std::io::{Seek, Write};
use std::path::Path;
use std::process::Command;

/// Write 16-bit PCM WAV to any seekable writer.
pub fn write_wav<W: Write + Seek>(writer: W, audio: &AudioData) -> AudioResult<()> {
    let channels = u16::try_from(audio.channels).map_err(|_| AudioError::InvalidTargetConfig {
        sample_rate: audio.sample_rate,
        channels: audio.channels,
    })?;
    let spec = hound::WavSpec {
        channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut wav = hound::WavWriter::new(writer, spec)?;
    for &sample in &audio.samples {
        let clamped = sample.clamp(-1.0, 1.0);
        wav.write_sample((clamped * i16::MAX as f32).round() as i16)?;
    }
    wav.finalize()?;
    Ok(())
}

/// Re-encode a WAV file into `format` by running ffmpeg.
pub fn encode_with_ffmpeg(
    ffmpeg: &Path,
    wav_input: &Path,
    output: &Path,
    format: TargetFormat,
) -> AudioResult<()> {
    let Some((codec, muxer)) = format.ffmpeg_codec() else {
        return Err(AudioError::UnsupportedTargetFormat(format.to_string()));
    };

    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-y")
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(wav_input)
        .arg("-codec:a")
        .arg(codec)
        .arg("-f")
        .arg(muxer)
        .arg(output);

    log::debug!("running {:?}", cmd);

    let program = ffmpeg.display().to_string();
    let result = cmd.output().map_err(|source| AudioError::EncoderLaunch {
        program: program.clone(),
        source,
    })?;

    if !result.status.success() {
        return Err(AudioError::EncoderFailed {
            program,
            status: result.status.to_string(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    Ok(())
}
