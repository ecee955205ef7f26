use std::f32::consts::PI;
use std::path::Path;
use voicelines_audio::decode::read_audio;
use voicelines_audio::{
    AudioConverter, AudioError, ConvertSettings, SourceEncoding, TargetFormat, Transcoder,
};

fn write_stereo_sine(path: &Path, sample_rate: u32, seconds: f32, amplitude: f32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as usize;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = (amplitude * (2.0 * PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
        writer.write_sample(value).unwrap();
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
}

fn peak_of(path: &Path) -> f32 {
    let mut reader = hound::WavReader::open(path).unwrap();
    reader
        .samples::<i16>()
        .map(|s| (s.unwrap() as f32 / i16::MAX as f32).abs())
        .fold(0.0, f32::max)
}

#[test]
fn test_stereo_wav_to_normalized_mono() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.wav");
    let destination = dir.path().join("out").join("line.wav");
    write_stereo_sine(&source, 44_100, 1.0, 0.3);

    let settings = ConvertSettings::new(TargetFormat::Wav, 22_000, 1);
    let report = Transcoder::default()
        .convert(&source, SourceEncoding::Container, &settings, &destination)
        .unwrap();

    assert_eq!(report.path, destination);
    assert_eq!(report.sample_rate, 22_000);
    assert_eq!(report.channels, 1);
    assert!((report.duration_secs - 1.0).abs() < 0.01);

    let reader = hound::WavReader::open(&destination).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 22_000);
    assert_eq!(reader.spec().bits_per_sample, 16);
    drop(reader);

    let peak = peak_of(&destination);
    assert!((peak - 0.98855).abs() < 1e-3, "peak was {peak}");
}

#[test]
fn test_without_normalization_keeps_level() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.wav");
    let destination = dir.path().join("quiet.wav");
    write_stereo_sine(&source, 22_000, 0.5, 0.3);

    let settings = ConvertSettings::new(TargetFormat::Wav, 22_000, 1).with_normalize(false);
    Transcoder::default()
        .convert(&source, SourceEncoding::Container, &settings, &destination)
        .unwrap();

    let peak = peak_of(&destination);
    assert!((peak - 0.3).abs() < 1e-2, "peak was {peak}");
}

#[test]
fn test_raw_pcm_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("speech.pcm");
    let bytes: Vec<u8> = (0..16_000)
        .map(|i| ((i as f32 / 16_000.0 * 2.0 * PI * 220.0).sin() * 8_000.0) as i16)
        .flat_map(|s| s.to_le_bytes())
        .collect();
    std::fs::write(&source, bytes).unwrap();

    let destination = dir.path().join("speech.wav");
    let settings = ConvertSettings::new(TargetFormat::Wav, 8_000, 2);
    let report = Transcoder::default()
        .convert(
            &source,
            SourceEncoding::Pcm16 { sample_rate: 16_000 },
            &settings,
            &destination,
        )
        .unwrap();

    assert_eq!(report.frames, 8_000);
    assert_eq!(report.channels, 2);
    assert!((report.duration_secs - 1.0).abs() < 1e-6);
}

#[test]
fn test_creates_missing_directories_and_leaves_no_staging_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.wav");
    write_stereo_sine(&source, 16_000, 0.25, 0.5);

    let destination = dir.path().join("a").join("b").join("c").join("clip.wav");
    Transcoder::default()
        .convert(
            &source,
            SourceEncoding::Container,
            &ConvertSettings::new(TargetFormat::Wav, 16_000, 1),
            &destination,
        )
        .unwrap();

    assert!(destination.exists());
    let entries: Vec<_> = std::fs::read_dir(destination.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_invalid_settings_rejected_before_decoding() {
    let dir = tempfile::tempdir().unwrap();
    let result = Transcoder::default().convert(
        &dir.path().join("missing.wav"),
        SourceEncoding::Container,
        &ConvertSettings::new(TargetFormat::Wav, 0, 1),
        &dir.path().join("out.wav"),
    );
    assert!(matches!(
        result,
        Err(AudioError::InvalidTargetConfig { sample_rate: 0, .. })
    ));
}

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// MPEG-1 Layer III frames at 128 kbps, 44.1 kHz mono (the `mp3_44100_128`
/// layout) with empty side info, so each one decodes to 1152 silent samples.
fn silent_mp3(frames: usize) -> Vec<u8> {
    const FRAME_LEN: usize = 144 * 128_000 / 44_100;
    let mut frame = vec![0u8; FRAME_LEN];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0xC0]);
    frame.repeat(frames)
}

#[test]
fn test_mp3_fixture_decodes_through_symphonia() {
    // 45 MPEG-2 Layer III frames of 576 samples at 22.05 kHz
    let expected_secs = 45.0 * 576.0 / 22_050.0;

    let audio = read_audio(
        &fixture("speech_22050_mono.mp3"),
        SourceEncoding::Container,
    )
    .unwrap();
    assert_eq!(audio.sample_rate, 22_050);
    assert_eq!(audio.channels, 1);
    assert!(
        (audio.duration_secs() - expected_secs).abs() < 0.06,
        "decoded {}s",
        audio.duration_secs()
    );
}

#[test]
fn test_mp3_to_resampled_stereo_wav() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("npc1").join("line.wav");

    let report = Transcoder::default()
        .convert(
            &fixture("speech_22050_mono.mp3"),
            SourceEncoding::Container,
            &ConvertSettings::new(TargetFormat::Wav, 44_100, 2),
            &destination,
        )
        .unwrap();

    assert_eq!(report.sample_rate, 44_100);
    assert_eq!(report.channels, 2);
    assert!((report.duration_secs - 45.0 * 576.0 / 22_050.0).abs() < 0.06);

    let reader = hound::WavReader::open(&destination).unwrap();
    assert_eq!(reader.spec().sample_rate, 44_100);
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.len() as usize, report.frames * 2);
}

#[test]
fn test_default_provider_mp3_layout() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("scratch.mp3");
    std::fs::write(&source, silent_mp3(40)).unwrap();
    let destination = dir.path().join("greet.wav");

    let decoded = read_audio(&source, SourceEncoding::Container).unwrap();
    assert_eq!(decoded.sample_rate, 44_100);
    assert_eq!(decoded.channels, 1);
    assert!(decoded.samples.iter().all(|s| s.abs() < 1e-6));

    let report = Transcoder::default()
        .convert(
            &source,
            SourceEncoding::Container,
            &ConvertSettings::new(TargetFormat::Wav, 22_000, 1),
            &destination,
        )
        .unwrap();

    let expected_secs = 40.0 * 1152.0 / 44_100.0;
    assert_eq!(report.sample_rate, 22_000);
    assert_eq!(report.channels, 1);
    assert!(
        (report.duration_secs - expected_secs).abs() < 0.03,
        "converted {}s",
        report.duration_secs
    );
}

#[test]
#[ignore = "requires ffmpeg"]
fn test_ogg_output_via_ffmpeg() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.wav");
    let destination = dir.path().join("npc1").join("greet.ogg");
    write_stereo_sine(&source, 44_100, 1.0, 0.5);

    let report = Transcoder::default()
        .convert(
            &source,
            SourceEncoding::Container,
            &ConvertSettings::default(),
            &destination,
        )
        .unwrap();

    assert!(destination.exists());
    assert!(std::fs::metadata(&destination).unwrap().len() > 0);
    assert!((report.duration_secs - 1.0).abs() < 0.01);
}
