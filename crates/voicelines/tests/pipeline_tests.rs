use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use voicelines::{
    BatchError, BatchRunner, FailureMode, ItemOutcome, RawItem, Report, RunOptions,
};
use voicelines_audio::{
    AudioConverter, AudioError, AudioResult, ConversionReport, ConvertSettings, SourceEncoding,
    Transcoder,
};
use voicelines_speech::{
    AudioByteStream, AudioCodec, SpeechRequest, TTSError, TTSResult, TTSSpeechProvider,
};

/// Returns a fixed payload in two chunks; text containing `FAIL` is rejected.
struct FakeSpeech {
    payload: Vec<u8>,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl FakeSpeech {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TTSSpeechProvider for FakeSpeech {
    async fn generate_speech_stream<'a>(
        &'a self,
        request: SpeechRequest,
    ) -> TTSResult<AudioByteStream<'a>> {
        let failing = request.text.contains("FAIL");
        self.requests.lock().unwrap().push(request);
        if failing {
            return Err(TTSError::RequestRejected {
                provider: "fake".into(),
                status: 500,
                body: "synthesis failed".into(),
            });
        }

        let (head, tail) = self.payload.split_at(self.payload.len() / 2);
        let chunks = vec![
            Ok(Bytes::copy_from_slice(head)),
            Ok(Bytes::copy_from_slice(tail)),
        ];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    fn supported_codecs(&self) -> Vec<AudioCodec> {
        vec![
            AudioCodec::Mp3,
            AudioCodec::Pcm,
            AudioCodec::Ulaw,
            AudioCodec::Opus,
        ]
    }
}

/// Copies the scratch payload to the destination; duration is bytes / 1000.
#[derive(Default)]
struct FakeConverter {
    calls: Mutex<Vec<(PathBuf, SourceEncoding, ConvertSettings)>>,
}

impl AudioConverter for FakeConverter {
    fn convert(
        &self,
        source: &Path,
        encoding: SourceEncoding,
        settings: &ConvertSettings,
        destination: &Path,
    ) -> AudioResult<ConversionReport> {
        let data = std::fs::read(source)?;
        if data.is_empty() {
            return Err(AudioError::EmptyAudio(source.to_path_buf()));
        }
        std::fs::create_dir_all(destination.parent().unwrap())?;
        std::fs::write(destination, &data)?;
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), encoding, settings.clone()));

        Ok(ConversionReport {
            path: destination.to_path_buf(),
            duration_secs: data.len() as f64 / 1000.0,
            sample_rate: settings.sample_rate,
            channels: settings.channels,
            frames: data.len(),
        })
    }
}

fn row(filename: &str, text: &str) -> RawItem {
    RawItem {
        output_directory: Some("npc1".into()),
        filename: Some(filename.into()),
        voice_id: Some("V1".into()),
        text: Some(text.into()),
        convert_format: Some("ogg".into()),
        frame_rate: Some("22000".into()),
        channels: Some("1".into()),
        normalize: Some("true".into()),
        ..Default::default()
    }
}

fn options(root: &Path) -> RunOptions {
    RunOptions::new(root.join("output")).with_scratch_dir(Some(root.join("scratch")))
}

#[tokio::test]
async fn test_generates_converts_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 1500]);
    let converter = FakeConverter::default();

    let summary = BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&[row("greet", "Hello there")])
        .await
        .unwrap();

    assert_eq!(summary.generated(), 1);
    assert_eq!(
        summary.outcomes[0],
        ItemOutcome::Generated {
            row: 1,
            key: "npc1/greet.ogg".into(),
            duration_secs: 1.5
        }
    );

    let output = dir.path().join("output").join("npc1").join("greet.ogg");
    assert_eq!(std::fs::read(&output).unwrap().len(), 1500);

    let report = std::fs::read_to_string(dir.path().join("output").join("report.csv")).unwrap();
    assert_eq!(report, "path,duration\nnpc1/greet.ogg,1.500\n");

    let requests = speech.requests.lock().unwrap();
    assert_eq!(requests[0].voice.id(), "V1");
    assert_eq!(requests[0].text, "Hello there");
    assert_eq!(requests[0].model_id.as_deref(), Some("eleven_multilingual_v2"));
    assert_eq!(requests[0].output_format.to_string(), "mp3_44100_128");

    let calls = converter.calls.lock().unwrap();
    assert_eq!(calls[0].1, SourceEncoding::Container);
    assert_eq!(calls[0].2.sample_rate, 22_000);
    assert!(calls[0].0.to_string_lossy().ends_with(".mp3"));
}

#[tokio::test]
async fn test_existing_output_is_skipped_and_report_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 800]);
    let converter = FakeConverter::default();
    let rows = [row("greet", "Hello there")];

    BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&rows)
        .await
        .unwrap();
    let report_path = dir.path().join("output").join("report.csv");
    let before = std::fs::read_to_string(&report_path).unwrap();

    let summary = BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&rows)
        .await
        .unwrap();

    assert_eq!(speech.calls(), 1);
    assert_eq!(converter.calls.lock().unwrap().len(), 1);
    assert_eq!(
        summary.outcomes,
        vec![ItemOutcome::Skipped {
            row: 1,
            key: "npc1/greet.ogg".into()
        }]
    );
    assert_eq!(std::fs::read_to_string(&report_path).unwrap(), before);
}

#[tokio::test]
async fn test_regenerate_reruns_and_updates_duration() {
    let dir = tempfile::tempdir().unwrap();
    let converter = FakeConverter::default();
    let rows = [row("greet", "Hello there"), row("bye", "Goodbye")];

    let first = FakeSpeech::new(vec![1u8; 1000]);
    BatchRunner::new(&first, &converter, options(dir.path()).with_regenerate(true))
        .run(&rows)
        .await
        .unwrap();

    let second = FakeSpeech::new(vec![1u8; 2000]);
    BatchRunner::new(&second, &converter, options(dir.path()).with_regenerate(true))
        .run(&rows)
        .await
        .unwrap();

    assert_eq!(second.calls(), 2);
    let mut files: Vec<_> = std::fs::read_dir(dir.path().join("output").join("npc1"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(files, vec!["bye.ogg", "greet.ogg"]);

    let report = Report::load(&dir.path().join("output").join("report.csv")).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.get("npc1/greet.ogg"), Some(2.0));
}

#[tokio::test]
async fn test_merge_keeps_keys_from_previous_runs() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("durations.csv");
    std::fs::write(
        &report_path,
        "path,duration\nnpc0/intro.ogg,3.250\nnpc1/greet.ogg,9.000\n",
    )
    .unwrap();

    let speech = FakeSpeech::new(vec![1u8; 500]);
    let converter = FakeConverter::default();
    BatchRunner::new(
        &speech,
        &converter,
        options(dir.path()).with_report_path(&report_path),
    )
    .run(&[row("greet", "Hello there")])
    .await
    .unwrap();

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(
        content,
        "path,duration\nnpc0/intro.ogg,3.250\nnpc1/greet.ogg,0.500\n"
    );
}

#[tokio::test]
async fn test_resilient_mode_continues_after_failures() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 1000]);
    let converter = FakeConverter::default();
    let missing_voice = RawItem {
        voice_id: None,
        ..row("nobody", "Who am I")
    };
    let rows = [
        row("greet", "Hello there"),
        row("broken", "FAIL here"),
        missing_voice,
        row("bye", "Goodbye"),
    ];

    let summary = BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&rows)
        .await
        .unwrap();

    assert_eq!(summary.generated(), 2);
    assert_eq!(summary.failed(), 2);
    assert!(matches!(
        &summary.outcomes[1],
        ItemOutcome::Failed { row: 2, key: Some(key), .. } if key == "npc1/broken.ogg"
    ));
    assert!(matches!(
        &summary.outcomes[2],
        ItemOutcome::Failed { row: 3, key: None, error } if error.contains("voice_id")
    ));

    let report = Report::load(&dir.path().join("output").join("report.csv")).unwrap();
    assert_eq!(report.len(), 2);
    assert!(report.get("npc1/broken.ogg").is_none());
    assert!(!dir.path().join("output").join("npc1").join("broken.ogg").exists());
}

#[tokio::test]
async fn test_fail_fast_stops_after_merging_completed_items() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 1000]);
    let converter = FakeConverter::default();
    let rows = [
        row("greet", "Hello there"),
        row("broken", "FAIL here"),
        row("bye", "Goodbye"),
    ];

    let result = BatchRunner::new(
        &speech,
        &converter,
        options(dir.path()).with_failure_mode(FailureMode::FailFast),
    )
    .run(&rows)
    .await;

    match result {
        Err(BatchError::ItemFailed { row, key, source }) => {
            assert_eq!(row, 2);
            assert_eq!(key, "npc1/broken.ogg");
            assert!(matches!(
                *source,
                BatchError::SpeechError(TTSError::RequestRejected { status: 500, .. })
            ));
        }
        other => panic!("expected ItemFailed, got {other:?}"),
    }

    assert_eq!(speech.calls(), 2);
    let report = Report::load(&dir.path().join("output").join("report.csv")).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.get("npc1/greet.ogg"), Some(1.0));
}

#[tokio::test]
async fn test_scratch_files_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 100]);
    let converter = FakeConverter::default();

    BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&[row("greet", "Hello there"), row("broken", "FAIL")])
        .await
        .unwrap();

    let leftovers = std::fs::read_dir(dir.path().join("scratch")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_empty_payload_fails_the_item() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(Vec::new());
    let converter = FakeConverter::default();

    let summary = BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&[row("greet", "Hello there")])
        .await
        .unwrap();

    assert_eq!(summary.failed(), 1);
    assert!(converter.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unusable_generate_format_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 1000]);
    let converter = FakeConverter::default();
    let undecodable = RawItem {
        generate_format: Some("opus_48000_64".into()),
        ..row("greet", "Hello there")
    };
    let unproduced = RawItem {
        generate_format: Some("alaw_8000".into()),
        ..row("bye", "Goodbye")
    };

    let summary = BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&[undecodable, unproduced])
        .await
        .unwrap();

    assert_eq!(summary.failed(), 2);
    assert_eq!(speech.calls(), 0);
    assert!(converter.calls.lock().unwrap().is_empty());
    assert!(matches!(
        &summary.outcomes[0],
        ItemOutcome::Failed { row: 1, key: Some(key), error }
            if key == "npc1/greet.ogg" && error.contains("opus_48000_64")
    ));
    assert!(matches!(
        &summary.outcomes[1],
        ItemOutcome::Failed { row: 2, error, .. } if error.contains("alaw_8000")
    ));
}

#[tokio::test]
async fn test_out_of_range_settings_fail_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(vec![1u8; 1000]);
    let converter = FakeConverter::default();
    let many_channels = RawItem {
        channels: Some("70000".into()),
        ..row("greet", "Hello there")
    };
    let huge_rate = RawItem {
        frame_rate: Some("4000000000".into()),
        ..row("bye", "Goodbye")
    };

    let summary = BatchRunner::new(&speech, &converter, options(dir.path()))
        .run(&[many_channels, huge_rate])
        .await
        .unwrap();

    assert_eq!(summary.failed(), 2);
    assert_eq!(speech.calls(), 0);
    assert!(matches!(
        &summary.outcomes[0],
        ItemOutcome::Failed { error, .. } if error.contains("channels=70000")
    ));
}

fn pcm_sine(sample_rate: u32, seconds: f32) -> Vec<u8> {
    let frames = (sample_rate as f32 * seconds) as usize;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            ((2.0 * std::f32::consts::PI * 330.0 * t).sin() * 6_000.0) as i16
        })
        .flat_map(|s| s.to_le_bytes())
        .collect()
}

#[tokio::test]
async fn test_pcm_payload_through_transcoder() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(pcm_sine(22_050, 1.0));
    let transcoder = Transcoder::default();
    let line = RawItem {
        generate_format: Some("pcm_22050".into()),
        convert_format: Some("wav".into()),
        ..row("greet", "Hello there")
    };

    let summary = BatchRunner::new(&speech, &transcoder, options(dir.path()))
        .run(&[line])
        .await
        .unwrap();

    let output = dir.path().join("output").join("npc1").join("greet.wav");
    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().sample_rate, 22_000);
    assert_eq!(reader.spec().channels, 1);

    let duration = summary.report.get("npc1/greet.wav").unwrap();
    assert!((duration - 1.0).abs() < 0.01, "duration was {duration}");
}

#[tokio::test]
#[ignore = "requires ffmpeg"]
async fn test_npc_greeting_to_ogg() {
    let dir = tempfile::tempdir().unwrap();
    let speech = FakeSpeech::new(pcm_sine(22_050, 0.5));
    let transcoder = Transcoder::default();
    let line = RawItem {
        generate_format: Some("pcm_22050".into()),
        ..row("greet", "Hello there")
    };

    BatchRunner::new(&speech, &transcoder, options(dir.path()))
        .run(&[line])
        .await
        .unwrap();

    assert!(dir.path().join("output/npc1/greet.ogg").exists());
    let report = Report::load(&dir.path().join("output/report.csv")).unwrap();
    assert!(report.get("npc1/greet.ogg").is_some());
}
