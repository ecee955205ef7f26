use crate::error::Result;
use crate::item::RawItem;
use serde::Deserialize;

/// Scalar that may be written as a string, number or boolean.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Text(s) => s,
            Loose::Bool(b) => b.to_string(),
            Loose::Int(i) => i.to_string(),
            Loose::Float(f) => f.to_string(),
        }
    }
}

fn text(value: Option<Loose>) -> Option<String> {
    value.map(Loose::into_text)
}

#[derive(Debug, Deserialize)]
struct Document {
    voice: Voice,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Voice {
    output_path: Option<Loose>,
    #[serde(default)]
    generate_settings: GenerateSettings,
    #[serde(default)]
    convert_settings: ConvertSettings,
    #[serde(default)]
    lines: Vec<Line>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateSettings {
    voice_id: Option<Loose>,
    format: Option<Loose>,
    seed: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertSettings {
    format: Option<Loose>,
    frame_rate: Option<Loose>,
    channels: Option<Loose>,
    normalize: Option<Loose>,
}

#[derive(Debug, Deserialize)]
struct Line {
    text: Option<Loose>,
    filename: Option<Loose>,
    previous_text: Option<Loose>,
    next_text: Option<Loose>,
    model_id: Option<Loose>,
    #[serde(alias = "voiceId")]
    voice_id: Option<Loose>,
    seed: Option<Loose>,
}

/// Parse a voice document. Every line inherits the voice level settings; a line
/// may override the voice id and seed.
pub fn parse_json_str(json: &str) -> Result<Vec<RawItem>> {
    let document: Document = serde_json::from_str(json)?;
    let voice = document.voice;

    let output_directory = text(voice.output_path);
    let generate = voice.generate_settings;
    let convert = voice.convert_settings;
    let voice_id = text(generate.voice_id);
    let generate_format = text(generate.format);
    let seed = text(generate.seed);
    let convert_format = text(convert.format);
    let frame_rate = text(convert.frame_rate);
    let channels = text(convert.channels);
    let normalize = text(convert.normalize);

    Ok(voice
        .lines
        .into_iter()
        .map(|line| RawItem {
            output_directory: output_directory.clone(),
            filename: text(line.filename),
            voice_id: text(line.voice_id).or_else(|| voice_id.clone()),
            text: text(line.text),
            previous_text: text(line.previous_text),
            next_text: text(line.next_text),
            model_id: text(line.model_id),
            generate_format: generate_format.clone(),
            convert_format: convert_format.clone(),
            frame_rate: frame_rate.clone(),
            channels: channels.clone(),
            normalize: normalize.clone(),
            seed: text(line.seed).or_else(|| seed.clone()),
        })
        .collect())
}
