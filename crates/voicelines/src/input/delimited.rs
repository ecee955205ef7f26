use crate::error::Result;
use crate::item::RawItem;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default, alias = "output_path", alias = "outputPath")]
    path: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default, alias = "voiceId")]
    voice_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    previous_text: Option<String>,
    #[serde(default)]
    next_text: Option<String>,
    #[serde(default)]
    model_id: Option<String>,
    #[serde(default)]
    generate_format: Option<String>,
    #[serde(default)]
    convert_format: Option<String>,
    #[serde(default, alias = "frameRate", alias = "sample_rate")]
    frame_rate: Option<String>,
    #[serde(default)]
    channels: Option<String>,
    #[serde(default)]
    normalize: Option<String>,
    #[serde(default)]
    seed: Option<String>,
}

impl From<Row> for RawItem {
    fn from(row: Row) -> Self {
        RawItem {
            output_directory: row.path,
            filename: row.filename,
            voice_id: row.voice_id,
            text: row.text,
            previous_text: row.previous_text,
            next_text: row.next_text,
            model_id: row.model_id,
            generate_format: row.generate_format,
            convert_format: row.convert_format,
            frame_rate: row.frame_rate,
            channels: row.channels,
            normalize: row.normalize,
            seed: row.seed,
        }
    }
}

/// Parse delimited rows with a header line. Unknown columns are ignored.
pub fn parse_csv_str(content: &str) -> Result<Vec<RawItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let mut items = Vec::new();
    for record in reader.deserialize::<Row>() {
        items.push(record?.into());
    }
    Ok(items)
}
