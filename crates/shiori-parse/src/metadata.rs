use serde::{Deserialize, Serialize};

/// Structured metadata extracted from a release filename.
///
/// Empty strings and empty lists mean "not found". Numeric fields are kept
/// as text so zero padding and decimals (`"01"`, `"12.5"`) survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Series title (e.g., "Sousou no Frieren").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Series title plus year, anime type and movie subtitle qualifiers.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub formatted_title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub season_number: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub part_number: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_number: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub episode_number: Vec<String>,
    /// Absolute numbering written in parentheses after the episode, e.g. `002 (100)`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub episode_number_alt: Vec<String>,
    /// Numbers bound to non-episode keywords (`ED1`, `OVA 2`) or the total in `01 of 12`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_episode_number: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub episode_title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anime_type: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub year: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audio_term: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device_compatibility: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_checksum: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_extension: String,
    /// The input, verbatim.
    pub file_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub release_group: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub release_information: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub release_version: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub video_resolution: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub video_term: Vec<String>,
}

impl Metadata {
    /// First episode number as a float, so `"12.5"` is kept.
    pub fn first_episode_number(&self) -> Option<f64> {
        self.episode_number.first()?.parse().ok()
    }

    pub fn first_season_number(&self) -> Option<u32> {
        first_integer(&self.season_number)
    }

    pub fn first_part_number(&self) -> Option<u32> {
        first_integer(&self.part_number)
    }

    pub fn first_volume_number(&self) -> Option<u32> {
        first_integer(&self.volume_number)
    }
}

fn first_integer(values: &[String]) -> Option<u32> {
    let value = values.first()?;
    // "1.5" seasons exist; the integer part is what callers sort on.
    let integer = value.split('.').next().unwrap_or(value);
    integer.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_skipped() {
        let metadata = Metadata {
            title: "Sousou no Frieren".into(),
            file_name: "Sousou no Frieren - 01.mkv".into(),
            episode_number: vec!["01".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&metadata).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(json["title"], "Sousou no Frieren");
        assert_eq!(json["episode_number"][0], "01");
        assert!(object.get("release_group").is_none());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let metadata: Metadata =
            serde_json::from_str(r#"{"file_name": "x.mkv", "season_number": ["2"]}"#).unwrap();
        assert_eq!(metadata.season_number, vec!["2"]);
        assert!(metadata.title.is_empty());
    }

    #[test]
    fn test_numeric_accessors() {
        let metadata = Metadata {
            episode_number: vec!["12.5".into()],
            season_number: vec!["02".into()],
            part_number: vec!["1.5".into()],
            ..Default::default()
        };
        assert_eq!(metadata.first_episode_number(), Some(12.5));
        assert_eq!(metadata.first_season_number(), Some(2));
        assert_eq!(metadata.first_part_number(), Some(1));
        assert_eq!(metadata.first_volume_number(), None);
    }
}
