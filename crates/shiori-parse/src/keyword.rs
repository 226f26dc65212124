use bitflags::bitflags;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::token::MetadataCategory;

bitflags! {
    /// Flags controlling when a standalone keyword may match.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeywordFlags: u8 {
        /// Short or common word that is not trusted during the first sweep
        /// (e.g., "ITA" in "Bokura ga Ita").
        const AMBIGUOUS = 0b0000_0001;
    }
}

/// The category a keyword belongs to, determining which field it populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    SeasonPrefix,
    EpisodePrefix,
    VolumePrefix,
    PartPrefix,
    AnimeType,
    Year,
    AudioTerm,
    DeviceCompat,
    FileChecksum,
    FileExtension,
    Language,
    ReleaseGroup,
    ReleaseInformation,
    ReleaseVersion,
    Source,
    Subtitles,
    VideoResolution,
    VideoTerm,
}

impl KeywordCategory {
    /// Technical tag describing the file rather than the release or episode.
    pub fn is_file_info(self) -> bool {
        !matches!(
            self,
            KeywordCategory::Year
                | KeywordCategory::ReleaseVersion
                | KeywordCategory::ReleaseGroup
                | KeywordCategory::SeasonPrefix
                | KeywordCategory::EpisodePrefix
                | KeywordCategory::VolumePrefix
                | KeywordCategory::PartPrefix
        )
    }

    pub fn is_season_like_prefix(self) -> bool {
        matches!(
            self,
            KeywordCategory::SeasonPrefix | KeywordCategory::VolumePrefix | KeywordCategory::PartPrefix
        )
    }

    /// Output field for the number following a prefix keyword.
    pub fn metadata_category(self) -> Option<MetadataCategory> {
        match self {
            KeywordCategory::SeasonPrefix => Some(MetadataCategory::Season),
            KeywordCategory::PartPrefix => Some(MetadataCategory::Part),
            KeywordCategory::VolumePrefix => Some(MetadataCategory::VolumeNumber),
            KeywordCategory::EpisodePrefix => Some(MetadataCategory::EpisodeNumber),
            _ => None,
        }
    }
}

/// How a keyword relates to the number it qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    /// `S01`, `EP05`, `ED1`.
    CombinedWithNumber,
    /// `Season 01`, `OVA 2`.
    SeparatedWithNumber,
    /// `2nd Season`.
    OrdinalSuffix,
    /// No number attached.
    Standalone,
}

/// A standalone keyword entry with its category and matching flags.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub category: KeywordCategory,
    pub flags: KeywordFlags,
}

impl KeywordEntry {
    const fn new(category: KeywordCategory) -> Self {
        Self {
            category,
            flags: KeywordFlags::empty(),
        }
    }

    const fn ambiguous(category: KeywordCategory) -> Self {
        Self {
            category,
            flags: KeywordFlags::AMBIGUOUS,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.flags.contains(KeywordFlags::AMBIGUOUS)
    }
}

/// A prefix keyword that binds to a number.
#[derive(Debug, Clone, Copy)]
pub struct NumberedKeyword {
    pub value: &'static str,
    pub category: KeywordCategory,
    pub kind: KeywordKind,
}

/// A keyword split over several tokens by the tokenizer (`BLU` `-` `RAY`).
#[derive(Debug, Clone, Copy)]
pub struct KeywordParts {
    pub category: KeywordCategory,
    /// Token values that must follow the prefix, compared case-insensitively.
    pub sequence: &'static [&'static str],
}

/// Compile-time standalone keyword table.
/// All keys are UPPERCASE; a key belongs to the first category that lists it.
pub static STANDALONE: phf::Map<&'static str, KeywordEntry> = phf_map! {
    // ── Anime type ───────────────────────────────────────────────
    "MOVIE" => KeywordEntry::new(KeywordCategory::AnimeType),
    "GEKIJOUBAN" => KeywordEntry::new(KeywordCategory::AnimeType),
    "ONA" => KeywordEntry::new(KeywordCategory::AnimeType),
    "OVA" => KeywordEntry::new(KeywordCategory::AnimeType),
    "OAV" => KeywordEntry::new(KeywordCategory::AnimeType),
    "OAD" => KeywordEntry::new(KeywordCategory::AnimeType),
    "SPECIALS" => KeywordEntry::new(KeywordCategory::AnimeType),
    "TV" => KeywordEntry::new(KeywordCategory::AnimeType),
    "ED" => KeywordEntry::new(KeywordCategory::AnimeType),
    "ENDING" => KeywordEntry::new(KeywordCategory::AnimeType),
    "NCED" => KeywordEntry::new(KeywordCategory::AnimeType),
    "NCOP" => KeywordEntry::new(KeywordCategory::AnimeType),
    "OPED" => KeywordEntry::new(KeywordCategory::AnimeType),
    "OP" => KeywordEntry::new(KeywordCategory::AnimeType),
    "OPENING" => KeywordEntry::new(KeywordCategory::AnimeType),
    "PREVIEW" => KeywordEntry::new(KeywordCategory::AnimeType),
    "PV" => KeywordEntry::new(KeywordCategory::AnimeType),
    "EVENT" => KeywordEntry::new(KeywordCategory::AnimeType),
    "TOKUTEN" => KeywordEntry::new(KeywordCategory::AnimeType),
    "LOGO" => KeywordEntry::new(KeywordCategory::AnimeType),
    "CM" => KeywordEntry::new(KeywordCategory::AnimeType),
    "SPOT" => KeywordEntry::new(KeywordCategory::AnimeType),
    "MENU" => KeywordEntry::new(KeywordCategory::AnimeType),

    // ── Audio terms ──────────────────────────────────────────────
    "2CH" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DTS" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DTS-ES" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DTS5.1" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "TRUEHD5.1" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "5.1" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "2.0" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "AAC" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "AACX2" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "AACX3" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "AACX4" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "AC3" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "EAC3" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "E-AC-3" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "FLAC" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "FLACX2" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "FLACX3" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "FLACX4" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "LOSSLESS" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "MP3" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "OGG" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "VORBIS" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DD2" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DD2.0" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DDP" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DD" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "HDMA" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DTSHD" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DUALAUDIO" => KeywordEntry::new(KeywordCategory::AudioTerm),
    "DUAL-AUDIO" => KeywordEntry::new(KeywordCategory::AudioTerm),

    // ── Video terms ──────────────────────────────────────────────
    "24FPS" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "30FPS" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "60FPS" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "120FPS" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "8BIT" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "10BIT" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "10BITS" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HI10" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HI10P" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HI444" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HI444P" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HI444PP" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "H264" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "H265" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "X264" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "X265" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "AVC" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HEVC" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HEVC2" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "DIVX" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "DIVX5" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "DIVX6" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "XVID" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "AV1" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HDR" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "DV" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "AVI" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "RMVB" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "WMV" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "WMV3" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "WMV9" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HQ" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "LQ" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "HD" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "SD" => KeywordEntry::new(KeywordCategory::VideoTerm),
    "4K" => KeywordEntry::new(KeywordCategory::VideoTerm),

    // ── Release version ──────────────────────────────────────────
    "V0" => KeywordEntry::new(KeywordCategory::ReleaseVersion),
    "V1" => KeywordEntry::new(KeywordCategory::ReleaseVersion),
    "V2" => KeywordEntry::new(KeywordCategory::ReleaseVersion),
    "V3" => KeywordEntry::new(KeywordCategory::ReleaseVersion),
    "V4" => KeywordEntry::new(KeywordCategory::ReleaseVersion),
    "V5" => KeywordEntry::new(KeywordCategory::ReleaseVersion),

    // ── Device compatibility ─────────────────────────────────────
    "IPAD3" => KeywordEntry::new(KeywordCategory::DeviceCompat),
    "IPHONE5" => KeywordEntry::new(KeywordCategory::DeviceCompat),
    "IPOD" => KeywordEntry::new(KeywordCategory::DeviceCompat),
    "PS3" => KeywordEntry::new(KeywordCategory::DeviceCompat),
    "XBOX" => KeywordEntry::new(KeywordCategory::DeviceCompat),
    "XBOX360" => KeywordEntry::new(KeywordCategory::DeviceCompat),
    "ANDROID" => KeywordEntry::ambiguous(KeywordCategory::DeviceCompat),

    // ── File extensions ──────────────────────────────────────────
    // AVI, DIVX, RMVB and WMV are video terms; both count as extensions.
    "3GP" => KeywordEntry::new(KeywordCategory::FileExtension),
    "FLV" => KeywordEntry::new(KeywordCategory::FileExtension),
    "M2TS" => KeywordEntry::new(KeywordCategory::FileExtension),
    "MKV" => KeywordEntry::new(KeywordCategory::FileExtension),
    "MOV" => KeywordEntry::new(KeywordCategory::FileExtension),
    "MP4" => KeywordEntry::new(KeywordCategory::FileExtension),
    "MPG" => KeywordEntry::new(KeywordCategory::FileExtension),
    "OGM" => KeywordEntry::new(KeywordCategory::FileExtension),
    "RM" => KeywordEntry::new(KeywordCategory::FileExtension),
    "TS" => KeywordEntry::new(KeywordCategory::FileExtension),
    "WEBM" => KeywordEntry::new(KeywordCategory::FileExtension),

    // ── Languages ────────────────────────────────────────────────
    "ENG" => KeywordEntry::new(KeywordCategory::Language),
    "ENGLISH" => KeywordEntry::new(KeywordCategory::Language),
    "ESPANOL" => KeywordEntry::new(KeywordCategory::Language),
    "JAP" => KeywordEntry::new(KeywordCategory::Language),
    "JP" => KeywordEntry::ambiguous(KeywordCategory::Language),
    "EN" => KeywordEntry::ambiguous(KeywordCategory::Language),
    "JPN" => KeywordEntry::new(KeywordCategory::Language),
    "FR" => KeywordEntry::ambiguous(KeywordCategory::Language),
    "PT-BR" => KeywordEntry::new(KeywordCategory::Language),
    "SPANISH" => KeywordEntry::new(KeywordCategory::Language),
    "VOSTFR" => KeywordEntry::new(KeywordCategory::Language),
    "ESP" => KeywordEntry::ambiguous(KeywordCategory::Language),
    "ITA" => KeywordEntry::ambiguous(KeywordCategory::Language),
    "RU" => KeywordEntry::ambiguous(KeywordCategory::Language),
    "CHT" => KeywordEntry::new(KeywordCategory::Language),
    "CHS" => KeywordEntry::new(KeywordCategory::Language),
    "CH" => KeywordEntry::ambiguous(KeywordCategory::Language),

    // ── Release information ──────────────────────────────────────
    "REMASTER" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "REMASTERED" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "UNCENSORED" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "UNCUT" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "VFR" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "WIDESCREEN" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "WS" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "BATCH" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "COMPLETE" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "PATCH" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "REMUX" => KeywordEntry::new(KeywordCategory::ReleaseInformation),
    "FINAL" => KeywordEntry::new(KeywordCategory::ReleaseInformation),

    // ── Subtitles ────────────────────────────────────────────────
    "ASS" => KeywordEntry::new(KeywordCategory::Subtitles),
    "BIG5" => KeywordEntry::new(KeywordCategory::Subtitles),
    "DUB" => KeywordEntry::new(KeywordCategory::Subtitles),
    "DUBBED" => KeywordEntry::new(KeywordCategory::Subtitles),
    "HARDSUB" => KeywordEntry::new(KeywordCategory::Subtitles),
    "HARDSUBS" => KeywordEntry::new(KeywordCategory::Subtitles),
    "RAW" => KeywordEntry::new(KeywordCategory::Subtitles),
    "SOFTSUB" => KeywordEntry::new(KeywordCategory::Subtitles),
    "SOFTSUBS" => KeywordEntry::new(KeywordCategory::Subtitles),
    "SUB" => KeywordEntry::new(KeywordCategory::Subtitles),
    "SUBBED" => KeywordEntry::new(KeywordCategory::Subtitles),
    "SUBTITLED" => KeywordEntry::new(KeywordCategory::Subtitles),
    "MULTISUB" => KeywordEntry::new(KeywordCategory::Subtitles),
    "MULTIAUDIO" => KeywordEntry::new(KeywordCategory::Subtitles),

    // ── Sources ──────────────────────────────────────────────────
    "BD" => KeywordEntry::new(KeywordCategory::Source),
    "ASF" => KeywordEntry::new(KeywordCategory::Source),
    "BDRIP" => KeywordEntry::new(KeywordCategory::Source),
    "BLURAY" => KeywordEntry::new(KeywordCategory::Source),
    "BLU-RAY" => KeywordEntry::new(KeywordCategory::Source),
    "DVD" => KeywordEntry::new(KeywordCategory::Source),
    "DVD5" => KeywordEntry::new(KeywordCategory::Source),
    "DVD9" => KeywordEntry::new(KeywordCategory::Source),
    "DVD-R2J" => KeywordEntry::new(KeywordCategory::Source),
    "DVDRIP" => KeywordEntry::new(KeywordCategory::Source),
    "DVD-RIP" => KeywordEntry::new(KeywordCategory::Source),
    "R2DVD" => KeywordEntry::new(KeywordCategory::Source),
    "R2J" => KeywordEntry::new(KeywordCategory::Source),
    "R2JDVD" => KeywordEntry::new(KeywordCategory::Source),
    "R2JDVDRIP" => KeywordEntry::new(KeywordCategory::Source),
    "HDTV" => KeywordEntry::new(KeywordCategory::Source),
    "HDTVRIP" => KeywordEntry::new(KeywordCategory::Source),
    "TVRIP" => KeywordEntry::new(KeywordCategory::Source),
    "TV-RIP" => KeywordEntry::new(KeywordCategory::Source),
    "WEBCAST" => KeywordEntry::new(KeywordCategory::Source),
    "WEBRIP" => KeywordEntry::new(KeywordCategory::Source),
};

const fn numbered(value: &'static str, category: KeywordCategory, kind: KeywordKind) -> NumberedKeyword {
    NumberedKeyword {
        value,
        category,
        kind,
    }
}

use KeywordCategory::{AnimeType, EpisodePrefix, PartPrefix, SeasonPrefix, VolumePrefix};
use KeywordKind::{CombinedWithNumber, OrdinalSuffix, SeparatedWithNumber};

/// Prefix keywords that bind to a number, in matching order.
///
/// Order matters: "2nd Season" is tried before "S01", which is tried before
/// "Season 01".
pub static NUMBERED: &[NumberedKeyword] = &[
    // ── Season ───────────────────────────────────────────────────
    numbered("SEASON", SeasonPrefix, OrdinalSuffix),
    numbered("SAISON", SeasonPrefix, OrdinalSuffix),
    numbered("SEASONS", SeasonPrefix, OrdinalSuffix),
    numbered("SAISONS", SeasonPrefix, OrdinalSuffix),
    numbered("S", SeasonPrefix, CombinedWithNumber),
    numbered("SEASON", SeasonPrefix, SeparatedWithNumber),
    numbered("SAISON", SeasonPrefix, SeparatedWithNumber),
    numbered("SEASONS", SeasonPrefix, SeparatedWithNumber),
    numbered("SAISONS", SeasonPrefix, SeparatedWithNumber),
    // ── Episode ──────────────────────────────────────────────────
    numbered("E", EpisodePrefix, CombinedWithNumber),
    numbered("#", EpisodePrefix, CombinedWithNumber),
    numbered("第", EpisodePrefix, CombinedWithNumber),
    numbered("EP", EpisodePrefix, CombinedWithNumber),
    numbered("EPS", EpisodePrefix, CombinedWithNumber),
    numbered("EPISODE", EpisodePrefix, CombinedWithNumber),
    numbered("EPISODES", EpisodePrefix, CombinedWithNumber),
    numbered("CAPITULO", EpisodePrefix, CombinedWithNumber),
    numbered("EPISODIO", EpisodePrefix, CombinedWithNumber),
    numbered("FOLDE", EpisodePrefix, CombinedWithNumber),
    numbered("EP", EpisodePrefix, SeparatedWithNumber),
    numbered("EPS", EpisodePrefix, SeparatedWithNumber),
    numbered("EPISODE", EpisodePrefix, SeparatedWithNumber),
    numbered("EPISODES", EpisodePrefix, SeparatedWithNumber),
    numbered("CAPITULO", EpisodePrefix, SeparatedWithNumber),
    numbered("EPISODIO", EpisodePrefix, SeparatedWithNumber),
    numbered("FOLDE", EpisodePrefix, SeparatedWithNumber),
    // ── Volume ───────────────────────────────────────────────────
    numbered("VOL", VolumePrefix, CombinedWithNumber),
    numbered("VOLUME", VolumePrefix, CombinedWithNumber),
    numbered("VOLUMES", VolumePrefix, CombinedWithNumber),
    numbered("VOL", VolumePrefix, SeparatedWithNumber),
    numbered("VOLUME", VolumePrefix, SeparatedWithNumber),
    numbered("VOLUMES", VolumePrefix, SeparatedWithNumber),
    // ── Part ─────────────────────────────────────────────────────
    numbered("PART", PartPrefix, CombinedWithNumber),
    numbered("PARTS", PartPrefix, CombinedWithNumber),
    numbered("COUR", PartPrefix, CombinedWithNumber),
    numbered("PART", PartPrefix, SeparatedWithNumber),
    numbered("PARTS", PartPrefix, SeparatedWithNumber),
    numbered("COUR", PartPrefix, SeparatedWithNumber),
    numbered("COUR", PartPrefix, OrdinalSuffix),
    // ── Anime type ───────────────────────────────────────────────
    numbered("SP", AnimeType, CombinedWithNumber),
    numbered("MOVIE", AnimeType, CombinedWithNumber),
    numbered("OAD", AnimeType, CombinedWithNumber),
    numbered("OAV", AnimeType, CombinedWithNumber),
    numbered("ONA", AnimeType, CombinedWithNumber),
    numbered("OVA", AnimeType, CombinedWithNumber),
    numbered("SPECIAL", AnimeType, CombinedWithNumber),
    numbered("SPECIALS", AnimeType, CombinedWithNumber),
    numbered("ED", AnimeType, CombinedWithNumber),
    numbered("ENDING", AnimeType, CombinedWithNumber),
    numbered("NCED", AnimeType, CombinedWithNumber),
    numbered("NCOP", AnimeType, CombinedWithNumber),
    numbered("OPED", AnimeType, CombinedWithNumber),
    numbered("OP", AnimeType, CombinedWithNumber),
    numbered("OPENING", AnimeType, CombinedWithNumber),
    numbered("番外編", AnimeType, CombinedWithNumber),
    numbered("總集編", AnimeType, CombinedWithNumber),
    numbered("映像特典", AnimeType, CombinedWithNumber),
    numbered("特典", AnimeType, CombinedWithNumber),
    numbered("特典アニメ", AnimeType, CombinedWithNumber),
    numbered("SP", AnimeType, SeparatedWithNumber),
    numbered("MOVIE", AnimeType, SeparatedWithNumber),
    numbered("OAD", AnimeType, SeparatedWithNumber),
    numbered("OAV", AnimeType, SeparatedWithNumber),
    numbered("ONA", AnimeType, SeparatedWithNumber),
    numbered("OVA", AnimeType, SeparatedWithNumber),
    numbered("SPECIAL", AnimeType, SeparatedWithNumber),
    numbered("SPECIALS", AnimeType, SeparatedWithNumber),
    numbered("ED", AnimeType, SeparatedWithNumber),
    numbered("ENDING", AnimeType, SeparatedWithNumber),
    numbered("NCED", AnimeType, SeparatedWithNumber),
    numbered("NCOP", AnimeType, SeparatedWithNumber),
    numbered("OPED", AnimeType, SeparatedWithNumber),
    numbered("OP", AnimeType, SeparatedWithNumber),
    numbered("OPENING", AnimeType, SeparatedWithNumber),
    numbered("番外編", AnimeType, SeparatedWithNumber),
    numbered("總集編", AnimeType, SeparatedWithNumber),
    numbered("映像特典", AnimeType, SeparatedWithNumber),
    numbered("特典", AnimeType, SeparatedWithNumber),
    numbered("特典アニメ", AnimeType, SeparatedWithNumber),
];

const fn parts(category: KeywordCategory, sequence: &'static [&'static str]) -> KeywordParts {
    KeywordParts { category, sequence }
}

/// Multi-token keywords keyed by their first token, tried in order.
pub static PARTS: phf::Map<&'static str, &'static [KeywordParts]> = phf_map! {
    // ── Audio terms ──────────────────────────────────────────────
    "2" => &[parts(KeywordCategory::AudioTerm, &[".", "0CH"])],
    "5" => &[
        parts(KeywordCategory::AudioTerm, &[".", "1"]),
        parts(KeywordCategory::AudioTerm, &[".", "1", "+", "2", ".", "0"]),
        parts(KeywordCategory::AudioTerm, &[".", "1CH"]),
    ],
    "DTS" => &[
        parts(KeywordCategory::AudioTerm, &["-", "ES"]),
        parts(KeywordCategory::AudioTerm, &["-", "HD"]),
        parts(KeywordCategory::AudioTerm, &["-", "HDMA"]),
    ],
    "DTS5" => &[parts(KeywordCategory::AudioTerm, &[".", "1"])],
    "TRUEHD5" => &[parts(KeywordCategory::AudioTerm, &[".", "1"])],
    "DUAL" => &[
        parts(KeywordCategory::AudioTerm, &["-", "AUDIO"]),
        parts(KeywordCategory::AudioTerm, &[".", "AUDIO"]),
        parts(KeywordCategory::AudioTerm, &[" ", "AUDIO"]),
    ],
    "DD2" => &[parts(KeywordCategory::AudioTerm, &[".", "0"])],
    "E" => &[parts(KeywordCategory::AudioTerm, &["-", "AC", "-", "3"])],

    // ── Video terms ──────────────────────────────────────────────
    "23" => &[parts(KeywordCategory::VideoTerm, &[".", "976FPS"])],
    "29" => &[parts(KeywordCategory::VideoTerm, &[".", "97FPS"])],
    "8" => &[
        parts(KeywordCategory::VideoTerm, &[".", "BIT"]),
        parts(KeywordCategory::VideoTerm, &["-", "BIT"]),
    ],
    "10" => &[
        parts(KeywordCategory::VideoTerm, &[" ", "BIT"]),
        parts(KeywordCategory::VideoTerm, &[".", "BIT"]),
        parts(KeywordCategory::VideoTerm, &["-", "BIT"]),
        parts(KeywordCategory::VideoTerm, &["-", "BITS"]),
        parts(KeywordCategory::VideoTerm, &[" ", "BITS"]),
        parts(KeywordCategory::VideoTerm, &[".", "BITS"]),
    ],
    "H" => &[
        parts(KeywordCategory::VideoTerm, &[".", "264"]),
        parts(KeywordCategory::VideoTerm, &[" ", "264"]),
        parts(KeywordCategory::VideoTerm, &[".", "265"]),
        parts(KeywordCategory::VideoTerm, &[" ", "265"]),
    ],
    "X" => &[parts(KeywordCategory::VideoTerm, &[".", "264"])],
    "DOLBY" => &[parts(KeywordCategory::VideoTerm, &[" ", "VISION"])],

    // ── Languages ────────────────────────────────────────────────
    "PT" => &[
        parts(KeywordCategory::Language, &["-", "BR"]),
        parts(KeywordCategory::Language, &[".", "BR"]),
        parts(KeywordCategory::Language, &[" ", "BR"]),
    ],

    // ── Subtitles ────────────────────────────────────────────────
    "MULTI" => &[
        parts(KeywordCategory::Subtitles, &["_", "SUB"]),
        parts(KeywordCategory::Subtitles, &[" ", "SUB"]),
        parts(KeywordCategory::Subtitles, &["-", "SUB"]),
        parts(KeywordCategory::Subtitles, &[".", "SUB"]),
        parts(KeywordCategory::Subtitles, &["-", "SUBS"]),
        parts(KeywordCategory::Subtitles, &[" ", "SUBS"]),
        parts(KeywordCategory::Subtitles, &[".", "SUBS"]),
        parts(KeywordCategory::Subtitles, &["-", "AUDIO"]),
        parts(KeywordCategory::Subtitles, &[" ", "AUDIO"]),
        parts(KeywordCategory::Subtitles, &[".", "AUDIO"]),
    ],

    // ── Sources ──────────────────────────────────────────────────
    "BLU" => &[
        parts(KeywordCategory::Source, &["-", "RAY"]),
        parts(KeywordCategory::Source, &[" ", "RAY"]),
    ],
    "DVD" => &[
        parts(KeywordCategory::Source, &["-", "R2J"]),
        parts(KeywordCategory::Source, &["-", "RIP"]),
        parts(KeywordCategory::Source, &[" ", "RIP"]),
    ],
    "TV" => &[
        parts(KeywordCategory::Source, &["-", "RIP"]),
        parts(KeywordCategory::Source, &[" ", "RIP"]),
    ],

    // ── Release groups ───────────────────────────────────────────
    "CENTRAL" => &[parts(KeywordCategory::ReleaseGroup, &[" ", "ANIME"])],
};

/// Look up a standalone keyword by its normalized (NFC, uppercase) value.
pub fn find_standalone(normalized: &str) -> Option<&'static KeywordEntry> {
    STANDALONE.get(normalized)
}

/// Multi-token templates whose first token is `normalized`.
pub fn find_parts(normalized: &str) -> &'static [KeywordParts] {
    PARTS.get(normalized).copied().unwrap_or(&[])
}

/// Numbered keywords matching `pred`, in catalogue order.
pub fn numbered_where(
    pred: impl Fn(&NumberedKeyword) -> bool,
) -> impl Iterator<Item = &'static NumberedKeyword> {
    NUMBERED.iter().filter(move |kw| pred(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_lookup() {
        assert_eq!(
            find_standalone("HEVC").map(|e| e.category),
            Some(KeywordCategory::VideoTerm)
        );
        assert_eq!(
            find_standalone("BATCH").map(|e| e.category),
            Some(KeywordCategory::ReleaseInformation)
        );
        assert!(find_standalone("hevc").is_none());
        assert!(find_standalone("FRIEREN").is_none());
    }

    #[test]
    fn test_first_category_wins() {
        assert_eq!(
            find_standalone("TS").map(|e| e.category),
            Some(KeywordCategory::FileExtension)
        );
        assert_eq!(
            find_standalone("AVI").map(|e| e.category),
            Some(KeywordCategory::VideoTerm)
        );
    }

    #[test]
    fn test_ambiguous_entries() {
        for value in ["ANDROID", "ITA", "ESP", "FR", "JP", "EN", "RU", "CH"] {
            assert!(find_standalone(value).unwrap().is_ambiguous(), "{value}");
        }
        assert!(!find_standalone("ENG").unwrap().is_ambiguous());
        // SP only binds to numbers, it never matches standalone.
        assert!(find_standalone("SP").is_none());
    }

    #[test]
    fn test_parts_lookup() {
        let dual = find_parts("DUAL");
        assert_eq!(dual.len(), 3);
        assert!(dual.iter().all(|p| p.category == KeywordCategory::AudioTerm));
        assert_eq!(find_parts("CENTRAL")[0].category, KeywordCategory::ReleaseGroup);
        assert!(find_parts("NOPE").is_empty());
    }

    #[test]
    fn test_numbered_order() {
        let season: Vec<_> = numbered_where(|kw| kw.category == SeasonPrefix)
            .map(|kw| kw.kind)
            .collect();
        assert_eq!(season.first(), Some(&OrdinalSuffix));
        assert_eq!(season[4], CombinedWithNumber);
        assert_eq!(season.last(), Some(&SeparatedWithNumber));
    }

    #[test]
    fn test_file_info_categories() {
        assert!(KeywordCategory::VideoTerm.is_file_info());
        assert!(KeywordCategory::Source.is_file_info());
        assert!(KeywordCategory::AnimeType.is_file_info());
        assert!(!KeywordCategory::ReleaseVersion.is_file_info());
        assert!(!KeywordCategory::SeasonPrefix.is_file_info());
    }
}
