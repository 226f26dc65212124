//! Classifiers and similarity helpers for parsed anime titles.
//!
//! These sit downstream of `shiori-parse`: they take a title or a raw
//! filename and answer narrow questions about it (does it name a season,
//! an extra, a batch?) or rank it against candidate titles.

pub mod classify;
pub mod similarity;

pub use classify::{
    extract_nc_type, extract_resolution_int, extract_season_number, is_ignored_filename,
    value_contains_batch_keywords, value_contains_ignored_keywords, value_contains_nc,
    value_contains_season, value_contains_special, NcType, IGNORED_FILENAMES,
};
pub use similarity::{
    eliminate_least_similar_value, find_best_match_with_levenshtein,
    find_best_match_with_sorensen_dice, levenshtein_distance, sorensen_dice_rating,
    LevenshteinResult, SorensenDiceResult,
};
