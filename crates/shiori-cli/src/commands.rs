//! Subcommand bodies. Each writes to the given sink so output can be checked
//! without a terminal.

use std::fmt;
use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::Value;
use shiori_compare::{
    LevenshteinResult, NcType, SorensenDiceResult, extract_nc_type, extract_season_number,
    find_best_match_with_levenshtein, find_best_match_with_sorensen_dice, is_ignored_filename,
    value_contains_batch_keywords, value_contains_ignored_keywords, value_contains_nc,
    value_contains_season, value_contains_special,
};
use tracing::debug;

use crate::config::{Algorithm, OutputFormat};
use crate::error::Result;

/// How results are written.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Output {
    fn write_json<T: Serialize>(&self, out: &mut impl Write, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, value)?;
        } else {
            serde_json::to_writer(&mut *out, value)?;
        }
        writeln!(out)?;
        Ok(())
    }
}

/// Non-blank lines of `input`, trimmed.
pub fn read_names(input: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            names.push(line.to_string());
        }
    }
    Ok(names)
}

pub fn parse(out: &mut impl Write, names: &[String], output: Output) -> Result<()> {
    for (i, name) in names.iter().enumerate() {
        if output.format == OutputFormat::Json {
            output.write_json(out, &shiori_parse::parse(name))?;
            continue;
        }
        if i > 0 {
            writeln!(out)?;
        }
        if output.format == OutputFormat::Debug {
            let (metadata, dump) = shiori_parse::parse_debug(name);
            write_fields(out, &metadata)?;
            writeln!(out)?;
            write!(out, "{dump}")?;
        } else {
            write_fields(out, &shiori_parse::parse(name))?;
        }
    }
    Ok(())
}

/// One `key  value` line per non-empty field.
fn write_fields<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    let Value::Object(fields) = serde_json::to_value(value)? else {
        return Ok(());
    };
    for (key, value) in &fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        };
        writeln!(out, "{key:<22} {text}")?;
    }
    Ok(())
}

/// Every classifier verdict for one title.
#[derive(Debug, Serialize)]
pub struct Classification {
    pub title: String,
    pub contains_season: bool,
    pub season_number: Option<u32>,
    pub special: bool,
    pub batch: bool,
    pub ignored_keywords: bool,
    pub ignored_filename: bool,
    pub nc: bool,
    pub nc_type: Option<NcType>,
}

impl Classification {
    pub fn of(title: &str) -> Self {
        Self {
            title: title.to_string(),
            contains_season: value_contains_season(title),
            season_number: extract_season_number(title),
            special: value_contains_special(title),
            batch: value_contains_batch_keywords(title),
            ignored_keywords: value_contains_ignored_keywords(title),
            ignored_filename: is_ignored_filename(title),
            nc: value_contains_nc(title),
            nc_type: extract_nc_type(title),
        }
    }
}

pub fn classify(out: &mut impl Write, titles: &[String], output: Output) -> Result<()> {
    for (i, title) in titles.iter().enumerate() {
        let classification = Classification::of(title);
        if output.format == OutputFormat::Json {
            output.write_json(out, &classification)?;
            continue;
        }
        if i > 0 {
            writeln!(out)?;
        }
        write_fields(out, &classification)?;
    }
    Ok(())
}

/// The winning candidate under either metric.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MatchReport {
    SorensenDice(SorensenDiceResult),
    Levenshtein(LevenshteinResult),
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReport::SorensenDice(result) => {
                write!(f, "{} (rating {:.3})", result.value, result.rating)
            }
            MatchReport::Levenshtein(result) => {
                write!(f, "{} (distance {})", result.value, result.distance)
            }
        }
    }
}

/// Best candidate for `value`. A Sørensen-Dice winner under `min_rating`
/// is no match.
pub fn best_match(
    value: &str,
    candidates: &[String],
    algorithm: Algorithm,
    min_rating: f64,
) -> Option<MatchReport> {
    match algorithm {
        Algorithm::SorensenDice => {
            let result = find_best_match_with_sorensen_dice(value, candidates)?;
            if result.rating < min_rating {
                debug!(value = %result.value, rating = result.rating, min_rating, "best candidate below minimum rating");
                return None;
            }
            Some(MatchReport::SorensenDice(result))
        }
        Algorithm::Levenshtein => {
            find_best_match_with_levenshtein(value, candidates).map(MatchReport::Levenshtein)
        }
    }
}

pub fn match_candidates(
    out: &mut impl Write,
    value: &str,
    candidates: &[String],
    algorithm: Algorithm,
    min_rating: f64,
    output: Output,
) -> Result<()> {
    let report = best_match(value, candidates, algorithm, min_rating);
    match (output.format, report) {
        (OutputFormat::Json, report) => output.write_json(out, &report)?,
        (_, Some(report)) => writeln!(out, "{report}")?,
        (_, None) => writeln!(out, "no match")?,
    }
    Ok(())
}
