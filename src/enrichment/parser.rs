//! Turns loosely formatted detail-page text into [`SongAttributes`].
//!
//! Everything here is pure: the resolver reads the raw strings from the
//! browser and hands them over.

use super::models::{ParseError, SongAttributes};
use std::collections::{BTreeMap, BTreeSet};

/// Build [`SongAttributes`] from the raw text of the four detail-page regions.
pub fn parse(
    raw_year_text: Option<&str>,
    raw_genre_tags: &[String],
    raw_tempo_text: &str,
    raw_metrics_text: &str,
) -> Result<SongAttributes, ParseError> {
    let date_released = raw_year_text.and_then(parse_year);
    let genres = parse_genres(raw_genre_tags);
    let tempo = parse_tempo(raw_tempo_text)?;
    let metrics = parse_metrics(raw_metrics_text)?;
    Ok(SongAttributes::new(date_released, genres, tempo, metrics))
}

/// Last four characters of the album-data text.
///
/// Not validated as a date: if the page format drifts this returns whatever
/// four characters end the text.
pub fn parse_year(text: &str) -> Option<String> {
    let chars: Vec<char> = text.trim_end().chars().collect();
    if chars.len() < 4 {
        return None;
    }
    Some(chars[chars.len() - 4..].iter().collect())
}

/// Tag labels with duplicates collapsed. Blank labels are dropped.
pub fn parse_genres(tags: &[String]) -> BTreeSet<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Second space-separated token of `"<label> <number>"`.
pub fn parse_tempo(text: &str) -> Result<u32, ParseError> {
    text.split(' ')
        .nth(1)
        .and_then(|token| token.trim().parse().ok())
        .ok_or_else(|| ParseError::Tempo(text.to_string()))
}

/// Category/score pairs from the metrics container text.
///
/// The text is a whitespace-delimited sequence like
/// `"Popularity: 88% Energy: 40%"`. Each label loses its trailing separator.
/// Each score keeps its leading numeric part; a score without one (`"N/A%"`)
/// just loses its unit suffix. Only an odd token count is malformed. Pairs
/// whose label is empty after stripping are skipped.
pub fn parse_metrics(text: &str) -> Result<BTreeMap<String, String>, ParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(ParseError::MalformedPage(format!(
            "expected category/score pairs, got {} tokens",
            tokens.len()
        )));
    }

    let mut metrics = BTreeMap::new();
    for pair in tokens.chunks_exact(2) {
        let category = strip_last_char(pair[0]);
        if category.is_empty() {
            continue;
        }
        let score = match numeric_prefix(pair[1]) {
            "" => strip_last_char(pair[1]),
            number => number,
        };
        metrics.insert(category.to_string(), score.to_string());
    }
    Ok(metrics)
}

fn strip_last_char(token: &str) -> &str {
    match token.char_indices().last() {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

fn numeric_prefix(token: &str) -> &str {
    let end = token
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-'))
        .map(|(idx, _)| idx)
        .unwrap_or(token.len());
    &token[..end]
}
