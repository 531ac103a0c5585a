/*!
 * Vocabulary summaries built from segmented subtitle tracks.
 *
 * - Timed definitions: one `romanization -> gloss` table per frame
 * - Ranked definitions: one table for the whole track, ordered by frequency
 * - Flashcard notes: the deduplicated `(romanization, gloss)` pairs
 *
 * Every unit the segmenter yields is collected, pass-through units included,
 * so punctuation and Latin text map to themselves.
 */

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::dictionary::{Segmenter, TranslationUnit};
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleTrack, TimeSpan};

/// Definitions of the words in one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedDefinitions {
    pub time_span: Option<TimeSpan>,
    pub definitions: BTreeMap<String, String>,
}

/// A word of the track with its number of occurrences
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedDefinition {
    pub romanization: String,
    pub gloss: String,
    pub count: usize,
}

/// Front and back of one flashcard
pub type FlashcardNote = (String, String);

fn frame_units<'a>(track: &'a SubtitleTrack, segmenter: &'a Segmenter) -> impl Iterator<Item = Vec<TranslationUnit>> + 'a {
    track.iter().map(move |frame| {
        frame
            .lines
            .iter()
            .flat_map(|line| segmenter.translate(line))
            .collect()
    })
}

/// Per-frame `romanization -> gloss` tables
///
/// Within a frame a later unit with the same romanization replaces the
/// earlier one.
pub fn timed_definitions(track: &SubtitleTrack, segmenter: &Segmenter) -> Vec<TimedDefinitions> {
    track
        .iter()
        .zip(frame_units(track, segmenter))
        .map(|(frame, units)| TimedDefinitions {
            time_span: frame.time_span.clone(),
            definitions: units
                .into_iter()
                .map(|unit| (unit.romanization, unit.gloss))
                .collect(),
        })
        .collect()
}

/// Track-wide definitions ordered by descending occurrence count
///
/// Each romanization keeps the gloss of its first occurrence; equal counts
/// keep first-seen order.
pub fn ranked_definitions(track: &SubtitleTrack, segmenter: &Segmenter) -> Vec<RankedDefinition> {
    let mut ranked: Vec<RankedDefinition> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for unit in frame_units(track, segmenter).flatten() {
        match positions.get(&unit.romanization) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                positions.insert(unit.romanization.clone(), ranked.len());
                ranked.push(RankedDefinition {
                    romanization: unit.romanization,
                    gloss: unit.gloss,
                    count: 1,
                });
            }
        }
    }

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Deduplicated `(romanization, gloss)` pairs of the track
pub fn flashcard_notes(track: &SubtitleTrack, segmenter: &Segmenter) -> BTreeSet<FlashcardNote> {
    frame_units(track, segmenter)
        .flatten()
        .map(|unit| (unit.romanization, unit.gloss))
        .collect()
}

/// Write timed definitions as pretty JSON
pub fn write_timed_definitions<P: AsRef<Path>>(definitions: &[TimedDefinitions], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(definitions).context("Failed to serialize timed definitions")?;
    FileManager::write_to_file(path, &json)
}

/// Write ranked definitions as pretty JSON
pub fn write_ranked_definitions<P: AsRef<Path>>(definitions: &[RankedDefinition], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(definitions).context("Failed to serialize ranked definitions")?;
    FileManager::write_to_file(path, &json)
}
