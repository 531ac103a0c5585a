/*!
 * Time-based merge of two subtitle tracks.
 *
 * Every frame of the secondary track is attached to the primary frame whose
 * start time is nearest to its own. This is a many-to-one nearest neighbour
 * join on start times, not an interval overlap join: a primary frame may
 * collect any number of secondary frames, a secondary frame lands in exactly
 * one primary frame.
 */

use log::{debug, warn};
use std::collections::BTreeMap;

use crate::errors::SubtitleError;
use crate::subtitle_processor::{SubtitleFrame, SubtitleTrack, TimeSpan};

/// Accumulated output for one distinct primary start time
#[derive(Debug)]
struct MergedFrame {
    time_span: TimeSpan,
    lines: Vec<String>,
}

fn start_of(frame: &SubtitleFrame) -> Result<(u64, &TimeSpan), SubtitleError> {
    let span = frame
        .time_span
        .as_ref()
        .ok_or_else(|| SubtitleError::MissingTimeSpan {
            index: frame.index.clone(),
        })?;
    Ok((span.start_ms()?, span))
}

/// Key of the working map nearest to `start_ms`
///
/// On equal distance the earlier primary frame wins.
fn nearest_key(frames: &BTreeMap<u64, MergedFrame>, start_ms: u64) -> Option<u64> {
    let before = frames.range(..=start_ms).next_back().map(|(key, _)| *key);
    let after = frames.range(start_ms..).next().map(|(key, _)| *key);

    match (before, after) {
        (Some(b), Some(a)) => {
            if a - start_ms < start_ms - b {
                Some(a)
            } else {
                Some(b)
            }
        }
        (Some(b), None) => Some(b),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Merge `secondary` into `primary`
///
/// The result holds one frame per distinct primary start time, in ascending
/// start order and renumbered from 1. Each frame keeps its primary time span;
/// its lines are the primary lines followed by the lines of every secondary
/// frame attached to it, in secondary order.
pub fn merge_tracks(primary: &SubtitleTrack, secondary: &SubtitleTrack) -> Result<SubtitleTrack, SubtitleError> {
    let mut frames: BTreeMap<u64, MergedFrame> = BTreeMap::new();

    for frame in primary {
        let (start_ms, span) = start_of(frame)?;
        match frames.get_mut(&start_ms) {
            Some(existing) => {
                debug!("Primary frame {} shares its start time, merging lines", frame.index);
                existing.lines.extend(frame.lines.iter().cloned());
            }
            None => {
                frames.insert(
                    start_ms,
                    MergedFrame {
                        time_span: span.clone(),
                        lines: frame.lines.clone(),
                    },
                );
            }
        }
    }

    if frames.is_empty() && !secondary.is_empty() {
        warn!(
            "Primary track is empty, discarding {} secondary frames",
            secondary.len()
        );
        return Ok(SubtitleTrack::default());
    }

    for frame in secondary {
        let (start_ms, _) = start_of(frame)?;
        if let Some(key) = nearest_key(&frames, start_ms) {
            if let Some(target) = frames.get_mut(&key) {
                target.lines.extend(frame.lines.iter().cloned());
            }
        }
    }

    let merged = frames
        .into_values()
        .enumerate()
        .map(|(i, merged)| SubtitleFrame::new(&(i + 1).to_string(), merged.time_span, merged.lines))
        .collect();

    Ok(SubtitleTrack::new(merged))
}
