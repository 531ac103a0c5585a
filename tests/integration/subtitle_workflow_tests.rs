/*!
 * Integration tests for subtitle processing workflow
 */

use anyhow::Result;
use std::fs;

use crate::common;
use llsubtitles::alignment::merge_tracks;
use llsubtitles::app_controller::Controller;
use llsubtitles::romanizer::ToneStyle;
use llsubtitles::subtitle_processor::SubtitleParser;

/// Parse, romanize, merge and write in one pass
#[test]
fn test_subtitle_workflow_withPinyinAndTranslation_shouldProduceBilingualTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chinese_path = common::create_test_file(temp_dir.path(), "show.Chinese.srt", common::CHINESE_SRT)?;
    let english_path = common::create_test_file(temp_dir.path(), "show.English.srt", common::ENGLISH_SRT)?;
    let parser = SubtitleParser::default();
    let segmenter = common::test_segmenter(ToneStyle::Marks);

    // 1. Parse both tracks
    let chinese = parser.parse_file(&chinese_path)?;
    let english = parser.parse_file(&english_path)?;

    // 2. Romanize the transcript
    let pinyin = Controller::pinyin_track(&chinese, &segmenter);
    assert_eq!(pinyin.frames[0].lines, vec!["wǒ shì zhōngguórén"]);
    assert_eq!(pinyin.frames[1].lines, vec!["nǐhǎo ， wǒ shì xuéshēng"]);

    // 3. Merge and write
    let merged = merge_tracks(&pinyin, &english)?;
    let merged_path = temp_dir.path().join("show.Merged.srt");
    merged.write_to_srt(&merged_path)?;

    let content = fs::read_to_string(&merged_path)?;
    assert!(content.starts_with("1\n00:00:01,000 --> 00:00:03,000\nwǒ shì zhōngguórén\nI am Chinese\n\n"));

    let reparsed = parser.parse_file(&merged_path)?;
    assert_eq!(reparsed, merged);
    Ok(())
}

/// The pinyin track never changes frame count or timing
#[test]
fn test_pinyin_track_withMixedContent_shouldKeepFrameStructure() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\n♪ music ♪\n\n2\n00:00:02,500 --> 00:00:04,000\n我\n是\n";
    let track = SubtitleParser::default().parse_str(content)?;
    let segmenter = common::test_segmenter(ToneStyle::Numbers);

    let pinyin = Controller::pinyin_track(&track, &segmenter);

    assert_eq!(pinyin.len(), 2);
    assert_eq!(pinyin.frames[0].lines, vec!["♪ music ♪"]);
    assert_eq!(pinyin.frames[1].lines, vec!["wo3", "shi4"]);
    assert_eq!(pinyin.frames[1].time_span, track.frames[1].time_span);
    Ok(())
}
