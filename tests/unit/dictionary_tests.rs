/*!
 * Tests for dictionary loading and segmentation
 */

use anyhow::Result;
use std::sync::Arc;

use crate::common;
use llsubtitles::dictionary::{DictionaryIndex, Segmenter, UnitSource};
use llsubtitles::errors::{DictionaryError, ErrorKind};
use llsubtitles::romanizer::ToneStyle;

#[test]
fn test_load_withJsonFile_shouldIndexAllEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_dictionary(temp_dir.path())?;

    let index = DictionaryIndex::load(&path)?;

    assert_eq!(index.len(), common::test_entries().len());
    assert!(index.contains("中国"));
    assert!(index.contains("中國"));
    assert_eq!(index.longest_headword(), 3);
    Ok(())
}

#[test]
fn test_load_withCedictFile_shouldParseLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "# CC-CEDICT\n\
                   中國 中国 [Zhong1 guo2] /China/Middle Kingdom/\n\
                   你好 你好 [ni3 hao3] /hello/hi/\n";
    let path = common::create_test_file(temp_dir.path(), "cedict_ts.u8", content)?;

    let index = DictionaryIndex::load(&path)?;

    assert_eq!(index.len(), 2);
    assert_eq!(index.lookup("中国").unwrap()[0].english, "China; Middle Kingdom");
    assert_eq!(index.lookup("你好").unwrap()[0].pinyin, "ni3 hao3");
    Ok(())
}

#[test]
fn test_load_withMissingFile_shouldFailWithPreconditionKind() {
    let error = DictionaryIndex::load("no/such/dictionary.json").unwrap_err();

    assert!(matches!(error, DictionaryError::NotFound(_)));
    assert_eq!(error.kind(), ErrorKind::PreconditionFailed);
}

#[test]
fn test_load_withMalformedJson_shouldFailAsUnreadable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(matches!(
        DictionaryIndex::load(&path),
        Err(DictionaryError::Unreadable { .. })
    ));
    Ok(())
}

#[test]
fn test_translate_withPunctuation_shouldPassThroughAndKeepOrder() {
    let segmenter = common::test_segmenter(ToneStyle::Marks);

    let units = segmenter.translate("你好，我是学生");
    let words: Vec<_> = units.iter().map(|u| u.word.as_str()).collect();

    assert_eq!(words, vec!["你好", "，", "我", "是", "学生"]);
    assert_eq!(units[1].source, UnitSource::PassThrough);
    assert_eq!(units[4].gloss, "student");
}

#[test]
fn test_translate_withMultipleSenses_shouldJoinGlosses() {
    let segmenter = common::test_segmenter(ToneStyle::Numbers);

    let units = segmenter.translate("好");

    assert_eq!(units[0].gloss, "good; to be fond of");
    assert_eq!(units[0].romanization, "hao3");
}

#[test]
fn test_translate_withTraditionalText_shouldMatchTraditionalHeadwords() {
    let segmenter = common::test_segmenter(ToneStyle::Plain);

    let units = segmenter.translate("中國人");

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].gloss, "Chinese person");
    assert_eq!(units[0].romanization, "zhongguoren");
}

#[test]
fn test_romanize_line_withEachToneStyle_shouldRenderReadings() {
    let mut segmenter = common::test_segmenter(ToneStyle::Marks);
    assert_eq!(segmenter.romanize_line("我是中国人"), "wǒ shì zhōngguórén");

    segmenter.set_tone_style(ToneStyle::Numbers);
    assert_eq!(segmenter.romanize_line("我是中国人"), "wo3 shi4 zhong1guo2ren2");

    segmenter.set_tone_style(ToneStyle::Plain);
    assert_eq!(segmenter.romanize_line("我是中国人"), "wo shi zhongguoren");
}

#[test]
fn test_romanize_line_withoutChinese_shouldReturnLineUnchanged() {
    let segmenter = common::test_segmenter(ToneStyle::Marks);
    assert_eq!(segmenter.romanize_line("- Hello there!"), "- Hello there!");
}

#[test]
fn test_segmenter_sharedAcrossThreads_shouldGiveSameResults() {
    let index = Arc::new(DictionaryIndex::from_entries(common::test_entries()));
    let segmenter = Segmenter::new(index, 3).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let segmenter = segmenter.clone();
            std::thread::spawn(move || segmenter.gloss_line("我是中国人"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "I is Chinese person");
    }
}
