/*!
 * Full application lifecycle tests driven through the controller
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use crate::common;
use crate::common::mock_transcriber::MockTranscriber;
use llsubtitles::app_config::Config;
use llsubtitles::app_controller::Controller;
use llsubtitles::dictionary::DictionaryIndex;
use llsubtitles::errors::{DictionaryError, ErrorKind};
use llsubtitles::romanizer::ToneStyle;
use llsubtitles::subtitle_processor::SubtitleParser;
use llsubtitles::transcriber::WhisperTask;

fn full_config() -> Config {
    let mut config = Config::default();
    config.tasks = vec![WhisperTask::Transcribe, WhisperTask::Translate];
    config.outputs.pinyin = true;
    config.outputs.timed_definitions = true;
    config.outputs.ranked_definitions = true;
    config.outputs.merge = true;
    config.outputs.flashcards = true;
    config
}

fn mock_transcriber() -> MockTranscriber {
    MockTranscriber::new()
        .with_output(WhisperTask::Transcribe, common::CHINESE_SRT)
        .with_output(WhisperTask::Translate, common::ENGLISH_SRT)
}

fn test_dictionary() -> Option<Arc<DictionaryIndex>> {
    Some(Arc::new(DictionaryIndex::from_entries(common::test_entries())))
}

#[tokio::test]
async fn test_process_path_withAllOutputs_shouldWriteEveryFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "episode01.mp4", "not really video")?;
    let transcriber = mock_transcriber();
    let controller = Controller::new(full_config(), Box::new(transcriber.clone()), test_dictionary());

    let paths = controller.process_path(&media).await?;

    assert_eq!(
        transcriber.calls().iter().map(|(_, task)| *task).collect::<Vec<_>>(),
        vec![WhisperTask::Transcribe, WhisperTask::Translate]
    );
    assert_eq!(paths.transcript, temp_dir.path().join("episode01.Chinese.srt"));
    for path in [
        &paths.transcript,
        &paths.english,
        &paths.pinyin,
        &paths.merged,
        &paths.timed_definitions,
        &paths.ranked_definitions,
        &paths.flashcards,
    ] {
        assert!(path.is_file(), "missing output {:?}", path);
    }

    let parser = SubtitleParser::default();
    let pinyin = parser.parse_file(&paths.pinyin)?;
    assert_eq!(pinyin.frames[2].lines, vec!["zhōngguórén hǎo"]);

    let merged = parser.parse_file(&paths.merged)?;
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.frames[0].lines, vec!["wǒ shì zhōngguórén", "I am Chinese"]);

    let ranked: serde_json::Value = serde_json::from_str(&fs::read_to_string(&paths.ranked_definitions)?)?;
    assert_eq!(ranked[0]["romanization"], "wo3");

    let deck = fs::read_to_string(&paths.flashcards)?;
    assert!(deck.starts_with("#separator:tab\n#html:false\n#deck:episode01\n"));
    assert_eq!(deck.lines().count(), 3 + 7);
    Ok(())
}

#[tokio::test]
async fn test_process_path_withMergeOnly_shouldUseTranscriptAsPrimary() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "clip.mkv", "")?;
    let mut config = Config::default();
    config.tasks = vec![WhisperTask::Transcribe, WhisperTask::Translate];
    config.outputs.merge = true;
    let controller = Controller::new(config, Box::new(mock_transcriber()), None);

    let paths = controller.process_path(&media).await?;

    let merged = SubtitleParser::default().parse_file(&paths.merged)?;
    assert_eq!(merged.frames[0].lines, vec!["我是中国人", "I am Chinese"]);
    assert!(!paths.pinyin.exists());
    Ok(())
}

#[tokio::test]
async fn test_process_path_withSubtitleInput_shouldSkipTranscription() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_file(temp_dir.path(), "film.Chinese.srt", common::CHINESE_SRT)?;
    let mut config = Config::default();
    config.tasks = vec![WhisperTask::Transcribe];
    config.outputs.ranked_definitions = true;
    let transcriber = mock_transcriber();
    let controller = Controller::new(config, Box::new(transcriber.clone()), test_dictionary());

    let paths = controller.process_path(&subtitle).await?;

    assert!(transcriber.calls().is_empty());
    assert_eq!(paths.transcript, subtitle);
    assert_eq!(paths.ranked_definitions, temp_dir.path().join("film.ranked.json"));
    assert!(paths.ranked_definitions.is_file());
    Ok(())
}

#[tokio::test]
async fn test_process_path_withPinyinButNoDictionary_shouldFailWithNotLoaded() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "clip.mp4", "")?;
    let mut config = Config::default();
    config.tasks = vec![WhisperTask::Transcribe];
    config.outputs.pinyin = true;
    let controller = Controller::new(config, Box::new(mock_transcriber()), None);

    let error = controller.process_path(&media).await.unwrap_err();
    let dictionary_error = error.downcast_ref::<DictionaryError>().unwrap();

    assert!(matches!(dictionary_error, DictionaryError::NotLoaded));
    assert_eq!(dictionary_error.kind(), ErrorKind::PreconditionFailed);
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingTranscriber_shouldReportFailureAfterAllFiles() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.mp4", "")?;
    common::create_test_file(temp_dir.path(), "b.mp4", "")?;
    let mut config = Config::default();
    config.tasks = vec![WhisperTask::Transcribe];
    let transcriber = MockTranscriber::new().failing("exit status: 1");
    let controller = Controller::new(config, Box::new(transcriber.clone()), None);

    let result = controller.run(&[temp_dir.path().to_path_buf()]).await;

    assert!(result.is_err());
    assert_eq!(transcriber.calls().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_withNoMediaInDirectory_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    let controller = Controller::new(Config::default(), Box::new(MockTranscriber::new()), None);

    controller.run(&[temp_dir.path().to_path_buf()]).await?;
    Ok(())
}

#[test]
fn test_merge_files_shouldWriteMergedTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let primary = common::create_test_file(temp_dir.path(), "p.srt", common::CHINESE_SRT)?;
    let secondary = common::create_test_file(temp_dir.path(), "s.srt", common::ENGLISH_SRT)?;
    let output = temp_dir.path().join("out").join("merged.srt");
    let controller = Controller::new(Config::default(), Box::new(MockTranscriber::new()), None);

    let merged = controller.merge_files(&primary, &secondary, &output)?;

    assert_eq!(merged.len(), 3);
    assert_eq!(SubtitleParser::default().parse_file(&output)?, merged);
    Ok(())
}

#[test]
fn test_merge_files_withMissingPrimary_shouldFailWithNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let secondary = common::create_test_file(temp_dir.path(), "s.srt", common::ENGLISH_SRT)?;
    let controller = Controller::new(Config::default(), Box::new(MockTranscriber::new()), None);

    let error = controller
        .merge_files(&temp_dir.path().join("missing.srt"), &secondary, &temp_dir.path().join("o.srt"))
        .unwrap_err();

    let subtitle_error = error.downcast_ref::<llsubtitles::SubtitleError>().unwrap();
    assert_eq!(subtitle_error.kind(), ErrorKind::NotFound);
    Ok(())
}

#[test]
fn test_export_deck_shouldWriteDeckNamedAfterSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_file(temp_dir.path(), "lesson3.Chinese.srt", common::CHINESE_SRT)?;
    let controller = Controller::new(Config::default(), Box::new(MockTranscriber::new()), test_dictionary());

    let deck_path = controller.export_deck(&subtitle, ToneStyle::Marks)?;

    assert_eq!(deck_path, temp_dir.path().join("lesson3.flashcards.txt"));
    let deck = fs::read_to_string(&deck_path)?;
    assert!(deck.contains("#deck:lesson3\n"));
    assert!(deck.contains("xuéshēng\tstudent\n"));
    Ok(())
}

#[test]
fn test_with_config_withMissingDictionary_shouldFail() {
    let mut config = full_config();
    config.dictionary_path = Some("no/such/dictionary.json".into());

    let error = Controller::with_config(config).unwrap_err();

    assert!(error.downcast_ref::<DictionaryError>().is_some());
}
