/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::common;
use llsubtitles::file_utils::{FileManager, FileType};

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_generate_output_path_withSuffix_shouldCreateSiblingPath() {
    let output_path = FileManager::generate_output_path(Path::new("/tmp/input/video.mkv"), "Chinese", "srt");
    assert_eq!(output_path, Path::new("/tmp/input/video.Chinese.srt"));
}

#[test]
fn test_output_paths_shouldDeriveEveryOutputFromStem() {
    let paths = FileManager::output_paths(Path::new("/media/show.mp4"), "Chinese");

    assert_eq!(paths.transcript, Path::new("/media/show.Chinese.srt"));
    assert_eq!(paths.english, Path::new("/media/show.English.srt"));
    assert_eq!(paths.pinyin, Path::new("/media/show.Pinyin.srt"));
    assert_eq!(paths.merged, Path::new("/media/show.Merged.srt"));
    assert_eq!(paths.timed_definitions, Path::new("/media/show.definitions.json"));
    assert_eq!(paths.ranked_definitions, Path::new("/media/show.ranked.json"));
    assert_eq!(paths.flashcards, Path::new("/media/show.flashcards.txt"));
}

#[test]
fn test_deck_name_shouldStopAtFirstDot() {
    assert_eq!(FileManager::deck_name("/media/episode01.Chinese.srt"), "episode01");
    assert_eq!(FileManager::deck_name("plain"), "plain");
}

#[test]
fn test_detect_file_type_shouldClassifyByExtension() {
    assert_eq!(FileManager::detect_file_type("a.srt"), FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type("a.SRT"), FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type("a.mp4"), FileType::Media);
    assert_eq!(FileManager::detect_file_type("a.mp3"), FileType::Media);
    assert_eq!(FileManager::detect_file_type("a.txt"), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type("noext"), FileType::Unknown);
}

#[test]
fn test_find_media_files_shouldSkipOtherFilesAndRecurse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "b.mkv", "")?;
    common::create_test_file(temp_dir.path(), "a.mp4", "")?;
    common::create_test_file(temp_dir.path(), "a.Chinese.srt", "")?;
    common::create_test_file(&nested, "c.wav", "")?;

    let files = FileManager::find_media_files(temp_dir.path())?;
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.mp4", "b.mkv", "c.wav"]);

    Ok(())
}

#[test]
fn test_write_to_file_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.txt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_remove_if_exists_shouldReportRemoval() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "gone.txt", "x")?;

    assert!(FileManager::remove_if_exists(&path)?);
    assert!(!FileManager::remove_if_exists(&path)?);
    Ok(())
}
