/*!
 * Common test utilities for the llsubtitles test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use llsubtitles::dictionary::{DictionaryEntry, DictionaryIndex, Segmenter};
use llsubtitles::romanizer::ToneStyle;


/// Routes library logs through the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Chinese transcript used across tests
pub const CHINESE_SRT: &str = "1
00:00:01,000 --> 00:00:03,000
我是中国人

2
00:00:04,000 --> 00:00:06,000
你好，我是学生

3
00:00:10,000 --> 00:00:12,000
中国人好
";

/// English translation matching `CHINESE_SRT`
pub const ENGLISH_SRT: &str = "1
00:00:01,200 --> 00:00:03,000
I am Chinese

2
00:00:04,100 --> 00:00:06,000
Hello, I am a student

3
00:00:09,000 --> 00:00:12,000
Chinese people are good
";

/// Entries of the small test dictionary
pub fn test_entries() -> Vec<DictionaryEntry> {
    vec![
        DictionaryEntry::new("我", "我", "wo3", "I"),
        DictionaryEntry::new("是", "是", "shi4", "is"),
        DictionaryEntry::new("中國", "中国", "Zhong1 guo2", "China"),
        DictionaryEntry::new("中國人", "中国人", "Zhong1 guo2 ren2", "Chinese person"),
        DictionaryEntry::new("人", "人", "ren2", "person"),
        DictionaryEntry::new("你好", "你好", "ni3 hao3", "hello"),
        DictionaryEntry::new("好", "好", "hao3", "good"),
        DictionaryEntry::new("好", "好", "hao4", "to be fond of"),
        DictionaryEntry::new("學生", "学生", "xue2 sheng5", "student"),
    ]
}

/// Writes the test dictionary as JSON and returns its path
pub fn create_test_dictionary(dir: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&test_entries())?;
    create_test_file(dir, "dictionary.json", &json)
}

/// Segmenter over the test dictionary
pub fn test_segmenter(tone_style: ToneStyle) -> Segmenter {
    let index = Arc::new(DictionaryIndex::from_entries(test_entries()));
    Segmenter::new(index, 3)
        .expect("window of three is valid")
        .with_tone_style(tone_style)
}
