/*!
 * Flashcard deck export.
 *
 * Notes are written as a tab separated import file with the header directives
 * understood by Anki (`#separator`, `#html`, `#deck`), one note per line with
 * the romanization on the front and the gloss on the back.
 */

use anyhow::Result;
use log::info;
use std::path::Path;

use crate::definitions::FlashcardNote;
use crate::file_utils::FileManager;

/// Make a field safe for a single tab separated line
fn sanitize_field(field: &str) -> String {
    field
        .chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Render a deck as import file content
pub fn render_deck<'a, I>(notes: I, deck_name: &str) -> String
where
    I: IntoIterator<Item = &'a FlashcardNote>,
{
    let mut out = String::new();
    out.push_str("#separator:tab\n");
    out.push_str("#html:false\n");
    out.push_str(&format!("#deck:{}\n", sanitize_field(deck_name)));

    for (front, back) in notes {
        out.push_str(&sanitize_field(front));
        out.push('\t');
        out.push_str(&sanitize_field(back));
        out.push('\n');
    }

    out
}

/// Write a deck import file
pub fn write_deck<'a, I, P>(notes: I, deck_name: &str, path: P) -> Result<usize>
where
    I: IntoIterator<Item = &'a FlashcardNote>,
    P: AsRef<Path>,
{
    let content = render_deck(notes, deck_name);
    let note_count = content.lines().count() - 3;
    FileManager::write_to_file(&path, &content)?;
    info!("Wrote {} flashcards to {}", note_count, path.as_ref().display());
    Ok(note_count)
}
