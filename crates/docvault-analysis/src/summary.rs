//! Templated change summaries based on word-count deltas.

use docvault_entity::ChangeType;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Produce a short human-readable description of a change.
pub fn change_summary(old_text: &str, new_text: &str, change_type: ChangeType) -> String {
    match change_type {
        ChangeType::Added => {
            format!("Added {} words of new content", word_count(new_text))
        }
        ChangeType::Deleted => {
            format!("Deleted {} words of content", word_count(old_text))
        }
        ChangeType::Modified => {
            let old_words = word_count(old_text);
            let new_words = word_count(new_text);
            if new_words > old_words {
                format!("Modified content, added {} words", new_words - old_words)
            } else if new_words < old_words {
                format!("Modified content, removed {} words", old_words - new_words)
            } else {
                format!("Modified {old_words} words of content")
            }
        }
        ChangeType::Moved | ChangeType::Renamed => "Content changed".to_string(),
    }
}
