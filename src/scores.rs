//! The high-score table: the top scores of every difficulty, kept on disk as
//! a JSON object keyed by difficulty label.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::MAX_NAME_LEN;

pub const MAX_ENTRIES: usize = 5;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("writing score file: {0}")]
    Io(#[from] io::Error),
    #[error("encoding score table: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    tables: BTreeMap<String, Vec<ScoreEntry>>,
}

impl HighScoreTable {
    /// Reads the table from `path`. A missing or unreadable file is an empty
    /// table, never an error.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No score file at {}, starting empty", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<HighScoreTable>(&text) {
            Ok(mut table) => {
                for entries in table.tables.values_mut() {
                    sort_and_trim(entries);
                }
                table
            }
            Err(e) => {
                log::warn!("Ignoring malformed score file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replaces the file at `path` with this table. The data goes to a
    /// sibling temp file first and is renamed over the target.
    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        let data = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn entries(&self, difficulty: &str) -> &[ScoreEntry] {
        self.tables.get(difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds a score, keeping the list sorted and capped. Returns the 1-based
    /// rank the score landed on, if it made the list.
    pub fn insert(&mut self, difficulty: &str, name: &str, score: u32) -> Option<usize> {
        let entries = self.tables.entry(difficulty.to_string()).or_default();

        // Equal scores keep insertion order, so the new one goes after them
        let idx = entries.partition_point(|e| e.score >= score);
        entries.insert(idx, ScoreEntry { name: name.to_string(), score });
        sort_and_trim(entries);

        if idx < MAX_ENTRIES { Some(idx + 1) } else { None }
    }
}

fn sort_and_trim(entries: &mut Vec<ScoreEntry>) {
    // Stable, so ties stay in the order they were set
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);

    // Hand-edited files can carry names longer than the text box allows
    for entry in entries.iter_mut() {
        if let Some((cut, _)) = entry.name.char_indices().nth(MAX_NAME_LEN) {
            entry.name.truncate(cut);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("snake-scores-{}-{}.json", std::process::id(), name));
        let _ = fs::remove_file(&path);
        path
    }

    fn scores(table: &HighScoreTable, difficulty: &str) -> Vec<u32> {
        table.entries(difficulty).iter().map(|e| e.score).collect()
    }

    #[test]
    fn missing_file_is_empty_table() {
        let path = temp_path("missing");
        assert_eq!(HighScoreTable::load(&path), HighScoreTable::default());
    }

    #[test]
    fn corrupt_file_is_empty_table() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(HighScoreTable::load(&path), HighScoreTable::default());

        // Valid JSON of the wrong shape too
        fs::write(&path, r#"{"Easy": [{"name": 3}]}"#).unwrap();
        assert_eq!(HighScoreTable::load(&path), HighScoreTable::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn keeps_top_five_sorted_descending() {
        let mut table = HighScoreTable::default();
        for (i, score) in [3, 9, 1, 7, 5, 8, 2].iter().enumerate() {
            table.insert("Easy", &format!("p{}", i), *score);
            let got = scores(&table, "Easy");
            assert!(got.len() <= MAX_ENTRIES);
            assert!(got.windows(2).all(|w| w[0] >= w[1]), "unsorted: {:?}", got);
        }
        assert_eq!(scores(&table, "Easy"), vec![9, 8, 7, 5, 3]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut table = HighScoreTable::default();
        table.insert("Hard", "first", 4);
        assert_eq!(table.insert("Hard", "second", 4), Some(2));
        let names: Vec<&str> = table.entries("Hard").iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn reports_rank_or_none() {
        let mut table = HighScoreTable::default();
        for score in [10, 20, 30, 40, 50] {
            table.insert("Medium", "x", score);
        }
        assert_eq!(table.insert("Medium", "low", 1), None);
        assert_eq!(table.insert("Medium", "top", 60), Some(1));
        assert_eq!(scores(&table, "Medium"), vec![60, 50, 40, 30, 20]);
    }

    #[test]
    fn duplicate_entry_cut_from_full_list_has_no_rank() {
        let mut table = HighScoreTable::default();
        for score in [10, 20, 30, 40, 50] {
            table.insert("Easy", "x", score);
        }
        assert_eq!(table.insert("Easy", "x", 10), None);
        assert_eq!(scores(&table, "Easy"), vec![50, 40, 30, 20, 10]);
        assert_eq!(table.insert("Easy", "x", 40), Some(3));
        assert_eq!(scores(&table, "Easy"), vec![50, 40, 40, 30, 20]);
    }

    #[test]
    fn load_shortens_overlong_names() {
        let path = temp_path("long-name");
        let long = "n".repeat(MAX_NAME_LEN * 4);
        fs::write(&path, format!(r#"{{"Hard": [{{"name": "{}", "score": 3}}]}}"#, long)).unwrap();

        let table = HighScoreTable::load(&path);
        assert_eq!(table.entries("Hard")[0].name.chars().count(), MAX_NAME_LEN);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn difficulties_are_separate() {
        let mut table = HighScoreTable::default();
        table.insert("Easy", "a", 5);
        table.insert("Hard", "b", 2);
        assert_eq!(scores(&table, "Easy"), vec![5]);
        assert_eq!(scores(&table, "Hard"), vec![2]);
        assert!(table.entries("Medium").is_empty());
    }

    #[test]
    fn save_then_load_keeps_scores() {
        let path = temp_path("saved");
        let mut table = HighScoreTable::default();
        table.insert("Easy", "ada", 12);
        table.insert("Easy", "bob", 30);
        table.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Easy\""));
        assert_eq!(HighScoreTable::load(&path), table);
        assert!(!path.with_extension("json.tmp").exists());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_trims_oversized_lists() {
        let path = temp_path("oversized");
        fs::write(
            &path,
            r#"{"Easy": [
                {"name": "a", "score": 1}, {"name": "b", "score": 6},
                {"name": "c", "score": 3}, {"name": "d", "score": 4},
                {"name": "e", "score": 5}, {"name": "f", "score": 2}
            ]}"#,
        )
        .unwrap();

        let table = HighScoreTable::load(&path);
        assert_eq!(scores(&table, "Easy"), vec![6, 5, 4, 3, 2]);
        fs::remove_file(&path).unwrap();
    }
}
