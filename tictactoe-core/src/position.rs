//! Position files - boards supplied by callers

use crate::board::Board;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named board loaded from disk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub name: Option<String>,
    pub board: Board,
}

impl Position {
    pub fn new(board: Board) -> Self {
        Self { name: None, board }
    }

    /// Load from file (JSON `{"board": "XX./O../..."}` or bare board text)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        if let Ok(position) = serde_json::from_str::<Position>(&content) {
            return Ok(position);
        }

        let board: Board = content.trim().parse()?;
        Ok(Self::new(board))
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tictactoe-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_json_round_trip() {
        let path = temp_path("position.json");
        let position = Position {
            name: Some("fork".to_string()),
            board: "X../.O./..X".parse().unwrap(),
        };
        position.save(&path).unwrap();

        let loaded = Position::load(&path).unwrap();
        assert_eq!(loaded, position);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_plain_text() {
        let path = temp_path("position.txt");
        std::fs::write(&path, "XX.\nO..\n...\n").unwrap();

        let loaded = Position::load(&path).unwrap();
        assert_eq!(loaded.name, None);
        assert_eq!(loaded.board.to_string(), "XX./O../...");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_garbage_fails() {
        let path = temp_path("garbage.txt");
        std::fs::write(&path, "not a board").unwrap();
        assert!(Position::load(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
