use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::prelude::*;

/// A session file: the boards to build and the default auto-placement policy.
///
/// ```toml
/// placement_order = ["bench", "inventory"]
/// overflow = "overflow"
///
/// [[board]]
/// kind = "battle"
/// columns = 5
/// rows = 3
/// shape = { kind = "isosceles_triangle" }
/// locked_percent = 0.2
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, rename = "board")]
    pub boards: Vec<BoardConfig>,

    /// Boards `autoplace` tries when the caller names none.
    #[serde(default)]
    pub placement_order: Vec<BoardType>,

    #[serde(default)]
    pub overflow: Option<BoardType>,
}

impl SessionConfig {
    /// Reads and parses a session file.
    pub fn load(path: impl AsRef<Path>) -> Result<SessionConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("could not read session file {}", path.display()))?;
        text.parse::<SessionConfig>().with_context(|| format!("invalid session file {}", path.display()))
    }

    /// Builds every declared board into a fresh registry. A board type declared twice keeps its last declaration.
    pub fn build_registry(&self) -> BoardRegistry {
        let mut registry = BoardRegistry::new();
        for config in &self.boards {
            if registry.register(Board::new(config)).is_some() {
                log::warn!("the {} board is declared more than once; keeping the last one", config.kind);
            }
        }
        log::info!(
            "session ready with {} board(s): {}",
            registry.len(),
            registry.boards().map(|b| b.kind().notate()).collect::<Vec<_>>().join(", ")
        );
        registry
    }

    /// The default auto-placement policy; every declared board, in declaration order, if none is configured.
    pub fn auto_placer(&self) -> AutoPlacer {
        let order = match self.placement_order.is_empty() {
            true => self.boards.iter().map(|b| b.kind).fold(vec![], |mut kinds, kind| {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
                kinds
            }),
            _    => self.placement_order.clone(),
        };
        match self.overflow {
            Some(overflow) => AutoPlacer::new(order).with_overflow(overflow),
            None           => AutoPlacer::new(order),
        }
    }
}

impl std::str::FromStr for SessionConfig {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"
        placement_order = ["bench"]
        overflow = "overflow"

        [[board]]
        kind = "battle"
        columns = 5
        rows = 3
        locked_percent = 0.2

        [[board]]
        kind = "bench"
        columns = 3
        rows = 2
        cell_size = 2.0
        cell_gap = 0.5
        origin = { x = 0.0, y = -10.0 }
        shape = { kind = "custom", cells = [{ col = 0, row = 0 }, { col = 2, row = 1 }, { col = 7, row = 7 }] }

        [[board]]
        kind = "overflow"
        columns = 4
        rows = 4
        shape = { kind = "right_triangle" }
    "#;

    #[test]
    fn parses_boards_with_defaults() {
        let session = SESSION.parse::<SessionConfig>().unwrap();
        assert_eq!(session.boards.len(), 3);

        let battle = &session.boards[0];
        assert_eq!(battle.shape, BoardShape::Rectangle);
        assert_eq!(battle.cell_size, 1.0);
        assert_eq!(battle.origin, Vec2::ZERO);
        assert!(!battle.lock_from_end);

        let bench = &session.boards[1];
        assert_eq!(bench.origin, Vec2::new(0.0, -10.0));
        assert!(matches!(&bench.shape, BoardShape::Custom { cells } if cells.len() == 3));
    }

    #[test]
    fn builds_a_registry() {
        let registry = SESSION.parse::<SessionConfig>().unwrap().build_registry();
        assert_eq!(
            registry.boards().map(|b| b.kind()).collect::<Vec<_>>(),
            vec![BoardType::Battle, BoardType::Bench, BoardType::Overflow]
        );
        assert_eq!(registry.get(BoardType::Battle).unwrap().locked_cells().len(), 3);
        assert_eq!(registry.get(BoardType::Bench).unwrap().allowed_count(), 2);
        assert_eq!(registry.get(BoardType::Overflow).unwrap().allowed_count(), 10);
    }

    #[test]
    fn auto_placer_policy() {
        let session = SESSION.parse::<SessionConfig>().unwrap();
        assert_eq!(session.auto_placer().candidates(), vec![BoardType::Bench, BoardType::Overflow]);

        let bare = "[[board]]\nkind = \"shop\"\ncolumns = 2\nrows = 2\n".parse::<SessionConfig>().unwrap();
        assert_eq!(bare.auto_placer().candidates(), vec![BoardType::Shop]);
    }

    #[test]
    fn rejects_bad_sessions() {
        assert!("[[board]]\nkind = \"moon\"\ncolumns = 2\nrows = 2\n".parse::<SessionConfig>().is_err());
        assert!("[[board]]\nkind = \"shop\"\n".parse::<SessionConfig>().is_err());
        assert!(SessionConfig::load("/nonexistent/session.toml").is_err());
        assert_eq!("".parse::<SessionConfig>().unwrap(), SessionConfig::default());
    }
}
