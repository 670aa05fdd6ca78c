//! What a cover has to guarantee: which games, which opening, which encoding

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{GameGraph, NodeId, Player},
};

/// One game the table has to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The table moves first, from the root
    ControlledFirst,
    /// The opponent opens; the table answers every opening
    AdversaryFirst,
}

impl Side {
    /// The player whose moves come from the table
    pub fn controlled(self, graph: &GameGraph) -> Player {
        let opener = graph.position(graph.root()).to_move();
        match self {
            Side::ControlledFirst => opener,
            Side::AdversaryFirst => opener.opponent(),
        }
    }

    /// Whether the table moves at `node` in this game
    pub fn controls(self, graph: &GameGraph, node: NodeId) -> bool {
        graph.position(node).to_move() == self.controlled(graph)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::ControlledFirst => write!(f, "controlled-first"),
            Side::AdversaryFirst => write!(f, "adversary-first"),
        }
    }
}

/// The set of games a table must serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sides {
    #[default]
    ControlledFirst,
    AdversaryFirst,
    Both,
}

impl Sides {
    const EXPECTED: &'static str = "controlled-first, adversary-first, both";

    /// Combine the two "who opens" flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when neither flag is set.
    pub fn from_flags(controlled_first: bool, adversary_first: bool) -> Result<Self> {
        match (controlled_first, adversary_first) {
            (true, false) => Ok(Sides::ControlledFirst),
            (false, true) => Ok(Sides::AdversaryFirst),
            (true, true) => Ok(Sides::Both),
            (false, false) => Err(Error::InvalidConfiguration {
                message: "at least one of controlled-first or adversary-first is required"
                    .to_string(),
            }),
        }
    }

    pub fn sides(self) -> &'static [Side] {
        match self {
            Sides::ControlledFirst => &[Side::ControlledFirst],
            Sides::AdversaryFirst => &[Side::AdversaryFirst],
            Sides::Both => &[Side::ControlledFirst, Side::AdversaryFirst],
        }
    }

    pub fn controlled_first(self) -> bool {
        self.sides().contains(&Side::ControlledFirst)
    }

    pub fn adversary_first(self) -> bool {
        self.sides().contains(&Side::AdversaryFirst)
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sides::ControlledFirst => write!(f, "controlled-first"),
            Sides::AdversaryFirst => write!(f, "adversary-first"),
            Sides::Both => write!(f, "both"),
        }
    }
}

impl FromStr for Sides {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "controlled-first" | "controlled" | "first" | "cf" => Ok(Sides::ControlledFirst),
            "adversary-first" | "adversary" | "second" | "af" => Ok(Sides::AdversaryFirst),
            "both" => Ok(Sides::Both),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown sides '{other}'. Expected one of: {}", Self::EXPECTED),
            }),
        }
    }
}

/// How the constraints walk the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Traversal {
    /// Jump from each controlled position straight to the grandchildren
    #[default]
    Skip,
    /// One ply at a time, with a vertex for every adversary position too
    Exhaustive,
}

impl Traversal {
    const EXPECTED: &'static str = "skip, exhaustive";
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::Skip => write!(f, "skip"),
            Traversal::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl FromStr for Traversal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip-levels" => Ok(Traversal::Skip),
            "exhaustive" | "all" => Ok(Traversal::Exhaustive),
            _ => Err(Error::ParseTraversal {
                input: s.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

/// A covering-set question.
///
/// # Examples
///
/// ```
/// use tictable::cover::{CoverQuery, Sides, Traversal};
///
/// let query = CoverQuery::new(Sides::Both)
///     .with_opening(None)
///     .with_traversal(Traversal::Exhaustive);
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverQuery {
    pub sides: Sides,
    /// Forced first move when the table opens; `None` allows any best move
    pub opening: Option<usize>,
    pub traversal: Traversal,
}

impl CoverQuery {
    /// Query for `sides` with the centre opening and skip traversal.
    pub fn new(sides: Sides) -> Self {
        Self {
            sides,
            opening: Some(4),
            traversal: Traversal::default(),
        }
    }

    pub fn with_opening(mut self, opening: Option<usize>) -> Self {
        self.opening = opening;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an opening outside the board.
    pub fn validate(&self) -> Result<()> {
        match self.opening {
            Some(cell) if cell >= 9 => Err(Error::InvalidConfiguration {
                message: format!("opening cell {cell} is outside the board (0-8)"),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for CoverQuery {
    fn default() -> Self {
        Self::new(Sides::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::ReductionMode;

    #[test]
    fn flags_map_to_sides() {
        assert_eq!(Sides::from_flags(true, false).unwrap(), Sides::ControlledFirst);
        assert_eq!(Sides::from_flags(false, true).unwrap(), Sides::AdversaryFirst);
        assert_eq!(Sides::from_flags(true, true).unwrap(), Sides::Both);
        assert!(matches!(
            Sides::from_flags(false, false),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn parse_names() {
        assert_eq!("both".parse::<Sides>().unwrap(), Sides::Both);
        assert_eq!("Adversary-First".parse::<Sides>().unwrap(), Sides::AdversaryFirst);
        assert_eq!("all".parse::<Traversal>().unwrap(), Traversal::Exhaustive);
        assert!(matches!(
            "zigzag".parse::<Traversal>(),
            Err(Error::ParseTraversal { .. })
        ));
    }

    #[test]
    fn control_follows_the_opener() {
        let graph = GameGraph::build(ReductionMode::Canonical);
        let root = graph.root();
        assert!(Side::ControlledFirst.controls(&graph, root));
        assert!(!Side::AdversaryFirst.controls(&graph, root));
        for (_, child) in graph.position(root).moves() {
            assert!(Side::AdversaryFirst.controls(&graph, child));
        }
        assert_eq!(Side::ControlledFirst.controlled(&graph), Player::X);
        assert_eq!(Side::AdversaryFirst.controlled(&graph), Player::O);
    }

    #[test]
    fn opening_must_be_on_the_board() {
        assert!(CoverQuery::default().validate().is_ok());
        assert!(CoverQuery::default().with_opening(Some(9)).validate().is_err());
    }
}
