//! CNF encoding of "the table fits in k positions and still plays optimally"
//!
//! Every position a side can reach gets an entry variable, whichever player
//! is to move and whether or not the game is over there. A selected position
//! where the table moves must pick one of its candidate moves, and every
//! adversary answer to that move is selected in turn. The bound is placed on
//! the entries.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use varisat::{CnfFormula, ExtendFormula, Lit};

use super::{
    query::{CoverQuery, Side, Traversal},
    table::{StrategyTable, TableEntry},
    variables::{CoverVar, VariablePool},
};
use crate::{
    Error, Result,
    ports::{AtMost, Model},
    tictactoe::{GameGraph, NodeId},
};

/// An encoded covering-set question, ready for bounded checks
#[derive(Debug)]
pub struct CoverProblem {
    query: CoverQuery,
    formula: CnfFormula,
    pool: VariablePool,
    /// Entry literal per side and position
    entries: BTreeMap<(Side, NodeId), Lit>,
    counted: Vec<Lit>,
    /// Candidate moves at every position where the table moves
    decisions: HashMap<(Side, NodeId), Vec<usize>>,
}

/// Positions and table read off a model
#[derive(Debug, Clone)]
pub(crate) struct Decoded {
    /// Selected positions, once per side that selects them
    pub selected: Vec<NodeId>,
    pub table: StrategyTable,
}

impl CoverProblem {
    pub fn query(&self) -> &CoverQuery {
        &self.query
    }

    pub fn formula(&self) -> &CnfFormula {
        &self.formula
    }

    /// Entry literals the bound applies to
    pub fn counted(&self) -> &[Lit] {
        &self.counted
    }

    /// A bound every satisfiable problem meets
    pub fn upper_bound(&self) -> usize {
        self.counted.len()
    }

    pub fn variable_count(&self) -> usize {
        self.formula.var_count()
    }

    pub fn clause_count(&self) -> usize {
        self.formula.len()
    }

    pub fn variables(&self) -> &VariablePool {
        &self.pool
    }

    pub fn at_most(&self, bound: usize) -> AtMost<'_> {
        AtMost {
            literals: &self.counted,
            bound,
        }
    }

    /// Read the selected positions and their moves out of `model`.
    ///
    /// Every true entry is selected. Positions where the table moves and
    /// whose vertex holds also get a table entry.
    pub(crate) fn decode(&self, graph: &GameGraph, model: &Model) -> Result<Decoded> {
        let mut selected = Vec::new();
        let mut entries = Vec::new();

        for (&(side, node), &entry) in &self.entries {
            if !model.lit_holds(entry) {
                continue;
            }
            selected.push(node);

            let position = graph.position(node);
            let reached = self
                .pool
                .get(CoverVar::Vertex { side, node })
                .is_some_and(|var| model.is_true(var));
            if position.is_terminal() || !side.controls(graph, node) || !reached {
                continue;
            }

            let unmatched = || Error::UnmatchedSelection {
                key: position.key().value(),
            };
            let candidates = self.decisions.get(&(side, node)).ok_or_else(unmatched)?;
            let mv = candidates
                .iter()
                .copied()
                .find(|&mv| self.is_chosen(graph, side, node, mv, model))
                .ok_or_else(unmatched)?;
            entries.push(TableEntry::for_move(position, mv)?);
        }

        Ok(Decoded {
            selected,
            table: entries.into(),
        })
    }

    fn is_chosen(
        &self,
        graph: &GameGraph,
        side: Side,
        node: NodeId,
        mv: usize,
        model: &Model,
    ) -> bool {
        let name = match self.query.traversal {
            Traversal::Skip => Some(CoverVar::Edge {
                side,
                node,
                mv: mv as u8,
            }),
            Traversal::Exhaustive => graph
                .position(node)
                .child(mv)
                .map(|child| CoverVar::Vertex { side, node: child }),
        };
        name.and_then(|name| self.pool.get(name))
            .is_some_and(|var| model.is_true(var))
    }
}

/// Builds a [`CoverProblem`] side by side
pub(crate) struct Encoder<'g> {
    graph: &'g GameGraph,
    query: CoverQuery,
    formula: CnfFormula,
    pool: VariablePool,
    entries: BTreeMap<(Side, NodeId), Lit>,
    counted_vertices: HashSet<(Side, NodeId)>,
    decisions: HashMap<(Side, NodeId), Vec<usize>>,
}

impl<'g> Encoder<'g> {
    pub(crate) fn encode(graph: &'g GameGraph, query: CoverQuery) -> Result<CoverProblem> {
        query.validate()?;
        let mut encoder = Encoder {
            graph,
            query,
            formula: CnfFormula::new(),
            pool: VariablePool::new(),
            entries: BTreeMap::new(),
            counted_vertices: HashSet::new(),
            decisions: HashMap::new(),
        };

        for &side in query.sides.sides() {
            match query.traversal {
                Traversal::Skip => encoder.skip_levels(side)?,
                Traversal::Exhaustive => encoder.every_level(side)?,
            }
        }

        let counted = encoder.entries.values().copied().collect();
        Ok(CoverProblem {
            query,
            formula: encoder.formula,
            pool: encoder.pool,
            entries: encoder.entries,
            counted,
            decisions: encoder.decisions,
        })
    }

    fn lit(&mut self, name: CoverVar) -> Lit {
        self.pool.lit(&mut self.formula, name)
    }

    fn vertex(&mut self, side: Side, node: NodeId) -> Lit {
        self.lit(CoverVar::Vertex { side, node })
    }

    fn entry(&mut self, side: Side, node: NodeId) -> Lit {
        let entry = self.lit(CoverVar::Entry { side, node });
        self.entries.insert((side, node), entry);
        entry
    }

    /// Tie the vertex of a position to its entry.
    fn count(&mut self, side: Side, node: NodeId) {
        if !self.counted_vertices.insert((side, node)) {
            return;
        }
        let vertex = self.vertex(side, node);
        let entry = self.entry(side, node);
        self.formula.add_clause(&[!vertex, entry]);
    }

    /// Require the root, where both games begin.
    fn require_root(&mut self, side: Side) -> NodeId {
        let root = self.graph.root();
        let vertex = self.vertex(side, root);
        self.formula.add_clause(&[vertex]);
        self.count(side, root);
        root
    }

    /// Moves the table may play at `node`: the forced opening at the root,
    /// otherwise the best moves.
    fn candidates(&self, side: Side, node: NodeId) -> Result<Vec<usize>> {
        let position = self.graph.position(node);
        if side == Side::ControlledFirst
            && node == self.graph.root()
            && let Some(opening) = self.query.opening
        {
            if position.child(opening).is_none() {
                return Err(Error::InvalidConfiguration {
                    message: format!("opening cell {opening} is not a legal first move"),
                });
            }
            return Ok(vec![opening]);
        }
        Ok(position.best_moves.clone())
    }

    fn child(&self, node: NodeId, mv: usize) -> Result<NodeId> {
        let position = self.graph.position(node);
        position.child(mv).ok_or(Error::MissingChild {
            key: position.key().value(),
            position: mv,
        })
    }

    /// Distinct positions one move away from `node`
    fn replies(&self, node: NodeId) -> Vec<NodeId> {
        let mut replies: Vec<NodeId> = self
            .graph
            .position(node)
            .moves()
            .map(|(_, id)| id)
            .collect();
        replies.sort();
        replies.dedup();
        replies
    }

    /// `v(p) -> OR_m e(p, m)`, `e(p, m) -> x(c)` for the child `c` reached
    /// by `m`, and `e(p, m) -> v(g)` for every grandchild `g` behind it.
    fn skip_levels(&mut self, side: Side) -> Result<()> {
        let graph = self.graph;
        let root = self.require_root(side);

        let mut frontier = VecDeque::new();
        if side.controls(graph, root) {
            frontier.push_back(root);
        } else {
            let parent = self.vertex(side, root);
            for reply in self.replies(root) {
                let vertex = self.vertex(side, reply);
                self.count(side, reply);
                self.formula.add_clause(&[!parent, vertex]);
                frontier.push_back(reply);
            }
        }

        let mut processed = HashSet::new();
        while let Some(node) = frontier.pop_front() {
            if !processed.insert(node) || graph.position(node).is_terminal() {
                continue;
            }

            let candidates = self.candidates(side, node)?;
            let mut choice = vec![!self.vertex(side, node)];
            for &mv in &candidates {
                let child = self.child(node, mv)?;
                let edge = self.lit(CoverVar::Edge {
                    side,
                    node,
                    mv: mv as u8,
                });
                choice.push(edge);

                let reached = self.entry(side, child);
                self.formula.add_clause(&[!edge, reached]);

                for grandchild in self.replies(child) {
                    let vertex = self.vertex(side, grandchild);
                    self.count(side, grandchild);
                    self.formula.add_clause(&[!edge, vertex]);
                    frontier.push_back(grandchild);
                }
            }
            self.formula.add_clause(&choice);
            self.decisions.insert((side, node), candidates);
        }
        Ok(())
    }

    /// One ply at a time: OR over candidate children where the table moves,
    /// AND over all children where the adversary moves.
    fn every_level(&mut self, side: Side) -> Result<()> {
        let graph = self.graph;
        let mut frontier = VecDeque::from([self.require_root(side)]);

        let mut processed = HashSet::new();
        while let Some(node) = frontier.pop_front() {
            if !processed.insert(node) {
                continue;
            }
            self.count(side, node);
            if graph.position(node).is_terminal() {
                continue;
            }

            let parent = self.vertex(side, node);
            if side.controls(graph, node) {
                let candidates = self.candidates(side, node)?;
                let mut choice = vec![!parent];
                for &mv in &candidates {
                    let child = self.child(node, mv)?;
                    choice.push(self.vertex(side, child));
                    frontier.push_back(child);
                }
                self.formula.add_clause(&choice);
                self.decisions.insert((side, node), candidates);
            } else {
                for child in self.replies(node) {
                    let vertex = self.vertex(side, child);
                    self.formula.add_clause(&[!parent, vertex]);
                    frontier.push_back(child);
                }
            }
        }
        Ok(())
    }
}
