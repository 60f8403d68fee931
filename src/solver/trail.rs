use super::clauses::ClauseIdx;
use crate::formula::{Literal, Variable};
use std::fmt::{self, Display, Formatter};
use std::ops::Index;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default)]
pub struct DecisionLevel(pub usize);

impl DecisionLevel {
    pub const ROOT: DecisionLevel = DecisionLevel(0);

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// One assignment event. `reason` is `None` for decisions and for root-level facts.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailEntry {
    pub variable: Variable,
    pub value: bool,
    pub level: DecisionLevel,
    pub reason: Option<ClauseIdx>,
    pub index: usize,
}

impl TrailEntry {
    /// The literal this entry makes true.
    pub fn literal(&self) -> Literal {
        Literal::new(self.variable, self.value)
    }
}

impl Display for TrailEntry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.reason {
            Some(c) => write!(f, "implied({}) {} @ {}", c.0, self.literal(), self.level.0),
            None => write!(f, "unforced {} @ {}", self.literal(), self.level.0),
        }
    }
}

/// Chronological record of assignments, with a per-variable view of the currently active one.
#[derive(Debug)]
pub struct Trail {
    entries: Vec<TrailEntry>,
    // trail index of the active entry, indexed by variable id
    assigned: Vec<Option<usize>>,
    decision_level: DecisionLevel,
}

impl Trail {
    pub fn new(num_variables: usize) -> Self {
        Self {
            entries: vec![],
            assigned: vec![None; num_variables + 1],
            decision_level: DecisionLevel::ROOT,
        }
    }

    pub fn push(
        &mut self,
        variable: Variable,
        value: bool,
        level: DecisionLevel,
        reason: Option<ClauseIdx>,
    ) -> &TrailEntry {
        assert!(
            self.assigned[variable.0].is_none(),
            "variable {} already has an active assignment",
            variable.0
        );
        debug_assert!(self.entries.last().map_or(true, |last| last.level <= level));

        let index = self.entries.len();
        self.assigned[variable.0] = Some(index);
        self.entries.push(TrailEntry {
            variable,
            value,
            level,
            reason,
            index,
        });
        &self.entries[index]
    }

    /// Pops every entry above `level`, most recent first, handing each one to `on_pop`.
    pub fn truncate_above(&mut self, level: DecisionLevel, mut on_pop: impl FnMut(&TrailEntry)) {
        while let Some(last) = self.entries.last() {
            if last.level <= level {
                break;
            }
            let entry = self.entries.pop().expect("trail is not empty");
            self.assigned[entry.variable.0] = None;
            on_pop(&entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TrailEntry> {
        self.entries.iter()
    }

    pub fn entry(&self, variable: Variable) -> Option<&TrailEntry> {
        self.assigned[variable.0].map(|index| &self.entries[index])
    }

    pub fn value(&self, variable: Variable) -> Option<bool> {
        self.entry(variable).map(|entry| entry.value)
    }

    /// `Some(true)` if `literal` holds under the current assignment, `Some(false)` if its negation does.
    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.value(literal.variable())
            .map(|value| value == literal.is_positive())
    }

    pub fn decision_level(&self) -> DecisionLevel {
        self.decision_level
    }

    pub fn set_decision_level(&mut self, level: DecisionLevel) {
        self.decision_level = level;
    }
}

impl Index<usize> for Trail {
    type Output = TrailEntry;

    fn index(&self, index: usize) -> &TrailEntry {
        &self.entries[index]
    }
}
