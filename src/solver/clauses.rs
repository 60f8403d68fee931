use crate::formula::Literal;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClauseIdx(pub usize);

#[derive(Debug)]
struct StoredClause {
    literals: Vec<Literal>,
    watched: [Literal; 2],
}

/// Owns every clause with at least two literals, original and learned alike.
/// Clauses are never removed, so a `ClauseIdx` stays valid for the solver's lifetime.
#[derive(Debug, Default)]
pub struct ClauseStore {
    clauses: Vec<StoredClause>,
    num_learned: usize,
}

impl ClauseStore {
    /// Stores a deduplicated clause and designates its first two literals as watched.
    pub fn add(&mut self, literals: Vec<Literal>, learned: bool) -> ClauseIdx {
        assert!(literals.len() >= 2, "unit and empty clauses are not stored");
        debug_assert_eq!(dedup(literals.clone()), literals);

        let idx = ClauseIdx(self.clauses.len());
        let watched = [literals[0], literals[1]];
        self.clauses.push(StoredClause { literals, watched });
        if learned {
            self.num_learned += 1;
        }
        idx
    }

    pub fn get(&self, idx: ClauseIdx) -> &[Literal] {
        &self.clauses[idx.0].literals
    }

    pub fn watched(&self, idx: ClauseIdx) -> [Literal; 2] {
        self.clauses[idx.0].watched
    }

    /// The watched literal of `idx` that is not `watch`.
    pub fn other_watch(&self, idx: ClauseIdx, watch: Literal) -> Literal {
        let [first, second] = self.clauses[idx.0].watched;
        if first == watch {
            second
        } else {
            first
        }
    }

    pub fn replace_watch(&mut self, idx: ClauseIdx, old: Literal, new: Literal) {
        let watched = &mut self.clauses[idx.0].watched;
        let slot = watched
            .iter()
            .position(|l| *l == old)
            .expect("replaced literal must be watched");
        watched[slot] = new;
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn num_learned(&self) -> usize {
        self.num_learned
    }

    pub fn num_original(&self) -> usize {
        self.clauses.len() - self.num_learned
    }
}

/// Drops repeated literals, keeping the first occurrence of each.
pub(crate) fn dedup(literals: impl IntoIterator<Item = Literal>) -> Vec<Literal> {
    let mut seen = HashSet::new();
    literals.into_iter().filter(|l| seen.insert(*l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup(vec![n(1), p(2), n(1), p(1), p(2)]), vec![n(1), p(2), p(1)]);
    }

    #[test]
    fn first_two_literals_are_watched() {
        let mut store = ClauseStore::default();
        let c0 = store.add(vec![p(1), n(2), p(3)], false);
        let c1 = store.add(vec![n(3), p(4)], true);

        assert_eq!(store.get(c0), &[p(1), n(2), p(3)][..]);
        assert_eq!(store.watched(c0), [p(1), n(2)]);
        assert_eq!(store.other_watch(c0, n(2)), p(1));
        assert_eq!(store.other_watch(c1, n(3)), p(4));
        assert_eq!((store.len(), store.num_original(), store.num_learned()), (2, 1, 1));
    }

    #[test]
    fn replace_watch_keeps_the_other() {
        let mut store = ClauseStore::default();
        let c = store.add(vec![p(1), n(2), p(3)], false);
        store.replace_watch(c, p(1), p(3));
        assert_eq!(store.watched(c), [p(3), n(2)]);
        assert_eq!(store.other_watch(c, p(3)), n(2));
    }

    #[test]
    #[should_panic]
    fn unit_clauses_are_rejected() {
        ClauseStore::default().add(vec![p(1)], false);
    }
}
