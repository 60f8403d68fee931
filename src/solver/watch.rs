use super::clauses::ClauseIdx;
use crate::formula::Literal;

/// Maps each literal to the clauses currently watching it.
#[derive(Debug)]
pub struct WatchIndex {
    lists: Vec<Vec<ClauseIdx>>,
}

impl WatchIndex {
    pub fn new(num_variables: usize) -> Self {
        Self {
            lists: vec![vec![]; 2 * num_variables + 2],
        }
    }

    pub fn watch(&mut self, literal: Literal, clause: ClauseIdx) {
        self.lists[literal.slot()].push(clause);
    }

    pub fn unwatch(&mut self, literal: Literal, clause: ClauseIdx) {
        let list = &mut self.lists[literal.slot()];
        if let Some(position) = list.iter().position(|c| *c == clause) {
            list.remove(position);
        }
    }

    pub fn watchers(&self, literal: Literal) -> &[ClauseIdx] {
        &self.lists[literal.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};

    #[test]
    fn watch_and_unwatch() {
        let mut index = WatchIndex::new(2);
        index.watch(p(1), ClauseIdx(0));
        index.watch(p(1), ClauseIdx(1));
        index.watch(n(2), ClauseIdx(1));

        assert_eq!(index.watchers(p(1)), &[ClauseIdx(0), ClauseIdx(1)][..]);
        assert!(index.watchers(n(1)).is_empty());

        index.unwatch(p(1), ClauseIdx(0));
        assert_eq!(index.watchers(p(1)), &[ClauseIdx(1)][..]);
        assert_eq!(index.watchers(n(2)), &[ClauseIdx(1)][..]);
    }
}
