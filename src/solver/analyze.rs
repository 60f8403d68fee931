use super::clauses::{dedup, ClauseIdx};
use super::propagate::Conflict;
use super::trail::{DecisionLevel, TrailEntry};
use super::Solver;
use crate::formula::{Clause, Literal, Variable};
use log::debug;

/// The literal to assert once the solver has backtracked, with the clause that forces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assertion {
    pub literal: Literal,
    pub reason: Option<ClauseIdx>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Analysis {
    /// The conflict happened without any decision, so the formula is unsatisfiable.
    Refuted,
    Backtrack {
        level: DecisionLevel,
        assertion: Assertion,
    },
}

impl Solver {
    /// First-UIP conflict analysis.
    ///
    /// Starting from the conflicting clause, repeatedly resolves on the most recently assigned
    /// literal at the conflict level until exactly one literal at that level remains. The result
    /// is learned (stored and watched on its first two literals, or turned into a root-level fact
    /// when it is a unit) and the remaining conflict-level literal becomes the assertion to make
    /// after backtracking.
    pub(crate) fn analyze_conflict(&mut self, conflict: Conflict) -> Analysis {
        self.stats.conflicts += 1;
        if conflict.level == DecisionLevel::ROOT {
            debug!("conflict in clause {} at the root level", conflict.clause.0);
            return Analysis::Refuted;
        }

        let mut learned = self.clauses.get(conflict.clause).to_vec();
        let uip = loop {
            let (count, latest) = self.latest_at_level(&learned, conflict.level);
            let latest = latest.expect("a conflicting clause has a literal at the conflict level");
            if count == 1 {
                break latest.variable;
            }
            let reason = latest
                .reason
                .expect("the latest conflict-level literal is implied while others remain");
            learned = resolve(&learned, self.clauses.get(reason), latest.variable);
        };

        self.stats.learned_clauses += 1;
        debug!(
            "learned {} at conflict level {}",
            Clause::new(learned.iter().copied()),
            conflict.level.0
        );

        let uip_literal = learned
            .iter()
            .copied()
            .find(|l| l.variable() == uip)
            .expect("the UIP belongs to the learned clause");

        if learned.len() == 1 {
            return Analysis::Backtrack {
                level: DecisionLevel::ROOT,
                assertion: Assertion {
                    literal: uip_literal,
                    reason: None,
                },
            };
        }

        let level = learned
            .iter()
            .filter(|l| l.variable() != uip)
            .map(|l| self.level_of(l.variable()))
            .max()
            .unwrap_or(DecisionLevel::ROOT);

        self.heuristic.learned(&learned);
        let idx = self.add_watched_clause(learned, true);

        Analysis::Backtrack {
            level,
            assertion: Assertion {
                literal: uip_literal,
                reason: Some(idx),
            },
        }
    }

    /// How many literals of `clause` were assigned at `level`, and the most recent such entry.
    fn latest_at_level(&self, clause: &[Literal], level: DecisionLevel) -> (usize, Option<&TrailEntry>) {
        let mut count = 0;
        let mut latest: Option<&TrailEntry> = None;
        for literal in clause {
            let entry = self
                .trail
                .entry(literal.variable())
                .expect("every literal of a conflicting clause is assigned");
            if entry.level == level {
                count += 1;
                if latest.map_or(true, |l| entry.index > l.index) {
                    latest = Some(entry);
                }
            }
        }
        (count, latest)
    }

    fn level_of(&self, variable: Variable) -> DecisionLevel {
        self.trail
            .entry(variable)
            .map(|entry| entry.level)
            .expect("every literal of a learned clause is assigned")
    }
}

/// Binary resolution on `pivot`: the union of both clauses, first occurrences kept, minus both
/// literals of `pivot`.
pub(crate) fn resolve(left: &[Literal], right: &[Literal], pivot: Variable) -> Vec<Literal> {
    dedup(left.iter().chain(right.iter()).copied())
        .into_iter()
        .filter(|l| l.variable() != pivot)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p, Formula};
    use crate::solver::propagate::BcpResult;
    use crate::Decider;

    fn solver(clauses: Vec<Vec<Literal>>) -> Solver {
        let f = Formula::new(clauses.into_iter().map(Clause::new));
        Solver::with_decider(f, Decider::Ordered)
    }

    fn decide(s: &mut Solver, literal: Literal) -> BcpResult {
        let level = s.trail.decision_level().next();
        s.trail.set_decision_level(level);
        s.trail.push(literal.variable(), literal.is_positive(), level, None);
        s.bcp(s.trail.len() - 1)
    }

    #[test]
    fn resolve_drops_pivot_and_duplicates() {
        assert_eq!(
            resolve(&[n(1), p(2), p(3)], &[n(2), p(3), n(4)], Variable(2)),
            vec![n(1), p(3), n(4)]
        );
    }

    #[test]
    fn root_conflict_refutes() {
        let mut s = solver(vec![vec![p(1), p(2)]]);
        let conflict = Conflict {
            clause: ClauseIdx(0),
            level: DecisionLevel::ROOT,
        };
        assert_eq!(s.analyze_conflict(conflict), Analysis::Refuted);
        assert_eq!(s.stats.learned_clauses, 0);
    }

    #[test]
    fn unit_learned_clause_asserts_at_root() {
        // (!1 | 2), (!1 | !2)
        let mut s = solver(vec![vec![n(1), p(2)], vec![n(1), n(2)]]);
        let conflict = match decide(&mut s, p(1)) {
            BcpResult::Conflict(c) => c,
            BcpResult::NoConflict => panic!("expected a conflict"),
        };

        let analysis = s.analyze_conflict(conflict);
        assert_eq!(
            analysis,
            Analysis::Backtrack {
                level: DecisionLevel::ROOT,
                assertion: Assertion {
                    literal: n(1),
                    reason: None
                }
            }
        );
        assert_eq!(s.stats.learned_clauses, 1);
        assert_eq!(s.clauses.num_learned(), 0);
    }

    #[test]
    fn learned_clause_backtracks_non_chronologically() {
        // decide 1 (level 1), decide 2 (level 2), decide 3 (level 3):
        // (!3 | !1 | 4), (!4 | !2 | 5), (!4 | !5)
        let mut s = solver(vec![
            vec![n(3), n(1), p(4)],
            vec![n(4), n(2), p(5)],
            vec![n(4), n(5)],
        ]);
        assert_eq!(decide(&mut s, p(1)), BcpResult::NoConflict);
        assert_eq!(decide(&mut s, p(2)), BcpResult::NoConflict);
        let conflict = match decide(&mut s, p(3)) {
            BcpResult::Conflict(c) => c,
            BcpResult::NoConflict => panic!("expected a conflict"),
        };
        assert_eq!(conflict.level, DecisionLevel(3));

        // conflict clause (!4 | !2 | 5) resolved on 5 with (!4 | !5) gives (!4 | !2): 4 is the UIP
        let analysis = s.analyze_conflict(conflict);
        let learned = ClauseIdx(3);
        assert_eq!(s.clauses.get(learned), &[n(4), n(2)][..]);
        assert_eq!(s.clauses.watched(learned), [n(4), n(2)]);
        assert_eq!(s.watches.watchers(n(4)).last(), Some(&learned));
        assert_eq!(
            analysis,
            Analysis::Backtrack {
                level: DecisionLevel(2),
                assertion: Assertion {
                    literal: n(4),
                    reason: Some(learned)
                }
            }
        );
        assert_eq!(s.stats.learned_clauses, 1);
    }
}
