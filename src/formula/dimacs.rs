use crate::formula::{Clause, Formula, Literal};
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;

/// The declared problem size from a `p cnf <variables> <clauses>` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub num_variables: usize,
    pub num_clauses: usize,
}

pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    parse_with_header(reader).map(|(_, formula)| formula)
}

pub fn parse_with_header<R: Read>(reader: R) -> Result<(Header, Formula), DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut header: Option<Header> = None;
    let mut clauses = vec![];
    let mut clause = vec![];

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_number + 1;
        let format_error = |message: &str| DimacsParseError::Format {
            line: line_number,
            message: message.into(),
        };

        match line.trim_start().chars().next() {
            None | Some('c') | Some('%') | Some('0') => continue,
            Some('p') => {
                if header.is_some() {
                    return Err(format_error("duplicate 'p' line"));
                }
                let mut words = line.split_whitespace();
                if words.next() != Some("p") || words.next() != Some("cnf") {
                    return Err(format_error("missing 'cnf'"));
                }

                let num_variables = words
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| format_error("invalid num_variables"))?;
                let num_clauses = words
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| format_error("invalid num_clauses"))?;

                header = Some(Header {
                    num_variables,
                    num_clauses,
                });
            }
            Some(_) => {
                let num_variables = match header {
                    Some(header) => header.num_variables,
                    None => return Err(format_error("missing 'p' line before clauses")),
                };

                for word in line.split_whitespace() {
                    let x = word.parse::<i64>().map_err(|_| format_error("invalid literal"))?;
                    match Literal::from_dimacs(x) {
                        Some(literal) if literal.idx() > num_variables => {
                            return Err(format_error("literal out of range"));
                        }
                        Some(literal) => clause.push(literal),
                        None if clause.is_empty() => {}
                        None => clauses.push(Clause::new(clause.drain(..))),
                    }
                }
            }
        }
    }

    let header = header.ok_or_else(|| DimacsParseError::Format {
        line: 0,
        message: "missing 'p' line".into(),
    })?;
    if !clause.is_empty() {
        clauses.push(Clause::new(clause));
    }
    if clauses.len() != header.num_clauses {
        log::debug!("header declares {} clauses, read {}", header.num_clauses, clauses.len());
    }

    let formula = Formula::with_num_variables(header.num_variables, clauses);
    Ok((header, formula))
}

#[derive(Debug, Error)]
pub enum DimacsParseError {
    #[error("cannot read formula: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};
    use crate::{Decider, Solver};

    #[test]
    fn parse_cnf_basic() {
        let cnf = "c  simple_v3_c2.cnf
c
p cnf 3 2
1 -3 0
2 3 -1 0";
        let (header, f) = parse_with_header(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(
            header,
            Header {
                num_variables: 3,
                num_clauses: 2
            }
        );
        assert_eq!(f.clauses().count(), 2);

        assert_eq!(
            f.clauses().nth(0).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![p(1), n(3)]
        );
        assert_eq!(
            f.clauses().nth(1).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![p(2), p(3), n(1)]
        );
    }

    #[test]
    fn parse_skips_comments_and_percent_trailer() {
        let cnf = "c header comment
p cnf 4 2

 1 -2 0
%
0
c trailing
3
  -4 0
";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.num_variables(), 4);
        assert_eq!(
            f.clauses().map(|c| c.literals().cloned().collect::<Vec<_>>()).collect::<Vec<_>>(),
            vec![vec![p(1), n(2)], vec![p(3), n(4)]]
        );
    }

    #[test]
    fn parse_keeps_clauses_beyond_declared_count() {
        let cnf = "p cnf 2 1\n1 0\n-2 0\n";
        let (header, f) = parse_with_header(cnf.as_bytes()).unwrap();
        assert_eq!(header.num_clauses, 1);
        assert_eq!(f.num_clauses(), 2);
    }

    #[test]
    fn parse_unterminated_last_clause() {
        let f = parse("p cnf 2 1\n1 -2".as_bytes()).unwrap();
        assert_eq!(f.num_clauses(), 1);
    }

    #[test]
    fn parse_errors() {
        let missing_header = parse("1 2 0\n".as_bytes());
        assert!(matches!(missing_header, Err(DimacsParseError::Format { line: 1, .. })));

        let no_header_at_all = parse("c nothing\n".as_bytes());
        assert!(matches!(no_header_at_all, Err(DimacsParseError::Format { .. })));

        let bad_kind = parse("p dnf 2 1\n".as_bytes());
        assert!(matches!(bad_kind, Err(DimacsParseError::Format { line: 1, .. })));

        let bad_count = parse("p cnf two 1\n".as_bytes());
        assert!(matches!(bad_count, Err(DimacsParseError::Format { .. })));

        let bad_literal = parse("p cnf 2 1\n1 x 0\n".as_bytes());
        assert!(matches!(bad_literal, Err(DimacsParseError::Format { line: 2, .. })));

        let out_of_range = parse("p cnf 2 1\n1 -3 0\n".as_bytes());
        assert!(matches!(out_of_range, Err(DimacsParseError::Format { line: 2, .. })));

        let duplicate = parse("p cnf 2 1\np cnf 2 1\n".as_bytes());
        assert!(matches!(duplicate, Err(DimacsParseError::Format { line: 2, .. })));
    }

    #[test]
    fn solve_cnf_quinn() {
        let cnf = "c  quinn.cnf
c
p cnf 16 18
  1    2  0
 -2   -4  0
  3    4  0
 -4   -5  0
  5   -6  0
  6   -7  0
  6    7  0
  7  -16  0
  8   -9  0
 -8  -14  0
  9   10  0
  9  -10  0
-10  -11  0
 10   12  0
 11   12  0
 13   14  0
 14  -15  0
 15   16  0
";

        let f = parse(cnf.as_bytes()).expect("failed to parse");

        for decider in [Decider::Vsids, Decider::Ordered].iter() {
            let mut solver = Solver::with_decider(f.clone(), *decider);
            let model = solver.solve().model().cloned().expect("quinn is satisfiable");
            assert!(f.is_satisfied_by(&model));
        }
    }

    #[test]
    fn solve_cnf_pigeonhole() {
        // three pigeons, two holes: variable 2 * (pigeon - 1) + hole
        let cnf = "p cnf 6 9
1 2 0
3 4 0
5 6 0
-1 -3 0
-1 -5 0
-3 -5 0
-2 -4 0
-2 -6 0
-4 -6 0
";
        let f = parse(cnf.as_bytes()).expect("failed to parse");

        for decider in [Decider::Vsids, Decider::Ordered].iter() {
            let mut solver = Solver::with_decider(f.clone(), *decider);
            assert!(!solver.solve().is_satisfiable());
            assert!(solver.statistics().learned_clauses > 0);
        }
    }
}
