use cdclsat::formula::dimacs::{parse_with_header, DimacsParseError, Header};
use cdclsat::formula::Formula;
use cdclsat::report::{write_assignment, SolveReport};
use cdclsat::*;
use clap::{App, Arg};
use log::{debug, info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    let matches = App::new("cdclsat")
        .about("Decides satisfiability of a CNF formula by conflict-driven clause learning")
        .arg(
            Arg::with_name("path")
                .short("p")
                .long("path")
                .takes_value(true)
                .required(true)
                .help("path of the .cnf file (DIMACS)"),
        )
        .arg(
            Arg::with_name("decider")
                .short("d")
                .long("decider")
                .takes_value(true)
                .possible_values(&["VSIDS", "ORDERED"])
                .default_value("VSIDS")
                .help("decision heuristic"),
        )
        .arg(
            Arg::with_name("log")
                .short("l")
                .long("log")
                .takes_value(true)
                .possible_values(&["true", "false", "True", "False"])
                .default_value("false")
                .help("trace every solver step"),
        )
        .get_matches();

    let verbose = matches.value_of("log").map_or(false, |v| v.eq_ignore_ascii_case("true"));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if verbose {
        "trace"
    } else {
        "warn"
    }))
    .init();

    let decider = match matches.value_of("decider").unwrap_or("VSIDS").parse::<Decider>() {
        Ok(decider) => decider,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let path = PathBuf::from(matches.value_of("path").expect("path is a required argument"));

    let start = Instant::now();
    let (header, formula) = match parse_from_file(&path) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(2);
        }
    };
    let read_time = start.elapsed();
    info!(
        "read {} clauses over {} variables from {}",
        formula.num_clauses(),
        formula.num_variables(),
        path.display()
    );

    let mut solver = Solver::with_decider(formula.clone(), decider);
    let result = solver.solve();
    let total_time = start.elapsed();
    println!("{}", result.status());

    let assignment_file = match result.model() {
        Some(model) => {
            debug!("model satisfies the formula: {}", formula.is_satisfied_by(model));
            match write_assignment(model, &path, Path::new("results")) {
                Ok(file) => Some(file),
                Err(e) => {
                    warn!("cannot write assignment: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let report = SolveReport {
        input: path,
        num_variables: header.num_variables,
        declared_clauses: header.num_clauses,
        stored_clauses: solver.num_clauses(),
        read_time,
        total_time,
        statistics: solver.statistics().clone(),
        result: result.clone(),
        assignment_file,
    };
    println!("{}", report);

    let exit_code = match result {
        SatResult::Satisfiable(_) => 0,
        SatResult::Unsatisfiable => 1,
    };
    std::process::exit(exit_code);
}

fn parse_from_file(path: &Path) -> Result<(Header, Formula), DimacsParseError> {
    let file = File::open(path)?;
    parse_with_header(file)
}
