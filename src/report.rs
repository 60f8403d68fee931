use crate::{Model, SatResult, Statistics};
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything printed after a run of the command-line solver.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub input: PathBuf,
    pub num_variables: usize,
    pub declared_clauses: usize,
    pub stored_clauses: usize,
    pub read_time: Duration,
    pub total_time: Duration,
    pub statistics: Statistics,
    pub result: SatResult,
    pub assignment_file: Option<PathBuf>,
}

impl Display for SolveReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{:=^70}", " STATISTICS ")?;
        writeln!(f, "Solving formula from file: {}", self.input.display())?;
        writeln!(
            f,
            "Vars: {}, Clauses: {}, Stored clauses: {}",
            self.num_variables, self.declared_clauses, self.stored_clauses
        )?;
        writeln!(f, "Input reading time: {:?}", self.read_time)?;
        writeln!(f, "{}", "-".repeat(31))?;
        writeln!(f, "Conflicts: {}", self.statistics.conflicts)?;
        writeln!(f, "Learned clauses: {}", self.statistics.learned_clauses)?;
        writeln!(f, "Decisions made: {}", self.statistics.decisions)?;
        writeln!(f, "Implications made: {}", self.statistics.implications)?;
        writeln!(f, "All time: {:?}", self.total_time)?;
        writeln!(f, "RESULT: {}", self.result.status())?;
        if let Some(path) = &self.assignment_file {
            writeln!(f, "Satisfying assignment stored in file: {}", path.display())?;
        }
        write!(f, "{}", "=".repeat(70))
    }
}

/// Where the assignment for `input` goes: `<results_dir>/decision_<input stem>.txt`.
pub fn assignment_path(input: &Path, results_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    results_dir.join(format!("decision_{}.txt", stem))
}

/// Writes `model` as a flat JSON object next to the other results, creating `results_dir` if needed.
pub fn write_assignment(model: &Model, input: &Path, results_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(results_dir)?;
    let path = assignment_path(input, results_dir);
    fs::write(&path, model.to_json())?;
    log::debug!("wrote assignment to {}", path.display());
    Ok(path)
}
