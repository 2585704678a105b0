// UPROOF - uproof-foundation
// Module: Proof Reports
// SW-REQ-ID: REQ_VERIFY_004
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Outcome of exploring a harness.

use core::{fmt, time::Duration};

use uproof_error::{Error, Violation};

use crate::{
    assume::{Assumption, CoverageReduction},
    source::ScriptedSource,
    stub::StubRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofOutcome {
    /// No violation on any path, under the recorded assumptions
    Verified,
    /// At least one path reaches a violation
    Failed,
    /// The harness misused the context or its choices diverged
    Error,
    /// An exploration limit was hit before the tree was exhausted
    Inconclusive,
    /// Every path was pruned; the assumptions are unsatisfiable
    Vacuous,
}

impl ProofOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Inconclusive => "inconclusive",
            Self::Vacuous => "vacuous",
        }
    }
}

impl fmt::Display for ProofOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value chosen at one choice point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub point: String,
    pub value: u64,
}

/// A violation together with the choices that reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample {
    pub violation: Violation,
    /// Every choice of the violating run, in order
    pub trace:     Vec<Assignment>,
}

impl Counterexample {
    /// Value of the first choice at `point`
    pub fn value_of(&self, point: &str) -> Option<u64> {
        self.trace
            .iter()
            .find(|assignment| assignment.point == point)
            .map(|assignment| assignment.value)
    }

    /// Source that replays this counterexample
    pub fn to_script(&self) -> ScriptedSource {
        ScriptedSource::from_assignments(
            self.trace
                .iter()
                .map(|assignment| (assignment.point.as_str(), assignment.value)),
        )
    }
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.violation)?;
        for assignment in &self.trace {
            writeln!(f, "  {} = {}", assignment.point, assignment.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub hit:    Vec<&'static str>,
    pub missed: Vec<&'static str>,
}

impl CoverageReport {
    pub fn total(&self) -> usize {
        self.hit.len() + self.missed.len()
    }

    /// Share of points reached, in percent; 100 when there are none
    pub fn percentage(&self) -> f64 {
        if self.total() == 0 {
            100.0
        } else {
            self.hit.len() as f64 * 100.0 / self.total() as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationStats {
    pub paths_explored:  usize,
    pub paths_completed: usize,
    pub paths_pruned:    usize,
    pub violating_paths: usize,
    /// Paths stopped by the depth or unwind limit
    pub bounded_paths:   usize,
    /// Paths stopped by a harness fault or a diverged choice
    pub faulted_paths:   usize,
    /// Most choice points on a single path
    pub max_depth_seen:  usize,
    /// The path budget ran out before the tree was exhausted
    pub path_limit_hit:  bool,
}

#[derive(Debug, Clone)]
pub struct ProofReport {
    pub harness:             &'static str,
    pub target:              &'static str,
    pub outcome:             ProofOutcome,
    pub stats:               ExplorationStats,
    /// One per distinct violation (kind, site, field)
    pub counterexamples:     Vec<Counterexample>,
    /// First harness fault, if any path hit one
    pub fault:               Option<Error>,
    pub assumptions:         Vec<Assumption>,
    pub coverage_reductions: Vec<CoverageReduction>,
    pub coverage:            CoverageReport,
    pub stubs:               StubRegistry,
    pub stub_calls:          usize,
    /// Choice points whose domain was sampled rather than enumerated
    pub sampled_points:      Vec<String>,
    pub unwind:              usize,
    pub duration:            Duration,
}

impl ProofReport {
    pub fn error_count(&self) -> usize {
        self.counterexamples.len()
    }

    pub fn precondition_count(&self) -> usize {
        self.assumptions.len()
    }

    pub fn is_verified(&self) -> bool {
        self.outcome == ProofOutcome::Verified
    }

    /// Error describing why the proof did not verify
    pub fn error(&self) -> Option<Error> {
        match self.outcome {
            ProofOutcome::Verified => None,
            ProofOutcome::Failed => Some(Error::verification_failed(
                "At least one path reaches a memory-safety violation",
            )),
            ProofOutcome::Error => Some(self.fault.unwrap_or(Error::REPLAY_DIVERGED)),
            ProofOutcome::Inconclusive => Some(Error::bound_reached(
                "Exploration stopped at a configured bound",
            )),
            ProofOutcome::Vacuous => Some(Error::VACUOUS_PROOF),
        }
    }
}

impl fmt::Display for ProofReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}): {} after {} paths ({} pruned)",
            self.harness,
            self.target,
            self.outcome,
            self.stats.paths_explored,
            self.stats.paths_pruned
        )?;
        writeln!(
            f,
            "coverage {}/{} ({:.1}%)",
            self.coverage.hit.len(),
            self.coverage.total(),
            self.coverage.percentage()
        )?;
        if let Some(fault) = &self.fault {
            writeln!(f, "fault on {} paths: {}", self.stats.faulted_paths, fault)?;
        }
        for assumption in &self.assumptions {
            writeln!(f, "assume [{}] {}", assumption.origin.as_str(), assumption.description)?;
        }
        for reduction in &self.coverage_reductions {
            writeln!(f, "coverage reduced: {} ({})", reduction.subject, reduction.description)?;
        }
        for counterexample in &self.counterexamples {
            write!(f, "{counterexample}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uproof_error::{AccessKind, ViolationKind};

    use super::*;
    use crate::{source::SymbolicSource, symbolic::Domain};

    #[test]
    fn coverage_percentage() {
        let report = CoverageReport {
            hit:    vec!["a", "b", "c"],
            missed: vec!["d"],
        };
        assert!((report.percentage() - 75.0).abs() < f64::EPSILON);
        assert!((CoverageReport::default().percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counterexample_replays_its_trace() {
        let counterexample = Counterexample {
            violation: Violation::detached(
                ViolationKind::NullDereference,
                AccessKind::Write,
                "f",
                "next",
                0,
                8,
            ),
            trace:     vec![Assignment {
                point: "handler_allocated".into(),
                value: 0,
            }],
        };
        assert_eq!(counterexample.value_of("handler_allocated"), Some(0));
        let mut script = counterexample.to_script();
        assert_eq!(script.choose("handler_allocated", &Domain::full::<bool>()), Ok(0));
        assert!(counterexample.to_string().contains("handler_allocated = 0"));
    }
}
