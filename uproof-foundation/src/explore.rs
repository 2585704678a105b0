// UPROOF - uproof-foundation
// Module: Bounded Explorer
// SW-REQ-ID: REQ_VERIFY_004
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Stateless depth-first exploration of a harness's choice tree.
//!
//! Each run of the harness makes a sequence of choices. The explorer starts
//! with an empty prefix (every choice takes its first representative), then
//! repeatedly bumps the deepest choice that still has an untried
//! representative and re-runs the harness from scratch with that prefix.
//! Nothing is shared between runs except what the explorer accumulates.
//!
//! Wide domains are reduced to their boundary partition (see
//! [`Domain::representatives`](crate::symbolic::Domain::representatives));
//! the choice points where that happened are listed in the report. Running
//! the same harness under Kani removes that restriction.

use core::{cmp, mem};
use std::{collections::BTreeSet, time::Instant};

use uproof_error::{Error, Result};

#[cfg(feature = "tracing")]
use crate::trace::{debug, info, warn, ExplorationTrace};
use crate::{
    assume::AssumptionLedger,
    context::{Halt, ProofContext, RunArtifacts},
    harness::Harness,
    report::{Assignment, Counterexample, CoverageReport, ExplorationStats, ProofOutcome, ProofReport},
    source::{ChoiceRecord, ExhaustiveSource, ScriptedSource},
};

/// Exploration limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationConfig {
    /// Harness runs before giving up
    pub max_paths:           usize,
    /// Choice points per run
    pub max_depth:           usize,
    /// Loop bound for shapes and traversals
    pub unwind:              usize,
    /// Distinct counterexamples kept in the report
    pub max_counterexamples: usize,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_paths:           4096,
            max_depth:           64,
            unwind:              2,
            max_counterexamples: 8,
        }
    }
}

impl ExplorationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_paths == 0 || self.max_depth == 0 || self.unwind == 0 {
            return Err(Error::invalid_config("Exploration limits must be non-zero"));
        }
        if self.max_counterexamples == 0 {
            return Err(Error::invalid_config("At least one counterexample must be kept"));
        }
        Ok(())
    }
}

/// Result of replaying one concrete scenario
#[derive(Debug)]
pub struct Replay {
    pub result:        core::result::Result<(), Halt>,
    pub choices:       Vec<ChoiceRecord>,
    pub artifacts:     RunArtifacts,
    /// Scripted points the run never asked for
    pub unused_points: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Explorer {
    config: ExplorationConfig,
}

impl Explorer {
    pub fn new(config: ExplorationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    /// Explore every path of `harness` within the configured limits.
    pub fn explore(&self, harness: &dyn Harness) -> ProofReport {
        #[cfg(feature = "tracing")]
        let _span = ExplorationTrace::harness(harness.name(), harness.target()).entered();

        let started = Instant::now();
        let mut stats = ExplorationStats::default();
        let mut ledger = AssumptionLedger::new();
        let mut coverage = BTreeSet::new();
        let mut sampled = BTreeSet::new();
        let mut seen = BTreeSet::new();
        let mut counterexamples = Vec::new();
        let mut stub_calls = 0;
        let mut fault = None;
        let mut prefix = Vec::new();

        loop {
            if stats.paths_explored >= self.config.max_paths {
                stats.path_limit_hit = true;
                break;
            }
            #[cfg(feature = "tracing")]
            let _path = ExplorationTrace::path(stats.paths_explored).entered();

            let mut source = ExhaustiveSource::new(mem::take(&mut prefix), self.config.max_depth);
            let (result, artifacts) = {
                let mut cx = ProofContext::new(&mut source, self.config.unwind);
                let result = harness.run(&mut cx);
                (result, cx.finish())
            };
            let choices = source.into_choices();

            stats.paths_explored += 1;
            stats.max_depth_seen = cmp::max(stats.max_depth_seen, choices.len());
            sampled.extend(
                choices
                    .iter()
                    .filter(|choice| !choice.enumerated)
                    .map(|choice| choice.point.clone()),
            );
            ledger.merge(&artifacts.ledger);
            coverage.extend(artifacts.coverage.iter().copied());
            stub_calls += artifacts.stub_calls.len();

            match result {
                Ok(()) => stats.paths_completed += 1,
                Err(Halt::Pruned { .. }) => stats.paths_pruned += 1,
                Err(Halt::Violation(violation)) => {
                    stats.violating_paths += 1;
                    #[cfg(feature = "tracing")]
                    debug!(%violation, choices = choices.len(), "violation");
                    if seen.insert(violation.key())
                        && counterexamples.len() < self.config.max_counterexamples
                    {
                        counterexamples.push(Counterexample {
                            violation,
                            trace: assignments(&choices),
                        });
                    }
                },
                Err(Halt::Fault(error)) => {
                    stats.faulted_paths += 1;
                    #[cfg(feature = "tracing")]
                    warn!(%error, "harness fault");
                    fault.get_or_insert(error);
                },
                Err(Halt::Diverged { point }) => {
                    stats.faulted_paths += 1;
                    #[cfg(feature = "tracing")]
                    warn!(%point, "choice tree diverged");
                    #[cfg(not(feature = "tracing"))]
                    let _ = point;
                    fault.get_or_insert(Error::REPLAY_DIVERGED);
                },
                Err(halt) => {
                    stats.bounded_paths += 1;
                    #[cfg(feature = "tracing")]
                    warn!(reason = %halt, "path stopped early");
                    #[cfg(not(feature = "tracing"))]
                    let _ = halt;
                },
            }

            match next_prefix(&choices) {
                Some(next) => prefix = next,
                None => break,
            }
        }

        let outcome = if stats.violating_paths > 0 {
            ProofOutcome::Failed
        } else if stats.faulted_paths > 0 {
            ProofOutcome::Error
        } else if stats.path_limit_hit || stats.bounded_paths > 0 {
            ProofOutcome::Inconclusive
        } else if stats.paths_completed == 0 {
            ProofOutcome::Vacuous
        } else {
            ProofOutcome::Verified
        };

        let (hit, missed): (Vec<&'static str>, Vec<&'static str>) = harness
            .coverage_points()
            .iter()
            .copied()
            .partition(|point| coverage.contains(point));

        #[cfg(feature = "tracing")]
        info!(
            outcome = %outcome,
            paths = stats.paths_explored,
            pruned = stats.paths_pruned,
            violations = stats.violating_paths,
            "exploration finished"
        );

        ProofReport {
            harness: harness.name(),
            target: harness.target(),
            outcome,
            stats,
            counterexamples,
            fault,
            assumptions: ledger.entries().to_vec(),
            coverage_reductions: ledger.reductions().to_vec(),
            coverage: CoverageReport { hit, missed },
            stubs: harness.stubs(),
            stub_calls,
            sampled_points: sampled.into_iter().collect(),
            unwind: self.config.unwind,
            duration: started.elapsed(),
        }
    }

    /// Run `harness` once with concrete values.
    pub fn replay(&self, harness: &dyn Harness, mut source: ScriptedSource) -> Replay {
        #[cfg(feature = "tracing")]
        let _span = ExplorationTrace::replay(harness.name()).entered();

        let (result, artifacts) = {
            let mut cx = ProofContext::new(&mut source, self.config.unwind);
            let result = harness.run(&mut cx);
            (result, cx.finish())
        };
        let unused_points = source.unused_points().into_iter().map(str::to_owned).collect();
        Replay {
            result,
            choices: source.into_choices(),
            artifacts,
            unused_points,
        }
    }
}

fn assignments(choices: &[ChoiceRecord]) -> Vec<Assignment> {
    choices
        .iter()
        .map(|choice| Assignment {
            point: choice.point.clone(),
            value: choice.value,
        })
        .collect()
}

/// Prefix of the next path in depth-first order, or `None` when the tree is
/// exhausted.
fn next_prefix(choices: &[ChoiceRecord]) -> Option<Vec<usize>> {
    let deepest = choices.iter().rposition(|choice| choice.index + 1 < choice.arity)?;
    let mut prefix: Vec<usize> = choices[..deepest].iter().map(|choice| choice.index).collect();
    prefix.push(choices[deepest].index + 1);
    Some(prefix)
}

/// Check `harness` with the Kani model checker: every choice is `kani::any()`
/// and any violation fails the proof.
#[cfg(kani)]
pub fn kani_check(harness: &dyn Harness, unwind: usize) {
    let mut source = crate::source::KaniSource;
    let mut cx = ProofContext::new(&mut source, unwind);
    let result = harness.run(&mut cx);
    assert!(
        result.as_ref().err().and_then(Halt::violation).is_none(),
        "memory-safety violation"
    );
}

#[cfg(test)]
mod tests {
    use uproof_error::ViolationKind;

    use super::*;
    use crate::{
        heap::Nullability,
        layout::{FieldDef, StructLayout},
        stub::StubRegistry,
    };

    static CELL_FIELDS: [FieldDef; 1] = [FieldDef::scalar("value", 0, 4)];
    static CELL: StructLayout = StructLayout {
        name:   "cell_t",
        size:   4,
        align:  4,
        fields: &CELL_FIELDS,
    };

    struct WriteCell {
        nullability: Nullability,
    }

    impl Harness for WriteCell {
        fn name(&self) -> &'static str {
            "write_cell"
        }

        fn target(&self) -> &'static str {
            "cell_write"
        }

        fn coverage_points(&self) -> &'static [&'static str] {
            &["write", "never"]
        }

        fn run(&self, cx: &mut ProofContext<'_>) -> core::result::Result<(), Halt> {
            let cell = cx.alloc_exact("cell", &CELL, self.nullability)?;
            let flag: bool = cx.any("flag")?;
            cx.cover("write");
            cx.store_scalar(cell, &CELL_FIELDS[0], u64::from(flag), "cell_write")
        }
    }

    static LINK_FIELDS: [FieldDef; 1] = [FieldDef::pointer("next", 0)];
    static LINK: StructLayout = StructLayout {
        name:   "link_t",
        size:   8,
        align:  8,
        fields: &LINK_FIELDS,
    };

    /// Reads a pointer field as if it were an integer
    struct ScalarLoadOfPointer;

    impl Harness for ScalarLoadOfPointer {
        fn name(&self) -> &'static str {
            "scalar_load_of_pointer"
        }

        fn target(&self) -> &'static str {
            "link_read"
        }

        fn coverage_points(&self) -> &'static [&'static str] {
            &[]
        }

        fn run(&self, cx: &mut ProofContext<'_>) -> core::result::Result<(), Halt> {
            let link = cx.alloc_exact("link", &LINK, Nullability::NonNull)?;
            cx.load_scalar(link, &LINK_FIELDS[0], "link_read").map(drop)
        }
    }

    struct Unsatisfiable;

    impl Harness for Unsatisfiable {
        fn name(&self) -> &'static str {
            "unsatisfiable"
        }

        fn target(&self) -> &'static str {
            "nothing"
        }

        fn stubs(&self) -> StubRegistry {
            StubRegistry::new()
        }

        fn coverage_points(&self) -> &'static [&'static str] {
            &[]
        }

        fn run(&self, cx: &mut ProofContext<'_>) -> core::result::Result<(), Halt> {
            let x: u8 = cx.any("x")?;
            cx.assume(x > 200 && x < 100, "x", "x > 200 && x < 100")
        }
    }

    #[test]
    fn non_null_harness_verifies() {
        let report = Explorer::default().explore(&WriteCell {
            nullability: Nullability::NonNull,
        });
        assert_eq!(report.outcome, ProofOutcome::Verified);
        // allocated in {0, 1}: the null branch is pruned before `flag` is chosen
        assert_eq!(report.stats.paths_explored, 3);
        assert_eq!(report.stats.paths_pruned, 1);
        assert_eq!(report.coverage.hit, vec!["write"]);
        assert_eq!(report.coverage.missed, vec!["never"]);
        assert!(report.sampled_points.is_empty());
    }

    #[test]
    fn may_fail_harness_reports_null_write() {
        let report = Explorer::default().explore(&WriteCell {
            nullability: Nullability::MayFail,
        });
        assert_eq!(report.outcome, ProofOutcome::Failed);
        assert_eq!(report.counterexamples.len(), 1);
        let counterexample = &report.counterexamples[0];
        assert_eq!(counterexample.violation.kind, ViolationKind::NullDereference);
        assert_eq!(counterexample.value_of("cell_allocated"), Some(0));

        let replay = Explorer::default().replay(
            &WriteCell {
                nullability: Nullability::MayFail,
            },
            counterexample.to_script(),
        );
        assert_eq!(
            replay.result.unwrap_err().violation().map(|v| v.kind),
            Some(ViolationKind::NullDereference)
        );
    }

    #[test]
    fn unsatisfiable_assumptions_are_vacuous() {
        let report = Explorer::default().explore(&Unsatisfiable);
        assert_eq!(report.outcome, ProofOutcome::Vacuous);
        assert_eq!(report.stats.paths_completed, 0);
        assert!(report.sampled_points.contains(&"x".to_string()));
    }

    #[test]
    fn path_budget_makes_result_inconclusive() {
        let explorer = Explorer::new(ExplorationConfig {
            max_paths: 1,
            ..ExplorationConfig::default()
        });
        let report = explorer.explore(&WriteCell {
            nullability: Nullability::NonNull,
        });
        assert_eq!(report.outcome, ProofOutcome::Inconclusive);
        assert!(report.stats.path_limit_hit);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let config = ExplorationConfig {
            unwind: 0,
            ..ExplorationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ExplorationConfig {
            max_counterexamples: 0,
            ..ExplorationConfig::default()
        };
        assert_eq!(
            config.validate().map_err(|e| e.code),
            Err(uproof_error::codes::INVALID_CONFIG)
        );
    }

    #[test]
    fn violations_fail_even_without_kept_counterexamples() {
        let explorer = Explorer::new(ExplorationConfig {
            max_counterexamples: 0,
            ..ExplorationConfig::default()
        });
        let report = explorer.explore(&WriteCell {
            nullability: Nullability::MayFail,
        });
        assert_eq!(report.outcome, ProofOutcome::Failed);
        assert!(report.stats.violating_paths > 0);
        assert!(report.counterexamples.is_empty());
        assert_eq!(
            report.error().map(|e| e.code),
            Some(uproof_error::codes::VERIFICATION_FAILED)
        );
    }

    #[test]
    fn harness_fault_is_an_error_not_a_bound() {
        let report = Explorer::default().explore(&ScalarLoadOfPointer);
        assert_eq!(report.outcome, ProofOutcome::Error);
        assert_eq!(report.stats.faulted_paths, 1);
        assert_eq!(report.stats.bounded_paths, 0);
        let fault = report.fault.unwrap();
        assert_eq!(fault.code, uproof_error::codes::LAYOUT_MISMATCH);
        assert_eq!(report.error(), Some(fault));
        assert!(report.to_string().contains("fault on 1 paths"));
    }

    #[test]
    fn outcomes_map_to_error_codes() {
        let vacuous = Explorer::default().explore(&Unsatisfiable);
        assert_eq!(vacuous.error(), Some(Error::VACUOUS_PROOF));

        let bounded = Explorer::new(ExplorationConfig {
            max_paths: 1,
            ..ExplorationConfig::default()
        })
        .explore(&WriteCell {
            nullability: Nullability::NonNull,
        });
        assert_eq!(
            bounded.error().map(|e| e.code),
            Some(uproof_error::codes::EXPLORATION_BOUND_REACHED)
        );

        let verified = Explorer::default().explore(&WriteCell {
            nullability: Nullability::NonNull,
        });
        assert_eq!(verified.error(), None);
    }
}
