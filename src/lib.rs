//! Single-winner instant-runoff (ranked-choice) tabulation.
//!
//! Ballots rank candidates in order of preference. Each round, the first
//! active preference of every valid ballot is tallied; a candidate with a
//! strict majority of the valid ballots wins outright, otherwise the
//! candidate with the fewest votes is eliminated and the ballots are
//! re-examined. Ties for elimination are resolved deterministically by
//! comparing support at deeper preference levels (see [`manual`]).
//!
//! ```
//! use instant_runoff::{Ballot, Candidate, Election};
//!
//! let election = Election::new(
//!     &[Candidate::new("Alice"), Candidate::new("Bob")],
//!     &[
//!         Ballot::new(&["Alice"]),
//!         Ballot::new(&["Alice", "Bob"]),
//!         Ballot::new(&["Bob"]),
//!     ],
//! )?;
//! let result = election.get_winner(false)?;
//! assert_eq!(result.winner.unwrap().name, "Alice");
//! # Ok::<(), instant_runoff::VotingErrors>(())
//! ```

mod builder;
mod config;
pub mod manual;

use log::{debug, info};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub use crate::builder::Builder;
pub use crate::config::*;

// **** Private structures ****

type RoundId = u32;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

/// The per-run state of one ballot: the interned preference list and a
/// cursor pointing at the current effective head.
///
/// The rank vector is never modified; eliminations only advance the cursor.
/// This keeps every past round auditable from the final ballot states.
#[derive(Eq, PartialEq, Debug, Clone)]
struct BallotState {
    ranks: Vec<CandidateId>,
    cursor: usize,
}

impl BallotState {
    fn new(ranks: Vec<CandidateId>) -> BallotState {
        BallotState { ranks, cursor: 0 }
    }

    /// A ballot is valid as long as the cursor points at a rank.
    fn is_valid(&self) -> bool {
        self.cursor < self.ranks.len()
    }

    /// The current effective head, if the ballot is still valid.
    fn head(&self) -> Option<CandidateId> {
        self.ranks.get(self.cursor).copied()
    }

    /// Advances the cursor until the head is an active candidate or the
    /// ballot is exhausted. Idempotent for a given active set.
    fn shift(&mut self, active: &HashSet<CandidateId>) {
        while let Some(cid) = self.ranks.get(self.cursor) {
            if active.contains(cid) {
                return;
            }
            self.cursor += 1;
        }
    }

    /// The 1-based `level`-th rank counted from the current effective head.
    /// Level 1 is the head itself.
    fn rank_at_level(&self, level: usize) -> Option<CandidateId> {
        if !self.is_valid() {
            return None;
        }
        self.ranks.get(self.cursor + level - 1).copied()
    }

    /// Number of ranks remaining from the effective head onwards.
    fn depth(&self) -> usize {
        self.ranks.len().saturating_sub(self.cursor)
    }
}

/// Diagnostics go to the info log when verbose, to the debug log otherwise.
/// The flag never affects the tabulation itself.
macro_rules! diag {
    ($verbose:expr, $($arg:tt)*) => {
        if $verbose {
            info!($($arg)*)
        } else {
            debug!($($arg)*)
        }
    };
}

/// A single-seat instant-runoff election: the registered candidates and the
/// ballots cast.
///
/// Construction interns candidate names and rejects duplicates. A ballot
/// entry that names no registered candidate is silently skipped and never
/// counted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    // Registration order; the index is the candidate id. This order drives
    // the tally scan, which makes tie detection deterministic.
    candidates: Vec<Candidate>,
    ballots: Vec<BallotState>,
}

impl Election {
    pub fn new(candidates: &[Candidate], ballots: &[Ballot]) -> Result<Election, VotingErrors> {
        let mut index: HashMap<&str, CandidateId> = HashMap::new();
        for (idx, c) in candidates.iter().enumerate() {
            let cid = CandidateId(idx as u32);
            if index.insert(c.name.as_str(), cid).is_some() {
                return Err(VotingErrors::DuplicateCandidate(c.name.clone()));
            }
        }

        let interned: Vec<BallotState> = ballots
            .iter()
            .map(|b| {
                let ranks: Vec<CandidateId> = b
                    .ranks
                    .iter()
                    .filter_map(|name| index.get(name.as_str()).copied())
                    .collect();
                BallotState::new(ranks)
            })
            .collect();

        Ok(Election {
            candidates: candidates.to_vec(),
            ballots: interned,
        })
    }

    /// Runs the tabulation and returns the winner together with the
    /// per-round statistics.
    ///
    /// `verbose` raises the per-round diagnostics (starting candidate set,
    /// tally, elimination) to the info log level. It has no effect on the
    /// result.
    ///
    /// An election with no candidates or no ballots yields a result with no
    /// winner. [`VotingErrors::InvariantViolation`] signals a bug in the
    /// elimination logic and aborts the run.
    pub fn get_winner(&self, verbose: bool) -> Result<ElectionResult, VotingErrors> {
        if self.candidates.is_empty() || self.ballots.is_empty() {
            diag!(verbose, "no candidates or no ballots, no winner possible");
            return Ok(ElectionResult {
                winner: None,
                round_stats: Vec::new(),
            });
        }

        diag!(
            verbose,
            "beginning election with candidates: {:?}",
            self.candidates
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
        );

        // The run works on copies so that the election can be re-tabulated.
        let mut active: Vec<CandidateId> = (0..self.candidates.len())
            .map(|idx| CandidateId(idx as u32))
            .collect();
        let mut ballots: Vec<BallotState> = self.ballots.clone();
        let mut round_stats: Vec<RoundStats> = Vec::new();

        while active.len() > 1 {
            let round_id = round_stats.len() as RoundId + 1;
            let active_set: HashSet<CandidateId> = active.iter().copied().collect();

            // Shift phase: every ballot advances to its most-preferred
            // candidate that is still active.
            for ballot in ballots.iter_mut() {
                ballot.shift(&active_set);
            }

            let tally = tally_at_level(&ballots, &active, 1);
            let valid_count = ballots.iter().filter(|b| b.is_valid()).count() as u64;

            diag!(
                verbose,
                "round {}: {} valid ballots, tally: {:?}",
                round_id,
                valid_count,
                self.named_tally(&tally, &active)
            );

            // Single pass in registration order: majority check and running
            // minimum. The scan order fixes which tied candidate plays the
            // provisional role in a tie-break.
            let mut provisional: Option<CandidateId> = None;
            let mut least: u64 = u64::MAX;
            for &cid in active.iter() {
                let count = tally[&cid];
                if 2 * count > valid_count {
                    diag!(
                        verbose,
                        "round {}: {} has a majority ({}/{}), elected",
                        round_id,
                        self.name_of(cid),
                        count,
                        valid_count
                    );
                    round_stats.push(RoundStats {
                        round: round_id,
                        tally: self.named_tally(&tally, &active),
                        valid_ballots: valid_count,
                        eliminated: None,
                    });
                    return Ok(ElectionResult {
                        winner: Some(self.candidates[cid.0 as usize].clone()),
                        round_stats,
                    });
                }
                match count.cmp(&least) {
                    Ordering::Less => {
                        least = count;
                        provisional = Some(cid);
                    }
                    Ordering::Equal => {
                        // Equal minimum: the tie-break decides whether the
                        // provisional candidate or the challenger remains
                        // the elimination target.
                        let current = provisional.ok_or_else(|| {
                            VotingErrors::InvariantViolation(
                                "tie detected with no provisional candidate".to_string(),
                            )
                        })?;
                        provisional = Some(resolve_tie(current, cid, &ballots));
                    }
                    Ordering::Greater => {}
                }
            }

            let eliminated = provisional.ok_or_else(|| {
                VotingErrors::InvariantViolation(format!(
                    "no elimination candidate in round {} with {} candidates and {} valid ballots",
                    round_id,
                    active.len(),
                    valid_count
                ))
            })?;

            diag!(
                verbose,
                "round {}: eliminated {}",
                round_id,
                self.name_of(eliminated)
            );
            round_stats.push(RoundStats {
                round: round_id,
                tally: self.named_tally(&tally, &active),
                valid_ballots: valid_count,
                eliminated: Some(self.name_of(eliminated).to_string()),
            });
            active.retain(|&cid| cid != eliminated);
        }

        // A single remaining candidate wins by elimination, even if every
        // ballot has been exhausted by now.
        let winner = self.candidates[active[0].0 as usize].clone();
        diag!(verbose, "sole remaining candidate: {}", winner.name);
        Ok(ElectionResult {
            winner: Some(winner),
            round_stats,
        })
    }

    fn name_of(&self, cid: CandidateId) -> &str {
        self.candidates[cid.0 as usize].name.as_str()
    }

    fn named_tally(
        &self,
        tally: &HashMap<CandidateId, u64>,
        active: &[CandidateId],
    ) -> Vec<(String, u64)> {
        active
            .iter()
            .map(|&cid| (self.name_of(cid).to_string(), tally[&cid]))
            .collect()
    }
}

/// Counts, for every active candidate, the ballots whose `level`-th effective
/// rank is that candidate. Level 1 is the current effective head.
///
/// The mapping is total over the active set: candidates without a single
/// matching ballot are present with a count of zero. Exhausted ballots and
/// rank entries outside the active set contribute nothing.
fn tally_at_level(
    ballots: &[BallotState],
    active: &[CandidateId],
    level: usize,
) -> HashMap<CandidateId, u64> {
    let mut tally: HashMap<CandidateId, u64> = active.iter().map(|&cid| (cid, 0)).collect();
    for ballot in ballots.iter() {
        if !ballot.is_valid() {
            continue;
        }
        if let Some(cid) = ballot.rank_at_level(level) {
            if let Some(count) = tally.get_mut(&cid) {
                *count += 1;
            }
        }
    }
    tally
}

/// Decides which of two candidates tied for fewest first-preference votes is
/// eliminated, by descending through deeper preference levels.
///
/// At each level the comparison is a cross-tally: the support for `a` among
/// the ballots currently headed by `b`, against the support for `b` among
/// the ballots currently headed by `a`. The candidate with the smaller
/// cross-support is eliminated; equal counts descend one level further. The
/// asymmetry is deliberate (see [`crate::manual`]).
///
/// When no ballot in either support pool ranks deep enough to separate the
/// pair, the first-named candidate `a` (the provisional elimination target)
/// is eliminated. The outcome is fully determined by `(a, b)` and the
/// ballots.
fn resolve_tie(a: CandidateId, b: CandidateId, ballots: &[BallotState]) -> CandidateId {
    let subset_a: Vec<&BallotState> = ballots.iter().filter(|bs| bs.head() == Some(a)).collect();
    let subset_b: Vec<&BallotState> = ballots.iter().filter(|bs| bs.head() == Some(b)).collect();

    let mut level: usize = 2;
    loop {
        let deep_enough = subset_a
            .iter()
            .chain(subset_b.iter())
            .any(|bs| bs.depth() >= level);
        if !deep_enough {
            return a;
        }

        let count_a = subset_b
            .iter()
            .filter(|bs| bs.rank_at_level(level) == Some(a))
            .count();
        let count_b = subset_a
            .iter()
            .filter(|bs| bs.rank_at_level(level) == Some(b))
            .count();
        debug!(
            "resolve_tie: level {}: cross-support {:?}={} {:?}={}",
            level, a, count_a, b, count_b
        );
        match count_a.cmp(&count_b) {
            Ordering::Less => return a,
            Ordering::Greater => return b,
            Ordering::Equal => level += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(x: u32) -> CandidateId {
        CandidateId(x)
    }

    fn ballot(ranks: &[u32]) -> BallotState {
        BallotState::new(ranks.iter().map(|&x| CandidateId(x)).collect())
    }

    #[test]
    fn shift_advances_past_eliminated_candidates() {
        let active: HashSet<CandidateId> = [cid(2)].into_iter().collect();
        let mut bs = ballot(&[0, 1, 2]);
        bs.shift(&active);
        assert_eq!(bs.head(), Some(cid(2)));
        assert!(bs.is_valid());

        // Idempotent: a second shift with the same active set is a no-op.
        let snapshot = bs.clone();
        bs.shift(&active);
        assert_eq!(bs, snapshot);
    }

    #[test]
    fn shift_exhausts_ballot_with_no_active_candidate() {
        let active: HashSet<CandidateId> = [cid(9)].into_iter().collect();
        let mut bs = ballot(&[0, 1]);
        bs.shift(&active);
        assert!(!bs.is_valid());
        assert_eq!(bs.head(), None);
        assert_eq!(bs.rank_at_level(1), None);
    }

    #[test]
    fn tally_is_total_over_the_active_set() {
        let ballots = vec![ballot(&[0]), ballot(&[0]), ballot(&[1])];
        let active = vec![cid(0), cid(1), cid(2)];
        let tally = tally_at_level(&ballots, &active, 1);
        assert_eq!(tally[&cid(0)], 2);
        assert_eq!(tally[&cid(1)], 1);
        assert_eq!(tally[&cid(2)], 0);
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn tally_skips_inactive_rank_entries() {
        // Candidate 7 is not active: its votes count for no one.
        let ballots = vec![ballot(&[7]), ballot(&[1])];
        let active = vec![cid(0), cid(1)];
        let tally = tally_at_level(&ballots, &active, 1);
        assert_eq!(tally[&cid(0)], 0);
        assert_eq!(tally[&cid(1)], 1);
    }

    #[test]
    fn resolve_tie_prefers_deeper_cross_support() {
        // b's supporters rank a second; a's supporters never rank b.
        // a has the larger cross-support, so b is eliminated.
        let ballots = vec![ballot(&[0]), ballot(&[1, 0])];
        assert_eq!(resolve_tie(cid(0), cid(1), &ballots), cid(1));
        // With the roles reversed, a is eliminated.
        let ballots = vec![ballot(&[0, 1]), ballot(&[1])];
        assert_eq!(resolve_tie(cid(0), cid(1), &ballots), cid(0));
    }

    #[test]
    fn resolve_tie_descends_until_counts_differ() {
        // Level 2 cross-support is 1 for both; level 3 separates the pair.
        let ballots = vec![ballot(&[0, 1, 1]), ballot(&[1, 0])];
        // At level 3, 0's cross-support is 0 and 1's is 1: 0 is eliminated.
        assert_eq!(resolve_tie(cid(0), cid(1), &ballots), cid(0));
    }

    #[test]
    fn resolve_tie_falls_back_to_the_provisional_candidate() {
        // No ballot ranks past the first preference: the pair cannot be
        // separated and the first-named candidate is eliminated.
        let ballots = vec![ballot(&[0]), ballot(&[1])];
        assert_eq!(resolve_tie(cid(0), cid(1), &ballots), cid(0));
        assert_eq!(resolve_tie(cid(1), cid(0), &ballots), cid(1));
    }

    #[test]
    fn duplicate_candidate_names_are_rejected() {
        let res = Election::new(
            &[Candidate::new("Anna"), Candidate::new("Anna")],
            &[Ballot::new(&["Anna"])],
        );
        assert_eq!(
            res.err(),
            Some(VotingErrors::DuplicateCandidate("Anna".to_string()))
        );
    }

    #[test]
    fn unknown_ballot_entries_are_never_counted() {
        let election = Election::new(
            &[Candidate::new("Anna"), Candidate::new("Bob")],
            &[
                Ballot::new(&["Zoe", "Bob"]),
                Ballot::new(&["Anna"]),
                Ballot::new(&["Anna"]),
            ],
        )
        .unwrap();
        let result = election.get_winner(false).unwrap();
        // The vote for Zoe transfers to Bob, Anna still has the majority.
        assert_eq!(result.winner.unwrap().name, "Anna");
        assert_eq!(result.round_stats[0].tally, vec![
            ("Anna".to_string(), 2),
            ("Bob".to_string(), 1),
        ]);
    }
}
