// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A candidate running in the election.
///
/// Candidates are value types keyed by name: two `Candidate` instances with
/// the same name refer to the same entity. Names must be unique within one
/// election; duplicates are rejected at construction time.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Candidate {
        Candidate { name: name.into() }
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single voter's ballot: candidate names ordered from most preferred
/// (index 0) to least preferred.
///
/// Names that do not match a registered candidate are tolerated and simply
/// never counted. Duplicate names within one ballot are permitted; whether
/// that is meaningful is the caller's responsibility.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    pub ranks: Vec<String>,
}

impl Ballot {
    pub fn new(ranks: &[&str]) -> Ballot {
        Ballot {
            ranks: ranks.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ******** Output data structures *********

/// Statistics for one elimination round.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundStats {
    pub round: u32,
    /// Count of first-preference votes for every candidate still active this
    /// round, in registration order. Zero counts are included.
    pub tally: Vec<(String, u64)>,
    /// Number of ballots still contributing a vote this round.
    pub valid_ballots: u64,
    /// The candidate eliminated at the end of this round, if the round did
    /// not terminate the election.
    pub eliminated: Option<String>,
}

/// The outcome of a tabulation.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionResult {
    /// The winning candidate, or `None` when the election cannot produce a
    /// winner (no candidates, or no ballots at all).
    pub winner: Option<Candidate>,
    pub round_stats: Vec<RoundStats>,
}

/// Errors that prevent the tabulation from completing.
///
/// An election without a winner is not an error; see
/// [`ElectionResult::winner`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// Two candidates were registered under the same name.
    DuplicateCandidate(String),
    /// The elimination step could not select a candidate while more than one
    /// candidate remained and valid ballots existed. This signals a logic
    /// bug in the engine, not a user error.
    InvariantViolation(String),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "duplicate candidate name: {}", name)
            }
            VotingErrors::InvariantViolation(msg) => {
                write!(f, "invariant violation: {}", msg)
            }
        }
    }
}
