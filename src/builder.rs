use crate::config::*;
use crate::Election;

/// An incremental builder for assembling an election.
///
/// ```
/// use instant_runoff::Builder;
/// # use instant_runoff::VotingErrors;
///
/// let mut builder = Builder::new().candidates(&["Anna", "Bob"])?;
/// builder.add_ballot(&["Anna", "Bob"]);
/// builder.add_ballot(&["Bob"]);
///
/// let election = builder.build()?;
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    candidates: Vec<Candidate>,
    ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Registers the candidates, in the order that will be used for tally
    /// scans. Duplicate names are rejected.
    pub fn candidates(mut self, names: &[&str]) -> Result<Builder, VotingErrors> {
        for name in names {
            if self.candidates.iter().any(|c| c.name == *name) {
                return Err(VotingErrors::DuplicateCandidate(name.to_string()));
            }
            self.candidates.push(Candidate::new(*name));
        }
        Ok(self)
    }

    /// Adds one ballot, candidate names ordered from most preferred to least
    /// preferred. Unknown names are accepted and never counted.
    pub fn add_ballot(&mut self, ranks: &[&str]) {
        self.ballots.push(Ballot::new(ranks));
    }

    pub fn build(self) -> Result<Election, VotingErrors> {
        Election::new(&self.candidates, &self.ballots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_duplicate_names() {
        let res = Builder::new().candidates(&["Anna", "Bob", "Anna"]);
        assert!(matches!(
            res,
            Err(VotingErrors::DuplicateCandidate(name)) if name == "Anna"
        ));
    }

    #[test]
    fn builder_produces_a_runnable_election() {
        let mut builder = Builder::new().candidates(&["Anna", "Bob"]).unwrap();
        builder.add_ballot(&["Anna"]);
        builder.add_ballot(&["Anna", "Bob"]);
        builder.add_ballot(&["Bob"]);
        let result = builder.build().unwrap().get_winner(false).unwrap();
        assert_eq!(result.winner.unwrap().name, "Anna");
    }
}
