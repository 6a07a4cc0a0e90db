pub use crate::config::*;

use std::collections::{BTreeMap, HashSet};

/// A builder for assembling an election snapshot.
///
/// ```
/// pub use social_choice::builder::Builder;
/// pub use social_choice::Factor;
/// # use social_choice::VotingErrors;
///
/// let mut builder = Builder::new(10.0)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?
///     .factors(&[Factor::neutral("taste")]);
///
/// builder.add_vote_simple("carla", "Anna", &[("taste", 8.0)])?;
/// builder.add_vote_simple("carla", "Bob", &[("taste", 3.0)])?;
///
/// let election = builder.build();
/// assert_eq!(election.participants.len(), 1);
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _max_scale: f64,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _factors: Vec<Factor>,
    pub(crate) _votes: Vec<VoteRecord>,
    pub(crate) _participants: Vec<Participant>,
    _seen_votes: HashSet<(String, String)>,
}

impl Builder {
    pub fn new(max_scale: f64) -> Result<Builder, VotingErrors> {
        if !max_scale.is_finite() || max_scale <= 0.0 {
            return Err(VotingErrors::InvalidScale(max_scale));
        }
        Ok(Builder {
            _max_scale: max_scale,
            _candidates: Vec::new(),
            _factors: Vec::new(),
            _votes: Vec::new(),
            _participants: Vec::new(),
            _seen_votes: HashSet::new(),
        })
    }

    /// Declares candidates by name. The name doubles as the candidate id.
    pub fn candidates(mut self, names: &[String]) -> Result<Builder, VotingErrors> {
        for name in names {
            self.add_candidate(Candidate::new(name, name))?;
        }
        Ok(self)
    }

    pub fn factors(mut self, factors: &[Factor]) -> Builder {
        self._factors.extend(factors.iter().cloned());
        self
    }

    pub fn add_candidate(&mut self, candidate: Candidate) -> Result<(), VotingErrors> {
        if self._candidates.iter().any(|c| c.id == candidate.id) {
            return Err(VotingErrors::DuplicateCandidate(candidate.id));
        }
        self._candidates.push(candidate);
        Ok(())
    }

    /// Declares participants as they are known to the session.
    pub fn participants(mut self, participants: &[Participant]) -> Builder {
        self._participants.extend(participants.iter().cloned());
        self
    }

    pub fn add_participant(&mut self, user_id: &str, nickname: &str) {
        self._participants.push(Participant {
            user_id: user_id.to_string(),
            nickname: nickname.to_string(),
            has_voted: false,
        });
    }

    /// Adds the scores of one voter for one candidate.
    ///
    /// It is the simplest use case for most cases.
    pub fn add_vote_simple(
        &mut self,
        voter: &str,
        candidate: &str,
        scores: &[(&str, f64)],
    ) -> Result<(), VotingErrors> {
        self.add_vote(&VoteRecord {
            voter_id: voter.to_string(),
            candidate_id: candidate.to_string(),
            scores: scores
                .iter()
                .map(|(factor, score)| (factor.to_string(), *score))
                .collect::<BTreeMap<String, f64>>(),
            is_jolly: false,
        })
    }

    /// Adds a vote record. Each voter may rate each declared candidate at most once.
    pub fn add_vote(&mut self, vote: &VoteRecord) -> Result<(), VotingErrors> {
        if !self._candidates.iter().any(|c| c.id == vote.candidate_id) {
            return Err(VotingErrors::UnknownCandidate(vote.candidate_id.clone()));
        }
        let key = (vote.voter_id.clone(), vote.candidate_id.clone());
        if !self._seen_votes.insert(key) {
            return Err(VotingErrors::DuplicateVote {
                voter: vote.voter_id.clone(),
                candidate: vote.candidate_id.clone(),
            });
        }
        self._votes.push(vote.clone());
        Ok(())
    }

    /// Finalizes the snapshot.
    ///
    /// Voters that were not declared as participants are appended as participants,
    /// in order of first vote, with their id as nickname. A participant with at least
    /// one vote is marked as having voted.
    pub fn build(self) -> Election {
        let mut participants = self._participants;
        for v in self._votes.iter() {
            if !participants.iter().any(|p| p.user_id == v.voter_id) {
                participants.push(Participant {
                    user_id: v.voter_id.clone(),
                    nickname: v.voter_id.clone(),
                    has_voted: true,
                });
            }
        }
        for p in participants.iter_mut() {
            p.has_voted = p.has_voted || self._votes.iter().any(|v| v.voter_id == p.user_id);
        }
        Election {
            max_scale: self._max_scale,
            candidates: self._candidates,
            factors: self._factors,
            votes: self._votes,
            participants,
        }
    }
}
