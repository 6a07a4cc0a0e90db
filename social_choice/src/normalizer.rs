use log::{debug, warn};

use std::collections::{HashMap, HashSet};

use crate::config::*;

// **** Private structures ****

/// Position of a candidate in the input candidate list.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub(crate) struct CandidateId(pub(crate) usize);

/// Position of a voter in order of first appearance in the vote records.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub(crate) struct VoterId(pub(crate) usize);

/// A vote record that refers to a known candidate, with its scores resolved.
#[derive(PartialEq, Debug, Clone)]
pub(crate) struct CheckedVote {
    pub(crate) voter: VoterId,
    pub(crate) candidate: CandidateId,
    /// Sum of the trend-adjusted, weight-scaled contributions over all factors.
    pub(crate) weighted_sum: f64,
    pub(crate) is_jolly: bool,
    /// The raw scores the voter actually gave, in factor order.
    pub(crate) given_scores: Vec<f64>,
}

pub(crate) struct CheckedElection<'a> {
    pub(crate) election: &'a Election,
    pub(crate) voters: Vec<String>,
    pub(crate) votes: Vec<CheckedVote>,
    pub(crate) total_abs_weight: f64,
}

impl<'a> CheckedElection<'a> {
    pub(crate) fn num_candidates(&self) -> usize {
        self.election.candidates.len()
    }

    /// The weighted mean of the contributions of one vote.
    pub(crate) fn weighted_mean(&self, vote: &CheckedVote) -> f64 {
        if self.total_abs_weight == 0.0 {
            0.0
        } else {
            vote.weighted_sum / self.total_abs_weight
        }
    }

    /// `grid[voter][candidate]`: the weighted sum this voter gave, if any.
    pub(crate) fn score_grid(&self) -> Vec<Vec<Option<f64>>> {
        let mut grid = vec![vec![None; self.num_candidates()]; self.voters.len()];
        for v in self.votes.iter() {
            grid[v.voter.0][v.candidate.0] = Some(v.weighted_sum);
        }
        grid
    }

    /// One ranked ballot per voter, best first. Unrated candidates are left out.
    pub(crate) fn ballots(&self) -> Vec<Vec<CandidateId>> {
        self.score_grid()
            .iter()
            .map(|scores| ranked_ballot(scores))
            .collect()
    }

    /// Same as `ballots`, without the candidates whose weighted sum is negative.
    pub(crate) fn non_negative_ballots(&self) -> Vec<Vec<CandidateId>> {
        self.score_grid()
            .iter()
            .map(|scores| {
                let kept: Vec<Option<f64>> =
                    scores.iter().map(|s| s.filter(|x| *x >= 0.0)).collect();
                ranked_ballot(&kept)
            })
            .collect()
    }
}

/// Contribution of one raw score: inverted for lower-is-better factors, then scaled by the weight.
pub(crate) fn contribution(raw: f64, factor: &Factor, max_scale: f64) -> f64 {
    let oriented = match factor.trend {
        Trend::HigherBetter => raw,
        Trend::LowerBetter => max_scale - raw,
    };
    oriented * factor.weight
}

fn clamp_score(raw: f64, max_scale: f64) -> f64 {
    // NaN collapses to 0 here.
    let clamped = raw.max(0.0).min(max_scale.max(0.0));
    if clamped != raw {
        debug!("clamp_score: {:?} -> {:?} (max scale {:?})", raw, clamped, max_scale);
    }
    clamped
}

/// The raw value used for a factor: the voter's score, the candidate's static value
/// for constant factors, or 0.
fn resolve_raw(vote: &VoteRecord, candidate: &Candidate, factor: &Factor, max_scale: f64) -> f64 {
    let given = vote.scores.get(&factor.id);
    let value = match (given, factor.kind) {
        (Some(v), _) => Some(*v),
        (None, FactorKind::Constant) => candidate.static_values.get(&factor.id).cloned(),
        (None, FactorKind::Numerical) => None,
    };
    value.map(|v| clamp_score(v, max_scale)).unwrap_or(0.0)
}

/// Sorts the rated candidates by decreasing score. Ties keep the candidate order.
pub(crate) fn ranked_ballot(scores: &[Option<f64>]) -> Vec<CandidateId> {
    let mut rated: Vec<(CandidateId, f64)> = scores
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| s.map(|x| (CandidateId(idx), x)))
        .collect();
    rated.sort_by(|a, b| b.1.total_cmp(&a.1));
    rated.into_iter().map(|(cid, _)| cid).collect()
}

/// Builds a result from one optional score per candidate.
///
/// Scored candidates come first by decreasing score, then the unscored ones,
/// ties in both groups keeping the candidate order.
pub(crate) fn assemble_result(
    election: &Election,
    scores: &[Option<f64>],
    details: Option<SchulzeDetails>,
) -> VotingResult {
    let mut order: Vec<usize> = (0..election.candidates.len()).collect();
    order.sort_by(|&a, &b| match (scores[a], scores[b]) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    VotingResult {
        ranking: order
            .iter()
            .map(|idx| election.candidates[*idx].clone())
            .collect(),
        scores: election
            .candidates
            .iter()
            .zip(scores.iter())
            .filter_map(|(c, s)| s.map(|x| (c.id.clone(), x)))
            .collect(),
        details,
    }
}

// Votes are returned in input order.
pub(crate) fn check(election: &Election) -> CheckedElection<'_> {
    let mut candidate_ids: HashMap<&str, CandidateId> = HashMap::new();
    for (idx, c) in election.candidates.iter().enumerate() {
        candidate_ids.entry(c.id.as_str()).or_insert(CandidateId(idx));
    }

    let mut voters: Vec<String> = Vec::new();
    let mut voter_ids: HashMap<&str, VoterId> = HashMap::new();
    let mut seen: HashSet<(VoterId, CandidateId)> = HashSet::new();
    let mut votes: Vec<CheckedVote> = Vec::new();

    for v in election.votes.iter() {
        let cid = match candidate_ids.get(v.candidate_id.as_str()) {
            Some(cid) => *cid,
            None => {
                warn!(
                    "check: dropping vote of {:?} for unknown candidate {:?}",
                    v.voter_id, v.candidate_id
                );
                continue;
            }
        };
        let vid = *voter_ids.entry(v.voter_id.as_str()).or_insert_with(|| {
            voters.push(v.voter_id.clone());
            VoterId(voters.len() - 1)
        });
        if !seen.insert((vid, cid)) {
            warn!(
                "check: dropping duplicate vote of {:?} for candidate {:?}",
                v.voter_id, v.candidate_id
            );
            continue;
        }

        let candidate = &election.candidates[cid.0];
        let mut weighted_sum = 0.0;
        let mut given_scores: Vec<f64> = Vec::new();
        for f in election.factors.iter() {
            let raw = resolve_raw(v, candidate, f, election.max_scale);
            weighted_sum += contribution(raw, f, election.max_scale);
            if v.scores.contains_key(&f.id) {
                given_scores.push(raw);
            }
        }
        votes.push(CheckedVote {
            voter: vid,
            candidate: cid,
            weighted_sum,
            is_jolly: v.is_jolly,
            given_scores,
        });
    }

    let total_abs_weight: f64 = election.factors.iter().map(|f| f.weight.abs()).sum();
    debug!(
        "check: {:?} checked votes from {:?} voters, total weight {:?}",
        votes.len(),
        voters.len(),
        total_abs_weight
    );
    CheckedElection {
        election,
        voters,
        votes,
        total_abs_weight,
    }
}
