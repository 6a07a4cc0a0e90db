use log::{debug, info};

use crate::config::*;
use crate::normalizer::{assemble_result, check, CandidateId};

/// Pairwise duel counts: `d[i][j]` is the number of ballots ranking `i` strictly before `j`.
///
/// A candidate on a ballot beats every candidate missing from it. Two candidates
/// both missing from a ballot do not duel on it.
fn duel_matrix(ballots: &[Vec<CandidateId>], num_candidates: usize) -> Vec<Vec<u64>> {
    let mut d = vec![vec![0u64; num_candidates]; num_candidates];
    for ballot in ballots.iter() {
        let mut on_ballot = vec![false; num_candidates];
        for cid in ballot.iter() {
            on_ballot[cid.0] = true;
        }
        for (pos, winner) in ballot.iter().enumerate() {
            for loser in ballot[pos + 1..].iter() {
                d[winner.0][loser.0] += 1;
            }
            for (loser, present) in on_ballot.iter().enumerate() {
                if !present {
                    d[winner.0][loser] += 1;
                }
            }
        }
    }
    d
}

/// Strongest beatpaths, by max-min closure over the pairwise victories.
///
/// The intermediate candidate `k` must be the outer loop.
fn strongest_paths(d: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let n = d.len();
    let mut p = vec![vec![0u64; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j && d[i][j] > d[j][i] {
                p[i][j] = d[i][j];
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            if i == k {
                continue;
            }
            for j in 0..n {
                if j == k || j == i {
                    continue;
                }
                let through_k = p[i][k].min(p[k][j]);
                if through_k > p[i][j] {
                    p[i][j] = through_k;
                }
            }
        }
    }
    p
}

/// Schulze (beatpath) method.
///
/// Candidates are ranked by their number of beatpath victories. The winners are all
/// the candidates tied at the top, which is the Schulze winner set. Below the top
/// this is a Copeland-style ordering of the beatpath relation, not a full Schulze
/// ranking.
///
/// A candidate whose weighted sum from a voter is negative is left off that voter's
/// ballot, as if it had not been rated.
pub fn schulze_ranking(election: &Election, _rules: &EngineRules) -> VotingResult {
    let checked = check(election);
    let n = checked.num_candidates();
    let ballots: Vec<Vec<CandidateId>> = checked
        .non_negative_ballots()
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();
    info!(
        "schulze_ranking: {:?} ballots over {:?} candidates",
        ballots.len(),
        n
    );
    debug!("schulze_ranking: ballots: {:?}", ballots);

    let d = duel_matrix(&ballots, n);
    debug!("schulze_ranking: duels: {:?}", d);
    let p = strongest_paths(&d);
    debug!("schulze_ranking: strongest paths: {:?}", p);

    let win_counts: Vec<u64> = (0..n)
        .map(|i| (0..n).filter(|&j| i != j && p[i][j] > p[j][i]).count() as u64)
        .collect();

    let candidate_ids: Vec<String> = election.candidates.iter().map(|c| c.id.clone()).collect();
    let (scores, winners): (Vec<Option<f64>>, Vec<String>) = if ballots.is_empty() {
        (vec![None; n], Vec::new())
    } else {
        let top = win_counts.iter().cloned().max().unwrap_or(0);
        (
            win_counts.iter().map(|w| Some(*w as f64)).collect(),
            win_counts
                .iter()
                .zip(candidate_ids.iter())
                .filter(|(w, _)| **w == top)
                .map(|(_, cid)| cid.clone())
                .collect(),
        )
    };
    info!("schulze_ranking: winners: {:?}", winners);

    let details = SchulzeDetails {
        candidates: candidate_ids,
        matrix: d,
        strongest_paths: p,
        winners,
    };
    assemble_result(election, &scores, Some(details))
}
