use log::{debug, info};

use crate::config::*;
use crate::normalizer::{assemble_result, check};

/// Borda count.
///
/// Every voter ranks the candidates they rated by weighted sum. The candidate at
/// position `k` of that ranking receives `(number of candidates - 1) - k` points; the
/// candidates the voter did not rate receive nothing from this voter.
pub fn borda_ranking(election: &Election, _rules: &EngineRules) -> VotingResult {
    let checked = check(election);
    let num_candidates = checked.num_candidates();
    let ballots = checked.ballots();
    info!(
        "borda_ranking: {:?} ballots over {:?} candidates",
        ballots.len(),
        num_candidates
    );

    let mut points: Vec<Option<u64>> = vec![None; num_candidates];
    for ballot in ballots.iter() {
        for (rank, cid) in ballot.iter().enumerate() {
            let p = (num_candidates - 1 - rank) as u64;
            *points[cid.0].get_or_insert(0) += p;
        }
    }
    debug!("borda_ranking: points: {:?}", points);

    let scores: Vec<Option<f64>> = points.iter().map(|p| p.map(|x| x as f64)).collect();
    assemble_result(election, &scores, None)
}
