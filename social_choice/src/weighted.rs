use log::{debug, info};

use crate::config::*;
use crate::normalizer::{assemble_result, check};

/// Weighted-sum tally.
///
/// Each vote is worth the weighted mean of its contributions (multiplied for a jolly
/// vote). A candidate scores the mean of the votes it received; voters who did not rate
/// it are not counted as zeros. Candidates nobody rated come last.
pub fn weighted_ranking(election: &Election, rules: &EngineRules) -> VotingResult {
    let checked = check(election);
    info!(
        "weighted_ranking: {:?} votes over {:?} candidates",
        checked.votes.len(),
        checked.num_candidates()
    );

    let mut totals: Vec<(f64, u64)> = vec![(0.0, 0); checked.num_candidates()];
    for v in checked.votes.iter() {
        let mut value = checked.weighted_mean(v);
        if v.is_jolly {
            value *= rules.jolly_multiplier;
        }
        let e = &mut totals[v.candidate.0];
        e.0 += value;
        e.1 += 1;
    }

    let scores: Vec<Option<f64>> = totals
        .iter()
        .map(|(sum, count)| {
            if *count == 0 {
                None
            } else {
                Some(sum / *count as f64)
            }
        })
        .collect();
    debug!("weighted_ranking: scores: {:?}", scores);
    assemble_result(election, &scores, None)
}
