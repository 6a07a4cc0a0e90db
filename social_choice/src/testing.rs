// Fixtures shared by the unit tests.

use crate::builder::Builder;
use crate::config::*;

pub(crate) const SCORE: &str = "score";

/// One ballot per entry: voter `v{idx}` scores the listed candidates in decreasing order,
/// leaving the others unrated.
pub(crate) fn ranked_election(candidates: &[&str], ballots: &[&[&str]]) -> Election {
    let names: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
    let mut b = Builder::new(10.0)
        .unwrap()
        .candidates(&names)
        .unwrap()
        .factors(&[Factor::neutral(SCORE)]);
    for (idx, ballot) in ballots.iter().enumerate() {
        let voter = format!("v{}", idx + 1);
        for (pos, cand) in ballot.iter().enumerate() {
            let score = (ballot.len() - pos) as f64;
            b.add_vote_simple(&voter, cand, &[(SCORE, score)]).unwrap();
        }
    }
    b.build()
}

pub(crate) fn ranking_ids(res: &VotingResult) -> Vec<&str> {
    res.ranking.iter().map(|c| c.id.as_str()).collect()
}

pub(crate) fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
