use log::{debug, info};

use std::collections::{HashMap, HashSet};

use crate::config::*;
use crate::normalizer::{check, CandidateId, CheckedElection};
use crate::stats;

// Rating behavior of one participant, before it is exposed as a VoterProfile.
#[derive(PartialEq, Debug, Clone)]
struct RaterStats {
    participant: usize,
    num_scores: usize,
    mean: f64,
    stddev: f64,
    // The candidate with the highest sum of raw scores, the first one in candidate order on ties.
    favorite: Option<CandidateId>,
}

// Participants who gave at least one score, in participant order.
fn rater_stats(election: &Election, checked: &CheckedElection) -> Vec<RaterStats> {
    let mut by_voter: HashMap<&str, (Vec<f64>, Option<(CandidateId, f64)>)> = HashMap::new();
    for v in checked.votes.iter() {
        let e = by_voter
            .entry(checked.voters[v.voter.0].as_str())
            .or_insert((Vec::new(), None));
        e.0.extend(v.given_scores.iter().cloned());
        let total: f64 = v.given_scores.iter().sum();
        let better = match e.1 {
            None => true,
            Some((cid, best)) => total > best || (total == best && v.candidate < cid),
        };
        if better {
            e.1 = Some((v.candidate, total));
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<RaterStats> = Vec::new();
    for (idx, p) in election.participants.iter().enumerate() {
        if !seen.insert(p.user_id.as_str()) {
            continue;
        }
        if let Some((scores, favorite)) = by_voter.get(p.user_id.as_str()) {
            if scores.is_empty() {
                debug!("rater_stats: {:?} voted without giving any score", p.user_id);
                continue;
            }
            let mean = stats::mean(scores);
            res.push(RaterStats {
                participant: idx,
                num_scores: scores.len(),
                mean,
                stddev: stats::stddev(scores, Some(mean)),
                favorite: favorite.map(|(cid, _)| cid),
            });
        }
    }
    debug!("rater_stats: {:?}", res);
    res
}

// Index of the first extremal element: `better(a, b)` tells if `a` strictly beats `b`.
fn first_extreme<'a>(
    all: &'a [RaterStats],
    key: impl Fn(&RaterStats) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<&'a RaterStats> {
    let mut res: Option<&'a RaterStats> = None;
    for s in all.iter() {
        let replace = match res {
            Some(cur) => better(key(s), key(cur)),
            None => true,
        };
        if replace {
            res = Some(s);
        }
    }
    res
}

/// Rating statistics of every participant who gave at least one score, in participant order.
pub fn voter_profiles(election: &Election) -> Vec<VoterProfile> {
    let checked = check(election);
    let all = rater_stats(election, &checked);
    let means: Vec<f64> = all.iter().map(|s| s.mean).collect();
    let group_mean = stats::mean(&means);
    let group_stddev = stats::stddev(&means, Some(group_mean));
    all.iter()
        .map(|s| {
            let p = &election.participants[s.participant];
            let z = stats::z_score(s.mean, group_mean, group_stddev);
            VoterProfile {
                participant_id: p.user_id.clone(),
                nickname: p.nickname.clone(),
                num_scores: s.num_scores,
                mean: s.mean,
                stddev: s.stddev,
                z_score: z,
                display_score: stats::normalize_z(z),
            }
        })
        .collect()
}

/// Assigns the behavior badges.
///
/// `schulze` is the Schulze result for the same election: its first ranked candidate
/// decides who is an oracle. Only participants who gave at least one score take part,
/// and nothing is assigned when fewer than `rules.min_badge_participants` of them did.
pub fn assign_badges(
    election: &Election,
    schulze: &VotingResult,
    rules: &EngineRules,
) -> BadgeAssignment {
    let mut res = BadgeAssignment::new();
    let checked = check(election);
    let all = rater_stats(election, &checked);
    if all.is_empty() || all.len() < rules.min_badge_participants {
        debug!(
            "assign_badges: {:?} voting participants, {:?} required",
            all.len(),
            rules.min_badge_participants
        );
        return res;
    }

    let mut give = |s: &RaterStats, tag: BadgeTag| {
        let id = election.participants[s.participant].user_id.clone();
        res.entry(id).or_default().insert(tag);
    };

    if let Some(s) = first_extreme(&all, |s| s.mean, |a, b| a < b) {
        give(s, BadgeTag::Hater);
    }
    if let Some(s) = first_extreme(&all, |s| s.mean, |a, b| a > b) {
        give(s, BadgeTag::Lover);
    }
    if let Some(s) = first_extreme(&all, |s| s.stddev, |a, b| a < b) {
        give(s, BadgeTag::HiveMind);
    }
    if let Some(s) = first_extreme(&all, |s| s.stddev, |a, b| a > b) {
        if s.stddev > rules.contrarian_threshold {
            give(s, BadgeTag::Contrarian);
        }
    }

    if let Some(winner) = schulze.ranking.first() {
        for s in all.iter() {
            let favorite = s.favorite.map(|cid| &election.candidates[cid.0]);
            if favorite.map(|c| c.id == winner.id).unwrap_or(false) {
                give(s, BadgeTag::Oracle);
            }
        }
    }

    info!("assign_badges: {:?}", res);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::schulze::schulze_ranking;
    use crate::testing::*;
    use std::collections::BTreeSet;

    const EPS: f64 = 1e-9;

    // Each voter gives one score per candidate, in candidate order.
    fn scored_election(candidates: &[&str], voters: &[(&str, &[f64])]) -> Election {
        let names: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
        let mut b = Builder::new(10.0)
            .unwrap()
            .candidates(&names)
            .unwrap()
            .factors(&[Factor::neutral(SCORE)]);
        for (voter, scores) in voters.iter() {
            for (cand, score) in candidates.iter().zip(scores.iter()) {
                b.add_vote_simple(voter, cand, &[(SCORE, *score)]).unwrap();
            }
        }
        b.build()
    }

    fn badges_of(election: &Election) -> BadgeAssignment {
        init_logs();
        let schulze = schulze_ranking(election, &EngineRules::DEFAULT_RULES);
        assign_badges(election, &schulze, &EngineRules::DEFAULT_RULES)
    }

    fn tags(res: &BadgeAssignment, id: &str) -> Vec<BadgeTag> {
        res.get(id)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn too_few_participants() {
        let e = scored_election(&["A", "B"], &[("u1", &[9.0, 1.0]), ("u2", &[2.0, 3.0])]);
        assert!(badges_of(&e).is_empty());
    }

    #[test]
    fn participants_without_votes_do_not_count() {
        let mut b = Builder::new(10.0)
            .unwrap()
            .candidates(&["A".to_string()])
            .unwrap()
            .factors(&[Factor::neutral(SCORE)]);
        b.add_participant("idle", "Idle");
        b.add_vote_simple("u1", "A", &[(SCORE, 5.0)]).unwrap();
        b.add_vote_simple("u2", "A", &[(SCORE, 6.0)]).unwrap();
        assert!(badges_of(&b.build()).is_empty());
    }

    #[test]
    fn assigns_all_badges() {
        let e = scored_election(
            &["A", "B", "C"],
            &[
                // lowest mean and spread: hater, hive mind, picks B
                ("grumpy", &[2.0, 3.0, 2.0]),
                // mean 9, small spread: lover, picks A
                ("sunny", &[10.0, 8.0, 9.0]),
                // mean 5, stddev 4.08: contrarian, picks A
                ("wild", &[10.0, 0.0, 5.0]),
            ],
        );
        let res = badges_of(&e);
        assert_eq!(tags(&res, "grumpy"), vec![BadgeTag::Hater, BadgeTag::HiveMind]);
        assert_eq!(tags(&res, "sunny"), vec![BadgeTag::Lover, BadgeTag::Oracle]);
        assert_eq!(
            tags(&res, "wild"),
            vec![BadgeTag::Contrarian, BadgeTag::Oracle]
        );
    }

    #[test]
    fn contrarian_needs_the_threshold() {
        let e = scored_election(
            &["A", "B"],
            &[
                ("u1", &[5.0, 4.0]),
                ("u2", &[6.0, 5.0]),
                ("u3", &[7.0, 4.0]),
            ],
        );
        let res = badges_of(&e);
        assert!(res
            .values()
            .all(|tags| !tags.contains(&BadgeTag::Contrarian)));
    }

    #[test]
    fn contrarian_threshold_is_strict() {
        // u1 deviates by exactly 2.
        let e = scored_election(
            &["A", "B"],
            &[
                ("u1", &[3.0, 7.0]),
                ("u2", &[5.0, 5.0]),
                ("u3", &[5.0, 6.0]),
            ],
        );
        let schulze = schulze_ranking(&e, &EngineRules::DEFAULT_RULES);
        let res = assign_badges(&e, &schulze, &EngineRules::DEFAULT_RULES);
        assert!(res
            .values()
            .all(|tags| !tags.contains(&BadgeTag::Contrarian)));

        let lenient = EngineRules {
            contrarian_threshold: 1.5,
            ..EngineRules::DEFAULT_RULES
        };
        let res = assign_badges(&e, &schulze, &lenient);
        assert!(tags(&res, "u1").contains(&BadgeTag::Contrarian));
    }

    #[test]
    fn votes_without_scores_do_not_qualify() {
        let mut b = Builder::new(10.0)
            .unwrap()
            .candidates(&["A".to_string(), "B".to_string()])
            .unwrap()
            .factors(&[Factor::neutral(SCORE)]);
        b.add_vote_simple("blank", "A", &[]).unwrap();
        for (voter, a, bb) in [("u1", 4.0, 6.0), ("u2", 8.0, 7.0), ("u3", 6.0, 9.0)] {
            b.add_vote_simple(voter, "A", &[(SCORE, a)]).unwrap();
            b.add_vote_simple(voter, "B", &[(SCORE, bb)]).unwrap();
        }
        let e = b.build();
        let res = badges_of(&e);
        assert!(!res.contains_key("blank"));
        assert!(tags(&res, "u1").contains(&BadgeTag::Hater));
        let ids: Vec<String> = voter_profiles(&e)
            .into_iter()
            .map(|p| p.participant_id)
            .collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn blank_voters_do_not_count_toward_the_minimum() {
        let mut b = Builder::new(10.0)
            .unwrap()
            .candidates(&["A".to_string()])
            .unwrap()
            .factors(&[Factor::neutral(SCORE)]);
        b.add_vote_simple("blank", "A", &[]).unwrap();
        b.add_vote_simple("u1", "A", &[(SCORE, 5.0)]).unwrap();
        b.add_vote_simple("u2", "A", &[(SCORE, 6.0)]).unwrap();
        assert!(badges_of(&b.build()).is_empty());
    }

    #[test]
    fn ties_go_to_the_first_participant() {
        let e = scored_election(
            &["A", "B"],
            &[
                ("u1", &[5.0, 5.0]),
                ("u2", &[5.0, 5.0]),
                ("u3", &[5.0, 5.0]),
            ],
        );
        let res = badges_of(&e);
        let expected: BTreeSet<BadgeTag> = [
            BadgeTag::Hater,
            BadgeTag::Lover,
            BadgeTag::HiveMind,
            BadgeTag::Oracle,
        ]
        .into_iter()
        .collect();
        assert_eq!(res.get("u1"), Some(&expected));
        assert_eq!(tags(&res, "u2"), vec![BadgeTag::Oracle]);
        assert_eq!(tags(&res, "u3"), vec![BadgeTag::Oracle]);
    }

    #[test]
    fn oracle_follows_the_schulze_winner() {
        let e = scored_election(
            &["A", "B"],
            &[
                ("u1", &[2.0, 8.0]),
                ("u2", &[3.0, 7.0]),
                ("u3", &[9.0, 1.0]),
            ],
        );
        let res = badges_of(&e);
        assert!(tags(&res, "u1").contains(&BadgeTag::Oracle));
        assert!(tags(&res, "u2").contains(&BadgeTag::Oracle));
        assert!(!tags(&res, "u3").contains(&BadgeTag::Oracle));
    }

    #[test]
    fn profiles_report_means_and_z_scores() {
        let e = scored_election(
            &["A", "B"],
            &[("u1", &[2.0, 4.0]), ("u2", &[6.0, 6.0]), ("u3", &[10.0, 8.0])],
        );
        let profiles = voter_profiles(&e);
        let ids: Vec<&str> = profiles.iter().map(|p| p.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
        assert!((profiles[0].mean - 3.0).abs() < EPS);
        assert!((profiles[0].stddev - 1.0).abs() < EPS);
        assert_eq!(profiles[0].num_scores, 2);
        assert!(profiles[0].z_score < 0.0);
        assert!((profiles[1].z_score).abs() < EPS);
        assert!((profiles[1].display_score - 50.0).abs() < EPS);
        assert!(profiles[2].display_score > 50.0);
    }

    #[test]
    fn no_votes_no_profiles() {
        let e = scored_election(&["A"], &[]);
        assert!(voter_profiles(&e).is_empty());
        assert!(badges_of(&e).is_empty());
    }
}
