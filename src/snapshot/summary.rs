use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use social_choice::*;

fn details_to_json(details: &Option<SchulzeDetails>) -> JSValue {
    match details {
        None => JSValue::Null,
        Some(d) => json!({
            "candidates": d.candidates,
            "matrix": d.matrix,
            "strongestPaths": d.strongest_paths,
            "winners": d.winners,
        }),
    }
}

fn result_to_json(res: &VotingResult) -> JSValue {
    let ranking: Vec<JSValue> = res
        .ranking
        .iter()
        .map(|c| json!({"id": c.id, "name": c.name}))
        .collect();
    let mut scores: JSMap<String, JSValue> = JSMap::new();
    for (cid, score) in res.scores.iter() {
        scores.insert(cid.clone(), json!(score));
    }
    json!({
        "ranking": ranking,
        "scores": scores,
        "details": details_to_json(&res.details),
    })
}

fn badges_to_json(badges: &BadgeAssignment) -> JSValue {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    for (pid, tags) in badges.iter() {
        let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
        res.insert(pid.clone(), json!(names));
    }
    JSValue::Object(res)
}

fn profile_to_json(p: &VoterProfile) -> JSValue {
    json!({
        "participantId": p.participant_id,
        "nickname": p.nickname,
        "numScores": p.num_scores,
        "mean": p.mean,
        "stddev": p.stddev,
        "zScore": p.z_score,
        "displayScore": p.display_score,
    })
}

/// The summary handed back to the presentation layer.
pub fn build_summary_js(
    results: &[(Algorithm, VotingResult)],
    badges: &BadgeAssignment,
    profiles: &[VoterProfile],
) -> JSValue {
    let mut results_js: JSMap<String, JSValue> = JSMap::new();
    for (algorithm, res) in results.iter() {
        results_js.insert(algorithm.name().to_string(), result_to_json(res));
    }
    json!({
        "results": results_js,
        "badges": badges_to_json(badges),
        "profiles": profiles.iter().map(profile_to_json).collect::<Vec<JSValue>>(),
    })
}
