use log::{debug, info, warn};

use social_choice::builder::Builder;
use social_choice::*;
use snafu::{prelude::*, Snafu};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use crate::snapshot::snapshot_reader::*;

mod summary;

pub use crate::snapshot::summary::build_summary_js;

#[derive(Debug, Snafu)]
pub enum SnapshotError {
    #[snafu(display("Error parsing snapshot: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error serializing summary: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Factor {factor}: unknown trend {trend:?}"))]
    UnknownTrend { factor: String, trend: String },
    #[snafu(display("Factor {factor}: unknown type {kind:?}"))]
    UnknownFactorType { factor: String, kind: String },
    #[snafu(display("Invalid snapshot: {source}"))]
    InvalidSnapshot { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// The rows of a snapshot, as the session layer emits them.
pub mod snapshot_reader {
    use crate::snapshot::*;
    use std::collections::BTreeMap;

    #[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct CandidateRow {
        pub id: String,
        pub name: String,
        #[serde(rename = "staticValues")]
        pub static_values: Option<BTreeMap<String, f64>>,
    }

    #[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct FactorRow {
        pub id: String,
        pub weight: Option<f64>,
        pub trend: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub step: Option<f64>,
    }

    #[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct VoteRow {
        #[serde(rename = "voterId")]
        pub voter_id: String,
        #[serde(rename = "candidateId")]
        pub candidate_id: String,
        #[serde(default)]
        pub scores: BTreeMap<String, f64>,
        #[serde(rename = "isJolly")]
        pub is_jolly: Option<bool>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct ParticipantRow {
        #[serde(rename = "userId")]
        pub user_id: String,
        pub nickname: Option<String>,
        #[serde(rename = "hasVoted")]
        pub has_voted: Option<bool>,
    }

    #[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct RulesRow {
        #[serde(rename = "jollyMultiplier")]
        pub jolly_multiplier: Option<f64>,
        #[serde(rename = "contrarianThreshold")]
        pub contrarian_threshold: Option<f64>,
        #[serde(rename = "minBadgeParticipants")]
        pub min_badge_participants: Option<usize>,
    }

    #[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct Snapshot {
        #[serde(rename = "maxScale")]
        pub max_scale: f64,
        #[serde(default)]
        pub candidates: Vec<CandidateRow>,
        #[serde(default)]
        pub factors: Vec<FactorRow>,
        #[serde(default)]
        pub votes: Vec<VoteRow>,
        #[serde(default)]
        pub participants: Vec<ParticipantRow>,
        pub rules: Option<RulesRow>,
        pub algorithms: Option<Vec<String>>,
    }

    pub fn read_snapshot(contents: &str) -> SnapshotResult<Snapshot> {
        let snapshot: Snapshot = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
        debug!(
            "read_snapshot: {:?} candidates, {:?} factors, {:?} votes",
            snapshot.candidates.len(),
            snapshot.factors.len(),
            snapshot.votes.len()
        );
        Ok(snapshot)
    }
}

fn validate_factor(row: &FactorRow) -> SnapshotResult<Factor> {
    let neutral = Factor::neutral(&row.id);
    let trend = match row.trend.as_deref() {
        None | Some("higher_better") => Trend::HigherBetter,
        Some("lower_better") => Trend::LowerBetter,
        Some(x) => {
            return UnknownTrendSnafu {
                factor: row.id.clone(),
                trend: x.to_string(),
            }
            .fail()
        }
    };
    let kind = match row.kind.as_deref() {
        None | Some("numerical") => FactorKind::Numerical,
        Some("constant") => FactorKind::Constant,
        Some(x) => {
            return UnknownFactorTypeSnafu {
                factor: row.id.clone(),
                kind: x.to_string(),
            }
            .fail()
        }
    };
    Ok(Factor {
        weight: row.weight.unwrap_or(neutral.weight),
        trend,
        kind,
        step: row.step.unwrap_or(neutral.step),
        ..neutral
    })
}

fn validate_rules(row: &Option<RulesRow>) -> SnapshotResult<EngineRules> {
    let defaults = EngineRules::DEFAULT_RULES;
    let row = match row {
        Some(r) => r,
        None => return Ok(defaults),
    };
    let jolly_multiplier = row.jolly_multiplier.unwrap_or(defaults.jolly_multiplier);
    if !jolly_multiplier.is_finite() || jolly_multiplier <= 0.0 {
        whatever!("Invalid jolly multiplier {:?}", jolly_multiplier)
    }
    let contrarian_threshold = row
        .contrarian_threshold
        .unwrap_or(defaults.contrarian_threshold);
    if !contrarian_threshold.is_finite() || contrarian_threshold < 0.0 {
        whatever!("Invalid contrarian threshold {:?}", contrarian_threshold)
    }
    Ok(EngineRules {
        jolly_multiplier,
        contrarian_threshold,
        min_badge_participants: row
            .min_badge_participants
            .unwrap_or(defaults.min_badge_participants),
    })
}

fn validate_algorithms(names: &Option<Vec<String>>) -> SnapshotResult<Vec<Algorithm>> {
    match names {
        None => Ok(Algorithm::ALL.to_vec()),
        Some(names) => {
            let mut res: Vec<Algorithm> = Vec::new();
            for name in names.iter() {
                let algorithm: Algorithm = name.parse().context(InvalidSnapshotSnafu {})?;
                if !res.contains(&algorithm) {
                    res.push(algorithm);
                }
            }
            Ok(res)
        }
    }
}

/// Converts the rows into an election.
///
/// Votes for candidates missing from the snapshot are dropped. A second vote of a
/// voter for the same candidate is an error.
pub fn validate_snapshot(snapshot: &Snapshot) -> SnapshotResult<Election> {
    let mut factors: Vec<Factor> = Vec::new();
    for f in snapshot.factors.iter() {
        factors.push(validate_factor(f)?);
    }
    let participants: Vec<Participant> = snapshot
        .participants
        .iter()
        .map(|p| Participant {
            user_id: p.user_id.clone(),
            nickname: match p.nickname.clone() {
                Some(x) if !x.is_empty() => x,
                _ => p.user_id.clone(),
            },
            has_voted: p.has_voted.unwrap_or(false),
        })
        .collect();

    let mut builder = Builder::new(snapshot.max_scale)
        .context(InvalidSnapshotSnafu {})?
        .factors(&factors)
        .participants(&participants);
    for c in snapshot.candidates.iter() {
        builder
            .add_candidate(Candidate {
                id: c.id.clone(),
                name: c.name.clone(),
                static_values: c.static_values.clone().unwrap_or_default(),
            })
            .context(InvalidSnapshotSnafu {})?;
    }
    for v in snapshot.votes.iter() {
        let vote = VoteRecord {
            voter_id: v.voter_id.clone(),
            candidate_id: v.candidate_id.clone(),
            scores: v.scores.clone(),
            is_jolly: v.is_jolly.unwrap_or(false),
        };
        match builder.add_vote(&vote) {
            Err(VotingErrors::UnknownCandidate(cid)) => {
                warn!(
                    "validate_snapshot: dropping vote of {:?} for unknown candidate {:?}",
                    vote.voter_id, cid
                );
            }
            res => res.context(InvalidSnapshotSnafu {})?,
        }
    }
    Ok(builder.build())
}

/// Ranks a snapshot given as JSON and returns the summary for the presentation layer.
///
/// Badges and voter profiles are always computed, whatever the requested algorithms.
pub fn rank_snapshot(contents: &str) -> SnapshotResult<JSValue> {
    let snapshot = read_snapshot(contents)?;
    let rules = validate_rules(&snapshot.rules)?;
    let algorithms = validate_algorithms(&snapshot.algorithms)?;
    let election = validate_snapshot(&snapshot)?;
    info!(
        "rank_snapshot: {:?} candidates, {:?} votes, algorithms {:?}",
        election.candidates.len(),
        election.votes.len(),
        algorithms
    );

    let registry = StrategyRegistry::standard();
    let engine = Engine::new(&registry, rules);
    let mut results: Vec<(Algorithm, VotingResult)> = Vec::new();
    for algorithm in algorithms {
        let res = engine.run(algorithm, &election).context(InvalidSnapshotSnafu {})?;
        results.push((algorithm, res));
    }
    let badges = engine.badges(&election).context(InvalidSnapshotSnafu {})?;
    let profiles = voter_profiles(&election);

    Ok(build_summary_js(&results, &badges, &profiles))
}

/// Same as `rank_snapshot`, as an indented JSON string.
pub fn rank_snapshot_pretty(contents: &str) -> SnapshotResult<String> {
    let js = rank_snapshot(contents)?;
    serde_json::to_string_pretty(&js).context(SerializingJsonSnafu {})
}
