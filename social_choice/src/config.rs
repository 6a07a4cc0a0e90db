// ********* Input data structures ***********

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// Whether higher or lower raw values count as better for a factor.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum Trend {
    #[default]
    HigherBetter,
    LowerBetter,
}

/// How the raw value of a factor is obtained.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum FactorKind {
    /// Every voter scores the candidate on this factor.
    #[default]
    Numerical,
    /// The value is a property of the candidate (see `Candidate::static_values`).
    /// A score given by the voter still takes precedence.
    Constant,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub static_values: BTreeMap<String, f64>,
}

impl Candidate {
    pub fn new(id: &str, name: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.to_string(),
            static_values: BTreeMap::new(),
        }
    }
}

/// A scored evaluation dimension.
///
/// The sign of `weight` tells whether the factor pulls a candidate up or down,
/// its magnitude how much it matters.
#[derive(PartialEq, Debug, Clone)]
pub struct Factor {
    pub id: String,
    pub weight: f64,
    pub trend: Trend,
    pub kind: FactorKind,
    pub step: f64,
}

impl Factor {
    /// A numerical factor with a weight of 1 where higher is better.
    pub fn neutral(id: &str) -> Factor {
        Factor {
            id: id.to_string(),
            weight: 1.0,
            trend: Trend::HigherBetter,
            kind: FactorKind::Numerical,
            step: 1.0,
        }
    }
}

/// The scores one voter gave to one candidate.
///
/// A voter who did not rate a candidate has no record for it at all.
#[derive(PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub voter_id: String,
    pub candidate_id: String,
    pub scores: BTreeMap<String, f64>,
    pub is_jolly: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Participant {
    pub user_id: String,
    pub nickname: String,
    pub has_voted: bool,
}

/// An immutable snapshot of everything a computation needs.
#[derive(PartialEq, Debug, Clone)]
pub struct Election {
    /// Upper bound of the rating scale. Scores lie in `[0, max_scale]`.
    pub max_scale: f64,
    pub candidates: Vec<Candidate>,
    pub factors: Vec<Factor>,
    pub votes: Vec<VoteRecord>,
    pub participants: Vec<Participant>,
}

// ******** Output data structures *********

/// Artifacts of the beatpath computation. Matrices are indexed in the order of `candidates`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SchulzeDetails {
    pub candidates: Vec<String>,
    /// `matrix[i][j]`: number of ballots ranking `i` strictly before `j`.
    pub matrix: Vec<Vec<u64>>,
    /// `strongest_paths[i][j]`: strength of the strongest path from `i` to `j`.
    pub strongest_paths: Vec<Vec<u64>>,
    /// Candidate ids with the maximum number of beatpath victories, in input order.
    pub winners: Vec<String>,
}

impl SchulzeDetails {
    /// True if `i` beats `j` on the beatpath relation.
    pub fn beats(&self, i: usize, j: usize) -> bool {
        self.strongest_paths[i][j] > self.strongest_paths[j][i]
    }

    /// All the (winner, loser, path strength) triples, in matrix order.
    pub fn defeats(&self) -> Vec<(String, String, u64)> {
        let n = self.candidates.len();
        let mut res = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i != j && self.beats(i, j) {
                    res.push((
                        self.candidates[i].clone(),
                        self.candidates[j].clone(),
                        self.strongest_paths[i][j],
                    ));
                }
            }
        }
        res
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct VotingResult {
    /// All the input candidates, best first.
    pub ranking: Vec<Candidate>,
    /// Score of each candidate that received at least one vote, by candidate id.
    pub scores: BTreeMap<String, f64>,
    /// Only filled by the Schulze method.
    pub details: Option<SchulzeDetails>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum BadgeTag {
    Hater,
    Lover,
    HiveMind,
    Contrarian,
    Oracle,
}

impl BadgeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTag::Hater => "hater",
            BadgeTag::Lover => "lover",
            BadgeTag::HiveMind => "hive_mind",
            BadgeTag::Contrarian => "contrarian",
            BadgeTag::Oracle => "oracle",
        }
    }
}

impl Display for BadgeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badges by participant id. Participants without any badge are absent.
pub type BadgeAssignment = BTreeMap<String, BTreeSet<BadgeTag>>;

/// Rating behavior of one participant.
#[derive(PartialEq, Debug, Clone)]
pub struct VoterProfile {
    pub participant_id: String,
    pub nickname: String,
    /// Number of raw scores given across all candidates and factors.
    pub num_scores: usize,
    pub mean: f64,
    pub stddev: f64,
    /// z-score of `mean` among the means of all the profiled participants.
    pub z_score: f64,
    /// `z_score` mapped to `[0, 100]`, for display.
    pub display_score: f64,
}

/// Errors raised while assembling a snapshot or picking an algorithm.
///
/// The tallies themselves never fail.
#[derive(PartialEq, Debug, Clone)]
pub enum VotingErrors {
    InvalidScale(f64),
    UnknownCandidate(String),
    DuplicateCandidate(String),
    DuplicateVote { voter: String, candidate: String },
    UnknownAlgorithm(String),
    UnregisteredAlgorithm(Algorithm),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InvalidScale(s) => write!(f, "invalid rating scale {}", s),
            VotingErrors::UnknownCandidate(c) => write!(f, "unknown candidate {:?}", c),
            VotingErrors::DuplicateCandidate(c) => write!(f, "duplicate candidate {:?}", c),
            VotingErrors::DuplicateVote { voter, candidate } => write!(
                f,
                "voter {:?} already voted for candidate {:?}",
                voter, candidate
            ),
            VotingErrors::UnknownAlgorithm(name) => write!(f, "unknown algorithm {:?}", name),
            VotingErrors::UnregisteredAlgorithm(a) => {
                write!(f, "algorithm {} is not registered", a)
            }
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Algorithm {
    Weighted,
    Borda,
    Schulze,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Weighted, Algorithm::Borda, Algorithm::Schulze];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Weighted => "weighted",
            Algorithm::Borda => "borda",
            Algorithm::Schulze => "schulze",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = VotingErrors;

    fn from_str(s: &str) -> Result<Algorithm, VotingErrors> {
        match s {
            "weighted" => Ok(Algorithm::Weighted),
            "borda" => Ok(Algorithm::Borda),
            "schulze" => Ok(Algorithm::Schulze),
            x => Err(VotingErrors::UnknownAlgorithm(x.to_string())),
        }
    }
}

/// Multiplier applied to a jolly (bonus) vote in the weighted-sum tally.
pub const DEFAULT_JOLLY_MULTIPLIER: f64 = 1.25;
/// Minimum stddev, on a 0-10 scale, for the contrarian badge.
pub const DEFAULT_CONTRARIAN_THRESHOLD: f64 = 2.0;
/// Below this number of voting participants no badge is given.
pub const DEFAULT_MIN_BADGE_PARTICIPANTS: usize = 3;

#[derive(PartialEq, Debug, Clone)]
pub struct EngineRules {
    pub jolly_multiplier: f64,
    pub contrarian_threshold: f64,
    pub min_badge_participants: usize,
}

impl EngineRules {
    pub const DEFAULT_RULES: EngineRules = EngineRules {
        jolly_multiplier: DEFAULT_JOLLY_MULTIPLIER,
        contrarian_threshold: DEFAULT_CONTRARIAN_THRESHOLD,
        min_badge_participants: DEFAULT_MIN_BADGE_PARTICIPANTS,
    };
}

impl Default for EngineRules {
    fn default() -> Self {
        EngineRules::DEFAULT_RULES
    }
}
