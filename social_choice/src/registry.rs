use log::info;

use crate::badges::assign_badges;
use crate::borda::borda_ranking;
use crate::config::*;
use crate::schulze::schulze_ranking;
use crate::weighted::weighted_ranking;

/// One ranking rule.
///
/// Implementations must be pure: the same election and rules always give the same result.
pub trait RankingStrategy: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    fn rank(&self, election: &Election, rules: &EngineRules) -> VotingResult;
}

pub struct WeightedSum;

impl RankingStrategy for WeightedSum {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Weighted
    }

    fn rank(&self, election: &Election, rules: &EngineRules) -> VotingResult {
        weighted_ranking(election, rules)
    }
}

pub struct BordaCount;

impl RankingStrategy for BordaCount {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Borda
    }

    fn rank(&self, election: &Election, rules: &EngineRules) -> VotingResult {
        borda_ranking(election, rules)
    }
}

pub struct Beatpath;

impl RankingStrategy for Beatpath {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Schulze
    }

    fn rank(&self, election: &Election, rules: &EngineRules) -> VotingResult {
        schulze_ranking(election, rules)
    }
}

/// The strategies available to an `Engine`, at most one per algorithm, in registration order.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn RankingStrategy>>,
}

impl StrategyRegistry {
    pub fn empty() -> StrategyRegistry {
        StrategyRegistry {
            strategies: Vec::new(),
        }
    }

    /// Weighted sum, Borda and Schulze, in that order.
    pub fn standard() -> StrategyRegistry {
        StrategyRegistry::empty()
            .with(WeightedSum)
            .with(BordaCount)
            .with(Beatpath)
    }

    /// Registers a strategy, replacing the one registered for the same algorithm.
    pub fn with(mut self, strategy: impl RankingStrategy + 'static) -> StrategyRegistry {
        let algorithm = strategy.algorithm();
        match self
            .strategies
            .iter()
            .position(|s| s.algorithm() == algorithm)
        {
            Some(idx) => self.strategies[idx] = Box::new(strategy),
            None => self.strategies.push(Box::new(strategy)),
        }
        self
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&dyn RankingStrategy> {
        self.strategies
            .iter()
            .find(|s| s.algorithm() == algorithm)
            .map(|s| &**s)
    }

    pub fn algorithms(&self) -> Vec<Algorithm> {
        self.strategies.iter().map(|s| s.algorithm()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        StrategyRegistry::standard()
    }
}

/// Single dispatch point for the rankings and the badges.
pub struct Engine<'a> {
    registry: &'a StrategyRegistry,
    rules: EngineRules,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a StrategyRegistry, rules: EngineRules) -> Engine<'a> {
        Engine { registry, rules }
    }

    pub fn rules(&self) -> &EngineRules {
        &self.rules
    }

    pub fn run(
        &self,
        algorithm: Algorithm,
        election: &Election,
    ) -> Result<VotingResult, VotingErrors> {
        let strategy = self
            .registry
            .get(algorithm)
            .ok_or(VotingErrors::UnregisteredAlgorithm(algorithm))?;
        info!(
            "Running {} over {:?} candidates and {:?} votes",
            algorithm,
            election.candidates.len(),
            election.votes.len()
        );
        Ok(strategy.rank(election, &self.rules))
    }

    /// Runs every registered strategy, in registration order.
    pub fn run_all(&self, election: &Election) -> Vec<(Algorithm, VotingResult)> {
        self.registry
            .strategies
            .iter()
            .map(|s| (s.algorithm(), s.rank(election, &self.rules)))
            .collect()
    }

    /// Badges, against the result of the registered Schulze strategy.
    pub fn badges(&self, election: &Election) -> Result<BadgeAssignment, VotingErrors> {
        let schulze = self.run(Algorithm::Schulze, election)?;
        Ok(assign_badges(election, &schulze, &self.rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::testing::*;

    fn mixed_election() -> Election {
        let mut b = Builder::new(10.0)
            .unwrap()
            .candidates(&[
                "pizza".to_string(),
                "sushi".to_string(),
                "tacos".to_string(),
                "ramen".to_string(),
            ])
            .unwrap()
            .factors(&[
                Factor {
                    weight: 2.0,
                    ..Factor::neutral("taste")
                },
                Factor {
                    trend: Trend::LowerBetter,
                    ..Factor::neutral("price")
                },
                Factor {
                    weight: -0.5,
                    ..Factor::neutral("wait")
                },
            ]);
        let votes: [(&str, &str, [f64; 3]); 8] = [
            ("ana", "pizza", [7.0, 3.0, 2.0]),
            ("ana", "sushi", [9.0, 8.0, 5.0]),
            ("ana", "tacos", [6.0, 2.0, 1.0]),
            ("ben", "sushi", [8.0, 7.0, 6.0]),
            ("ben", "tacos", [8.0, 3.0, 2.0]),
            ("cy", "pizza", [5.0, 4.0, 0.0]),
            ("cy", "tacos", [9.0, 1.0, 3.0]),
            ("cy", "sushi", [4.0, 9.0, 9.0]),
        ];
        for (voter, cand, [taste, price, wait]) in votes.iter() {
            b.add_vote_simple(
                voter,
                cand,
                &[("taste", *taste), ("price", *price), ("wait", *wait)],
            )
            .unwrap();
        }
        b.build()
    }

    #[test]
    fn standard_registry_order() {
        let registry = StrategyRegistry::standard();
        assert_eq!(registry.algorithms(), Algorithm::ALL.to_vec());
    }

    #[test]
    fn rankings_are_permutations_of_the_candidates() {
        init_logs();
        let registry = StrategyRegistry::standard();
        let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
        let e = mixed_election();
        let mut expected: Vec<&str> = e.candidates.iter().map(|c| c.id.as_str()).collect();
        expected.sort();
        for (algorithm, res) in engine.run_all(&e) {
            let mut ids = ranking_ids(&res);
            ids.sort();
            assert_eq!(ids, expected, "{}", algorithm);
            // Nobody rated ramen.
            assert_eq!(res.ranking.last().map(|c| c.id.as_str()), Some("ramen"));
        }
    }

    #[test]
    fn tacos_win_everywhere() {
        let registry = StrategyRegistry::standard();
        let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
        let e = mixed_election();
        for algorithm in Algorithm::ALL {
            let res = engine.run(algorithm, &e).unwrap();
            assert_eq!(res.ranking[0].id, "tacos", "{}", algorithm);
        }
        let schulze = engine.run(Algorithm::Schulze, &e).unwrap();
        assert_eq!(schulze.details.unwrap().winners, vec!["tacos".to_string()]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let registry = StrategyRegistry::standard();
        let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
        let e = mixed_election();
        assert_eq!(engine.run_all(&e), engine.run_all(&e));
        assert_eq!(engine.badges(&e).unwrap(), engine.badges(&e).unwrap());
    }

    #[test]
    fn raising_a_candidate_never_lowers_its_rank() {
        let registry = StrategyRegistry::standard();
        let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
        let before = mixed_election();
        let mut after = before.clone();
        for v in after.votes.iter_mut() {
            if v.candidate_id == "pizza" {
                v.scores.insert("taste".to_string(), 10.0);
            }
        }
        for algorithm in Algorithm::ALL {
            let pos = |e: &Election| {
                let res = engine.run(algorithm, e).unwrap();
                res.ranking.iter().position(|c| c.id == "pizza").unwrap()
            };
            assert!(pos(&after) <= pos(&before), "{}", algorithm);
        }
    }

    #[test]
    fn empty_election() {
        let registry = StrategyRegistry::standard();
        let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
        let e = ranked_election(&["A", "B", "C"], &[]);
        for (_, res) in engine.run_all(&e) {
            assert_eq!(ranking_ids(&res), vec!["A", "B", "C"]);
            assert!(res.scores.is_empty());
        }
        assert!(engine.badges(&e).unwrap().is_empty());
    }

    #[test]
    fn custom_registry() {
        let registry = StrategyRegistry::empty().with(BordaCount).with(BordaCount);
        assert_eq!(registry.algorithms(), vec![Algorithm::Borda]);
        let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
        let e = ranked_election(&["A", "B"], &[&["B", "A"]]);
        assert!(engine.run(Algorithm::Borda, &e).is_ok());
        assert_eq!(
            engine.run(Algorithm::Weighted, &e),
            Err(VotingErrors::UnregisteredAlgorithm(Algorithm::Weighted))
        );
        assert_eq!(
            engine.badges(&e),
            Err(VotingErrors::UnregisteredAlgorithm(Algorithm::Schulze))
        );
    }
}
