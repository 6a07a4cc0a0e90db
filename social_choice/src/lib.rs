/*!
Rankings for group decisions scored on several criteria.

Voters rate candidates on a set of factors. From the same ballots, this crate computes
three interchangeable rankings (weighted sum, Borda count and the Schulze beatpath
method) and a set of playful badges describing how each participant voted.

All the computations are pure and synchronous: they read an [`Election`] snapshot
and return plain values. See the [manual] for the details of each method.

```
use social_choice::builder::Builder;
use social_choice::*;

let mut builder = Builder::new(10.0)?
    .candidates(&["Tacos".to_string(), "Sushi".to_string()])?
    .factors(&[Factor::neutral("taste")]);
builder.add_vote_simple("ana", "Tacos", &[("taste", 9.0)])?;
builder.add_vote_simple("ana", "Sushi", &[("taste", 6.0)])?;
let election = builder.build();

let registry = StrategyRegistry::standard();
let engine = Engine::new(&registry, EngineRules::DEFAULT_RULES);
let result = engine.run(Algorithm::Schulze, &election)?;
assert_eq!(result.ranking[0].name, "Tacos");
# Ok::<(), VotingErrors>(())
```
*/

mod badges;
mod borda;
pub mod builder;
mod config;
pub mod manual;
mod normalizer;
mod registry;
mod schulze;
pub mod stats;
mod weighted;

#[cfg(test)]
mod testing;

pub use crate::badges::{assign_badges, voter_profiles};
pub use crate::borda::borda_ranking;
pub use crate::config::*;
pub use crate::registry::*;
pub use crate::schulze::schulze_ranking;
pub use crate::weighted::weighted_ranking;
