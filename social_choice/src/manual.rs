/*!

This is the long-form manual for `social_choice`.

## Input

An [`Election`](crate::Election) snapshot holds:
* `max_scale`: the top of the rating scale. Scores are expected in `[0, max_scale]`;
  anything outside is clamped.
* `candidates`: what is being voted on. A candidate may carry `static_values`,
  one per constant factor.
* `factors`: the criteria. Each one has a signed `weight` and a `trend`.
* `votes`: one record per (voter, candidate) pair. A voter who skips a candidate
  leaves no record for it: this is different from rating it zero.
* `participants`: the people in the session, used by the badges.

Records for unknown candidates are dropped, and only the first record of a
(voter, candidate) pair counts. Scores for unknown factors are ignored.

## Normalization

Every raw score `v` of a factor becomes a contribution:

```text
contribution = (trend == lower_better ? max_scale - v : v) * weight
```

A missing score counts as `0`, except for a constant factor where the candidate's
static value is used when the voter did not give one.

## Methods

### `weighted`

Each vote is worth `sum(contribution) / sum(|weight|)`, times the jolly multiplier
(1.25 by default) if the voter used their jolly on this candidate. The score of a
candidate is the mean over the voters who rated it.

### `borda`

Each voter ranks the candidates they rated by `sum(contribution)`. With `n` candidates
in the election, the candidate at position `k` (starting at 0) gets `n - 1 - k`
points. Points are summed over voters.

### `schulze`

Each voter's ranking is a ballot. Candidates with a negative `sum(contribution)`
are left off the ballot, like the unrated ones. `d[i][j]` counts the ballots that put `i` before
`j`; a candidate on a ballot is before every candidate absent from it. The strongest
path `p[i][j]` is the best chain of pairwise victories from `i` to `j`, the strength
of a chain being its weakest link. `i` beats `j` when `p[i][j] > p[j][i]`.

Candidates are ranked by how many others they beat. Everyone tied at the top is a
winner: that is the Schulze winner set. Below the top, the order is a simplification
of the full Schulze ranking.

### Ties and missing candidates

Ties are broken by the order of the candidates in the input, within a ballot and in
the final ranking. Candidates nobody rated come last, in input order, and do not
appear in the score maps.

## Badges

Only participants who gave at least one score take part. With at least 3 of them,
each one's raw scores are pooled to compute a
mean and a standard deviation:
* `hater` and `lover`: lowest and highest mean,
* `hive_mind`: lowest deviation,
* `contrarian`: highest deviation, if above 2.0,
* `oracle`: everyone whose favorite candidate (highest sum of raw scores) is the
  Schulze winner.

Ties go to the first participant in input order.

 */
