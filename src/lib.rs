/*!
Host adapter for [`social_choice`].

A session layer hands over a JSON snapshot of the candidates, factors, votes and
participants. [`rank_snapshot`] ranks it with the requested algorithms, computes the
badges and the voter profiles, and returns everything as one JSON summary.

```
let summary = group_decision::rank_snapshot(r#"{
    "maxScale": 10,
    "candidates": [{"id": "c1", "name": "Tacos"}, {"id": "c2", "name": "Sushi"}],
    "factors": [{"id": "taste"}],
    "votes": [
        {"voterId": "ana", "candidateId": "c1", "scores": {"taste": 9}},
        {"voterId": "ana", "candidateId": "c2", "scores": {"taste": 6}}
    ],
    "algorithms": ["schulze"]
}"#)?;
assert_eq!(summary["results"]["schulze"]["ranking"][0]["name"], "Tacos");
# Ok::<(), group_decision::SnapshotError>(())
```
*/

pub mod snapshot;

pub use crate::snapshot::snapshot_reader::{read_snapshot, Snapshot};
pub use crate::snapshot::{
    build_summary_js, rank_snapshot, rank_snapshot_pretty, validate_snapshot, SnapshotError,
    SnapshotResult,
};
