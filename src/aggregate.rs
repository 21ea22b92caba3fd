//! # Property aggregator module
//!
//! Two caller-supplied hooks, both optional, let a cluster carry more than
//! just its synthetic `cluster`/`cluster_id`/`point_count` metadata: `map`
//! turns a raw point's properties into a seed accumulator, and `reduce`
//! folds a neighbor's contribution into that accumulator as it's absorbed.
//! The core never looks inside the accumulator beyond handing it to these
//! two closures and echoing it back to the caller in query results — it is
//! an opaque `JsonObject` here, per DESIGN NOTES' "the core treats A as
//! opaque".

use std::sync::Arc;

use geojson::JsonObject;

/// Seeds an accumulator from a raw point's properties.
pub type MapFn = Arc<dyn Fn(&JsonObject) -> JsonObject + Send + Sync>;

/// Folds a contribution into an accumulator in place.
pub type ReduceFn = Arc<dyn Fn(&mut JsonObject, &JsonObject) + Send + Sync>;

/// The caller-supplied `map`/`reduce` pair, if configured.
#[derive(Clone)]
pub struct Aggregator {
    /// Seeds an accumulator from a raw point's properties.
    pub map: MapFn,
    /// Folds a contribution into an accumulator in place.
    pub reduce: ReduceFn,
}

impl Aggregator {
    /// Build an aggregator from a `map`/`reduce` pair.
    pub fn new(map: MapFn, reduce: ReduceFn) -> Self {
        Aggregator { map, reduce }
    }

    /// Seed an accumulator from a raw point's properties.
    pub fn seed(&self, props: &JsonObject) -> JsonObject {
        (self.map)(props)
    }

    /// Fold `contribution` into `accumulator` in place.
    pub fn fold(&self, accumulator: &mut JsonObject, contribution: &JsonObject) {
        (self.reduce)(accumulator, contribution);
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_then_fold_sums_a_field() {
        let aggregator = Aggregator::new(
            Arc::new(|props: &JsonObject| {
                let mut out = JsonObject::new();
                out.insert(
                    "sum".to_string(),
                    props.get("value").cloned().unwrap_or(json!(0)),
                );
                out
            }),
            Arc::new(|acc: &mut JsonObject, contribution: &JsonObject| {
                let a = acc.get("sum").and_then(|v| v.as_f64()).unwrap_or(0.0);
                let b = contribution.get("sum").and_then(|v| v.as_f64()).unwrap_or(0.0);
                acc.insert("sum".to_string(), json!(a + b));
            }),
        );

        let mut p1 = JsonObject::new();
        p1.insert("value".to_string(), json!(3));
        let mut p2 = JsonObject::new();
        p2.insert("value".to_string(), json!(4));

        let mut acc = aggregator.seed(&p1);
        let contribution = aggregator.seed(&p2);
        aggregator.fold(&mut acc, &contribution);

        assert_eq!(acc.get("sum").and_then(|v| v.as_f64()), Some(7.0));
    }
}
