//! Rate lookups against the snapshots attached to a single change.

use super::changes_model::{
    Change, NormalizedChange, RateResolution, RateSnapshot, ResolvedChange,
};

/// Anything that carries the two rate snapshots of a change.
pub trait RateSource {
    fn rates(&self) -> &RateSnapshot;
    fn second_degree(&self) -> &RateSnapshot;
}

impl RateSource for Change {
    fn rates(&self) -> &RateSnapshot {
        &self.rates
    }

    fn second_degree(&self) -> &RateSnapshot {
        &self.second_degree
    }
}

impl RateSource for NormalizedChange {
    fn rates(&self) -> &RateSnapshot {
        &self.rates
    }

    fn second_degree(&self) -> &RateSnapshot {
        &self.second_degree
    }
}

impl RateSource for ResolvedChange {
    fn rates(&self) -> &RateSnapshot {
        &self.change.rates
    }

    fn second_degree(&self) -> &RateSnapshot {
        &self.change.second_degree
    }
}

/// Resolves the best-known rate between `reference` and `counter` on one change.
///
/// The direct snapshot wins over the second-degree one. Missing, null and
/// non-positive entries are skipped, so the result is never a zero rate.
pub fn resolve<S>(source: &S, reference: &str, counter: &str) -> RateResolution
where
    S: RateSource + ?Sized,
{
    if let Some(rate) = source.rates().get(reference, counter) {
        return RateResolution::Direct(rate);
    }
    if let Some(rate) = source.second_degree().get(reference, counter) {
        return RateResolution::SecondDegree(rate);
    }
    RateResolution::Unresolved
}
