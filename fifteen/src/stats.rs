use std::ops::AddAssign;

/// Search statistic collector.
/// It collects data during IDA* search.
pub trait SearchStatsCollector {
    /// Called for each state visited that is not expanded, can return false to cancel search process.
    #[inline(always)] fn leaf(&mut self) -> bool { true }

    /// Called for each state expanded.
    #[inline(always)] fn internal(&mut self) { }

    /// Adds visits counted elsewhere (e.g. by the workers of parallel search).
    /// Can return false to cancel search process.
    #[inline(always)] fn add_visits(&mut self, _internal: u64, _leaves: u64) -> bool { true }
}

/// Search statistic collector that ignore all events.
impl SearchStatsCollector for () {}

impl SearchStatsCollector for u64 {
    #[inline(always)] fn leaf(&mut self) -> bool { *self += 1; true }
    #[inline(always)] fn internal(&mut self) { *self += 1; }
    #[inline(always)] fn add_visits(&mut self, internal: u64, leaves: u64) -> bool { *self += internal + leaves; true }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchAllStats {
    pub internal: u64,
    pub leaves: u64
}

impl SearchAllStats {
    pub fn visits(&self) -> u64 { self.internal + self.leaves }
}

impl AddAssign for SearchAllStats {
    fn add_assign(&mut self, rhs: Self) {
        self.internal += rhs.internal;
        self.leaves += rhs.leaves;
    }
}

impl SearchStatsCollector for SearchAllStats {
    #[inline(always)] fn leaf(&mut self) -> bool { self.leaves += 1; true }
    #[inline(always)] fn internal(&mut self) { self.internal += 1; }
    #[inline(always)] fn add_visits(&mut self, internal: u64, leaves: u64) -> bool {
        *self += SearchAllStats { internal, leaves };
        true
    }
}

/// Counts visits and cancels search once the total number of visits reaches `limit`.
pub struct Limited {
    pub internal: u64,
    pub leaves: u64,
    pub limit: u64
}

impl Limited {
    pub fn with_limit(limit: u64) -> Self { Self{internal: 0, leaves: 0, limit} }

    pub fn reset_visits(&mut self) { self.internal = 0; self.leaves = 0; }

    pub fn reset_limit(&mut self, limit: u64) { self.reset_visits(); self.limit = limit; }

    pub fn visits(&self) -> u64 { self.internal + self.leaves }
}

impl SearchStatsCollector for Limited {
    #[inline(always)] fn leaf(&mut self) -> bool {
        if self.visits() >= self.limit { return false; }
        self.leaves += 1;
        true
    }

    #[inline(always)] fn internal(&mut self) { self.internal += 1; }

    fn add_visits(&mut self, internal: u64, leaves: u64) -> bool {
        self.internal += internal;
        self.leaves += leaves;
        self.visits() < self.limit
    }
}

/// Passes all events to `inner` and also counts them, for logging the size of each iteration.
pub struct Counted<'s, S: ?Sized> {
    pub inner: &'s mut S,
    pub counts: SearchAllStats
}

impl<'s, S: SearchStatsCollector + ?Sized> Counted<'s, S> {
    #[inline] pub fn new(inner: &'s mut S) -> Self { Self { inner, counts: Default::default() } }
}

impl<S: SearchStatsCollector + ?Sized> SearchStatsCollector for Counted<'_, S> {
    #[inline(always)] fn leaf(&mut self) -> bool { self.counts.leaves += 1; self.inner.leaf() }
    #[inline(always)] fn internal(&mut self) { self.counts.internal += 1; self.inner.internal() }
    #[inline(always)] fn add_visits(&mut self, internal: u64, leaves: u64) -> bool {
        self.counts.add_visits(internal, leaves);
        self.inner.add_visits(internal, leaves)
    }
}
