//! Tier quotas and the collector that enforces them.
//!
//! The collector sees accepted records in scan order. Once every tier is at
//! capacity it reports [`QuotaCollector::is_full`] and the caller stops
//! scanning; records after that point are never evaluated.

use serde::Serialize;

use crate::criteria::QuotaMode;
use crate::scoring::PriorityTier;

/// Per-tier capacities derived from a budget: floor(40%), floor(40%), floor(20%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultQuota {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ResultQuota {
    pub fn from_budget(budget: usize) -> Self {
        // floor(2B/5) without forming 2B, which overflows near usize::MAX.
        let two_fifths = budget / 5 * 2 + budget % 5 * 2 / 5;
        Self {
            high: two_fifths,
            medium: two_fifths,
            low: budget / 5,
        }
    }

    pub fn capacity(&self, tier: PriorityTier) -> usize {
        match tier {
            PriorityTier::High => self.high,
            PriorityTier::Medium => self.medium,
            PriorityTier::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Accepted-record counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn get(&self, tier: PriorityTier) -> usize {
        match tier {
            PriorityTier::High => self.high,
            PriorityTier::Medium => self.medium,
            PriorityTier::Low => self.low,
        }
    }

    fn bump(&mut self, tier: PriorityTier) {
        match tier {
            PriorityTier::High => self.high += 1,
            PriorityTier::Medium => self.medium += 1,
            PriorityTier::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

impl From<ResultQuota> for TierCounts {
    fn from(quota: ResultQuota) -> Self {
        Self {
            high: quota.high,
            medium: quota.medium,
            low: quota.low,
        }
    }
}

/// What happened to a record offered to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Included,
    DroppedByQuota,
}

/// Collected items, still grouped the way the collector stored them.
#[derive(Debug, Clone, PartialEq)]
pub enum Buckets<T> {
    /// One bucket per tier, indexed high, medium, low. Scan order within each.
    Tiered([Vec<T>; 3]),
    /// A single bucket in scan order.
    Flat(Vec<T>),
}

/// Final state of a collector.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected<T> {
    pub buckets: Buckets<T>,
    pub counts: TierCounts,
    pub capacities: TierCounts,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy)]
enum Capacity {
    Tiered(ResultQuota),
    Flat(usize),
}

/// Bounded per-tier accumulator.
#[derive(Debug)]
pub struct QuotaCollector<T> {
    capacity: Capacity,
    buckets: Buckets<T>,
    counts: TierCounts,
    dropped: usize,
}

impl<T> QuotaCollector<T> {
    pub fn new(budget: usize, mode: QuotaMode) -> Self {
        match mode {
            QuotaMode::Tiered => Self::tiered(ResultQuota::from_budget(budget)),
            QuotaMode::Flat => Self::flat(budget),
        }
    }

    pub fn tiered(quota: ResultQuota) -> Self {
        Self {
            capacity: Capacity::Tiered(quota),
            buckets: Buckets::Tiered([Vec::new(), Vec::new(), Vec::new()]),
            counts: TierCounts::default(),
            dropped: 0,
        }
    }

    /// Every tier draws from one shared pool of `budget` slots.
    pub fn flat(budget: usize) -> Self {
        Self {
            capacity: Capacity::Flat(budget),
            buckets: Buckets::Flat(Vec::new()),
            counts: TierCounts::default(),
            dropped: 0,
        }
    }

    fn has_room(&self, tier: PriorityTier) -> bool {
        match self.capacity {
            Capacity::Tiered(quota) => self.counts.get(tier) < quota.capacity(tier),
            Capacity::Flat(budget) => self.counts.total() < budget,
        }
    }

    /// Offer the next accepted record. Appends it if its tier has room.
    pub fn offer(&mut self, item: T, tier: PriorityTier) -> Admission {
        if !self.has_room(tier) {
            self.dropped += 1;
            return Admission::DroppedByQuota;
        }
        self.counts.bump(tier);
        match &mut self.buckets {
            Buckets::Tiered(buckets) => buckets[tier.index()].push(item),
            Buckets::Flat(bucket) => bucket.push(item),
        }
        Admission::Included
    }

    /// True once every capacity is reached; scanning should stop.
    pub fn is_full(&self) -> bool {
        PriorityTier::ALL.iter().all(|tier| !self.has_room(*tier))
    }

    pub fn counts(&self) -> TierCounts {
        self.counts
    }

    pub fn capacities(&self) -> TierCounts {
        match self.capacity {
            Capacity::Tiered(quota) => quota.into(),
            // Flat mode has no per-tier split; every tier may use the whole pool.
            Capacity::Flat(budget) => TierCounts {
                high: budget,
                medium: budget,
                low: budget,
            },
        }
    }

    pub fn finish(self) -> Collected<T> {
        let capacities = self.capacities();
        Collected {
            buckets: self.buckets,
            counts: self.counts,
            capacities,
            dropped: self.dropped,
        }
    }
}
