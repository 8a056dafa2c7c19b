//! Baseline recommenders for the evaluation tool.
//!
//! Neither baseline is personalized. They give the benchmark a reference
//! point: a recommender worth shipping should beat both on accuracy, and
//! usually loses to `random` on coverage and novelty.

use crate::sampling::LcgRng;
use clap::ValueEnum;
use recbench_core::recommender::{Recommendation, Recommender};
use recbench_core::types::{InteractionLog, ItemId, UserId};
use std::collections::{HashMap, HashSet};

/// Baselines selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SystemKind {
    /// Most clicked items in the training log
    Popular,
    /// Uniformly random items from the catalog
    Random,
}

impl SystemKind {
    /// Name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            SystemKind::Popular => "popular",
            SystemKind::Random => "random",
        }
    }
}

/// Recommends the globally most clicked training items to everyone.
#[derive(Debug, Clone)]
pub struct MostPopular {
    ranking: Vec<ItemId>,
}

impl MostPopular {
    /// Ranks items by click count; ties break on item id so runs are stable.
    pub fn fit(train_log: &InteractionLog) -> Self {
        let mut counts: HashMap<&ItemId, usize> = HashMap::new();
        for row in train_log.rows().iter().filter(|row| row.clicked) {
            *counts.entry(&row.news_id).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&ItemId, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Self {
            ranking: ranked.into_iter().map(|(item, _)| item.clone()).collect(),
        }
    }
}

impl Recommender for MostPopular {
    fn recommend(&self, _user: &UserId, top_n: usize) -> Recommendation {
        if self.ranking.is_empty() {
            return Recommendation::Empty;
        }
        Recommendation::Items(self.ranking.iter().take(top_n).cloned().collect())
    }
}

/// Recommends distinct random catalog items.
///
/// Each user gets a stream seeded from `(seed, user id)`, so repeated calls
/// for one user agree and whole runs are reproducible.
#[derive(Debug, Clone)]
pub struct RandomItems {
    catalog: Vec<ItemId>,
    seed: u64,
}

impl RandomItems {
    /// Builds the baseline over `catalog`, sorted for a stable draw order.
    pub fn new(catalog: &HashSet<ItemId>, seed: u64) -> Self {
        let mut catalog: Vec<ItemId> = catalog.iter().cloned().collect();
        catalog.sort();
        Self { catalog, seed }
    }
}

impl Recommender for RandomItems {
    fn recommend(&self, user: &UserId, top_n: usize) -> Recommendation {
        if self.catalog.is_empty() {
            return Recommendation::Empty;
        }

        let mut order: Vec<usize> = (0..self.catalog.len()).collect();
        let n = top_n.min(order.len());
        LcgRng::keyed(self.seed, user.as_str()).shuffle_prefix(&mut order, n);

        Recommendation::Items(order[..n].iter().map(|&i| self.catalog[i].clone()).collect())
    }
}

/// A baseline chosen at runtime.
#[derive(Debug, Clone)]
pub enum Baseline {
    Popular(MostPopular),
    Random(RandomItems),
}

impl Baseline {
    /// Builds the baseline `kind` from the training log and item catalog.
    pub fn build(
        kind: SystemKind,
        train_log: &InteractionLog,
        catalog: &HashSet<ItemId>,
        seed: u64,
    ) -> Self {
        match kind {
            SystemKind::Popular => Baseline::Popular(MostPopular::fit(train_log)),
            SystemKind::Random => Baseline::Random(RandomItems::new(catalog, seed)),
        }
    }
}

impl Recommender for Baseline {
    fn recommend(&self, user: &UserId, top_n: usize) -> Recommendation {
        match self {
            Baseline::Popular(inner) => inner.recommend(user, top_n),
            Baseline::Random(inner) => inner.recommend(user, top_n),
        }
    }
}
