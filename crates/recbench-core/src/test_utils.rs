//! Test utilities for recbench-core.
//!
//! Small builders for interaction logs and canned recommenders.
//! Only compiled when running tests.

use crate::recommender::Recommendation;
use crate::types::{Interaction, InteractionLog, ItemId, UserId};
use std::collections::HashMap;

/// Builds a log from `(user, item, clicked)` triples.
pub fn log(rows: &[(&str, &str, u8)]) -> InteractionLog {
    rows.iter()
        .map(|&(user, item, clicked)| Interaction::new(user, item, clicked == 1))
        .collect()
}

/// Builds a recommender that returns a fixed, whitespace-separated item list
/// per user and [`Recommendation::Empty`] for everyone else.
///
/// The list is truncated to the requested `top_n`.
pub fn fixed_recommender(table: &[(&str, &str)]) -> impl Fn(&UserId, usize) -> Recommendation {
    let table: HashMap<UserId, Vec<ItemId>> = table
        .iter()
        .map(|&(user, items)| {
            (
                UserId::from(user),
                items.split_whitespace().map(ItemId::from).collect(),
            )
        })
        .collect();

    move |user: &UserId, top_n: usize| match table.get(user) {
        Some(items) => Recommendation::Items(items.iter().take(top_n).cloned().collect()),
        None => Recommendation::Empty,
    }
}

/// Builds a set of item ids.
pub fn items(ids: &[&str]) -> std::collections::HashSet<ItemId> {
    ids.iter().map(|&id| ItemId::from(id)).collect()
}

/// Builds a list of user ids.
pub fn users(ids: &[&str]) -> Vec<UserId> {
    ids.iter().map(|&id| UserId::from(id)).collect()
}
