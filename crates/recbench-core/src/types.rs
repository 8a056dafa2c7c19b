//! Core data model: identifiers, interactions, and the interaction log.

use crate::error::InteractionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Opaque user identifier.
///
/// # Examples
///
/// ```
/// use recbench_core::types::UserId;
///
/// let user = UserId::from("U13740");
/// assert_eq!(user.as_str(), "U13740");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque item (news article) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an item id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One observation: a user was shown an item and either clicked it or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// User who saw the item
    pub user_id: UserId,
    /// Item that was shown
    pub news_id: ItemId,
    /// Whether the user engaged with the item (serialized as 0/1)
    #[serde(
        serialize_with = "serialize_clicked",
        deserialize_with = "deserialize_clicked"
    )]
    pub clicked: bool,
}

impl Interaction {
    /// Creates an interaction.
    pub fn new(user_id: impl Into<UserId>, news_id: impl Into<ItemId>, clicked: bool) -> Self {
        Self {
            user_id: user_id.into(),
            news_id: news_id.into(),
            clicked,
        }
    }

    /// Creates a positive (clicked) interaction.
    pub fn click(user_id: impl Into<UserId>, news_id: impl Into<ItemId>) -> Self {
        Self::new(user_id, news_id, true)
    }

    /// Creates a negative (shown but not clicked) interaction.
    pub fn skip(user_id: impl Into<UserId>, news_id: impl Into<ItemId>) -> Self {
        Self::new(user_id, news_id, false)
    }
}

/// Converts the integer click flag used by interaction logs.
pub fn clicked_from_int(value: i64) -> Result<bool, InteractionError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(InteractionError::InvalidClicked(other)),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClickedRepr {
    Flag(bool),
    Int(i64),
}

fn deserialize_clicked<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match ClickedRepr::deserialize(deserializer)? {
        ClickedRepr::Flag(flag) => Ok(flag),
        ClickedRepr::Int(value) => clicked_from_int(value).map_err(serde::de::Error::custom),
    }
}

fn serialize_clicked<S>(clicked: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*clicked))
}

/// Immutable, ordered table of interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionLog {
    rows: Vec<Interaction>,
}

impl InteractionLog {
    /// Creates a log from rows in their original order.
    pub fn new(rows: Vec<Interaction>) -> Self {
        Self { rows }
    }

    /// All rows, in log order.
    pub fn rows(&self) -> &[Interaction] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the log has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Groups rows by user.
    ///
    /// Every row lands in exactly one group. Groups come out in the order
    /// their user first appears; rows keep log order within a group.
    pub fn group_by_user(&self) -> Vec<UserGroup<'_>> {
        let mut index: HashMap<&UserId, usize> = HashMap::new();
        let mut groups: Vec<UserGroup<'_>> = Vec::new();

        for row in &self.rows {
            let slot = *index.entry(&row.user_id).or_insert_with(|| {
                groups.push(UserGroup {
                    user_id: &row.user_id,
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].rows.push(row);
        }

        groups
    }

    /// Distinct users in first-seen order.
    pub fn users(&self) -> Vec<UserId> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| seen.insert(&row.user_id))
            .map(|row| row.user_id.clone())
            .collect()
    }

    /// Distinct items that appear anywhere in the log.
    pub fn items(&self) -> HashSet<ItemId> {
        self.rows.iter().map(|row| row.news_id.clone()).collect()
    }
}

impl From<Vec<Interaction>> for InteractionLog {
    fn from(rows: Vec<Interaction>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Interaction> for InteractionLog {
    fn from_iter<I: IntoIterator<Item = Interaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// All interactions of one user, borrowed from an [`InteractionLog`].
#[derive(Debug, Clone)]
pub struct UserGroup<'a> {
    /// User the rows belong to
    pub user_id: &'a UserId,
    /// Rows for this user, in log order
    pub rows: Vec<&'a Interaction>,
}

impl<'a> UserGroup<'a> {
    /// Distinct items this user clicked.
    pub fn positive_items(&self) -> HashSet<&'a ItemId> {
        self.rows
            .iter()
            .filter(|row| row.clicked)
            .map(|row| &row.news_id)
            .collect()
    }

    /// Returns true if the user clicked at least one item.
    pub fn has_positive(&self) -> bool {
        self.rows.iter().any(|row| row.clicked)
    }
}
