use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The fixed vocabulary of roles the backend can assign
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
pub enum Role {
    Admin,
    ShelterStaff,
    Donor,
    Volunteer,
    Adopter,
}

/// Unique and order irrelevant collection of roles
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(BTreeSet::new());

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from the names returned by the backend
    ///
    /// Names outside of the vocabulary are dropped (and logged) instead of
    /// failing the whole set
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = Self::default();
        for name in names {
            let name = name.as_ref();
            match name.trim().parse::<Role>() {
                Ok(role) => {
                    result.0.insert(role);
                }
                Err(_) => warn!(?name, "dropping unknown role name"),
            }
        }
        result
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if at least one role is shared between the two sets
    pub fn intersects(&self, other: &RoleSet) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl From<&[Role]> for RoleSet {
    fn from(value: &[Role]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(value: [Role; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
