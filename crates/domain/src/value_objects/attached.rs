//! Assets attached to an invocation, aggregated by denomination.

use crate::error::DomainError;
use crate::math::rounding::add;
use crate::value_objects::{Amount, AssetAmount, Denom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The multiset of assets sent along with one invocation.
///
/// Several sends of the same denomination are summed. Iteration is always in
/// denomination order so downstream output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedAssets {
    amounts: BTreeMap<Denom, Amount>,
}

impl AttachedAssets {
    /// Creates an empty attachment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates a sequence of sends by denomination.
    pub fn from_assets<I>(assets: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = AssetAmount>,
    {
        let mut attached = Self::new();
        for asset in assets {
            attached.push(asset)?;
        }
        Ok(attached)
    }

    /// Adds one send to the set.
    pub fn push(&mut self, asset: AssetAmount) -> Result<(), DomainError> {
        let entry = self.amounts.entry(asset.denom).or_insert(Amount::ZERO);
        *entry = add(*entry, asset.amount)?;
        Ok(())
    }

    /// Number of distinct denominations attached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true if nothing was attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Aggregated amount for a denomination.
    #[must_use]
    pub fn get(&self, denom: &Denom) -> Option<Amount> {
        self.amounts.get(denom).copied()
    }

    /// Iterates the attachments in denomination order.
    pub fn iter(&self) -> impl Iterator<Item = AssetAmount> + '_ {
        self.amounts.iter().map(|(denom, amount)| AssetAmount {
            denom: denom.clone(),
            amount: *amount,
        })
    }

    /// Collects the attachments in denomination order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<AssetAmount> {
        self.iter().collect()
    }
}
