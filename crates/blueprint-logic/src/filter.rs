//! Sparse index-keyed signal tables: filters, request filters and
//! constant combinator outputs.

use blueprint_core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A canonical signal name with an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCount {
    pub name: String,
    pub count: i32,
}

impl SignalCount {
    pub fn new(name: impl Into<String>, count: i32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// SlotTable
// ---------------------------------------------------------------------------

/// Sparse index -> signal table. Iterates in ascending index order.
///
/// Clearing a slot removes the key; there are no empty placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotTable {
    slots: BTreeMap<u32, SignalCount>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `name` at `index` with `amount` (zero when absent), or delete
    /// the slot when `name` is `None`.
    pub fn set(&mut self, index: u32, name: Option<String>, amount: Option<i32>) {
        match name {
            Some(name) => {
                self.slots
                    .insert(index, SignalCount::new(name, amount.unwrap_or(0)));
            }
            None => {
                self.slots.remove(&index);
            }
        }
    }

    /// The signal stored at `index`, if the slot is filled.
    pub fn get(&self, index: u32) -> Option<&SignalCount> {
        self.slots.get(&index)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Filled slots, lowest index first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SignalCount)> {
        self.slots.iter().map(|(&i, s)| (i, s))
    }
}

// ---------------------------------------------------------------------------
// ConstantTable
// ---------------------------------------------------------------------------

/// Highest output slot of a constant combinator.
pub const MAX_CONSTANT_INDEX: u32 = 17;

/// A [`SlotTable`] limited to the constant combinator's output slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstantTable {
    slots: SlotTable,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`SlotTable::set`], but rejects indices outside `0..=17`.
    pub fn set(
        &mut self,
        index: i64,
        name: Option<String>,
        amount: Option<i32>,
    ) -> Result<(), ValidationError> {
        let slot = u32::try_from(index)
            .ok()
            .filter(|&i| i <= MAX_CONSTANT_INDEX)
            .ok_or(ValidationError::ConstantIndexOutOfRange(index))?;
        self.slots.set(slot, name, amount);
        Ok(())
    }

    pub fn get(&self, index: u32) -> Option<&SignalCount> {
        self.slots.get(index)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &SignalCount)> {
        self.slots.iter()
    }
}
