//! Typed access to fixed, unstructured storage slots.
use alloc::{vec, vec::Vec};

use alloy_primitives::U256;
use stylus_sdk::prelude::*;

const SLOT_BYTE_SPACE: u8 = 32;

/// Typed access to fixed storage slots.
///
/// A proxy shares its storage with whatever implementation runs behind it, so
/// it cannot keep its own state in regular `#[storage]` fields: those start at
/// slot zero, exactly where the implementation keeps its fields. Instead the
/// proxy stores everything at pseudo-random slots (ERC-1967 style), out of the
/// way of any sequentially laid out contract.
///
/// [`StorageSlot`] occupies no storage itself.
#[storage]
pub struct StorageSlot;

impl StorageSlot {
    /// Returns a [`StorageType`] located at `slot`.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `slot` - The slot the value lives at.
    #[must_use]
    pub fn get_slot<ST: StorageType>(&self, slot: impl Into<U256>) -> ST {
        // SAFETY: `ST::SLOT_BYTES` is never larger than 32, so the offset
        // cannot underflow and the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        unsafe {
            ST::new(
                slot.into(),
                SLOT_BYTE_SPACE - ST::SLOT_BYTES as u8,
                self.__stylus_host.clone(),
            )
        }
    }
}
