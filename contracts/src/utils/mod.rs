//! Common Smart Contracts utilities.

pub mod storage_slot;
