//! Upgradeable proxy that delegates every unmatched call to an
//! implementation contract.
use alloc::vec::Vec;

use alloy_primitives::Address;
use stylus_sdk::{
    call::{self, Call, Error},
    prelude::*,
    ArbResult,
};

pub mod ossifiable;

/// Dispatch seam between a proxy and the code it runs.
///
/// The proxy never calls its implementation as a separate contract. It runs
/// the implementation's code against its own storage and identity through
/// `delegatecall`, so state written by the implementation lives in the proxy.
///
/// Implementors decide which implementation a call is delegated to, or
/// whether it is delegated at all, through
/// [`IProxy::resolve_implementation`].
pub trait IProxy: TopLevelStorage + Sized {
    /// Returns the implementation that should execute `calldata` for the
    /// current caller, or the encoded reason to reject the call.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `calldata` - The calldata of the incoming call.
    ///
    /// # Errors
    ///
    /// * Any encoded error of the proxy when the call must not be forwarded.
    fn resolve_implementation(
        &self,
        calldata: &[u8],
    ) -> Result<Address, Vec<u8>>;

    /// Executes the code at `implementation` against this contract's state.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `implementation` - The contract whose code is executed.
    /// * `calldata` - The calldata handed to that code.
    ///
    /// # Errors
    ///
    /// * [`Error`] - If the delegated code reverts.
    fn delegate(
        &mut self,
        implementation: Address,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Error> {
        unsafe {
            call::delegate_call(Call::new_in(self), implementation, calldata)
        }
    }

    /// Fallback routine. Resolves the implementation for `calldata` and
    /// delegates to it, returning its output (or its revert data) verbatim.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `calldata` - The calldata of the incoming call.
    ///
    /// # Errors
    ///
    /// * The rejection reason from [`IProxy::resolve_implementation`].
    /// * The revert data of the delegated call.
    fn do_fallback(&mut self, calldata: &[u8]) -> ArbResult {
        let implementation = self.resolve_implementation(calldata)?;
        Ok(self.delegate(implementation, calldata)?)
    }
}
