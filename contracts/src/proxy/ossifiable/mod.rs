//! Upgradeable proxy administered by a single account, that can be frozen
//! forever.
//!
//! Calls that don't match an administrative selector are delegated to the
//! current implementation, see [`IProxy`]. The admin (usually a governance
//! voting contract) can:
//!
//! * upgrade the implementation, optionally running a setup call against the
//!   proxy's storage ([`OssifiableProxy::upgrade_to_and_call`]),
//! * hand the admin role over to another account
//!   ([`OssifiableProxy::change_admin`]).
//!
//! Handing the role over to [`Address::ZERO`] *ossifies* the proxy. There is
//! no separate entry point for it, and there is no way back: an ossified proxy
//! rejects every administrative call, including from its former admin, and
//! keeps delegating to its last implementation for good.
//!
//! While the proxy is active the admin is not allowed to reach the
//! implementation through the fallback, so implementation selectors can never
//! be shadowed by the administrative ones. Bare value transfers are rejected
//! from any caller.
//!
//! The proxy state lives at ERC-1967 slots (plus a dedicated slot for the
//! ossified flag), so it never collides with the storage layout of the
//! implementation running on top of it.
use alloc::{vec, vec::Vec};
use core::fmt;

use alloy_primitives::{uint, Address, U256};
pub use sol::*;
use stylus_sdk::{
    abi::Bytes,
    call::{self, MethodError},
    evm, msg,
    prelude::*,
    storage::{StorageAddress, StorageBool},
};

pub use self::status::ProxyStatus;
use crate::{proxy::IProxy, utils::storage_slot::StorageSlot};

pub mod status;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the implementation is upgraded.
        ///
        /// * `implementation` - Address of the new implementation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Upgraded(address indexed implementation);

        /// Emitted when the admin account has changed. A `new_admin` of
        /// [`alloy_primitives::Address::ZERO`] marks the ossification.
        ///
        /// * `previous_admin` - Address of the previous admin.
        /// * `new_admin` - Address of the new admin.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event AdminChanged(address indexed previous_admin, address indexed new_admin);
    }

    sol! {
        /// The admin is not a valid admin account (eg. the zero address).
        ///
        /// * `admin` - Account that's not allowed to become the admin.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ProxyInvalidAdmin(address admin);

        /// The caller account is not authorized to perform an
        /// administrative operation.
        ///
        /// * `account` - Account that was found to not be authorized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ProxyUnauthorized(address account);

        /// The proxy is ossified, administrative operations are disabled.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ProxyOssified();

        /// A call was forwarded before any implementation was set.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ProxyNoImplementation();

        /// The proxy doesn't accept bare value transfers, and doesn't let its
        /// admin reach the implementation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ProxyUnsupportedTransfer();

        /// The new implementation is not a contract.
        ///
        /// * `implementation` - Address of the invalid implementation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ProxyInvalidImplementation(address implementation);

        /// The setup call to a new implementation reverted without a reason.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error FailedCall();

        /// The setup call to a new implementation reverted with a reason.
        ///
        /// * `reason` - The revert data returned by the setup call.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error FailedCallWithReason(bytes reason);
    }
}

/// An error that occurred in the implementation of an [`OssifiableProxy`].
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The admin is not a valid admin account (eg. the zero address).
    InvalidAdmin(ProxyInvalidAdmin),
    /// The caller account is not authorized to perform an administrative
    /// operation.
    Unauthorized(ProxyUnauthorized),
    /// The proxy is ossified.
    Ossified(ProxyOssified),
    /// A call was forwarded before any implementation was set.
    NoImplementation(ProxyNoImplementation),
    /// Bare value transfer, or the admin trying to reach the implementation.
    UnsupportedTransfer(ProxyUnsupportedTransfer),
    /// The new implementation is not a contract.
    InvalidImplementation(ProxyInvalidImplementation),
    /// The setup call reverted without a reason.
    FailedCall(FailedCall),
    /// The setup call reverted with a reason.
    FailedCallWithReason(FailedCallWithReason),
}

impl Error {
    /// Human readable rejection reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidAdmin(_) => "proxy: invalid admin",
            Error::Unauthorized(_) => "proxy: unauthorized",
            Error::Ossified(_) => "proxy: ossified",
            Error::NoImplementation(_) => "proxy: no implementation",
            Error::UnsupportedTransfer(_) => "not supported",
            Error::InvalidImplementation(_) => "proxy: invalid implementation",
            Error::FailedCall(_) | Error::FailedCallWithReason(_) => {
                "proxy: setup call failed"
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// Storage slot with the address of the current implementation.
/// This is the keccak-256 hash of "eip1967.proxy.implementation" subtracted by
/// 1.
pub const IMPLEMENTATION_SLOT: U256 = uint!(
    0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc_U256
);

/// Storage slot with the admin of the proxy.
/// This is the keccak-256 hash of "eip1967.proxy.admin" subtracted by 1.
pub const ADMIN_SLOT: U256 = uint!(
    0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103_U256
);

/// Storage slot with the ossified flag of the proxy.
/// This is the keccak-256 hash of "ossifiable.proxy.ossified" subtracted by 1.
pub const OSSIFIED_SLOT: U256 = uint!(
    0x5b1902201cbeffdc6ad75d3b26a4600e5864e793c0de1d936f2fd1f1d097eae1_U256
);

/// State of an [`OssifiableProxy`].
///
/// Holds no regular fields: everything lives at [`IMPLEMENTATION_SLOT`],
/// [`ADMIN_SLOT`] and [`OSSIFIED_SLOT`].
#[storage]
pub struct OssifiableProxy {
    storage_slot: StorageSlot,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self` when
/// calling other contracts and not `&mut (impl TopLevelStorage +
/// BorrowMut<Self>)`. Should be fixed in the future by the Stylus team.
unsafe impl TopLevelStorage for OssifiableProxy {}

/// Interface for an [`OssifiableProxy`] contract.
pub trait IOssifiableProxy {
    /// The error type associated to the trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Returns the current admin, or [`Address::ZERO`] once ossified.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    fn get_admin(&self) -> Address;

    /// Returns whether the proxy is ossified.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    fn get_is_ossified(&self) -> bool;

    /// Returns the current implementation, or [`Address::ZERO`] if the proxy
    /// was never upgraded.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    fn implementation(&self) -> Address;

    /// Upgrades the proxy to `new_implementation` and, if `setup_calldata` is
    /// not empty, delegates it to the new implementation. Can only be called
    /// by the admin of an active proxy.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The address of the new implementation.
    /// * `setup_calldata` - Calldata executed against the proxy's storage
    ///   right after the upgrade.
    ///
    /// # Errors
    ///
    /// * [`Error::Ossified`] - If the proxy is ossified.
    /// * [`Error::Unauthorized`] - If not called by the admin.
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    /// * [`Error::FailedCall`] - If the setup call reverted without a reason.
    /// * [`Error::FailedCallWithReason`] - If the setup call reverted with a
    ///   reason.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    fn upgrade_to(
        &mut self,
        new_implementation: Address,
        setup_calldata: Bytes,
    ) -> Result<(), Self::Error>;

    /// Transfers the admin role to `new_admin`. Transferring it to
    /// [`Address::ZERO`] ossifies the proxy. Can only be called by the admin
    /// of an active proxy.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_admin` - The next admin of this proxy.
    ///
    /// # Errors
    ///
    /// * [`Error::Ossified`] - If the proxy is ossified.
    /// * [`Error::Unauthorized`] - If not called by the admin.
    ///
    /// # Events
    ///
    /// * [`AdminChanged`].
    fn change_admin(&mut self, new_admin: Address) -> Result<(), Self::Error>;
}

#[public]
#[implements(IOssifiableProxy<Error = Error>)]
impl OssifiableProxy {
    /// Constructor.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `admin` - The initial admin of this proxy.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAdmin`] - If `admin` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`AdminChanged`].
    #[constructor]
    pub fn constructor(&mut self, admin: Address) -> Result<(), Error> {
        if admin.is_zero() {
            return Err(Error::InvalidAdmin(ProxyInvalidAdmin { admin }));
        }
        self._change_admin(admin);
        Ok(())
    }
}

#[public]
impl IOssifiableProxy for OssifiableProxy {
    type Error = Error;

    #[selector(name = "proxy_getAdmin")]
    fn get_admin(&self) -> Address {
        self.admin()
    }

    #[selector(name = "proxy_getIsOssified")]
    fn get_is_ossified(&self) -> bool {
        self.is_ossified()
    }

    fn implementation(&self) -> Address {
        self.implementation()
    }

    #[selector(name = "proxy_upgradeTo")]
    fn upgrade_to(
        &mut self,
        new_implementation: Address,
        setup_calldata: Bytes,
    ) -> Result<(), Self::Error> {
        self.upgrade_to_and_call(new_implementation, &setup_calldata)
    }

    #[selector(name = "proxy_changeAdmin")]
    fn change_admin(&mut self, new_admin: Address) -> Result<(), Self::Error> {
        self.change_admin(new_admin)
    }
}

impl OssifiableProxy {
    /// Returns the lifecycle state of the proxy.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn status(&self) -> ProxyStatus {
        let admin =
            self.storage_slot.get_slot::<StorageAddress>(ADMIN_SLOT).get();
        let ossified =
            self.storage_slot.get_slot::<StorageBool>(OSSIFIED_SLOT).get();
        ProxyStatus::from_raw(admin, ossified)
    }

    /// Returns the current admin, or [`Address::ZERO`] once ossified.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.status().admin()
    }

    /// Returns whether the proxy is ossified.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn is_ossified(&self) -> bool {
        self.status().is_ossified()
    }

    /// Returns the current implementation.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn implementation(&self) -> Address {
        self.storage_slot.get_slot::<StorageAddress>(IMPLEMENTATION_SLOT).get()
    }

    /// Upgrades the proxy to `new_implementation`, running `setup_calldata`
    /// against the proxy's storage when it is not empty.
    ///
    /// Either the whole upgrade commits or nothing changes: if the setup call
    /// reverts, the previous implementation stays in place and no event is
    /// emitted.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The address of the new implementation.
    /// * `setup_calldata` - Calldata delegated to the new implementation.
    ///
    /// # Errors
    ///
    /// * [`Error::Ossified`] - If the proxy is ossified.
    /// * [`Error::Unauthorized`] - If not called by the admin.
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    /// * [`Error::FailedCall`] - If the setup call reverted without a reason.
    /// * [`Error::FailedCallWithReason`] - If the setup call reverted with a
    ///   reason.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    pub fn upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        setup_calldata: &[u8],
    ) -> Result<(), Error> {
        self.only_admin()?;
        self._upgrade_to_and_call(new_implementation, setup_calldata)
    }

    /// Transfers the admin role to `new_admin`, ossifying the proxy when
    /// `new_admin` is [`Address::ZERO`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_admin` - The next admin of this proxy.
    ///
    /// # Errors
    ///
    /// * [`Error::Ossified`] - If the proxy is ossified.
    /// * [`Error::Unauthorized`] - If not called by the admin.
    ///
    /// # Events
    ///
    /// * [`AdminChanged`].
    pub fn change_admin(&mut self, new_admin: Address) -> Result<(), Error> {
        self.only_admin()?;
        self._change_admin(new_admin);
        Ok(())
    }

    /// Decides whether a call from `caller`, carrying `value` and
    /// `calldata`, may be forwarded, and to which implementation.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `caller` - The account performing the call.
    /// * `value` - The value attached to the call.
    /// * `calldata` - The calldata of the call.
    ///
    /// # Errors
    ///
    /// * [`Error::UnsupportedTransfer`] - If `calldata` is empty while
    ///   `value` is not zero, or if `caller` is the admin of an active proxy.
    /// * [`Error::NoImplementation`] - If no implementation was set yet.
    pub fn forwarding_target(
        &self,
        caller: Address,
        value: U256,
        calldata: &[u8],
    ) -> Result<Address, Error> {
        if calldata.is_empty() && !value.is_zero() {
            return Err(ProxyUnsupportedTransfer {}.into());
        }

        if self.status().is_admin(caller) {
            return Err(ProxyUnsupportedTransfer {}.into());
        }

        let implementation = self.implementation();
        if implementation.is_zero() {
            return Err(ProxyNoImplementation {}.into());
        }

        Ok(implementation)
    }
}

impl OssifiableProxy {
    /// Checks that the proxy is active and [`msg::sender`] is its admin.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::Ossified`] - If the proxy is ossified.
    /// * [`Error::Unauthorized`] - If called by any account other than the
    ///   admin.
    pub fn only_admin(&self) -> Result<(), Error> {
        match self.status() {
            ProxyStatus::Ossified => Err(ProxyOssified {}.into()),
            ProxyStatus::Active { admin } => {
                let account = msg::sender();
                if account != admin {
                    return Err(ProxyUnauthorized { account }.into());
                }
                Ok(())
            }
        }
    }

    /// Sets the admin without access restriction. A zero `new_admin` ossifies
    /// the proxy.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_admin` - Account that is going to be the next admin.
    ///
    /// # Events
    ///
    /// * [`AdminChanged`].
    fn _change_admin(&mut self, new_admin: Address) {
        let previous_admin = self.admin();

        self.storage_slot.get_slot::<StorageAddress>(ADMIN_SLOT).set(new_admin);
        if new_admin.is_zero() {
            self.storage_slot.get_slot::<StorageBool>(OSSIFIED_SLOT).set(true);
        }

        evm::log(AdminChanged { previous_admin, new_admin });
    }

    /// Sets the implementation without access restriction and runs the setup
    /// call, if any.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The address of the new implementation.
    /// * `setup_calldata` - Calldata delegated to the new implementation.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    /// * [`Error::FailedCall`] - If the setup call reverted without a reason.
    /// * [`Error::FailedCallWithReason`] - If the setup call reverted with a
    ///   reason.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    fn _upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        setup_calldata: &[u8],
    ) -> Result<(), Error> {
        if !new_implementation.has_code() {
            return Err(ProxyInvalidImplementation {
                implementation: new_implementation,
            }
            .into());
        }

        let previous_implementation = self.implementation();
        self._set_implementation(new_implementation);

        if !setup_calldata.is_empty() {
            if let Err(e) = self._setup_call(new_implementation, setup_calldata)
            {
                self._set_implementation(previous_implementation);
                return Err(e);
            }
        }

        evm::log(Upgraded { implementation: new_implementation });

        Ok(())
    }

    fn _set_implementation(&mut self, implementation: Address) {
        self.storage_slot
            .get_slot::<StorageAddress>(IMPLEMENTATION_SLOT)
            .set(implementation);
    }

    /// Delegates `setup_calldata` to `implementation`, discarding its output.
    ///
    /// # Errors
    ///
    /// * [`Error::FailedCall`] - If the call reverted without a reason.
    /// * [`Error::FailedCallWithReason`] - If the call reverted with a reason,
    ///   or its output could not be handled.
    fn _setup_call(
        &mut self,
        implementation: Address,
        setup_calldata: &[u8],
    ) -> Result<(), Error> {
        self.delegate(implementation, setup_calldata)
            .map(drop)
            .map_err(Self::setup_call_failure)
    }

    /// Maps a failed setup call to [`Error::FailedCall`] when it reverted
    /// without data, and to [`Error::FailedCallWithReason`] otherwise.
    fn setup_call_failure(error: call::Error) -> Error {
        match &error {
            call::Error::Revert(data) if data.is_empty() => FailedCall {}.into(),
            _ => {
                let reason = Vec::<u8>::from(error).into();
                FailedCallWithReason { reason }.into()
            }
        }
    }
}

impl IProxy for OssifiableProxy {
    fn resolve_implementation(
        &self,
        calldata: &[u8],
    ) -> Result<Address, Vec<u8>> {
        Ok(self.forwarding_target(msg::sender(), msg::value(), calldata)?)
    }
}
