//! Lifecycle of an [`super::OssifiableProxy`].
use alloy_primitives::Address;

/// The administrative state a proxy is in.
///
/// A proxy starts [`ProxyStatus::Active`] and can only move to
/// [`ProxyStatus::Ossified`], which is terminal. Privileged code must match on
/// this value instead of comparing the admin against [`Address::ZERO`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyStatus {
    /// The proxy is administered by `admin`. Upgrades and admin changes are
    /// possible.
    Active {
        /// Account allowed to perform administrative operations.
        admin: Address,
    },
    /// The proxy has no admin anymore. Upgrades and admin changes are
    /// disabled forever.
    Ossified,
}

impl ProxyStatus {
    /// Builds the status out of the raw stored values.
    ///
    /// The `ossified` flag wins over whatever admin is stored, so a stale
    /// admin value can never bring an ossified proxy back to life.
    #[must_use]
    pub fn from_raw(admin: Address, ossified: bool) -> Self {
        if ossified {
            ProxyStatus::Ossified
        } else {
            ProxyStatus::Active { admin }
        }
    }

    /// Returns the current admin, or [`Address::ZERO`] once ossified.
    #[must_use]
    pub fn admin(&self) -> Address {
        match self {
            ProxyStatus::Active { admin } => *admin,
            ProxyStatus::Ossified => Address::ZERO,
        }
    }

    /// Whether the proxy reached its terminal state.
    #[must_use]
    pub fn is_ossified(&self) -> bool {
        matches!(self, ProxyStatus::Ossified)
    }

    /// Whether `account` is the admin of an active proxy.
    #[must_use]
    pub fn is_admin(&self, account: Address) -> bool {
        matches!(self, ProxyStatus::Active { admin } if *admin == account)
    }
}
