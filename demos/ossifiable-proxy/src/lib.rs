#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::vec::Vec;

use ossifiable_proxy_stylus::proxy::{
    ossifiable::{self, IOssifiableProxy, OssifiableProxy},
    IProxy,
};
use stylus_sdk::{
    abi::Bytes, alloy_primitives::Address, prelude::*, ArbResult,
};

#[entrypoint]
#[storage]
struct OssifiableProxyExample {
    proxy: OssifiableProxy,
}

#[public]
#[implements(IOssifiableProxy<Error = ossifiable::Error>)]
impl OssifiableProxyExample {
    #[constructor]
    fn constructor(&mut self, admin: Address) -> Result<(), ossifiable::Error> {
        self.proxy.constructor(admin)
    }

    #[fallback]
    #[payable]
    fn fallback(&mut self, calldata: &[u8]) -> ArbResult {
        self.do_fallback(calldata)
    }
}

#[public]
impl IOssifiableProxy for OssifiableProxyExample {
    type Error = ossifiable::Error;

    #[selector(name = "proxy_getAdmin")]
    fn get_admin(&self) -> Address {
        self.proxy.admin()
    }

    #[selector(name = "proxy_getIsOssified")]
    fn get_is_ossified(&self) -> bool {
        self.proxy.is_ossified()
    }

    fn implementation(&self) -> Address {
        self.proxy.implementation()
    }

    #[selector(name = "proxy_upgradeTo")]
    fn upgrade_to(
        &mut self,
        new_implementation: Address,
        setup_calldata: Bytes,
    ) -> Result<(), Self::Error> {
        self.proxy.upgrade_to_and_call(new_implementation, &setup_calldata)
    }

    #[selector(name = "proxy_changeAdmin")]
    fn change_admin(&mut self, new_admin: Address) -> Result<(), Self::Error> {
        self.proxy.change_admin(new_admin)
    }
}

impl IProxy for OssifiableProxyExample {
    fn resolve_implementation(
        &self,
        calldata: &[u8],
    ) -> Result<Address, Vec<u8>> {
        self.proxy.resolve_implementation(calldata)
    }
}
