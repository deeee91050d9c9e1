/*!
# Ossifiable Proxy for Stylus

An upgradeable proxy for
[Arbitrum Stylus](https://docs.arbitrum.io/stylus/stylus-gentle-introduction)
that is administered by a single authority (typically a governance voting
contract) and can be permanently frozen.

The proxy forwards every call that does not match one of its administrative
selectors to the current implementation with `delegatecall`, so the
implementation's code runs against the proxy's own storage. The admin can
upgrade the implementation and hand its role over to another account. Handing
the role over to [`Address::ZERO`] ossifies the proxy: from that moment on no
upgrade or admin change is possible, ever.

> This project has never been audited nor thoroughly reviewed for security
> vulnerabilities. Do not use in production.

## Usage

```toml
[dependencies]
ossifiable-proxy-stylus = "x.x.x"
```

Embed [`proxy::ossifiable::OssifiableProxy`] into your entrypoint and route
the fallback through it:

```ignore
use ossifiable_proxy_stylus::proxy::ossifiable::{self, OssifiableProxy};

#[entrypoint]
#[storage]
struct MyProxy {
    proxy: OssifiableProxy,
}

#[public]
impl MyProxy {
    #[constructor]
    fn constructor(&mut self, admin: Address) -> Result<(), ossifiable::Error> {
        self.proxy.constructor(admin)
    }

    #[fallback]
    #[payable]
    fn fallback(&mut self, calldata: &[u8]) -> ArbResult {
        self.proxy.do_fallback(calldata)
    }
}
```

[`Address::ZERO`]: alloy_primitives::Address::ZERO
*/

#![allow(clippy::pub_underscore_fields, clippy::module_name_repetitions)]
#![cfg_attr(not(feature = "std"), no_std, no_main)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod proxy;
pub mod utils;
