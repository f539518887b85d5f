// default implementations don't always make sense...
#![allow(clippy::new_without_default)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(warnings)]
//! Firmware key wiki page tokenizer and key record normalizer.
//!
//! Key pages are wiki template invocations:
//!
//! ```text
//! {{keys
//!  | Version  = 13.0
//!  | Build    = 17A577
//!  | Device   = iPhone9,3
//!  | Codename = Yukon
//!  | IBoot    = iBoot.d10.RELEASE.im4p
//!  | IBootIV  = ...
//!  | IBootKey = ...
//! }}
//! ```
//!
//! [tokenize] flattens the markup into a [TokenMap], [normalize] turns
//! that into a [FirmwareKeySet] with one [KeyRecord] per component in
//! the fixed [COMPONENTS] order.
//!
//! ```
//! use firmware_keys_api::prelude::*;
//!
//! let set = extract(
//!     "{{keys |Device = iPhone9,3 |Build = 17A577 |Codename = D10 |LLB = LLB.d10 }}",
//!     None,
//! )
//! .unwrap();
//! assert_eq!("LLB.d10", set.keys[0].filename());
//! ```

/// Re-exported dependencies.
pub mod dependencies {
    pub use futures;
    pub use one_err;
    pub use serde;
    pub use serde_json;
    pub use time;
    pub use tracing;
}

/// Re-export module of all the types needed to extract firmware keys.
pub mod prelude {
    pub use crate::component::*;
    pub use crate::error::*;
    pub use crate::normalizer::*;
    pub use crate::page_source::traits::*;
    pub use crate::page_source::*;
    pub use crate::record::*;
    pub use crate::tokenizer::*;
}

#[allow(unused_imports)]
use prelude::*;

mod error;

pub mod component;
pub mod normalizer;
pub mod page_source;
pub mod record;
pub mod tokenizer;

/// The version of this library.
pub const KEYS_API_VER: &str = env!("CARGO_PKG_VERSION");
