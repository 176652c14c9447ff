//! Request authentication and authorisation protocol for the iov42 platform.
//!
//! Every write submitted to the platform carries:
//!
//! - one [`Authorisation`] per required signer, each signing the exact bytes
//!   of the [`FinalizedBody`] that will be transmitted;
//! - exactly one [`AuthenticationHeader`], signing the `;`-joined
//!   authorisation signatures in array order;
//! - optionally a claims disclosure header carrying plaintext claims whose
//!   hashes are already committed in the signed body.
//!
//! Cryptography is pluggable: this crate only consumes the
//! [`SigningCapability`] and [`SignatureVerifier`] traits. Concrete key types
//! live in `iov42-credentials`.
//!
//! Reads following a write are throttled by a [`ConsistencyWindow`], which
//! compensates for the platform replicating writes asynchronously.

mod authentication;
mod authorisation;
mod body;
mod capability;
mod claims;
mod codec;
mod consistency;
mod encoding;
mod error;
pub mod headers;
pub mod request;
mod write;

pub use authentication::*;
pub use authorisation::*;
pub use body::*;
pub use capability::*;
pub use claims::*;
pub use codec::*;
pub use consistency::*;
pub use encoding::{PublicKey, Signature};
pub use error::*;
pub use write::*;

#[cfg(test)]
pub(crate) mod testing;
