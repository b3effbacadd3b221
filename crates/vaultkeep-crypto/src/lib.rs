#![doc = include_str!("../README.md")]

//! # Pinned heap data
//!
//! Key bytes live in `Pin<Box<GenericArray<..>>>`. A bare `GenericArray` is `Copy` and sits on
//! the stack, so every move of a key struct could leave a stray copy behind. Boxing keeps the
//! bytes in one heap allocation and pinning keeps them from being moved out of it. Together with
//! the zeroizing global allocator this means key material is wiped when it is freed.

#[cfg(not(feature = "no-memory-hardening"))]
#[global_allocator]
static ALLOC: ZeroizingAllocator<std::alloc::System> = ZeroizingAllocator(std::alloc::System);

mod aes;
mod enc_string;
pub use enc_string::EncString;
mod error;
pub(crate) use error::Result;
pub use error::{CryptoError, EncStringParseError};
mod keys;
pub use keys::*;
mod util;
pub use util::pbkdf2;
pub use zeroizing_alloc::ZeroAlloc as ZeroizingAllocator;
