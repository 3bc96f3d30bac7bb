//! # hike_cpi
//!
//! Pinned interface of the external `hike_to_mint` program: program ids,
//! the ordered account-role list of `mint_nft`, and the instruction builders
//! a client needs to assemble a mint transaction. All targets are
//! hardcoded; nothing here is user-supplied.

// `system_instruction` is re-exported through a deprecated path in
// solana-sdk 2.x; the instruction layout itself is stable.
#![allow(deprecated)]

pub mod constants;
pub mod instructions;

pub use constants::*;
