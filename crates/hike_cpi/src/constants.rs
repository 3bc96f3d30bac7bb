//! Hardcoded identifiers for the hike_to_mint program.
//!
//! These MUST NOT be configurable at runtime. A change to the deployed
//! program's expected accounts must be mirrored in
//! [`crate::instructions::MintAccountRole`].

use solana_sdk::pubkey::Pubkey;

/// hike_to_mint program ID (devnet deployment).
pub const HIKE_TO_MINT_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("Hhf9G9gUrQRjJ1ZPhgrZzj3eAw8mofXtNg21WjtB2Pym");

/// SPL Token-2022. The program only accepts Token-2022 mints.
pub const TOKEN_2022_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// SPL Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Size of a base SPL mint account in bytes.
pub const MINT_SIZE: u64 = 82;

/// Anchor instruction name of the mint entrypoint.
pub const MINT_NFT_IX: &str = "mint_nft";

/// Category passed as the token symbol.
pub const DEFAULT_CATEGORY: &str = "Hike";
