//! hike_to_mint instruction builders.
//!
//! A mint transaction is three instructions: create the mint account,
//! create the destination associated token account, then `mint_nft`.
//! The program initializes the mint itself, so the mint account is created
//! empty and owned by Token-2022.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program, sysvar,
};

use crate::constants::{ASSOCIATED_TOKEN_PROGRAM_ID, MINT_NFT_IX, MINT_SIZE, TOKEN_2022_PROGRAM_ID};

/// Anchor global instruction discriminator: `sha256("global:<name>")[..8]`.
pub fn anchor_discriminator(ix_name: &str) -> [u8; 8] {
    let mut h = Sha256::new();
    h.update(b"global:");
    h.update(ix_name.as_bytes());
    let out = h.finalize();
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&out[..8]);
    disc
}

/// Arguments of `mint_nft`, in on-chain order.
#[derive(BorshSerialize, Clone, Debug, PartialEq, Eq)]
pub struct MintNftArgs {
    /// Landmark name, stored as the token name.
    pub name: String,
    /// Badge category, stored as the token symbol.
    pub symbol: String,
    /// Off-chain metadata URI.
    pub uri: String,
}

/// Account roles expected by `mint_nft`.
///
/// The program resolves accounts by position, so [`MintAccountRole::ORDER`]
/// is the contract, not the declaration order of this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintAccountRole {
    Payer,
    Mint,
    Destination,
    TokenProgram,
    SystemProgram,
    Rent,
}

impl MintAccountRole {
    pub const ORDER: [MintAccountRole; 6] = [
        MintAccountRole::Payer,
        MintAccountRole::Mint,
        MintAccountRole::Destination,
        MintAccountRole::TokenProgram,
        MintAccountRole::SystemProgram,
        MintAccountRole::Rent,
    ];

    pub fn is_writable(self) -> bool {
        matches!(
            self,
            MintAccountRole::Payer | MintAccountRole::Mint | MintAccountRole::Destination
        )
    }

    pub fn is_signer(self) -> bool {
        matches!(self, MintAccountRole::Payer | MintAccountRole::Mint)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MintAccountRole::Payer => "payer",
            MintAccountRole::Mint => "mint",
            MintAccountRole::Destination => "destination",
            MintAccountRole::TokenProgram => "token_program",
            MintAccountRole::SystemProgram => "system_program",
            MintAccountRole::Rent => "rent",
        }
    }
}

/// Caller-supplied keys for `mint_nft`. Program and sysvar accounts are pinned.
#[derive(Clone, Copy, Debug)]
pub struct MintNftAccountKeys {
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub destination: Pubkey,
}

impl MintNftAccountKeys {
    pub fn key_for(&self, role: MintAccountRole) -> Pubkey {
        match role {
            MintAccountRole::Payer => self.payer,
            MintAccountRole::Mint => self.mint,
            MintAccountRole::Destination => self.destination,
            MintAccountRole::TokenProgram => TOKEN_2022_PROGRAM_ID,
            MintAccountRole::SystemProgram => system_program::id(),
            MintAccountRole::Rent => sysvar::rent::id(),
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        MintAccountRole::ORDER
            .iter()
            .map(|&role| {
                let key = self.key_for(role);
                if role.is_writable() {
                    AccountMeta::new(key, role.is_signer())
                } else {
                    AccountMeta::new_readonly(key, role.is_signer())
                }
            })
            .collect()
    }
}

pub fn build_mint_nft_ix(
    program_id: Pubkey,
    keys: MintNftAccountKeys,
    args: &MintNftArgs,
) -> std::io::Result<Instruction> {
    let encoded = borsh::to_vec(args)?;
    let mut data = Vec::with_capacity(8 + encoded.len());
    data.extend_from_slice(&anchor_discriminator(MINT_NFT_IX));
    data.extend_from_slice(&encoded);

    Ok(Instruction {
        program_id,
        accounts: keys.to_account_metas(),
        data,
    })
}

/// Allocates the mint account, owned by Token-2022, funded for rent exemption.
pub fn create_mint_account_ix(payer: &Pubkey, mint: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::create_account(payer, mint, lamports, MINT_SIZE, &TOKEN_2022_PROGRAM_ID)
}

/// Derive the associated token account for `owner` and `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// `Create` (discriminant 0) on the associated token account program.
pub fn create_associated_token_account_ix(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    let ata = associated_token_address(owner, mint, token_program);
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: vec![0],
    }
}
