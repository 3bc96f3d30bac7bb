//! Mint submission: one attempt per call, reported once.
//!
//! The transaction carries three instructions: create the mint account,
//! create the payer's associated token account, then `mint_nft`. A failure
//! after the chain has applied part of it is not reconciled here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hike_cpi::instructions::{
    associated_token_address, build_mint_nft_ix, create_associated_token_account_ix,
    create_mint_account_ix, MintNftAccountKeys, MintNftArgs,
};
use hike_cpi::{HIKE_TO_MINT_PROGRAM_ID, MINT_SIZE, TOKEN_2022_PROGRAM_ID};
use proximity::{is_eligible, Landmark};
use solana_sdk::{
    hash::Hash,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::PassportConfig;
use crate::rpc::{Rpc, RpcError};
use crate::wallet::Wallet;

#[derive(Debug, Error)]
pub enum MintError {
    #[error("Please connect your wallet first!")]
    WalletNotConnected,

    #[error("Not close enough to {landmark}: get within {radius_m}m to mint")]
    NotEligible { landmark: String, radius_m: f64 },

    #[error("A mint is already in progress")]
    MintInProgress,

    #[error("Failed to build mint transaction: {0}")]
    Instruction(String),

    #[error("Minting failed: {0}")]
    MintSubmissionFailed(String),
}

/// Chain-side messages pass through untouched; transport failures keep their
/// own description.
impl From<RpcError> for MintError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Rpc(m) | RpcError::TransactionFailed(m) => MintError::MintSubmissionFailed(m),
            other => MintError::MintSubmissionFailed(other.to_string()),
        }
    }
}

/// Clears the in-progress flag when the submission ends, however it ends.
struct InProgress<'a>(&'a AtomicBool);

impl<'a> InProgress<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, MintError> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(MintError::MintInProgress);
        }
        Ok(Self(flag))
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Assemble and sign the mint transaction for a fresh `mint` keypair.
pub fn build_mint_transaction(
    payer: &dyn Signer,
    mint: &Keypair,
    args: &MintNftArgs,
    lamports: u64,
    blockhash: Hash,
) -> Result<Transaction, MintError> {
    let payer_pk = payer.pubkey();
    let mint_pk = mint.pubkey();
    let destination = associated_token_address(&payer_pk, &mint_pk, &TOKEN_2022_PROGRAM_ID);

    let keys = MintNftAccountKeys {
        payer: payer_pk,
        mint: mint_pk,
        destination,
    };
    let mint_ix = build_mint_nft_ix(HIKE_TO_MINT_PROGRAM_ID, keys, args)
        .map_err(|e| MintError::Instruction(e.to_string()))?;

    let ixs = [
        create_mint_account_ix(&payer_pk, &mint_pk, lamports),
        create_associated_token_account_ix(&payer_pk, &payer_pk, &mint_pk, &TOKEN_2022_PROGRAM_ID),
        mint_ix,
    ];

    let mut tx = Transaction::new_with_payer(&ixs, Some(&payer_pk));
    let signers: [&dyn Signer; 2] = [payer, mint];
    tx.try_sign(&signers, blockhash)
        .map_err(|e| MintError::Instruction(format!("sign: {e}")))?;
    Ok(tx)
}

pub struct Minter<W> {
    rpc: Rpc,
    wallet: W,
    radius_m: f64,
    category: String,
    metadata_uri: String,
    confirm_timeout: Duration,
    in_progress: AtomicBool,
}

impl<W: Wallet> Minter<W> {
    pub fn new(rpc: Rpc, wallet: W, cfg: &PassportConfig) -> Self {
        Self {
            rpc,
            wallet,
            radius_m: cfg.radius_meters,
            category: cfg.category.clone(),
            metadata_uri: cfg.metadata_uri.clone(),
            confirm_timeout: cfg.confirm_timeout(),
            in_progress: AtomicBool::new(false),
        }
    }

    /// Mint the badge for `landmark` if `distance_m` is within the radius.
    pub async fn mint(
        &self,
        landmark: &Landmark,
        distance_m: Option<f64>,
    ) -> Result<Signature, MintError> {
        let Some(payer) = self.wallet.signer() else {
            warn!("Mint requested without a connected wallet");
            return Err(MintError::WalletNotConnected);
        };
        if !distance_m.is_some_and(|d| is_eligible(d, self.radius_m)) {
            return Err(MintError::NotEligible {
                landmark: landmark.name.clone(),
                radius_m: self.radius_m,
            });
        }
        let _guard = InProgress::acquire(&self.in_progress)?;

        info!("Minting your {} Badge...", landmark.name);
        match self.submit(payer, landmark).await {
            Ok(sig) => {
                info!(
                    "Successfully minted! You've conquered {}! ({})",
                    landmark.name, sig
                );
                Ok(sig)
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    async fn submit(&self, payer: &dyn Signer, landmark: &Landmark) -> Result<Signature, MintError> {
        let mint = Keypair::new();
        let lamports = self.rpc.get_minimum_balance_for_rent_exemption(MINT_SIZE).await?;
        let blockhash = self.rpc.get_latest_blockhash().await?;

        let args = MintNftArgs {
            name: landmark.name.clone(),
            symbol: self.category.clone(),
            uri: self.metadata_uri.clone(),
        };
        let tx = build_mint_transaction(payer, &mint, &args, lamports, blockhash)?;
        info!("Mint account: {}", mint.pubkey());

        let sig = self.rpc.send_transaction(&tx).await?;
        self.rpc
            .wait_for_signature_confirmation(&sig, self.confirm_timeout)
            .await?;
        Ok(sig)
    }
}
