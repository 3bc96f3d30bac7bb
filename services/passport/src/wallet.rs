use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};
use tracing::warn;

use crate::config::expand_tilde;

/// Source of the payer identity. `None` means no wallet is connected.
pub trait Wallet {
    fn pubkey(&self) -> Option<Pubkey>;
    fn signer(&self) -> Option<&dyn Signer>;
}

/// Wallet backed by a local keypair file.
pub struct KeypairWallet {
    keypair: Option<Keypair>,
}

impl KeypairWallet {
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Some(keypair),
        }
    }

    pub fn disconnected() -> Self {
        Self { keypair: None }
    }

    /// A missing or unreadable keypair leaves the wallet disconnected.
    pub fn connect(path: &str) -> Self {
        match load_keypair(path) {
            Ok(k) => Self::from_keypair(k),
            Err(e) => {
                warn!("Wallet not connected: {}", e);
                Self::disconnected()
            }
        }
    }
}

impl Wallet for KeypairWallet {
    fn pubkey(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|k| k.pubkey())
    }

    fn signer(&self) -> Option<&dyn Signer> {
        self.keypair.as_ref().map(|k| k as &dyn Signer)
    }
}

pub fn load_keypair(path: &str) -> Result<Keypair, String> {
    let expanded = expand_tilde(path);
    read_keypair_file(&expanded).map_err(|e| format!("read keypair {}: {e}", expanded.display()))
}
