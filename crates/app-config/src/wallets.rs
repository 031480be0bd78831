// In crates/app-config/src/wallets.rs

use crate::Result;
use core_types::WalletAddressSet;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// File-backed persistence for the user's wallet addresses.
///
/// Subscribers only see a new value when a save actually changes the stored set.
#[derive(Debug)]
pub struct WalletStore {
    path: PathBuf,
    tx: watch::Sender<WalletAddressSet>,
}

impl WalletStore {
    /// Opens the store at `path`. A missing file is an empty address set.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let addresses = read_addresses(&path).await?;
        tracing::debug!(path = %path.display(), "Loaded wallet addresses.");
        let (tx, _rx) = watch::channel(addresses);
        Ok(Self { path, tx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current address set.
    pub fn addresses(&self) -> WalletAddressSet {
        self.tx.borrow().clone()
    }

    /// A receiver that is notified of each distinct saved value.
    pub fn subscribe(&self) -> watch::Receiver<WalletAddressSet> {
        self.tx.subscribe()
    }

    /// Persists `addresses` with every slot trimmed.
    ///
    /// Returns `false` without touching the file when nothing changed.
    pub async fn save(&self, addresses: &WalletAddressSet) -> Result<bool> {
        let trimmed = addresses.trimmed();
        if *self.tx.borrow() == trimmed {
            return Ok(false);
        }

        let contents = toml::to_string_pretty(&trimmed)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, contents).await?;
        tracing::info!(path = %self.path.display(), "Saved wallet addresses.");

        Ok(self.tx.send_if_modified(|current| {
            if *current == trimmed {
                false
            } else {
                *current = trimmed;
                true
            }
        }))
    }

    /// Applies `edit` to a copy of the current set and saves the result.
    pub async fn update<F>(&self, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut WalletAddressSet),
    {
        let mut addresses = self.addresses();
        edit(&mut addresses);
        self.save(&addresses).await
    }

    /// Re-reads the file, notifying subscribers if another process changed it.
    pub async fn reload(&self) -> Result<bool> {
        let addresses = read_addresses(&self.path).await?;
        let changed = self.tx.send_if_modified(|current| {
            if *current == addresses {
                false
            } else {
                *current = addresses;
                true
            }
        });
        if changed {
            tracing::info!(path = %self.path.display(), "Wallet addresses changed on disk.");
        }
        Ok(changed)
    }
}

async fn read_addresses(path: &Path) -> Result<WalletAddressSet> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(toml::from_str::<WalletAddressSet>(&contents)?.trimmed()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(WalletAddressSet::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Chain;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = WalletStore::open(dir.path().join("wallets.toml")).await.unwrap();
        assert!(store.addresses().is_empty());
    }

    #[tokio::test]
    async fn save_trims_and_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wallets.toml");
        let store = WalletStore::open(&path).await.unwrap();

        let addresses = WalletAddressSet {
            bitcoin: "  btc_addr  ".to_string(),
            ..Default::default()
        };
        assert!(store.save(&addresses).await.unwrap());

        let reopened = WalletStore::open(&path).await.unwrap();
        assert_eq!(reopened.addresses().for_chain(Chain::Bitcoin), Some("btc_addr"));
        assert_eq!(reopened.addresses().bitcoin, "btc_addr");
    }

    #[tokio::test]
    async fn subscribers_only_see_distinct_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = WalletStore::open(dir.path().join("wallets.toml")).await.unwrap();
        let mut rx = store.subscribe();

        store
            .update(|w| w.solana = "7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV".to_string())
            .await
            .unwrap();
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        // Same value again, only padded differently.
        let changed = store
            .update(|w| w.solana = " 7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV ".to_string())
            .await
            .unwrap();
        assert!(!changed);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn reload_picks_up_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.toml");
        let store = WalletStore::open(&path).await.unwrap();
        let mut rx = store.subscribe();

        std::fs::write(&path, "dogecoin = \"DH5yaieqoZN36fDVciNyRueRGvGLR3mr7L\"\n").unwrap();
        assert!(store.reload().await.unwrap());
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().for_chain(Chain::Dogecoin),
            Some("DH5yaieqoZN36fDVciNyRueRGvGLR3mr7L")
        );

        assert!(!store.reload().await.unwrap());
    }
}
