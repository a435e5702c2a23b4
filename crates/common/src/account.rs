use ethereum_types::U256;
use serde::{Deserialize, Serialize};

use crate::constants::{EMPTY_CODE_HASH, EMPTY_STORAGE_ROOT};
use crate::Bytes32;

/// An account record: nonce, balance, and the hashes of its code and
/// storage trie. The world-state layer never stores the code or storage
/// values directly on this type — those live in the separate code and
/// storage maps, keyed by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub code_hash: Bytes32,
    pub storage_root: Bytes32,
}

impl Default for Account {
    fn default() -> Self {
        Self::empty()
    }
}

impl Account {
    /// The account state of an address that has never been touched: no
    /// nonce, no balance, no code, no storage.
    pub fn empty() -> Self {
        Self {
            nonce: 0,
            balance: U256::zero(),
            code_hash: EMPTY_CODE_HASH,
            storage_root: EMPTY_STORAGE_ROOT,
        }
    }

    /// EIP-161 emptiness: zero nonce, zero balance, no code. Storage root
    /// is not part of this predicate — an account can be "empty" while
    /// still carrying a non-empty storage root (see [`Account::is_totally_empty`]).
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && self.code_hash == EMPTY_CODE_HASH
    }

    /// Empty plus an empty storage root.
    pub fn is_totally_empty(&self) -> bool {
        self.is_empty() && self.storage_root == EMPTY_STORAGE_ROOT
    }

    /// Whether the account has ever sent a transaction or deployed code.
    pub fn has_code_or_nonce(&self) -> bool {
        self.nonce != 0 || self.code_hash != EMPTY_CODE_HASH
    }

    /// Whether the account is a contract (has code).
    pub fn is_contract(&self) -> bool {
        self.code_hash != EMPTY_CODE_HASH
    }
}

/// "Alive" per the data model: present and not empty. Takes an `Option`
/// because liveness depends on presence in the world-state account map,
/// which this crate has no notion of.
pub fn is_alive(account: Option<&Account>) -> bool {
    matches!(account, Some(account) if !account.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_account_is_empty_and_totally_empty() {
        let account = Account::empty();
        assert!(account.is_empty());
        assert!(account.is_totally_empty());
        assert!(!account.has_code_or_nonce());
        assert!(!account.is_contract());
    }

    #[test]
    fn nonzero_nonce_breaks_emptiness() {
        let account = Account {
            nonce: 1,
            ..Account::empty()
        };
        assert!(!account.is_empty());
        assert!(account.has_code_or_nonce());
    }

    #[test]
    fn nonempty_storage_root_alone_is_empty_but_not_totally_empty() {
        let account = Account {
            storage_root: Bytes32::repeat_byte(0x11),
            ..Account::empty()
        };
        assert!(account.is_empty());
        assert!(!account.is_totally_empty());
    }

    #[test]
    fn contract_has_code_hash() {
        let account = Account {
            code_hash: Bytes32::repeat_byte(0x22),
            ..Account::empty()
        };
        assert!(account.is_contract());
        assert!(account.has_code_or_nonce());
        assert!(!account.is_empty());
    }

    #[test]
    fn alive_requires_presence_and_non_emptiness() {
        assert!(!is_alive(None));
        assert!(!is_alive(Some(&Account::empty())));
        let present = Account {
            nonce: 1,
            ..Account::empty()
        };
        assert!(is_alive(Some(&present)));
    }
}
