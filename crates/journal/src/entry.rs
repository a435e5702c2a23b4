use evmstate_common::{Account, Address, Bytes, Bytes32};

/// Identifies what a journal entry's key refers to. Replaces the composite
/// string key (`"account:<addr>"`, `"code:<addr>"`, `"storage:<addr>:<slot>"`)
/// with a structured enum, per the enum-tagged-journal-entries guidance:
/// a single heterogeneous log is convenient, but the key itself need not be
/// a string to get that convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalKey {
    Account(Address),
    Code(Address),
    Storage(Address, Bytes32),
}

/// The value carried by a journal entry: the previous value for
/// `update`/`delete`, a cached value for `just_cache`, or absent for
/// `create`/`touch`.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalValue {
    Account(Option<Account>),
    Code(Option<Bytes>),
    Storage(Bytes32),
}

/// Tags a journal entry with the kind of change it records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Create,
    Update,
    Delete,
    Touch,
    JustCache,
}

/// A single append-only journal record.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub key: JournalKey,
    pub value: Option<JournalValue>,
    pub tag: Tag,
}

impl JournalEntry {
    pub fn create(key: JournalKey) -> Self {
        Self {
            key,
            value: None,
            tag: Tag::Create,
        }
    }

    pub fn update(key: JournalKey, previous: JournalValue) -> Self {
        Self {
            key,
            value: Some(previous),
            tag: Tag::Update,
        }
    }

    pub fn delete(key: JournalKey, previous: JournalValue) -> Self {
        Self {
            key,
            value: Some(previous),
            tag: Tag::Delete,
        }
    }

    pub fn touch(key: JournalKey) -> Self {
        Self {
            key,
            value: None,
            tag: Tag::Touch,
        }
    }

    pub fn just_cache(key: JournalKey, cached: JournalValue) -> Self {
        Self {
            key,
            value: Some(cached),
            tag: Tag::JustCache,
        }
    }
}
