//! Folder tree enumeration.
//!
//! Flattens the account/folder forest into a single ordered resource
//! list. Traversal is breadth-first per account: a folder's children are
//! appended to the queue tail when the folder is dequeued, and one
//! account's walk finishes before the next account's begins.

use std::collections::VecDeque;

use crate::domain::{Account, Folder};

/// Flattens all accounts into one ordered folder list.
///
/// Accounts are processed in the given order. Accounts with no root
/// folder are skipped silently. The result is a point-in-time snapshot
/// of references into `accounts`; it is deterministic for a fixed tree
/// shape and account order.
pub fn enumerate(accounts: &[Account]) -> Vec<&Folder> {
    let mut folders = Vec::new();
    for account in accounts {
        folders.extend(account_folders(account));
    }
    folders
}

/// Breadth-first walk of a single account's folder tree.
pub fn account_folders(account: &Account) -> Vec<&Folder> {
    let Some(root) = &account.root else {
        return Vec::new();
    };
    let mut folders = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(folder) = queue.pop_front() {
        folders.push(folder);
        queue.extend(folder.children.iter());
    }
    folders
}
