//! Balance Ledger
//!
//! This module holds the friends being tracked and which of them, if any,
//! is currently selected for a bill split:
//!
//! - `Friend`: one counterparty with a signed running balance
//! - `Ledger`: the ordered friend list plus the selection back-reference
//! - `split`: turning a bill into the delta applied to a balance
//! - `seed`: the friends a fresh session starts with
//!
//! Balance sign convention: negative means the user owes the friend,
//! positive means the friend owes the user, zero means settled.

pub mod seed;
pub mod split;

use crate::error::LedgerError;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FriendId(String);

impl FriendId {
    /// A fresh random id for a newly added friend.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl From<&str> for FriendId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for FriendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Friend {
    pub id: FriendId,
    pub name: String,
    /// Avatar URL. Only ever displayed, never parsed.
    pub image: String,
    pub balance: f64,
}

impl Friend {
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::of(self.balance)
    }
}

/// How a balance reads from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceStatus {
    Even,
    YouOwe(f64),
    OwesYou(f64),
}

impl BalanceStatus {
    pub fn of(balance: f64) -> Self {
        if balance < 0.0 {
            BalanceStatus::YouOwe(balance.abs())
        } else if balance > 0.0 {
            BalanceStatus::OwesYou(balance)
        } else {
            BalanceStatus::Even
        }
    }

    pub fn describe(&self, name: &str, currency: &str) -> String {
        match self {
            BalanceStatus::Even => format!("You and {} are even", name),
            BalanceStatus::YouOwe(amount) => {
                format!("You owe {} {}{}", name, currency, format_amount(*amount))
            }
            BalanceStatus::OwesYou(amount) => {
                format!("{} owes you {}{}", name, currency, format_amount(*amount))
            }
        }
    }
}

/// Whole amounts print without decimals, anything else with two.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    friends: Vec<Friend>,
    selected: Option<FriendId>,
}

impl Ledger {
    pub fn new(friends: Vec<Friend>) -> Self {
        Self {
            friends,
            selected: None,
        }
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn len(&self) -> usize {
        self.friends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    pub fn get(&self, id: &FriendId) -> Option<&Friend> {
        self.friends.iter().find(|f| &f.id == id)
    }

    pub fn selected_id(&self) -> Option<&FriendId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Friend> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &FriendId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Sum of all balances: what the user is owed overall, net.
    pub fn net_balance(&self) -> f64 {
        self.friends.iter().map(|f| f.balance).sum()
    }

    /// Append a friend with a zero balance.
    ///
    /// The stored image is `image` suffixed with `?=<id>`. Returns `None`
    /// without touching the ledger when either input is empty.
    pub fn add_friend(&mut self, name: &str, image: &str) -> Option<&Friend> {
        if name.is_empty() || image.is_empty() {
            debug!(name_empty = name.is_empty(), image_empty = image.is_empty(), "add friend ignored");
            return None;
        }

        let id = FriendId::generate();
        let friend = Friend {
            image: format!("{}?={}", image, id),
            id,
            name: name.to_string(),
            balance: 0.0,
        };
        info!(id = %friend.id, name = %friend.name, "friend added");
        self.friends.push(friend);
        self.friends.last()
    }

    /// Select `id`, or clear the selection if `id` is already selected.
    ///
    /// Ids not present in the ledger are ignored.
    pub fn toggle_selection(&mut self, id: &FriendId) {
        if self.get(id).is_none() {
            debug!(%id, "selection of unknown friend ignored");
            return;
        }

        if self.is_selected(id) {
            debug!(%id, "selection cleared");
            self.selected = None;
        } else {
            debug!(%id, "friend selected");
            self.selected = Some(id.clone());
        }
    }

    /// Add `delta` to the selected friend's balance and clear the selection.
    pub fn split_bill(&mut self, delta: f64) -> Result<&Friend, LedgerError> {
        let id = self.selected.take().ok_or(LedgerError::NoSelection)?;
        let friend = self
            .friends
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(LedgerError::NoSelection)?;

        friend.balance += delta;
        info!(id = %friend.id, delta, balance = friend.balance, "bill split applied");
        Ok(&*friend)
    }
}
