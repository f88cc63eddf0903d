//! Coin selection with tiered fees.
//!
//! Candidates are taken in the order given. After every accepted output the
//! selector checks whether the inputs cover the transfer and the fee of the
//! tier that applies to the externally-facing amount; it stops at the first
//! acceptance where they do.

use tracing::{debug, trace};

use crate::config::{tier_for, FeeTier};
use crate::types::{TransferRecipient, Txo};
use crate::MneeError;

/// Fee output owed to the fee address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeOutput {
    /// Fee address.
    pub address: String,
    /// Fee in atomic units.
    pub amount: u64,
}

/// Change returned to the owner of the last accepted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutput {
    /// Owner address.
    pub address: String,
    /// Change in atomic units.
    pub amount: u64,
}

/// Outcome of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// Accepted candidates, in acceptance order.
    pub selected: Vec<Txo>,
    /// Token amount across `selected`.
    pub total_input: u64,
    /// Sum of all recipient amounts.
    pub total_transfer: u64,
    /// Sum of recipient amounts going to addresses that fund none of the
    /// inputs. This is the amount the fee tier is chosen by.
    pub actual_transfer: u64,
    /// Fee output, present whenever a tier applied.
    pub fee: Option<FeeOutput>,
    /// Change output, present when inputs exceed transfer plus fee.
    pub change: Option<ChangeOutput>,
}

/// Where the last completion check left off.
enum Shortfall {
    /// No tier contains the externally-facing amount.
    NoTier(u64),
    /// A tier applies but the surplus does not cover its fee.
    Fee(u64),
}

/// Chooses which controlled outputs fund a transfer.
#[derive(Debug, Clone, Copy)]
pub struct CoinSelector<'a> {
    fee_tiers: &'a [FeeTier],
    fee_address: &'a str,
}

impl<'a> CoinSelector<'a> {
    /// Selector charging fees from `fee_tiers` to `fee_address`.
    pub fn new(fee_tiers: &'a [FeeTier], fee_address: &'a str) -> Self {
        CoinSelector {
            fee_tiers,
            fee_address,
        }
    }

    /// Select candidates covering `required` plus the applicable fee.
    ///
    /// # Arguments
    /// * `candidates` - Outputs in preference order.
    /// * `required` - Sum of `recipients` amounts.
    /// * `owned_addresses` - Addresses the caller holds keys for.
    /// * `recipients` - The requested transfer.
    ///
    /// # Returns
    /// The selection, or `InsufficientBalance` when the candidates run out
    /// short, or `ConfigInvalid` when no fee tier applies to the transfer.
    pub fn select(
        &self,
        candidates: &[Txo],
        required: u64,
        owned_addresses: &[String],
        recipients: &[TransferRecipient],
    ) -> Result<SelectionResult, MneeError> {
        let mut selected = Vec::new();
        let mut total_input: u64 = 0;
        let mut touched: Vec<&str> = Vec::new();
        let mut shortfall = None;

        for txo in candidates {
            let Some(owner) = usable_owner(txo) else {
                continue;
            };
            if !owned_addresses.iter().any(|a| a == owner) {
                trace!(owner, "skipping candidate: owner not controlled");
                continue;
            }

            let amount = txo.token_amount();
            total_input = total_input
                .checked_add(amount)
                .ok_or(MneeError::InvalidAmount)?;
            selected.push(txo.clone());
            if !touched.contains(&owner) {
                touched.push(owner);
            }
            debug!(owner, amount, total_input, "accepted candidate");

            if total_input < required {
                continue;
            }

            let actual_transfer = recipients
                .iter()
                .filter(|r| !touched.contains(&r.address.as_str()))
                .try_fold(0u64, |acc, r| acc.checked_add(r.amount))
                .ok_or(MneeError::InvalidAmount)?;

            let Some(tier) = tier_for(self.fee_tiers, actual_transfer) else {
                shortfall = Some(Shortfall::NoTier(actual_transfer));
                continue;
            };

            let surplus = total_input - required;
            if surplus < tier.fee {
                shortfall = Some(Shortfall::Fee(tier.fee));
                continue;
            }

            let change = (surplus > tier.fee).then(|| ChangeOutput {
                address: owner.to_string(),
                amount: surplus - tier.fee,
            });
            debug!(
                inputs = selected.len(),
                total_input,
                actual_transfer,
                fee = tier.fee,
                change = change.as_ref().map_or(0, |c| c.amount),
                "selection complete"
            );
            return Ok(SelectionResult {
                selected,
                total_input,
                total_transfer: required,
                actual_transfer,
                fee: Some(FeeOutput {
                    address: self.fee_address.to_string(),
                    amount: tier.fee,
                }),
                change,
            });
        }

        match shortfall {
            _ if total_input < required => Err(MneeError::InsufficientBalance {
                required,
                available: total_input,
            }),
            Some(Shortfall::NoTier(amount)) => Err(MneeError::ConfigInvalid(format!(
                "no fee tier contains transfer amount {}",
                amount
            ))),
            Some(Shortfall::Fee(fee)) => Err(MneeError::InsufficientBalance {
                required: required.saturating_add(fee),
                available: total_input,
            }),
            None => Err(MneeError::InsufficientBalance {
                required,
                available: total_input,
            }),
        }
    }
}

/// The owner of a candidate that carries everything needed to spend it.
fn usable_owner(txo: &Txo) -> Option<&str> {
    let reason = if txo.data.as_ref().and_then(|d| d.bsv21.as_ref()).is_none() {
        "no token data"
    } else if txo.txid.is_none() {
        "no txid"
    } else if txo.script.is_none() {
        "no script"
    } else if txo.token_amount() == 0 {
        "zero amount"
    } else if txo.owners.is_empty() {
        "no owners"
    } else {
        return txo.owner();
    };
    trace!(outpoint = ?txo.outpoint, reason, "skipping candidate");
    None
}
