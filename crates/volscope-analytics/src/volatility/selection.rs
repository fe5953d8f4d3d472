//! Contract selection.
//!
//! Every pick in the analyzer is "closest by absolute difference, earliest
//! position wins a tie". The tie-break is made explicit by minimizing the pair
//! `(distance, position)` instead of relying on sort stability.

use volscope_core::{ContractType, Date, OptionContract};

/// Position of the item minimizing `distance`, ties going to the lowest position.
///
/// Distances are compared with `f64::total_cmp`, so a NaN distance never beats
/// a finite one. Returns `None` for an empty iterator.
pub fn closest_position<I>(distances: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    distances
        .into_iter()
        .min_by(|(pos_a, dist_a), (pos_b, dist_b)| {
            dist_a.total_cmp(dist_b).then_with(|| pos_a.cmp(pos_b))
        })
        .map(|(pos, _)| pos)
}

/// Contracts sharing the selected days-to-expiration, in chain order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpirationBucket<'a> {
    /// Days-to-expiration shared by every contract in the bucket.
    pub dte: i64,
    /// The contracts, in chain order.
    pub contracts: Vec<&'a OptionContract>,
}

impl<'a> ExpirationBucket<'a> {
    /// Contracts of one type, in chain order.
    #[must_use]
    pub fn of_type(&self, contract_type: ContractType) -> Vec<&'a OptionContract> {
        self.contracts
            .iter()
            .copied()
            .filter(|c| c.contract_type == contract_type)
            .collect()
    }

    /// Calls in the bucket.
    #[must_use]
    pub fn calls(&self) -> Vec<&'a OptionContract> {
        self.of_type(ContractType::Call)
    }

    /// Puts in the bucket.
    #[must_use]
    pub fn puts(&self) -> Vec<&'a OptionContract> {
        self.of_type(ContractType::Put)
    }

    /// Number of contracts in the bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// Picks the expiration bucket to analyze.
///
/// Only contracts with at least `min_dte` days to expiration qualify. Among the
/// qualifying days-to-expiration values the one closest to `target_dte` wins,
/// ties going to the value whose first contract appears earliest in the chain.
/// Returns `None` when nothing qualifies; there is no fallback to shorter-dated
/// contracts.
#[must_use]
pub fn select_expiration_bucket(
    chain: &[OptionContract],
    as_of: Date,
    min_dte: i64,
    target_dte: i64,
) -> Option<ExpirationBucket<'_>> {
    let dtes: Vec<i64> = chain.iter().map(|c| c.days_to_expiration(as_of)).collect();

    let chosen = closest_position(
        dtes.iter()
            .enumerate()
            .filter(|(_, dte)| **dte >= min_dte)
            .map(|(pos, dte)| (pos, dte.abs_diff(target_dte) as f64)),
    )?;
    let dte = dtes[chosen];

    let contracts = chain
        .iter()
        .zip(&dtes)
        .filter(|(_, d)| **d == dte)
        .map(|(c, _)| c)
        .collect();

    Some(ExpirationBucket { dte, contracts })
}

/// Contract whose strike is closest to `stock_price`.
///
/// Calls and puts compete on equal terms; at a shared strike the one listed
/// first wins.
#[must_use]
pub fn find_atm_contract<'a>(
    contracts: &[&'a OptionContract],
    stock_price: f64,
) -> Option<&'a OptionContract> {
    closest_position(
        contracts
            .iter()
            .enumerate()
            .map(|(pos, c)| (pos, (c.strike_price - stock_price).abs())),
    )
    .map(|pos| contracts[pos])
}

/// Contract whose delta is closest to `target_delta`.
#[must_use]
pub fn find_delta_contract<'a>(
    contracts: &[&'a OptionContract],
    target_delta: f64,
) -> Option<&'a OptionContract> {
    closest_position(
        contracts
            .iter()
            .enumerate()
            .map(|(pos, c)| (pos, (c.delta - target_delta).abs())),
    )
    .map(|pos| contracts[pos])
}
