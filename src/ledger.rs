use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::LedgerError;
use crate::store::KeyValueStore;

/// One step of a batch call: apply the surrounding operation to `key` with
/// `value` as the operand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchItem {
    pub key: String,
    pub value: Amount,
}

/// Numeric counters persisted through a [`KeyValueStore`].
///
/// Every operation is one read-decode-compute-encode-write sequence against
/// the injected store. Faults never reach the caller: reads degrade to
/// `0.0`, writes are dropped, and either way the failing operation and key
/// are logged at `warn`.
pub struct Ledger<S: KeyValueStore> {
    store: S,
    rng: StdRng,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Wrap `store`, seeding the range-operand generator from entropy.
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Wrap `store` with a caller-supplied generator. A seeded generator
    /// makes range operands deterministic.
    pub fn with_rng(store: S, rng: StdRng) -> Self {
        Self { store, rng }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the underlying store back out of the ledger.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Current value under `key`. Reads `0.0` when the key is absent, the
    /// stored text is not numeric, or the backend fails.
    pub fn get(&self, key: &str) -> f64 {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("get failed for key {:?}: {}", key, err);
                0.0
            }
        }
    }

    /// Whether the store holds an entry under `key`, numeric or not. This is
    /// the one way to tell a stored zero from an absent key.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.store.get(key), Ok(Some(_)))
    }

    /// Overwrite `key` with the resolved operand.
    pub fn set(&mut self, key: &str, amount: impl Into<Amount>) {
        let value = amount.into().resolve(&mut self.rng);
        self.put("set", key, value);
    }

    /// Increase `key` by the resolved operand. Unclamped: a negative operand
    /// or a negative stored value takes the counter below zero.
    pub fn add(&mut self, key: &str, amount: impl Into<Amount>) {
        let delta = amount.into().resolve(&mut self.rng);
        let value = self.get(key) + delta;
        self.put("add", key, value);
    }

    /// Decrease `key` by the resolved operand, saturating at zero.
    pub fn sub(&mut self, key: &str, amount: impl Into<Amount>) {
        let delta = amount.into().resolve(&mut self.rng);
        let value = floor_clamp(self.get(key) - delta);
        self.put("sub", key, value);
    }

    /// Multiply `key` by the resolved operand. Unclamped: a negative factor
    /// inverts the sign.
    pub fn mul(&mut self, key: &str, amount: impl Into<Amount>) {
        let factor = amount.into().resolve(&mut self.rng);
        let value = self.get(key) * factor;
        self.put("mul", key, value);
    }

    /// Divide `key` by the resolved operand, saturating at zero. Division by
    /// zero follows IEEE 754: positive infinity survives the clamp, and NaN
    /// is stored as-is.
    pub fn div(&mut self, key: &str, amount: impl Into<Amount>) {
        let divisor = amount.into().resolve(&mut self.rng);
        let value = floor_clamp(self.get(key) / divisor);
        self.put("div", key, value);
    }

    /// Remove the entry under `key`. A later [`Ledger::get`] reads `0.0` and
    /// the key is indistinguishable from one never written.
    pub fn delete(&mut self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            tracing::warn!("delete failed for key {:?}: {}", key, err);
        }
    }

    /// Remove every entry in the underlying store.
    ///
    /// This clears the whole injected store, not a namespaced slice of it. A
    /// caller sharing one backend between subsystems should hand each ledger
    /// its own store instead.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("reset failed: {}", err);
        }
    }

    /// Read several keys at once. Each key degrades to `0.0` independently.
    pub fn batch_get(&self, keys: &[&str]) -> BTreeMap<String, f64> {
        keys.iter()
            .map(|key| (key.to_string(), self.get(key)))
            .collect()
    }

    /// Apply [`Ledger::set`] to each item in input order. Range operands
    /// resolve independently as each item is processed, and one failing item
    /// does not stop the rest.
    pub fn batch_set(&mut self, items: &[BatchItem]) {
        for item in items {
            self.set(&item.key, item.value);
        }
    }

    /// Apply [`Ledger::add`] to each item in input order.
    pub fn batch_add(&mut self, items: &[BatchItem]) {
        for item in items {
            self.add(&item.key, item.value);
        }
    }

    /// Apply [`Ledger::sub`] to each item in input order.
    pub fn batch_sub(&mut self, items: &[BatchItem]) {
        for item in items {
            self.sub(&item.key, item.value);
        }
    }

    /// Apply [`Ledger::mul`] to each item in input order.
    pub fn batch_mul(&mut self, items: &[BatchItem]) {
        for item in items {
            self.mul(&item.key, item.value);
        }
    }

    /// Apply [`Ledger::div`] to each item in input order.
    pub fn batch_div(&mut self, items: &[BatchItem]) {
        for item in items {
            self.div(&item.key, item.value);
        }
    }

    /// Apply [`Ledger::delete`] to each key in input order.
    pub fn batch_delete(&mut self, keys: &[&str]) {
        for key in keys {
            self.delete(key);
        }
    }

    fn try_get(&self, key: &str) -> Result<f64, LedgerError> {
        match self.store.get(key)? {
            Some(text) => decode(key, &text),
            None => Ok(0.0),
        }
    }

    fn put(&mut self, op: &str, key: &str, value: f64) {
        if let Err(err) = self.store.set(key, &encode(value)) {
            tracing::warn!("{} failed for key {:?}: {}", op, key, err);
        }
    }
}

/// Canonical text form persisted for a value. Round-trips every finite
/// number as well as `inf`, `-inf`, and `NaN`.
fn encode(value: f64) -> String {
    value.to_string()
}

fn decode(key: &str, text: &str) -> Result<f64, LedgerError> {
    text.trim().parse().map_err(|_| LedgerError::Decode {
        key: key.to_string(),
        text: text.to_string(),
    })
}

// Written out instead of `f64::max`, which would swallow NaN.
fn floor_clamp(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else {
        value
    }
}
