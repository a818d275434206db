//! Layered merge for environment sources.
//!
//! Implements key-by-key merging where higher tier values override lower tier values.
//! Values are flat strings, so a key is either replaced entirely or kept.

use super::loader::EnvTier;
use std::collections::BTreeMap;

/// Flat key/value map read from one source.
pub type EnvMap = BTreeMap<String, String>;

/// Effective value of a key and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVar {
    pub value: String,
    pub tier: EnvTier,
}

/// Merge `overlay` into `base`; every key in `overlay` replaces the one in `base`.
///
/// # Example
/// ```
/// use project_init::config::{EnvMap, EnvTier, merge_layer};
///
/// let mut merged = Default::default();
/// let defaults = EnvMap::from([("POSTGRES_HOST".into(), "localhost".into())]);
/// let local = EnvMap::from([("POSTGRES_HOST".into(), "db.internal".into())]);
/// merge_layer(&mut merged, EnvTier::Defaults, defaults);
/// merge_layer(&mut merged, EnvTier::Local, local);
/// assert_eq!(merged["POSTGRES_HOST"].value, "db.internal");
/// ```
pub fn merge_layer(base: &mut BTreeMap<String, ResolvedVar>, tier: EnvTier, overlay: EnvMap) {
    for (key, value) in overlay {
        base.insert(key, ResolvedVar { value, tier });
    }
}

/// Merge layers in order, with later layers taking precedence.
///
/// Equivalent to folding `merge_layer` over the list.
pub fn merge_layers(
    layers: impl IntoIterator<Item = (EnvTier, EnvMap)>,
) -> BTreeMap<String, ResolvedVar> {
    layers
        .into_iter()
        .fold(BTreeMap::new(), |mut merged, (tier, vars)| {
            merge_layer(&mut merged, tier, vars);
            merged
        })
}
