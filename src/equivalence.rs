//! The Equivalence Checker (spec.md §4.9) and its shared hash-equality
//! utility (spec.md §9: "Equality of hashes... should be a shared utility;
//! map it over each entity family in the Equivalence Checker").

use indexmap::IndexMap;
use std::hash::Hash;

/// `keys(a) == keys(b)` as sets, AND `eq(a[k], b[k])` for every key `k`.
pub fn maps_equal<K, V, F>(a: &IndexMap<K, V>, b: &IndexMap<K, V>, eq: F) -> bool
where
  K: Hash + Eq,
  F: Fn(&V, &V) -> bool,
{
  if a.len() != b.len() {
    return false;
  }
  a.iter().all(|(k, va)| b.get(k).map_or(false, |vb| eq(va, vb)))
}
