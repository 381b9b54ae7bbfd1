//! This module provides a deterministic hasher and `HashMap` and `HashSet` variants that use
//! it. The hashing data structures in the standard library are not deterministic:
//!
//! > By default, HashMap uses a hashing algorithm selected to provide
//! > resistance against HashDoS attacks. The algorithm is randomly seeded, and a
//! > reasonable best-effort is made to generate this seed from a high quality,
//! > secure source of randomness provided by the host without blocking the program.
//!
//! A seeded run must produce the same output every time, so every map and set in this
//! crate uses the Fx hasher instead.
//!
//! The standard library `HashMap` has a `new` method, but `HashMap<K, V, S>` does not have a
//! `new` method by default. If you need to keep the API the same across implementations, we
//! provide the `HashMapExt` trait extension. Similarly, for `HashSet` and `HashSetExt`. The
//! traits need only be in scope.
//!
//! The `hash_str` free function is a convenience function used in `crate::random`.

use std::hash::Hasher;

use rustc_hash::FxHasher;
pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub trait HashMapExt {
    fn new() -> Self;
}

impl<K, V> HashMapExt for HashMap<K, V> {
    fn new() -> Self {
        HashMap::default()
    }
}

pub trait HashSetExt {
    fn new() -> Self;
}

impl<T> HashSetExt for HashSet<T> {
    fn new() -> Self {
        HashSet::default()
    }
}

/// A convenience method to compute the hash of a `&str`.
pub fn hash_str(data: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_bytes());
    hasher.finish()
}
