//! Seeded random number streams keyed by type.
//!
//! Every module that draws randomness defines its own stream with [`define_rng!`] and pulls
//! draws through the [`ContextRandomExt`] helpers. Streams are seeded from a single base seed
//! combined with the stream's name, so runs with the same base seed reproduce the same draws
//! no matter which other streams exist or in what order they are first used.

use std::any::{Any, TypeId};
use std::cell::{RefCell, RefMut};

use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::prelude::Distribution;
use rand::{Rng, SeedableRng};

use crate::context::Context;
use crate::define_data_plugin;
use crate::hashing::{hash_str, HashMap, HashMapExt};
use crate::log::trace;

/// Defines a unique type which is used as a key to retrieve an independent rng stream
/// when calling the [`ContextRandomExt`] methods.
#[macro_export]
macro_rules! define_rng {
    ($random_id:ident) => {
        #[derive(Copy, Clone)]
        struct $random_id;

        impl $crate::random::RngId for $random_id {
            type RngType = rand::rngs::StdRng;

            fn get_name() -> &'static str {
                stringify!($random_id)
            }
        }
    };
}
pub use define_rng;

pub trait RngId: Copy + Clone {
    type RngType: SeedableRng;

    fn get_name() -> &'static str;
}

// This is a wrapper which allows for rng streams with different generator types.
struct RngHolder {
    rng: Box<dyn Any>,
}

struct RngData {
    base_seed: u64,
    rng_holders: RefCell<HashMap<TypeId, RngHolder>>,
}

// Registers a data container which stores:
// * base_seed: A base seed for all rngs
// * rng_holders: A map of rngs, keyed by their `RngId`. Note that this is stored in a
//   `RefCell` to allow for mutable borrow without requiring a mutable borrow of the
//   `Context` itself.
define_data_plugin!(
    RngPlugin,
    RngData,
    RngData {
        base_seed: 0,
        rng_holders: RefCell::new(HashMap::new()),
    }
);

/// Gets a mutable reference to the random number generator associated with the given
/// `RngId`. If the rng has not been used before, one will be created, seeded from the
/// base seed combined with the stream name.
///
/// Panics if `init_random` was never called.
fn get_rng<R: RngId + 'static>(context: &Context) -> RefMut<'_, R::RngType> {
    let data_container = context
        .get_data_container(RngPlugin)
        .expect("You must initialize the random number generator with a base seed");

    let rng_holders = data_container.rng_holders.try_borrow_mut().unwrap();

    let rng_holder = RefMut::map(rng_holders, |holders| {
        holders.entry(TypeId::of::<R>()).or_insert_with(|| {
            trace!("creating new rng (name={})", R::get_name());
            let seed_offset = hash_str(R::get_name());
            RngHolder {
                rng: Box::new(R::RngType::seed_from_u64(
                    data_container.base_seed.wrapping_add(seed_offset),
                )),
            }
        })
    });

    RefMut::map(rng_holder, |holder| {
        holder.rng.downcast_mut::<R::RngType>().unwrap()
    })
}

/// `ContextRandomExt` is a trait extension on [`Context`] for random number generation.
pub trait ContextRandomExt {
    /// Initializes the random number generation with the given base seed. Rng streams are
    /// created lazily on first use; calling this again resets every stream.
    fn init_random(&mut self, base_seed: u64);

    /// Gets a random sample from the rng stream keyed by `RngId` using the provided closure.
    fn sample<R: RngId + 'static, T>(
        &self,
        _rng_id: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T;

    /// Gets a random sample from the specified distribution.
    fn sample_distr<R: RngId + 'static, T>(
        &self,
        _rng_id: R,
        distribution: impl Distribution<T>,
    ) -> T
    where
        R::RngType: Rng;

    /// Gets a random sample from the given range.
    fn sample_range<R: RngId + 'static, S, T>(&self, rng_id: R, range: S) -> T
    where
        R::RngType: Rng,
        S: SampleRange<T>,
        T: SampleUniform;

    /// Gets a random boolean which is true with probability `p`.
    fn sample_bool<R: RngId + 'static>(&self, rng_id: R, p: f64) -> bool
    where
        R::RngType: Rng;
}

impl ContextRandomExt for Context {
    fn init_random(&mut self, base_seed: u64) {
        trace!("initializing random module");
        let data_container = self.get_data_container_mut(RngPlugin);
        data_container.base_seed = base_seed;

        // Clear any existing rngs so they get re-seeded on next use
        let mut rng_map = data_container.rng_holders.try_borrow_mut().unwrap();
        rng_map.clear();
    }

    fn sample<R: RngId + 'static, T>(
        &self,
        _rng_id: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T {
        let mut rng = get_rng::<R>(self);
        sampler(&mut rng)
    }

    fn sample_distr<R: RngId + 'static, T>(
        &self,
        _rng_id: R,
        distribution: impl Distribution<T>,
    ) -> T
    where
        R::RngType: Rng,
    {
        let mut rng = get_rng::<R>(self);
        distribution.sample::<R::RngType>(&mut rng)
    }

    fn sample_range<R: RngId + 'static, S, T>(&self, rng_id: R, range: S) -> T
    where
        R::RngType: Rng,
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(rng_id, |rng| rng.random_range(range))
    }

    fn sample_bool<R: RngId + 'static>(&self, rng_id: R, p: f64) -> bool
    where
        R::RngType: Rng,
    {
        self.sample(rng_id, |rng| rng.random_bool(p))
    }
}
