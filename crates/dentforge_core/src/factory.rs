//! Tooth geometry factory and cache
//!
//! [`ToothFactory`] is the only way to obtain a [`GeneratedTooth`]. It builds
//! each (category, condition) pair lazily on first request and memoizes the
//! result under the key `"{category}_{condition}"` until the cache is cleared.
//!
//! # Lifecycle
//!
//! Create one factory at application start and pass it by reference (or in an
//! `Arc`) to every consumer. There is no global instance.
//!
//! # Concurrency
//!
//! The factory is `Send + Sync`:
//!
//! - Each key owns a slot with its own lock. The first request for a key builds
//!   while holding that slot; racing requests for the same key wait on it and
//!   receive the same `Arc`. Different keys build in parallel.
//! - Requests hold a shared build gate. [`clear_cache`](ToothFactory::clear_cache)
//!   takes the gate exclusively, so it waits for in-flight builds to finish.
//! - Failed builds leave their slot empty; nothing partial is cached.
//!
//! # Example
//!
//! ```ignore
//! let factory = ToothFactory::with_seed(42);
//! let tooth = factory.request(ToothCategory::Molar, ToothCondition::Implant)?;
//! assert_eq!(tooth.name(), "molar_implant");
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::animation::standard_animations;
use crate::builders::build_base;
use crate::material::materials_for;
use crate::modifiers::apply_condition;
use crate::tooth::tooth_key;
use crate::{GeneratedTooth, ToothCategory, ToothCondition, ToothError};

/// Cache slot for one key: empty until the first successful build
type Slot = Arc<Mutex<Option<Arc<GeneratedTooth>>>>;

/// Builds and memoizes generated teeth
pub struct ToothFactory {
    /// Slots indexed by `"{category}_{condition}"`
    slots: Mutex<HashMap<String, Slot>>,
    /// Shared by requests, exclusive for cache clears
    gate: RwLock<()>,
    /// Random source for stochastic conditions (cavity pitting)
    rng: Mutex<StdRng>,
    /// Number of successful constructions since creation
    builds: AtomicUsize,
}

impl Default for ToothFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ToothFactory {
    /// Create a factory whose cavity pitting is seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a factory with a fixed seed, making every build reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a factory with an explicit random source
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            gate: RwLock::new(()),
            rng: Mutex::new(rng),
            builds: AtomicUsize::new(0),
        }
    }

    /// Every tooth category
    pub fn list_categories() -> &'static [ToothCategory] {
        &ToothCategory::ALL
    }

    /// Every tooth condition
    pub fn list_conditions() -> &'static [ToothCondition] {
        &ToothCondition::ALL
    }

    /// Get the tooth for a (category, condition) pair, building it on first use
    ///
    /// Repeat requests return the cached `Arc` without rebuilding.
    ///
    /// # Errors
    ///
    /// Returns [`ToothError::GeometryAssembly`] if the generated geometry
    /// breaks an invariant. The error is returned as-is and nothing is cached.
    pub fn request(
        &self,
        category: ToothCategory,
        condition: ToothCondition,
    ) -> Result<Arc<GeneratedTooth>, ToothError> {
        let _gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let key = tooth_key(category, condition);

        let slot = Arc::clone(lock(&self.slots).entry(key.clone()).or_default());
        let mut entry = lock(&slot);
        if let Some(tooth) = entry.as_ref() {
            log::debug!("Tooth cache hit: {}", key);
            return Ok(Arc::clone(tooth));
        }

        let tooth = Arc::new(self.build(category, condition)?);
        *entry = Some(Arc::clone(&tooth));
        Ok(tooth)
    }

    /// Parse category and condition names, then [`request`](Self::request)
    ///
    /// # Errors
    ///
    /// Returns [`ToothError::InvalidCategory`] or
    /// [`ToothError::InvalidCondition`] for unknown names; never substitutes a
    /// default tooth.
    pub fn request_named(&self, category: &str, condition: &str) -> Result<Arc<GeneratedTooth>, ToothError> {
        let category = category.parse::<ToothCategory>()?;
        let condition = condition.parse::<ToothCondition>()?;
        self.request(category, condition)
    }

    /// Build every (category, condition) pair
    ///
    /// Stops at the first failure.
    pub fn prewarm(&self) -> Result<usize, ToothError> {
        let mut count = 0;
        for &category in Self::list_categories() {
            for &condition in Self::list_conditions() {
                self.request(category, condition)?;
                count += 1;
            }
        }
        log::debug!("Prewarmed {} teeth", count);
        Ok(count)
    }

    /// Drop every cached tooth
    ///
    /// Blocks until in-flight builds complete. The next request for any key
    /// rebuilds from scratch. Never called automatically.
    pub fn clear_cache(&self) {
        let _gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let mut slots = lock(&self.slots);
        let count = slots.len();
        slots.clear();
        log::debug!("Cleared tooth cache ({} slots)", count);
    }

    /// Number of teeth currently cached
    pub fn cached_count(&self) -> usize {
        lock(&self.slots)
            .values()
            .filter(|slot| lock(slot).is_some())
            .count()
    }

    /// Check if a pair is already built
    pub fn is_cached(&self, category: ToothCategory, condition: ToothCondition) -> bool {
        let slot = lock(&self.slots).get(&tooth_key(category, condition)).cloned();
        slot.map_or(false, |slot| lock(&slot).is_some())
    }

    /// Number of successful constructions since the factory was created
    ///
    /// Cache hits don't count; clearing the cache doesn't reset it.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn build(&self, category: ToothCategory, condition: ToothCondition) -> Result<GeneratedTooth, ToothError> {
        let mut mesh = build_base(category);
        let regions = {
            let mut rng = lock(&self.rng);
            apply_condition(&mut mesh, condition, &mut *rng)?
        };
        let tooth = GeneratedTooth::assemble(
            category,
            condition,
            mesh,
            materials_for(condition),
            regions,
            standard_animations(),
        )?;

        self.builds.fetch_add(1, Ordering::SeqCst);
        log::debug!(
            "Built tooth {}: {} vertices, {} materials",
            tooth.name(),
            tooth.mesh().vertex_count(),
            tooth.materials().len()
        );
        Ok(tooth)
    }
}

/// Lock a mutex, recovering the data if a panicking thread poisoned it
///
/// Slots only ever hold fully built teeth, so a poisoned lock still guards
/// consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
