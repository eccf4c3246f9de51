//! # Encoding Shape Cache
//!
//! Memoizes composed shapes by expanded shape index. Identical topologies (long
//! straight runs, repeated corners) share one shape, so the hit rate is high even
//! though the key space is huge.
//!
//! Lookups for one key are serialized through a per-key slot: the first caller
//! composes the shape while later callers for the same key wait on the slot and
//! receive the same `Arc`. Callers for other keys never wait on that composition.
//! Entries are evicted once they have not been read for the idle window; the map is
//! kept in access order so a sweep only looks at the stale end. A slot some caller
//! is still waiting on or composing into is never evicted, and a slot whose
//! composition failed is removed straight away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};
use lru::LruCache;
use web_time::{Duration, Instant};

use crate::engine_state::error::WireError;

use super::composer::ShapeComposer;
use super::encoding::ExpandedShapeIndex;
use super::shape::WireShape;

type ShapeCell = Arc<Mutex<Option<Arc<WireShape>>>>;

struct Slot {
    shape: ShapeCell,
    last_access: Instant,
}

/// Tier-one shape cache, shared by every region using the same wire family.
pub struct EncodingShapeCache {
    composer: Arc<ShapeComposer>,
    entries: Mutex<LruCache<ExpandedShapeIndex, Slot>>,
    idle_expiry: Duration,
    computations: AtomicU64,
}

impl EncodingShapeCache {
    /// An empty cache composing through `composer`.
    pub fn new(composer: Arc<ShapeComposer>, idle_expiry: Duration) -> Self {
        EncodingShapeCache {
            composer,
            entries: Mutex::new(LruCache::unbounded()),
            idle_expiry,
            computations: AtomicU64::new(0),
        }
    }

    /// Returns the shape for `index`, composing it on first request.
    ///
    /// # Errors
    /// Propagates composition failures. Nothing is cached on failure, so a later
    /// call tries again.
    pub fn get(&self, index: ExpandedShapeIndex) -> Result<Arc<WireShape>, WireError> {
        let cell = {
            let mut entries = self.lock_entries();
            // Taken under the lock so access times follow the recency order.
            let now = Instant::now();
            let slot = entries.get_or_insert_mut(index, || Slot {
                shape: ShapeCell::default(),
                last_access: now,
            });
            slot.last_access = now;
            slot.shape.clone()
        };

        let mut shape = cell.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(shape) = shape.as_ref() {
            trace!("Shape cache hit for {:?}", index);
            return Ok(shape.clone());
        }

        let composed = match self.composer.compose(index) {
            Ok(composed) => Arc::new(composed),
            Err(error) => {
                self.discard_slot(index, &cell);
                return Err(error);
            }
        };
        self.computations.fetch_add(1, Ordering::Relaxed);
        *shape = Some(composed.clone());
        Ok(composed)
    }

    /// Removes the slot for `index` if it is still `cell`.
    ///
    /// Called with `cell` locked. Nothing takes a slot lock while holding the map
    /// lock, so this order cannot deadlock.
    fn discard_slot(&self, index: ExpandedShapeIndex, cell: &ShapeCell) {
        let mut entries = self.lock_entries();
        if entries
            .peek(&index)
            .map_or(false, |slot| Arc::ptr_eq(&slot.shape, cell))
        {
            entries.pop(&index);
            debug!("Dropped failed slot for {:?}", index);
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, LruCache<ExpandedShapeIndex, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of compositions performed so far.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Number of cached entries, including ones still being composed.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How long an entry may go without a lookup before it expires.
    pub fn idle_expiry(&self) -> Duration {
        self.idle_expiry
    }

    /// The composer used on misses.
    pub fn composer(&self) -> &ShapeComposer {
        &self.composer
    }

    /// Evicts every entry idle for at least the expiry window as of `now`.
    ///
    /// Slots still shared with an in-flight lookup are skipped; the next sweep
    /// picks them up.
    ///
    /// # Returns
    /// The number of evicted entries.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.lock_entries();
        // Clones of a slot's cell are only handed out under the map lock.
        let expired: Vec<ExpandedShapeIndex> = entries
            .iter()
            .rev()
            .take_while(|(_, slot)| now.saturating_duration_since(slot.last_access) >= self.idle_expiry)
            .filter(|(_, slot)| Arc::strong_count(&slot.shape) == 1)
            .map(|(index, _)| *index)
            .collect();
        for index in &expired {
            entries.pop(index);
        }
        let evicted = expired.len();
        if evicted > 0 {
            debug!("Evicted {} idle shapes, {} remain", evicted, entries.len());
        }
        evicted
    }

    /// Sweeps with the current time.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::WireGeometry;
    use crate::engine_state::voxels::block::block_side::BlockSide;
    use crate::engine_state::wires::encoding::AttachmentMask;
    use crate::engine_state::wires::primitives::PrimitiveShapeTables;
    use std::sync::Barrier;
    use std::thread;

    const IDLE: Duration = Duration::from_secs(300);

    fn cache() -> EncodingShapeCache {
        let tables = PrimitiveShapeTables::from_geometry(WireGeometry::default()).unwrap();
        EncodingShapeCache::new(Arc::new(ShapeComposer::new(tables)), IDLE)
    }

    fn floor_wire() -> ExpandedShapeIndex {
        ExpandedShapeIndex::from_primary(AttachmentMask::from_sides(&[BlockSide::DOWN]))
    }

    #[test]
    fn repeated_lookups_share_one_computation() {
        let cache = cache();
        let first = cache.get(floor_wire()).unwrap();
        let second = cache.get(floor_wire()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.computations(), 1);

        let elbow = floor_wire().with_secondary(BlockSide::DOWN, 2);
        cache.get(elbow).unwrap();
        assert_eq!(cache.computations(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_misses_compute_once() {
        const THREADS: usize = 8;
        let cache = Arc::new(cache());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache.get(floor_wire()).unwrap()
                })
            })
            .collect();

        let shapes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.computations(), 1);
        assert!(shapes.iter().all(|shape| Arc::ptr_eq(shape, &shapes[0])));
    }

    #[test]
    fn idle_entries_expire() {
        let cache = cache();
        cache.get(floor_wire()).unwrap();
        let start = Instant::now();

        assert_eq!(cache.sweep_expired_at(start), 0);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.sweep_expired_at(start + IDLE + Duration::from_secs(1)), 1);
        assert!(cache.is_empty());

        cache.get(floor_wire()).unwrap();
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn slots_in_use_survive_a_sweep() {
        let cache = cache();
        cache.get(floor_wire()).unwrap();
        let late = Instant::now() + IDLE + Duration::from_secs(1);

        let in_flight = cache.entries.lock().unwrap().peek(&floor_wire()).unwrap().shape.clone();
        let guard = in_flight.lock().unwrap();
        assert_eq!(cache.sweep_expired_at(late), 0);
        assert_eq!(cache.len(), 1);

        drop(guard);
        drop(in_flight);
        assert_eq!(cache.sweep_expired_at(late), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_compositions_leave_no_slot() {
        let tables = PrimitiveShapeTables::from_geometry(WireGeometry::default())
            .unwrap()
            .with_empty_edges();
        let cache = EncodingShapeCache::new(Arc::new(ShapeComposer::new(tables)), IDLE);
        let edge_only = ExpandedShapeIndex::default().with_edge(3);

        assert!(matches!(cache.get(edge_only), Err(WireError::EmptyComposition { .. })));
        assert!(cache.is_empty());
        assert_eq!(cache.computations(), 0);

        cache.get(floor_wire()).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn recently_used_entries_survive_a_sweep() {
        let cache = cache();
        let old = floor_wire();
        let fresh = floor_wire().with_edge(0);
        cache.get(old).unwrap();
        cache.get(fresh).unwrap();
        // touching `old` moves it to the fresh end
        cache.get(old).unwrap();

        let entries = cache.entries.lock().unwrap();
        let (stale_key, _) = entries.peek_lru().unwrap();
        assert_eq!(*stale_key, fresh);
    }
}
