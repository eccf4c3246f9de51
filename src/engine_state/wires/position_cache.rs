//! # Position Shape Cache
//!
//! Holds the current shape of each wire cell in one region. Entries stay until the
//! region explicitly invalidates them; nothing here expires on a timer.
//!
//! Readers compute missing shapes without holding the write lock. To keep a slow
//! reader from storing a shape computed against grid state that was invalidated
//! meanwhile, every invalidated position bumps a generation counter and a fill is
//! only stored if its position's generation is unchanged. Counters are striped by
//! position, so a change elsewhere in the region rarely discards a fill.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cgmath::Point3;
use log::trace;

use crate::core::MtResource;
use crate::engine_state::error::WireError;
use crate::engine_state::voxels::block::block_side::BlockSide;

use super::shape::WireShape;

/// Number of generation counters. Must stay at most 32 for `Default`.
const GENERATION_STRIPES: usize = 32;

fn stripe(position: Point3<i32>) -> usize {
    let hash = (position.x as u32).wrapping_mul(73_856_093)
        ^ (position.y as u32).wrapping_mul(19_349_663)
        ^ (position.z as u32).wrapping_mul(83_492_791);
    hash as usize % GENERATION_STRIPES
}

/// Tier-two shape cache, keyed by world position.
#[derive(Default)]
pub struct PositionShapeCache {
    entries: MtResource<HashMap<Point3<i32>, Arc<WireShape>>>,
    generations: [AtomicU64; GENERATION_STRIPES],
}

impl PositionShapeCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached shape at `position`, if one is stored.
    pub fn get(&self, position: Point3<i32>) -> Option<Arc<WireShape>> {
        self.entries.get().get(&position).cloned()
    }

    /// Returns the cached shape at `position`, or computes and stores it.
    ///
    /// `compute` returns `None` for positions that have no shape to cache; that
    /// result is passed through without storing anything. Grid reads belong inside
    /// `compute` so they are covered by the stale-fill check.
    ///
    /// # Errors
    /// Propagates the error of `compute`; nothing is stored in that case.
    pub fn get_or_insert_with<F>(
        &self,
        position: Point3<i32>,
        compute: F,
    ) -> Result<Option<Arc<WireShape>>, WireError>
    where
        F: FnOnce() -> Result<Option<Arc<WireShape>>, WireError>,
    {
        if let Some(shape) = self.get(position) {
            trace!("Position cache hit at {:?}", position);
            return Ok(Some(shape));
        }

        let counter = &self.generations[stripe(position)];
        let generation = counter.load(Ordering::Acquire);
        let Some(shape) = compute()? else {
            return Ok(None);
        };

        let mut entries = self.entries.get_mut();
        if counter.load(Ordering::Acquire) == generation {
            // Another reader may have filled it first; keep theirs.
            let stored = entries.entry(position).or_insert_with(|| shape.clone());
            return Ok(Some(stored.clone()));
        }
        trace!("Discarded stale fill at {:?}", position);
        Ok(Some(shape))
    }

    /// Drops the entry at `position`.
    ///
    /// # Returns
    /// Whether an entry was present.
    pub fn invalidate(&self, position: Point3<i32>) -> bool {
        let mut entries = self.entries.get_mut();
        self.bump(position);
        entries.remove(&position).is_some()
    }

    /// Drops the entries at `position` and its six face neighbours.
    pub fn invalidate_with_neighbors(&self, position: Point3<i32>) {
        let mut entries = self.entries.get_mut();
        for position in std::iter::once(position).chain(BlockSide::all().map(|side| side.step(position))) {
            self.bump(position);
            entries.remove(&position);
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.get_mut();
        for counter in &self.generations {
            counter.fetch_add(1, Ordering::AcqRel);
        }
        entries.clear();
    }

    // Callers hold the write lock.
    fn bump(&self, position: Point3<i32>) {
        self.generations[stripe(position)].fetch_add(1, Ordering::AcqRel);
    }

    /// Number of cached positions.
    pub fn len(&self) -> usize {
        self.entries.get().len()
    }

    /// Whether no position is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::wires::shape::ShapeBox;

    fn shape(size: u8) -> Arc<WireShape> {
        Arc::new(WireShape::from_box(ShapeBox::new([0, 0, 0], [size, 1, 1])))
    }

    #[test]
    fn stored_shapes_are_reused_until_invalidated() {
        let cache = PositionShapeCache::new();
        let position = Point3::new(1, 2, 3);

        let first = cache.get_or_insert_with(position, || Ok(Some(shape(1)))).unwrap().unwrap();
        let again = cache.get_or_insert_with(position, || Ok(Some(shape(2)))).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        assert!(cache.invalidate(position));
        assert!(!cache.invalidate(position));
        let fresh = cache.get_or_insert_with(position, || Ok(Some(shape(2)))).unwrap().unwrap();
        assert_eq!(*fresh, *shape(2));
    }

    #[test]
    fn neighbours_are_invalidated_together() {
        let cache = PositionShapeCache::new();
        let centre = Point3::new(0, 0, 0);
        let far = Point3::new(2, 0, 0);
        for position in std::iter::once(centre)
            .chain(BlockSide::all().map(|side| side.step(centre)))
            .chain(std::iter::once(far))
        {
            cache.get_or_insert_with(position, || Ok(Some(shape(1)))).unwrap();
        }
        assert_eq!(cache.len(), 8);

        cache.invalidate_with_neighbors(centre);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(far).is_some());
    }

    #[test]
    fn fills_started_before_an_invalidation_are_not_stored() {
        let cache = PositionShapeCache::new();
        let position = Point3::new(4, 4, 4);

        let returned = cache
            .get_or_insert_with(position, || {
                cache.invalidate(position);
                Ok(Some(shape(3)))
            })
            .unwrap()
            .unwrap();
        assert_eq!(*returned, *shape(3));
        assert!(cache.get(position).is_none());
    }

    #[test]
    fn changes_elsewhere_do_not_discard_a_fill() {
        let cache = PositionShapeCache::new();
        let position = Point3::new(4, 4, 4);
        let touched = |centre: Point3<i32>| {
            std::iter::once(centre)
                .chain(BlockSide::all().map(|side| side.step(centre)))
                .map(stripe)
                .collect::<Vec<_>>()
        };
        let elsewhere = (8..)
            .map(|x| Point3::new(x, 4, 4))
            .find(|centre| !touched(*centre).contains(&stripe(position)))
            .unwrap();

        cache
            .get_or_insert_with(position, || {
                cache.invalidate_with_neighbors(elsewhere);
                Ok(Some(shape(3)))
            })
            .unwrap();
        assert!(cache.get(position).is_some());

        cache
            .get_or_insert_with(BlockSide::UP.step(elsewhere), || {
                cache.invalidate_with_neighbors(elsewhere);
                Ok(Some(shape(3)))
            })
            .unwrap();
        assert!(cache.get(BlockSide::UP.step(elsewhere)).is_none());
    }

    #[test]
    fn failed_fills_leave_no_entry() {
        let cache = PositionShapeCache::new();
        let position = Point3::new(0, 0, 0);
        let result = cache.get_or_insert_with(position, || Err(WireError::EmptyComposition { index: 1 }));
        assert!(result.is_err());
        assert!(cache.is_empty());

        let nothing = cache.get_or_insert_with(position, || Ok(None)).unwrap();
        assert!(nothing.is_none());
        assert!(cache.is_empty());
    }
}
