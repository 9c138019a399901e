use std::mem;
use std::time::Instant;

use indexmap::IndexSet;
use lumen_blocks::Block;
use lumen_chunk::{BlockPos, Chunk};

use crate::change::BlockChange;
use crate::face::Face;
use crate::rules::PropagationRules;
use crate::view::PropagatorWorldView;

#[derive(Default, Debug, Clone, Copy)]
pub struct ProcessStats {
    pub changes: usize,
    pub purged: usize,
    pub pushed: usize,
}

/// Incremental propagator for one rule set.
///
/// Work is kept in two families of bucket queues, one bucket per value with
/// index `max_value - value` (0 holds the strongest entries). Reductions are
/// drained from the strongest bucket down before any increase runs, so a stale
/// high value is always purged before anything could spread from it.
///
/// The propagator never stores a view; every call borrows one for its duration.
pub struct BatchPropagator<'r, R: PropagationRules> {
    rules: &'r R,
    scale: u8,
    reduce_queues: Vec<IndexSet<BlockPos>>,
    increase_queues: Vec<IndexSet<BlockPos>>,
    stats: ProcessStats,
}

impl<'r, R: PropagationRules> BatchPropagator<'r, R> {
    pub fn new(rules: &'r R) -> Self {
        let n = rules.max_value() as usize;
        Self {
            rules,
            scale: 1,
            reduce_queues: (0..n).map(|_| IndexSet::new()).collect(),
            increase_queues: (0..n).map(|_| IndexSet::new()).collect(),
            stats: ProcessStats::default(),
        }
    }

    /// Attenuation multiplier for coarse grids where one cell spans several blocks.
    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale.max(1);
        self
    }

    #[inline]
    pub fn rules(&self) -> &'r R {
        self.rules
    }

    #[inline]
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Counters of the last `process` call.
    #[inline]
    pub fn last_stats(&self) -> ProcessStats {
        self.stats
    }

    /// Positions waiting for the next `process` call.
    pub fn pending(&self) -> usize {
        self.reduce_queues.iter().map(IndexSet::len).sum::<usize>()
            + self.increase_queues.iter().map(IndexSet::len).sum::<usize>()
    }

    /// Applies `changes` (blocks already replaced in `view`) plus any queued seeds.
    pub fn process<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V, changes: &[BlockChange]) {
        let t0 = Instant::now();
        self.stats = ProcessStats {
            changes: changes.len(),
            ..ProcessStats::default()
        };
        for change in changes {
            self.review_change(view, change);
        }
        self.process_reduction(view);
        self.process_increase(view);
        self.clean_up();
        let ms: u32 = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        log::debug!(
            target: "perf",
            "ms={} propagate_process changes={} purged={} pushed={} scale={}",
            ms,
            self.stats.changes,
            self.stats.purged,
            self.stats.pushed,
            self.scale
        );
    }

    /// Queues `pos` to spread the fixed value `block` would have there.
    pub fn propagate_from_block(&mut self, pos: BlockPos, block: Block) {
        let value = self.rules.fixed_value(block, pos);
        self.queue_spread(pos, value);
    }

    /// Queues `pos` to spread `value` to its neighbors.
    pub fn propagate_from(&mut self, pos: BlockPos, value: u8) {
        self.queue_spread(pos, value);
    }

    /// Queues `pos` for reduction as if it had held `old_value`.
    pub fn regenerate(&mut self, pos: BlockPos, old_value: u8) {
        self.reduce(pos, old_value);
    }

    /// Writes the fixed value of every cell of a freshly built `chunk` and queues
    /// the sources. Returns the number of sources; settle them with `process`.
    pub fn seed_fixed_values(&mut self, chunk: &mut Chunk) -> usize {
        let rules = self.rules;
        let dims = chunk.dims;
        let mut sources = 0;
        for y in 0..dims.sy {
            for z in 0..dims.sz {
                for x in 0..dims.sx {
                    let pos = chunk.world_pos(x, y, z);
                    let fixed = rules.fixed_value(chunk.get_local(x, y, z), pos).min(rules.max_value());
                    if fixed > 0 {
                        rules.set_value(chunk, x, y, z, fixed);
                        self.queue_spread(pos, fixed);
                        sources += 1;
                    }
                }
            }
        }
        sources
    }

    #[inline]
    fn bucket(&self, value: u8) -> usize {
        let max = self.rules.max_value();
        debug_assert!(value <= max, "value {} above max {}", value, max);
        (max - value.min(max)) as usize
    }

    fn review_change<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V, change: &BlockChange) {
        let pos = change.pos;
        let Some(existing) = view.value_at(pos) else {
            log::trace!("skipping change at unavailable {:?}", pos);
            return;
        };

        let new_value = self.rules.fixed_value(change.to, pos);
        if new_value > existing {
            self.increase(view, pos, new_value);
        }
        let old_value = self.rules.fixed_value(change.from, pos);
        if new_value < old_value {
            self.reduce(pos, old_value);
        }

        for face in Face::ALL {
            let cmp = self.rules.compare_propagation(change.to, change.from, face);
            let adj = face.step(pos);
            if cmp.is_restricting() && existing > 0 {
                self.reduce(pos, existing);
                let expected = self.rules.propagate_value(existing, face, change.from, self.scale);
                if view.value_at(adj) == Some(expected) {
                    self.reduce(adj, expected);
                }
            } else if cmp.is_permitting() {
                if existing > 0 {
                    self.queue_spread(pos, existing);
                }
                if let Some(adj_value) = view.value_at(adj) {
                    self.queue_spread(adj, adj_value);
                }
            }
        }
    }

    fn process_reduction<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V) {
        let max = self.rules.max_value();
        for depth in 0..max as usize {
            let old_value = max - depth as u8;
            // Purging may add to the bucket being drained
            while !self.reduce_queues[depth].is_empty() {
                let batch = mem::take(&mut self.reduce_queues[depth]);
                for pos in batch {
                    self.purge(view, pos, old_value);
                }
            }
        }
    }

    fn process_increase<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V) {
        let max = self.rules.max_value();
        // Value 1 never spreads
        for depth in 0..max.saturating_sub(1) as usize {
            let value = max - depth as u8;
            while !self.increase_queues[depth].is_empty() {
                let batch = mem::take(&mut self.increase_queues[depth]);
                for pos in batch {
                    self.push(view, pos, value);
                }
            }
        }
    }

    /// Resets `pos` to its fixed value and schedules whatever depended on `old_value`.
    fn purge<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V, pos: BlockPos, old_value: u8) {
        self.stats.purged += 1;
        // Any pending spread from `pos` used a value it no longer holds
        for q in self.increase_queues.iter_mut() {
            q.swap_remove(&pos);
        }

        let Some(block) = view.block_at(pos) else {
            return;
        };
        let fixed = self.rules.fixed_value(block, pos);
        if fixed > 0 {
            self.increase(view, pos, fixed);
        } else {
            view.set_value_at(pos, 0);
        }

        for face in Face::ALL {
            if !self.rules.can_spread_out_of(block, face) {
                continue;
            }
            let expected = self.rules.propagate_value(old_value, face, block, self.scale);
            let adj = face.step(pos);
            match view.value_at(adj) {
                Some(adj_value) if adj_value == expected => {
                    let accepts = view
                        .block_at(adj)
                        .is_some_and(|b| self.rules.can_spread_into(b, face.opposite()));
                    if accepts {
                        self.reduce(adj, expected);
                    }
                }
                Some(adj_value) if adj_value > 0 => self.queue_spread(adj, adj_value),
                _ => {}
            }
        }
    }

    fn push<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V, pos: BlockPos, value: u8) {
        self.stats.pushed += 1;
        let Some(block) = view.block_at(pos) else {
            return;
        };
        for face in Face::ALL {
            if !self.rules.can_spread_out_of(block, face) {
                continue;
            }
            let propagated = self.rules.propagate_value(value, face, block, self.scale);
            let adj = face.step(pos);
            let Some(adj_value) = view.value_at(adj) else {
                continue;
            };
            if adj_value >= propagated {
                continue;
            }
            let accepts = view
                .block_at(adj)
                .is_some_and(|b| self.rules.can_spread_into(b, face.opposite()));
            if accepts {
                self.increase(view, adj, propagated);
            }
        }
    }

    fn increase<V: PropagatorWorldView + ?Sized>(&mut self, view: &mut V, pos: BlockPos, value: u8) {
        let max = self.rules.max_value();
        debug_assert!(value <= max, "value {} above max {}", value, max);
        let value = value.min(max);
        view.set_value_at(pos, value);
        self.queue_spread(pos, value);
    }

    #[inline]
    fn reduce(&mut self, pos: BlockPos, old_value: u8) {
        if old_value > 0 {
            let bucket = self.bucket(old_value);
            self.reduce_queues[bucket].insert(pos);
        }
    }

    #[inline]
    pub(crate) fn queue_spread(&mut self, pos: BlockPos, value: u8) {
        if value > 1 {
            let bucket = self.bucket(value);
            self.increase_queues[bucket].insert(pos);
        }
    }

    fn clean_up(&mut self) {
        for q in self.reduce_queues.iter_mut() {
            q.clear();
        }
        for q in self.increase_queues.iter_mut() {
            q.clear();
        }
    }
}
