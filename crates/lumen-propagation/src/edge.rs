//! Continuing propagation across a chunk seam once both sides are loaded.
//!
//! Each column of the shared face is walked straight into the neighbor chunk,
//! writing values while they beat what is stored. Only the walked cells whose
//! sideways spread is not already covered by the adjacent columns are queued,
//! so the follow-up `process` touches the seam region instead of the whole
//! neighbor.

use std::time::Instant;

use lumen_chunk::{Chunk, ChunkCoord, ChunkDims, ChunkProvider};

use crate::batch::BatchPropagator;
use crate::face::Face;
use crate::rules::PropagationRules;
use crate::view::ProviderWorldView;

#[derive(Clone, Copy, Default, Debug)]
struct Column {
    depth: usize,
    // Walk reached the far side of the neighbor chunk
    truncated: bool,
}

/// The shared face seen from the neighbor chunk: columns indexed by the two
/// in-face axes `(a, b)`, depth measured along the face normal.
struct FacePlane {
    face: Face,
    dims: [usize; 3],
    axis: usize,
    u: usize,
    v: usize,
}

impl FacePlane {
    fn new(dims: ChunkDims, face: Face) -> Self {
        let axis = face.axis();
        let (u, v) = match axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        Self {
            face,
            dims: [dims.sx, dims.sy, dims.sz],
            axis,
            u,
            v,
        }
    }

    #[inline]
    fn width(&self) -> usize {
        self.dims[self.u]
    }

    #[inline]
    fn height(&self) -> usize {
        self.dims[self.v]
    }

    #[inline]
    fn depth_limit(&self) -> usize {
        self.dims[self.axis]
    }

    #[inline]
    fn index(&self, a: usize, b: usize) -> usize {
        a + self.width() * b
    }

    /// Face cell of the source chunk for column `(a, b)`.
    #[inline]
    fn source_local(&self, a: usize, b: usize) -> [usize; 3] {
        let mut p = [0; 3];
        p[self.u] = a;
        p[self.v] = b;
        p[self.axis] = if self.face.is_positive() {
            self.depth_limit() - 1
        } else {
            0
        };
        p
    }

    /// Cell `depth` steps into the neighbor chunk for column `(a, b)`.
    #[inline]
    fn adj_local(&self, a: usize, b: usize, depth: usize) -> [usize; 3] {
        let mut p = [0; 3];
        p[self.u] = a;
        p[self.v] = b;
        p[self.axis] = if self.face.is_positive() {
            depth
        } else {
            self.depth_limit() - 1 - depth
        };
        p
    }

    /// In-face neighbors of `(a, b)`, `None` where they fall outside the face.
    fn neighbors(&self, a: usize, b: usize) -> [(Option<(usize, usize)>, Face); 4] {
        let (w, h) = (self.width(), self.height());
        [
            (a.checked_sub(1).map(|na| (na, b)), Face::from_axis(self.u, false)),
            ((a + 1 < w).then_some((a + 1, b)), Face::from_axis(self.u, true)),
            (b.checked_sub(1).map(|nb| (a, nb)), Face::from_axis(self.v, false)),
            ((b + 1 < h).then_some((a, b + 1)), Face::from_axis(self.v, true)),
        ]
    }
}

impl<R: PropagationRules> BatchPropagator<'_, R> {
    /// Continues values of `chunk` into `adj_chunk`, its neighbor across `face`,
    /// and queues the seam cells that still need to spread. Returns whether
    /// `adj_chunk` was written. Follow with `process` over a view covering both
    /// chunks.
    ///
    /// With `propagate_external`, columns on the border of the face also queue
    /// their full depth so the next `process` can carry them into chunks beside
    /// `adj_chunk`.
    pub fn propagate_between(
        &mut self,
        chunk: &Chunk,
        adj_chunk: &mut Chunk,
        face: Face,
        propagate_external: bool,
    ) -> bool {
        let (dx, dy, dz) = face.delta();
        if chunk.coord.offset(dx, dy, dz) != adj_chunk.coord || chunk.dims != adj_chunk.dims {
            log::warn!(
                "propagate_between: {:?} is not the {:?} neighbor of {:?}",
                adj_chunk.coord,
                face,
                chunk.coord
            );
            return false;
        }
        let plane = FacePlane::new(chunk.dims, face);
        let columns = self.walk_columns(chunk, adj_chunk, &plane);
        let written = columns.iter().filter(|c| c.depth > 0).count();
        if written > 0 {
            self.seed_columns(adj_chunk, &plane, &columns, propagate_external);
        }
        log::trace!(
            "propagate_between {:?} -> {:?} face={:?} columns={} pending={}",
            chunk.coord,
            adj_chunk.coord,
            face,
            written,
            self.pending()
        );
        written > 0
    }

    fn walk_columns(&self, chunk: &Chunk, adj: &mut Chunk, plane: &FacePlane) -> Vec<Column> {
        let rules = self.rules();
        let scale = self.scale();
        let face = plane.face;
        let mut columns = vec![Column::default(); plane.width() * plane.height()];
        for b in 0..plane.height() {
            for a in 0..plane.width() {
                let [sx, sy, sz] = plane.source_local(a, b);
                let mut last = chunk.get_local(sx, sy, sz);
                let mut expected = rules.propagate_value(rules.value(chunk, sx, sy, sz), face, last, scale);
                let col = &mut columns[plane.index(a, b)];
                while expected > 0 {
                    if col.depth >= plane.depth_limit() {
                        col.truncated = true;
                        break;
                    }
                    let [x, y, z] = plane.adj_local(a, b, col.depth);
                    if expected <= rules.value(adj, x, y, z) || !rules.can_spread_out_of(last, face) {
                        break;
                    }
                    let next = adj.get_local(x, y, z);
                    if !rules.can_spread_into(next, face.opposite()) {
                        break;
                    }
                    rules.set_value(adj, x, y, z, expected);
                    col.depth += 1;
                    last = next;
                    expected = rules.propagate_value(expected, face, next, scale);
                }
            }
        }
        columns
    }

    /// Leading run of depths where column `n` already holds at least what
    /// column `c` would pass to it sideways across `lateral`.
    fn saturated_depth(
        &self,
        adj: &Chunk,
        plane: &FacePlane,
        c: (usize, usize, Column),
        n: (usize, usize, Column),
        lateral: Face,
    ) -> usize {
        let rules = self.rules();
        let run = c.2.depth.min(n.2.depth);
        for i in 0..run {
            let [x, y, z] = plane.adj_local(c.0, c.1, i);
            let passed = rules.propagate_value(rules.value(adj, x, y, z), lateral, adj.get_local(x, y, z), self.scale());
            let [nx, ny, nz] = plane.adj_local(n.0, n.1, i);
            if rules.value(adj, nx, ny, nz) < passed {
                return i;
            }
        }
        run
    }

    fn seed_columns(&mut self, adj: &Chunk, plane: &FacePlane, columns: &[Column], propagate_external: bool) {
        let rules = self.rules();
        for b in 0..plane.height() {
            for a in 0..plane.width() {
                let col = columns[plane.index(a, b)];
                if col.depth == 0 {
                    continue;
                }
                let mut start = col.depth;
                for (n, lateral) in plane.neighbors(a, b) {
                    match n {
                        Some((na, nb)) => {
                            let ncol = columns[plane.index(na, nb)];
                            let sat = self.saturated_depth(adj, plane, (a, b, col), (na, nb, ncol), lateral);
                            start = start.min(sat);
                        }
                        None if propagate_external => start = 0,
                        None => {}
                    }
                }
                for i in start..col.depth {
                    let [x, y, z] = plane.adj_local(a, b, i);
                    self.queue_spread(adj.world_pos(x, y, z), rules.value(adj, x, y, z));
                }
                if col.truncated {
                    let [x, y, z] = plane.adj_local(a, b, col.depth - 1);
                    self.queue_spread(adj.world_pos(x, y, z), rules.value(adj, x, y, z));
                }
            }
        }
    }
}

/// Joins a freshly loaded chunk at `coord` with every loaded face neighbor:
/// continues values across each shared face in both directions, marks the
/// written chunks dirty and settles the result through the provider.
/// Returns the number of directed seams that wrote values.
pub fn relight_loaded_neighbors<R, P>(
    propagator: &mut BatchPropagator<'_, R>,
    provider: &mut P,
    coord: ChunkCoord,
    propagate_external: bool,
) -> usize
where
    R: PropagationRules,
    P: ChunkProvider + ?Sized,
{
    let t0 = Instant::now();
    if provider.chunk(coord).is_none() {
        return 0;
    }
    let mut seams = 0;
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        let other = coord.offset(dx, dy, dz);
        let (into_other, into_center) = {
            let Some([center, neighbor]) = provider.chunk_pair_mut(coord, other) else {
                continue;
            };
            let into_other = propagator.propagate_between(center, neighbor, face, propagate_external);
            let into_center = propagator.propagate_between(neighbor, center, face.opposite(), propagate_external);
            (into_other, into_center)
        };
        if into_other || into_center {
            provider.mark_dirty(coord);
            provider.mark_dirty(other);
        }
        seams += into_other as usize + into_center as usize;
    }
    let rules = propagator.rules();
    let mut view = ProviderWorldView::new(rules, provider);
    propagator.process(&mut view, &[]);
    let ms: u32 = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    log::info!(
        target: "perf",
        "ms={} relight_neighbors cx={} cy={} cz={} seams={}",
        ms,
        coord.cx,
        coord.cy,
        coord.cz,
        seams
    );
    seams
}
