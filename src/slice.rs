use lumen_blocks::BlockRegistry;
use lumen_chunk::{BlockPos, ChunkProvider, ChunkStore, ValueChannel};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Renders the horizontal plane at world `y` across every loaded chunk, one
/// row per z. Cells print their value as a hex digit; opaque cells without a
/// value print `#`, unloaded cells print a space.
pub fn render_slice(store: &ChunkStore, reg: &BlockRegistry, channel: ValueChannel, y: i32) -> String {
    let coords = store.coords();
    let dims = store.dims();
    let Some(first) = coords.first() else {
        return String::new();
    };
    let (mut lo, mut hi) = (*first, *first);
    for c in &coords {
        lo.cx = lo.cx.min(c.cx);
        lo.cz = lo.cz.min(c.cz);
        hi.cx = hi.cx.max(c.cx);
        hi.cz = hi.cz.max(c.cz);
    }
    let x0 = lo.cx * dims.sx as i32;
    let x1 = (hi.cx + 1) * dims.sx as i32;
    let z0 = lo.cz * dims.sz as i32;
    let z1 = (hi.cz + 1) * dims.sz as i32;

    let mut out = String::with_capacity(((x1 - x0 + 1) * (z1 - z0)) as usize);
    for z in z0..z1 {
        for x in x0..x1 {
            let pos = BlockPos::new(x, y, z);
            let Some(chunk) = store.chunk(dims.chunk_of(pos)) else {
                out.push(' ');
                continue;
            };
            let (lx, ly, lz) = dims.local_of(pos);
            let v = chunk.value(channel, lx, ly, lz);
            let opaque = reg
                .get_block(chunk.get_local(lx, ly, lz))
                .is_none_or(|ty| !ty.propagates_light && ty.solid);
            if v == 0 && opaque {
                out.push('#');
            } else {
                out.push(HEX[(v & 0x0f) as usize] as char);
            }
        }
        out.push('\n');
    }
    out
}
