//! Chunk sizing for pixel-parallel passes.

/// Multiplier for number of chunks relative to CPU threads.
/// Using 3x threads gives good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 3;

/// Smallest chunk handed to a worker. Below this, scheduling overhead
/// dominates the per-pixel work.
pub const MIN_CHUNK_PIXELS: usize = 4096;

/// Chunk lengths are kept a multiple of this so SIMD kernels only see a
/// scalar tail in the final chunk.
pub const LANE_ALIGN: usize = 16;

/// Chunk length for splitting `len` pixels across the rayon pool.
///
/// Always at least `MIN_CHUNK_PIXELS` and a multiple of `LANE_ALIGN`.
#[inline]
pub fn pixel_chunk_size(len: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    let size = (len / num_chunks).max(MIN_CHUNK_PIXELS);
    size.next_multiple_of(LANE_ALIGN)
}

/// Number of chunks `len` pixels split into with the given chunk length.
#[inline]
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    debug_assert!(chunk_size > 0);
    len.div_ceil(chunk_size)
}
