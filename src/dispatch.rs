//! Data-parallel dispatch over per-element (or per-component) chunks.
//!
//! Every kernel in this crate is a map over the index space
//! `{0..N}^d × {0..nVar} × {0..nEl}` in which each output offset is written
//! by exactly one execution unit reading only its own offsets. That makes
//! the decomposition embarrassingly parallel: buffers are split into
//! equal-count chunks (one per element, or one per tensor component) and
//! chunks are processed independently.
//!
//! With the `parallel` feature the chunks run on the rayon pool; without it
//! the same closures run serially. Callers guarantee, via the layout
//! validation in each kernel, that all buffers split into the same number
//! of chunks.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `f` to each chunk of `buf`, chunked by `stride`.
pub(crate) fn for_each_chunk<F>(buf: &mut [f64], stride: usize, f: F)
where
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    buf.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(k, chunk)| f(k, chunk));

    #[cfg(not(feature = "parallel"))]
    buf.chunks_mut(stride)
        .enumerate()
        .for_each(|(k, chunk)| f(k, chunk));
}

/// Apply `f` to corresponding chunks of a mutable and a read-only buffer.
///
/// The strides may differ (history and work buffers are wider than the
/// solution) but must yield the same chunk count.
pub(crate) fn zip_chunks<F>(a: &mut [f64], stride_a: usize, b: &[f64], stride_b: usize, f: F)
where
    F: Fn(usize, &mut [f64], &[f64]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    a.par_chunks_mut(stride_a)
        .zip(b.par_chunks(stride_b))
        .enumerate()
        .for_each(|(k, (ca, cb))| f(k, ca, cb));

    #[cfg(not(feature = "parallel"))]
    a.chunks_mut(stride_a)
        .zip(b.chunks(stride_b))
        .enumerate()
        .for_each(|(k, (ca, cb))| f(k, ca, cb));
}

/// Apply `f` to corresponding chunks of two mutable buffers.
pub(crate) fn zip_chunks_mut<F>(
    a: &mut [f64],
    stride_a: usize,
    b: &mut [f64],
    stride_b: usize,
    f: F,
) where
    F: Fn(usize, &mut [f64], &mut [f64]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    a.par_chunks_mut(stride_a)
        .zip(b.par_chunks_mut(stride_b))
        .enumerate()
        .for_each(|(k, (ca, cb))| f(k, ca, cb));

    #[cfg(not(feature = "parallel"))]
    a.chunks_mut(stride_a)
        .zip(b.chunks_mut(stride_b))
        .enumerate()
        .for_each(|(k, (ca, cb))| f(k, ca, cb));
}

/// Apply `f` to corresponding chunks of one mutable and two read-only
/// buffers (right-hand-side assembly reads `source` and `fluxDivergence`).
pub(crate) fn zip3_chunks<F>(
    a: &mut [f64],
    stride_a: usize,
    b: &[f64],
    stride_b: usize,
    c: &[f64],
    stride_c: usize,
    f: F,
) where
    F: Fn(usize, &mut [f64], &[f64], &[f64]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    a.par_chunks_mut(stride_a)
        .zip(b.par_chunks(stride_b))
        .zip(c.par_chunks(stride_c))
        .enumerate()
        .for_each(|(k, ((ca, cb), cc))| f(k, ca, cb, cc));

    #[cfg(not(feature = "parallel"))]
    a.chunks_mut(stride_a)
        .zip(b.chunks(stride_b))
        .zip(c.chunks(stride_c))
        .enumerate()
        .for_each(|(k, ((ca, cb), cc))| f(k, ca, cb, cc));
}

/// Apply `f` to corresponding chunks of two mutable buffers and one
/// read-only buffer (the RK stage touches `grk`, `solution`, and `dSdt`).
pub(crate) fn zip3_chunks_mut<F>(
    a: &mut [f64],
    stride_a: usize,
    b: &mut [f64],
    stride_b: usize,
    c: &[f64],
    stride_c: usize,
    f: F,
) where
    F: Fn(usize, &mut [f64], &mut [f64], &[f64]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    a.par_chunks_mut(stride_a)
        .zip(b.par_chunks_mut(stride_b))
        .zip(c.par_chunks(stride_c))
        .enumerate()
        .for_each(|(k, ((ca, cb), cc))| f(k, ca, cb, cc));

    #[cfg(not(feature = "parallel"))]
    a.chunks_mut(stride_a)
        .zip(b.chunks_mut(stride_b))
        .zip(c.chunks(stride_c))
        .enumerate()
        .for_each(|(k, ((ca, cb), cc))| f(k, ca, cb, cc));
}
