//! Metric terms for curvilinear hexahedral elements.
//!
//! The contravariant basis `dsdx` is the cofactor matrix of the covariant
//! Jacobian `dxds` of the reference-to-physical map, computed per node as
//! cross products of the covariant basis vectors:
//!
//! `Ja_c = a_{c+1} × a_{c+2}` (cyclic), where `a_c` is column `c` of `dxds`.
//!
//! Columns of `dsdx` are the `Ja_c`, so `dxds · dsdxᵀ = det(dxds) · I`.
//! The exact index pairing below is load-bearing: it is the discrete
//! metric identity that keeps free-stream preservation intact on curved
//! elements, and sign or pairing changes break conservation without any
//! local symptom.

use crate::dispatch;
use crate::error::{check_len, KernelError};
use crate::layout::{Dim, ScalarLayout, TensorLayout};

/// Cofactor pairings, one entry per output block in layout order
/// ((1,1), (2,1), (3,1), (1,2), ...). Each output component is
/// `dxds(p0) * dxds(p1) - dxds(p2) * dxds(p3)`.
const COFACTORS: [[(usize, usize); 4]; 9] = [
    // Ja1
    [(2, 2), (3, 3), (3, 2), (2, 3)], // dsdx(1,1)
    [(1, 3), (3, 2), (3, 3), (1, 2)], // dsdx(2,1)
    [(1, 2), (2, 3), (2, 2), (1, 3)], // dsdx(3,1)
    // Ja2
    [(2, 3), (3, 1), (3, 3), (2, 1)], // dsdx(1,2)
    [(1, 1), (3, 3), (3, 1), (1, 3)], // dsdx(2,2)
    [(1, 3), (2, 1), (2, 3), (1, 1)], // dsdx(3,2)
    // Ja3
    [(2, 1), (3, 2), (3, 1), (2, 2)], // dsdx(1,3)
    [(1, 2), (3, 1), (3, 2), (1, 1)], // dsdx(2,3)
    [(1, 1), (2, 2), (2, 1), (1, 2)], // dsdx(3,3)
];

/// Tensor layout used by the metric kernels: one variable per node.
pub fn metric_layout(order: usize, n_elem: usize) -> TensorLayout {
    TensorLayout::new(ScalarLayout::new(order, 1, n_elem, Dim::Three))
}

/// Compute the contravariant basis for every node of every hexahedral
/// element: `dsdx` becomes the cofactor matrix of `dxds`, overwritten in
/// full.
///
/// Both buffers are 3x3 tensor fields of shape `(N+1)^3 × 1 × nEl`
/// (length `9 * (N+1)^3 * nEl`).
pub fn contravariant_basis_hex(
    dxds: &[f64],
    dsdx: &mut [f64],
    order: usize,
    n_elem: usize,
) -> Result<(), KernelError> {
    let tensor = metric_layout(order, n_elem);
    check_len("dxds", dxds.len(), tensor.len())?;
    check_len("dsdx", dsdx.len(), tensor.len())?;
    if tensor.is_empty() {
        return Ok(());
    }

    let block_len = tensor.scalar().len();

    // One output component block per execution unit; each reads four
    // input blocks at its own node offsets only.
    dispatch::for_each_chunk(dsdx, block_len, |b, out| {
        let [p0, p1, p2, p3] = COFACTORS[b];
        let (f0, f1) = (component(dxds, tensor, p0), component(dxds, tensor, p1));
        let (f2, f3) = (component(dxds, tensor, p2), component(dxds, tensor, p3));
        for idx in 0..block_len {
            out[idx] = f0[idx] * f1[idx] - f2[idx] * f3[idx];
        }
    });
    Ok(())
}

/// The scalar-sized block of component `(r, c)` within a tensor buffer.
fn component(buf: &[f64], tensor: TensorLayout, (r, c): (usize, usize)) -> &[f64] {
    &buf[tensor.component_start(r, c)..][..tensor.scalar().len()]
}
