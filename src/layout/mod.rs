//! Flat-buffer layouts for nodal field data.
//!
//! All field storage in this crate is a single contiguous `[f64]` holding a
//! tensor of shape `[node]^d × variable × element`, where each axis carries
//! `N + 1` nodes for polynomial order `N`. The scalar offset is
//!
//! 1D: `i + (N+1)*(iVar + nVar*iEl)`
//! 2D: `i + (N+1)*(j + (N+1)*(iVar + nVar*iEl))`
//! 3D: `i + (N+1)*(j + (N+1)*(k + (N+1)*(iVar + nVar*iEl)))`
//!
//! so nodes vary fastest, then variables, then elements. Vector and tensor
//! fields store each component as a complete scalar-sized block; the
//! component index selects the block and is 1-based. The 1-based convention
//! is load-bearing for downstream code and is preserved here deliberately.
//!
//! Every stride expression used by the kernels is funneled through this
//! module; integrator code never does raw offset arithmetic.

/// Spatial dimensionality of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim {
    One,
    Two,
    Three,
}

impl Dim {
    /// Number of spatial axes.
    #[inline]
    pub const fn rank(self) -> usize {
        match self {
            Dim::One => 1,
            Dim::Two => 2,
            Dim::Three => 3,
        }
    }
}

/// Layout of a scalar field buffer.
///
/// Describes a buffer of length `(N+1)^d * n_var * n_elem`. The layout is a
/// bijection from valid `(node, iVar, iEl)` tuples onto `[0, len)`.
///
/// # Example
///
/// ```
/// use sem_rs::{Dim, ScalarLayout};
///
/// let layout = ScalarLayout::new(3, 2, 10, Dim::Two);
/// assert_eq!(layout.nodes_per_elem(), 16);
/// assert_eq!(layout.len(), 16 * 2 * 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarLayout {
    order: usize,
    n_var: usize,
    n_elem: usize,
    dim: Dim,
}

impl ScalarLayout {
    /// Create a layout for polynomial order `order` with `n_var` variables
    /// and `n_elem` elements.
    ///
    /// # Panics
    ///
    /// Panics if `n_var == 0`; a field with no variables has no valid layout.
    pub fn new(order: usize, n_var: usize, n_elem: usize, dim: Dim) -> Self {
        assert!(n_var > 0, "layout requires at least one variable");
        Self {
            order,
            n_var,
            n_elem,
            dim,
        }
    }

    /// Polynomial order `N`.
    #[inline]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Number of variables stored per node.
    #[inline]
    pub const fn n_var(&self) -> usize {
        self.n_var
    }

    /// Number of elements.
    #[inline]
    pub const fn n_elem(&self) -> usize {
        self.n_elem
    }

    /// Spatial dimensionality.
    #[inline]
    pub const fn dim(&self) -> Dim {
        self.dim
    }

    /// Nodes per axis, `N + 1`.
    #[inline]
    pub const fn nodes_per_axis(&self) -> usize {
        self.order + 1
    }

    /// Nodes per element, `(N + 1)^d`.
    #[inline]
    pub const fn nodes_per_elem(&self) -> usize {
        let n = self.order + 1;
        match self.dim {
            Dim::One => n,
            Dim::Two => n * n,
            Dim::Three => n * n * n,
        }
    }

    /// Distance between consecutive elements in the flat buffer.
    #[inline]
    pub const fn elem_stride(&self) -> usize {
        self.nodes_per_elem() * self.n_var
    }

    /// Total buffer length, `(N+1)^d * n_var * n_elem`.
    #[inline]
    pub const fn len(&self) -> usize {
        self.elem_stride() * self.n_elem
    }

    /// Whether the buffer is empty (`n_elem == 0`).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.n_elem == 0
    }

    /// Same node/element shape with a different variable count.
    ///
    /// Used to view history buffers (`nPrev = p * nVar` slots) and RK work
    /// buffers (`nWork` slots) that share the nodal layout of the solution.
    #[inline]
    pub fn with_n_var(&self, n_var: usize) -> Self {
        Self::new(self.order, n_var, self.n_elem, self.dim)
    }

    /// Flatten a 1D node coordinate.
    #[inline]
    pub fn node_1d(&self, i: usize) -> usize {
        debug_assert_eq!(self.dim, Dim::One);
        debug_assert!(i <= self.order);
        i
    }

    /// Flatten a 2D node coordinate: `i + (N+1)*j`.
    #[inline]
    pub fn node_2d(&self, i: usize, j: usize) -> usize {
        debug_assert_eq!(self.dim, Dim::Two);
        debug_assert!(i <= self.order && j <= self.order);
        i + self.nodes_per_axis() * j
    }

    /// Flatten a 3D node coordinate: `i + (N+1)*(j + (N+1)*k)`.
    #[inline]
    pub fn node_3d(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert_eq!(self.dim, Dim::Three);
        debug_assert!(i <= self.order && j <= self.order && k <= self.order);
        i + self.nodes_per_axis() * (j + self.nodes_per_axis() * k)
    }

    /// Offset of `(node, iVar)` relative to the start of an element chunk.
    ///
    /// `node` is a flattened node index in `[0, nodes_per_elem())`.
    #[inline]
    pub fn offset_in_elem(&self, i_var: usize, node: usize) -> usize {
        debug_assert!(i_var < self.n_var);
        debug_assert!(node < self.nodes_per_elem());
        node + self.nodes_per_elem() * i_var
    }

    /// Absolute offset of a flattened `(node, iVar, iEl)` tuple.
    #[inline]
    pub fn index(&self, node: usize, i_var: usize, i_el: usize) -> usize {
        debug_assert!(i_el < self.n_elem);
        self.offset_in_elem(i_var, node) + self.elem_stride() * i_el
    }

    /// Scalar offset for a 1D field.
    #[inline]
    pub fn index_1d(&self, i: usize, i_var: usize, i_el: usize) -> usize {
        self.index(self.node_1d(i), i_var, i_el)
    }

    /// Scalar offset for a 2D field.
    #[inline]
    pub fn index_2d(&self, i: usize, j: usize, i_var: usize, i_el: usize) -> usize {
        self.index(self.node_2d(i, j), i_var, i_el)
    }

    /// Scalar offset for a 3D field.
    #[inline]
    pub fn index_3d(&self, i: usize, j: usize, k: usize, i_var: usize, i_el: usize) -> usize {
        self.index(self.node_3d(i, j, k), i_var, i_el)
    }
}

/// Layout of a vector field buffer.
///
/// A vector field stores `d` components, each a complete scalar-sized block,
/// so the buffer length is `d * scalar.len()`. Component blocks are not
/// interleaved at node granularity. The component index is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorLayout {
    scalar: ScalarLayout,
}

impl VectorLayout {
    pub fn new(scalar: ScalarLayout) -> Self {
        Self { scalar }
    }

    /// The per-component scalar layout.
    #[inline]
    pub const fn scalar(&self) -> ScalarLayout {
        self.scalar
    }

    /// Total buffer length, `d * (N+1)^d * n_var * n_elem`.
    #[inline]
    pub const fn len(&self) -> usize {
        self.scalar.dim().rank() * self.scalar.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.scalar.is_empty()
    }

    /// Start of the scalar-sized block for component `c` (1-based).
    #[inline]
    pub fn component_start(&self, c: usize) -> usize {
        debug_assert!(c >= 1 && c <= self.scalar.dim().rank());
        (c - 1) * self.scalar.len()
    }

    /// Offset of component `c` (1-based) at a flattened node tuple.
    #[inline]
    pub fn index(&self, c: usize, node: usize, i_var: usize, i_el: usize) -> usize {
        self.component_start(c) + self.scalar.index(node, i_var, i_el)
    }

    /// Offset of component `c` (1-based) for a 2D field.
    #[inline]
    pub fn index_2d(&self, c: usize, i: usize, j: usize, i_var: usize, i_el: usize) -> usize {
        self.component_start(c) + self.scalar.index_2d(i, j, i_var, i_el)
    }

    /// Offset of component `c` (1-based) for a 3D field.
    #[inline]
    pub fn index_3d(
        &self,
        c: usize,
        i: usize,
        j: usize,
        k: usize,
        i_var: usize,
        i_el: usize,
    ) -> usize {
        self.component_start(c) + self.scalar.index_3d(i, j, k, i_var, i_el)
    }
}

/// Layout of a tensor field buffer.
///
/// A tensor field stores `d*d` components, each a complete scalar-sized
/// block. Component indices `(r, c)` are 1-based; the row index varies
/// fastest across blocks, so block `(r, c)` is `(r-1) + d*(c-1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorLayout {
    scalar: ScalarLayout,
}

impl TensorLayout {
    pub fn new(scalar: ScalarLayout) -> Self {
        Self { scalar }
    }

    /// The per-component scalar layout.
    #[inline]
    pub const fn scalar(&self) -> ScalarLayout {
        self.scalar
    }

    /// Total buffer length, `d^2 * (N+1)^d * n_var * n_elem`.
    #[inline]
    pub const fn len(&self) -> usize {
        let d = self.scalar.dim().rank();
        d * d * self.scalar.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.scalar.is_empty()
    }

    /// Block index of component `(r, c)`, both 1-based.
    #[inline]
    pub fn component_block(&self, r: usize, c: usize) -> usize {
        let d = self.scalar.dim().rank();
        debug_assert!(r >= 1 && r <= d);
        debug_assert!(c >= 1 && c <= d);
        (r - 1) + d * (c - 1)
    }

    /// Start of the scalar-sized block for component `(r, c)`.
    #[inline]
    pub fn component_start(&self, r: usize, c: usize) -> usize {
        self.component_block(r, c) * self.scalar.len()
    }

    /// Offset of component `(r, c)` at a flattened node tuple.
    #[inline]
    pub fn index(&self, r: usize, c: usize, node: usize, i_var: usize, i_el: usize) -> usize {
        self.component_start(r, c) + self.scalar.index(node, i_var, i_el)
    }

    /// Offset of component `(r, c)` for a 2D field.
    #[inline]
    pub fn index_2d(
        &self,
        r: usize,
        c: usize,
        i: usize,
        j: usize,
        i_var: usize,
        i_el: usize,
    ) -> usize {
        self.component_start(r, c) + self.scalar.index_2d(i, j, i_var, i_el)
    }

    /// Offset of component `(r, c)` for a 3D field.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn index_3d(
        &self,
        r: usize,
        c: usize,
        i: usize,
        j: usize,
        k: usize,
        i_var: usize,
        i_el: usize,
    ) -> usize {
        self.component_start(r, c) + self.scalar.index_3d(i, j, k, i_var, i_el)
    }
}
