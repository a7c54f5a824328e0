//! Shape compatibility rules and kernel selection

use crate::error::{EvalError, Result};
use crate::site::Site;
use crate::value::Shape;

/// How one axis of a 2-D pair lines up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stretch {
    /// Both operands have the same extent
    Neither,
    /// The left operand has extent 1 and is replicated
    Lhs,
    /// The right operand has extent 1 and is replicated
    Rhs,
}

impl Stretch {
    /// Classify one axis, or `None` if the extents are incompatible.
    pub fn classify(lhs: usize, rhs: usize) -> Option<Stretch> {
        if lhs == rhs {
            Some(Stretch::Neither)
        } else if lhs == 1 {
            Some(Stretch::Lhs)
        } else if rhs == 1 {
            Some(Stretch::Rhs)
        } else {
            None
        }
    }
}

/// The nine ways two 2-D operands can be combined.
///
/// "Row" kernels replicate a single-row operand down the rows of the result,
/// "col" kernels replicate a single-column operand across its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Same shape, elementwise
    NoStretch,
    /// lhs is 1x1
    LhsBoth,
    /// rhs is 1x1
    RhsBoth,
    /// lhs is a single row
    LhsRow,
    /// lhs is a single column
    LhsCol,
    /// rhs is a single row
    RhsRow,
    /// rhs is a single column
    RhsCol,
    /// lhs is a single row, rhs a single column
    LhsRowRhsCol,
    /// lhs is a single column, rhs a single row
    LhsColRhsRow,
}

impl Kernel {
    /// Select the kernel for a row/column stretch pair.
    pub fn select(rows: Stretch, cols: Stretch) -> Kernel {
        use Stretch::*;
        match (rows, cols) {
            (Neither, Neither) => Kernel::NoStretch,
            (Lhs, Lhs) => Kernel::LhsBoth,
            (Rhs, Rhs) => Kernel::RhsBoth,
            (Lhs, Neither) => Kernel::LhsRow,
            (Neither, Lhs) => Kernel::LhsCol,
            (Rhs, Neither) => Kernel::RhsRow,
            (Neither, Rhs) => Kernel::RhsCol,
            (Lhs, Rhs) => Kernel::LhsRowRhsCol,
            (Rhs, Lhs) => Kernel::LhsColRhsRow,
        }
    }

    /// Whether the result is larger than both operands
    pub fn is_cross(&self) -> bool {
        matches!(self, Kernel::LhsRowRhsCol | Kernel::LhsColRhsRow)
    }
}

/// Everything needed to run a broadcast, computed before any element is
/// touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Shape of the result
    pub shape: Shape,
    /// Rows of the result viewed as 2-D
    pub rows: usize,
    /// Columns of the result viewed as 2-D
    pub cols: usize,
    /// lhs viewed as `(rows, cols)`
    pub lhs: (usize, usize),
    /// rhs viewed as `(rows, cols)`
    pub rhs: (usize, usize),
    /// Selected kernel
    pub kernel: Kernel,
}

/// Scalars are 1x1, vectors a single row.
fn as_2d(shape: Shape) -> (usize, usize) {
    match shape {
        Shape::Scalar => (1, 1),
        Shape::Vector(n) => (1, n),
        Shape::Matrix { rows, cols } => (rows, cols),
    }
}

fn mismatch(site: &Site, lhs: Shape, rhs: Shape) -> EvalError {
    EvalError::shape_mismatch(
        site,
        format!(
            "the dimensions of the operands do not match: {} and {}",
            lhs, rhs
        ),
    )
}

/// Work out the result shape and kernel for `lhs op rhs`.
pub fn plan(lhs: Shape, rhs: Shape, site: &Site) -> Result<Plan> {
    let (l, r) = match (lhs, rhs) {
        (Shape::Scalar, _) | (_, Shape::Scalar) => (as_2d(lhs), as_2d(rhs)),

        (Shape::Vector(a), Shape::Vector(b)) => {
            if a != b && a != 1 && b != 1 {
                return Err(mismatch(site, lhs, rhs));
            }
            ((1, a), (1, b))
        }

        (Shape::Vector(n), Shape::Matrix { rows, cols }) => {
            if n != cols && n != 1 && cols != 1 {
                return Err(mismatch(site, lhs, rhs));
            }
            ((1, n), (rows, cols))
        }

        (Shape::Matrix { rows, cols }, Shape::Vector(n)) => {
            if n != cols && n != 1 && cols != 1 {
                return Err(mismatch(site, lhs, rhs));
            }
            ((rows, cols), (1, n))
        }

        (Shape::Matrix { .. }, Shape::Matrix { .. }) => (as_2d(lhs), as_2d(rhs)),
    };

    let row_stretch = Stretch::classify(l.0, r.0).ok_or_else(|| mismatch(site, lhs, rhs))?;
    let col_stretch = Stretch::classify(l.1, r.1).ok_or_else(|| mismatch(site, lhs, rhs))?;
    let kernel = Kernel::select(row_stretch, col_stretch);

    let rows = if l.0 == 1 { r.0 } else { l.0 };
    let cols = if l.1 == 1 { r.1 } else { l.1 };
    let shape = match lhs.rank().max(rhs.rank()) {
        0 => Shape::Scalar,
        1 => Shape::Vector(cols),
        _ => Shape::Matrix { rows, cols },
    };

    Ok(Plan {
        shape,
        rows,
        cols,
        lhs: l,
        rhs: r,
        kernel,
    })
}
