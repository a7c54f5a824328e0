//! Rank-polymorphic elementwise broadcasting
//!
//! Every binary numeric operator funnels through [`broadcast`]: the caller
//! supplies the elementwise function, this module works out the result
//! shape, picks which operand's buffer (if any) can receive the result, and
//! runs the loop.
//!
//! ## Aliasing
//!
//! The operand whose shape equals the result shape receives the result when
//! it owns its buffer. When both do, lhs wins, then rhs. Reference views are
//! never written; a fresh buffer is allocated instead. Cross kernels, whose
//! result is larger than either operand, always allocate.

mod plan;

pub use plan::{plan, Kernel, Plan, Stretch};

use tracing::trace;

use crate::error::Result;
use crate::site::Site;
use crate::value::NodeData;

/// Which buffer receives the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Write into lhs in place
    Lhs,
    /// Write into rhs in place
    Rhs,
    /// Allocate a new buffer
    Fresh,
}

impl Plan {
    /// Apply the aliasing policy to a pair of operands.
    pub fn target(&self, lhs: &NodeData<f64>, rhs: &NodeData<f64>) -> Target {
        if lhs.shape() == self.shape && !lhs.is_ref() {
            Target::Lhs
        } else if rhs.shape() == self.shape && !rhs.is_ref() {
            Target::Rhs
        } else {
            Target::Fresh
        }
    }
}

/// A 2-D read view that replicates along any axis of extent 1.
#[derive(Clone, Copy)]
struct View<'a> {
    data: &'a [f64],
    rows: usize,
    cols: usize,
}

impl<'a> View<'a> {
    fn new(data: &'a [f64], (rows, cols): (usize, usize)) -> Self {
        Self { data, rows, cols }
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        let row = if self.rows == 1 { 0 } else { row };
        let col = if self.cols == 1 { 0 } else { col };
        self.data[row * self.cols + col]
    }
}

/// Combine two arrays elementwise under the broadcasting rules.
///
/// `op` receives `(lhs_element, rhs_element)` in that order whichever buffer
/// ends up holding the result. All shape checks happen before any element is
/// written, so an error leaves both operands untouched.
pub fn broadcast<F>(lhs: NodeData<f64>, rhs: NodeData<f64>, op: F, site: &Site) -> Result<NodeData<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    let plan = plan(lhs.shape(), rhs.shape(), site)?;
    let target = plan.target(&lhs, &rhs);
    trace!(
        node = %site,
        lhs = %lhs.shape(),
        rhs = %rhs.shape(),
        kernel = ?plan.kernel,
        target = ?target,
        "broadcast"
    );

    let (rows, cols) = (plan.rows, plan.cols);
    let result = match target {
        Target::Lhs => {
            let r = View::new(rhs.as_slice(), plan.rhs);
            let (shape, mut out) = lhs.into_parts();
            for i in 0..rows {
                for j in 0..cols {
                    let k = i * cols + j;
                    out[k] = op(out[k], r.get(i, j));
                }
            }
            NodeData::from_vec(shape, out)
        }
        Target::Rhs => {
            let l = View::new(lhs.as_slice(), plan.lhs);
            let (shape, mut out) = rhs.into_parts();
            for i in 0..rows {
                for j in 0..cols {
                    let k = i * cols + j;
                    out[k] = op(l.get(i, j), out[k]);
                }
            }
            NodeData::from_vec(shape, out)
        }
        Target::Fresh => {
            let l = View::new(lhs.as_slice(), plan.lhs);
            let r = View::new(rhs.as_slice(), plan.rhs);
            let mut out = Vec::with_capacity(rows * cols);
            for i in 0..rows {
                for j in 0..cols {
                    out.push(op(l.get(i, j), r.get(i, j)));
                }
            }
            NodeData::from_vec(plan.shape, out)
        }
    };
    Ok(result)
}
