//! `sum` with optional axis and keepdims

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{type_name, EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, check_operands, map_operands};
use crate::site::Site;
use crate::value::{extract_bool, extract_integer, Element, NodeData, Shape, Value};

/// Sum of array elements: `sum(x)`, `sum(x, axis)`, `sum(x, axis, keepdims)`.
///
/// Integer and boolean arrays sum to integers, float arrays to floats. A
/// `Nil` axis means all elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Operation for Sum {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 1, 3, &site)?;
            check_operands(&operands[..1], &site)?;

            let values = map_operands(&operands, &args, &site).await?;
            let axis = match values.get(1) {
                None | Some(Value::Nil) => None,
                Some(v) => Some(extract_integer(v, &site)?),
            };
            let keepdims = match values.get(2) {
                Some(v) => extract_bool(v, &site)?,
                None => false,
            };

            match &values[0] {
                Value::Float(d) => Ok(Value::Float(sum(d, axis, keepdims, &site)?)),
                Value::Int(d) => Ok(Value::Int(sum(d, axis, keepdims, &site)?)),
                Value::Mask(d) => {
                    let counts = d.map(i64::from);
                    Ok(Value::Int(sum(&counts, axis, keepdims, &site)?))
                }
                Value::Bool(b) => Ok(Value::int(i64::from(*b))),
                other => Err(EvalError::type_mismatch(
                    &site,
                    format!("cannot sum `{}`", type_name(other)),
                )),
            }
        }
        .boxed()
    }
}

/// Map a possibly negative axis onto `0..rank`.
fn normalize_axis(axis: i64, rank: usize, site: &Site) -> Result<usize> {
    let rank = rank as i64;
    let resolved = if axis < 0 { axis + rank } else { axis };
    if (0..rank).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(EvalError::invalid_operand(
            site,
            format!("axis {} is out of range for an array of rank {}", axis, rank),
        ))
    }
}

fn overflow(site: &Site) -> EvalError {
    EvalError::invalid_operand(site, "sum overflows the element type")
}

fn add<T: Element>(a: T, b: T, site: &Site) -> Result<T> {
    a.checked_add(b).ok_or_else(|| overflow(site))
}

/// Reduce `data` by addition. Integer overflow is an `InvalidOperand` error.
pub fn sum<T: Element>(data: &NodeData<T>, axis: Option<i64>, keepdims: bool, site: &Site) -> Result<NodeData<T>> {
    let total = |xs: &[T]| xs.iter().try_fold(T::default(), |acc, &x| add(acc, x, site));

    let axis = match axis {
        Some(axis) => Some(normalize_axis(axis, data.rank(), site)?),
        None => None,
    };

    let result = match (data.shape(), axis) {
        (Shape::Scalar, _) => NodeData::scalar(total(data.as_slice())?),

        (Shape::Vector(_), _) => {
            let s = total(data.as_slice())?;
            if keepdims {
                NodeData::vector(vec![s])
            } else {
                NodeData::scalar(s)
            }
        }

        (Shape::Matrix { .. }, None) => {
            let s = total(data.as_slice())?;
            if keepdims {
                NodeData::matrix(1, 1, vec![s])
            } else {
                NodeData::scalar(s)
            }
        }

        (Shape::Matrix { rows, cols }, Some(0)) => {
            let mut sums = vec![T::default(); cols];
            for i in 0..rows {
                for (acc, &x) in sums.iter_mut().zip(data.row(i)) {
                    *acc = add(*acc, x, site)?;
                }
            }
            if keepdims {
                NodeData::matrix(1, cols, sums)
            } else {
                NodeData::vector(sums)
            }
        }

        (Shape::Matrix { rows, .. }, Some(_)) => {
            let sums = (0..rows).map(|i| total(data.row(i))).collect::<Result<Vec<T>>>()?;
            if keepdims {
                NodeData::matrix(rows, 1, sums)
            } else {
                NodeData::vector(sums)
            }
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site::new("sum", "")
    }

    #[test]
    fn test_negative_axis() {
        let m = NodeData::matrix(2, 2, vec![1i64, 2, 3, 4]);
        assert_eq!(sum(&m, Some(-1), false, &site()).unwrap(), NodeData::vector(vec![3, 7]));
        assert_eq!(sum(&m, Some(-2), false, &site()).unwrap(), NodeData::vector(vec![4, 6]));
    }

    #[test]
    fn test_axis_out_of_range() {
        let v = NodeData::vector(vec![1.0, 2.0]);
        let err = sum(&v, Some(1), false, &site()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidOperand { .. }));
        assert!(sum(&NodeData::scalar(1.0), Some(0), false, &site()).is_err());
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let v = NodeData::vector(vec![i64::MAX, 1]);
        let err = sum(&v, None, false, &site()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidOperand { .. }));

        let m = NodeData::matrix(2, 1, vec![i64::MAX, 1]);
        assert!(sum(&m, Some(0), false, &site()).is_err());
        assert!(sum(&m, Some(1), false, &site()).is_ok());
    }

    #[test]
    fn test_scalar_sum_is_itself() {
        assert_eq!(
            sum(&NodeData::scalar(2.5), None, false, &site()).unwrap(),
            NodeData::scalar(2.5)
        );
    }
}
