//! Rectangular multi-dimensional arrays

use super::{collection_stops, null_pair, precondition, ContainerStrategy, NullPair, StrategyScope};
use crate::diff::{Difference, DifferenceKind};
use crate::engine::{empty, single, Differences};
use crate::reflect::{GridValue, Shape, TypeDesc, Value};

/// Compares rank, then every dimension length, then elements by position
///
/// Dimension 0 is reported as `Length` and dimension `n` as `Dimensionn`;
/// elements use `[i,j,...]` segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiArrayStrategy;

impl ContainerStrategy for MultiArrayStrategy {
    fn name(&self) -> &'static str {
        "multi_array"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::MultiArray(_))
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        let element = match scope.ty.element_type() {
            Some(e) => e.clone(),
            None => return precondition(self.name(), scope.ty, "not a grid type"),
        };
        if null_pair(scope.comparer.settings(), scope.v1, scope.v2) != NullPair::NeitherNull {
            return empty();
        }
        let (left, right) = match (scope.v1, scope.v2) {
            (Value::Grid(l), Value::Grid(r)) => (l.clone(), r.clone()),
            _ => return precondition(self.name(), scope.ty, "operands are not grids"),
        };
        let comparer = scope.comparer;
        let cursor = scope.cursor;

        if left.rank() != right.rank() {
            return comparer.emit(
                cursor,
                Difference::new(
                    "Rank",
                    left.rank().to_string(),
                    right.rank().to_string(),
                    DifferenceKind::CountMismatch,
                ),
            );
        }

        let mismatched: Vec<Difference> = left
            .dims
            .iter()
            .zip(&right.dims)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(d, (a, b))| {
                comparer.record(
                    cursor,
                    Difference::new(
                        dimension_label(d),
                        a.to_string(),
                        b.to_string(),
                        DifferenceKind::CountMismatch,
                    ),
                )
            })
            .collect();
        if !mismatched.is_empty() {
            return Box::new(mismatched.into_iter().map(Ok));
        }
        if left.items.is_empty() {
            return empty();
        }

        let (comparer, cursor) = (comparer.clone(), cursor.clone());
        Box::new((0..left.items.len()).flat_map(move |offset| {
            let segment = format!("[{}]", index_label(&left, offset));
            let node = cursor.add_descendant(None);
            let nested = comparer.nested_differences(
                &element,
                &left.items[offset],
                &right.items[offset],
                None,
                &node,
            );
            comparer.prefixed(nested, &segment, node)
        }))
    }

    fn stops_further_comparison(&self, scope: &StrategyScope<'_>) -> bool {
        collection_stops(scope)
    }
}

fn dimension_label(dimension: usize) -> String {
    if dimension == 0 {
        "Length".to_string()
    } else {
        format!("Dimension{}", dimension)
    }
}

/// `i,j,...` of a row-major offset
fn index_label(grid: &GridValue, offset: usize) -> String {
    let mut rest = offset;
    let mut index = vec![0; grid.dims.len()];
    for (slot, dim) in index.iter_mut().zip(&grid.dims).rev() {
        *slot = rest % dim;
        rest /= dim;
    }
    index
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_labels() {
        assert_eq!(dimension_label(0), "Length");
        assert_eq!(dimension_label(2), "Dimension2");
    }

    #[test]
    fn test_index_label_row_major() {
        let grid = GridValue {
            ty: TypeDesc::grid(TypeDesc::primitive("i32", Value::Int(0))),
            dims: vec![2, 3],
            items: vec![Value::Int(0); 6],
        };
        assert_eq!(index_label(&grid, 0), "0,0");
        assert_eq!(index_label(&grid, 4), "1,1");
        assert_eq!(index_label(&grid, 5), "1,2");
    }
}
