/// In-memory sorter
///
/// Stable sort of records by one declared field name. Aliases are not
/// considered here, unlike filters. Descending order reverses the ascending
/// result, so tied records come out in reverse input order.
use super::option::QueryOption;
use crate::error::{Error, Result};
use crate::record::{position_by_name, Record};
use crate::value::Value;
use std::cmp::Ordering;

/// Sort `records` in place by `option.sort_by` and `option.order`.
///
/// An empty or unknown sort field leaves the slice untouched. All records
/// must expose the same value kind for the sort field, otherwise
/// [`Error::Structural`] is returned and the slice is left as it was.
pub fn sort_records<R: Record>(records: &mut [R], option: &QueryOption) -> Result<()> {
    if !option.has_sort() {
        return Ok(());
    }
    let Some(index) = position_by_name::<R>(&option.sort_by) else {
        tracing::debug!(field = %option.sort_by, "sort field not declared, keeping order");
        return Ok(());
    };

    check_uniform(records, index, &option.sort_by)?;

    records.sort_by(|a, b| match (a.value(index), b.value(index)) {
        (Some(a), Some(b)) => compare_values(&a, &b),
        _ => Ordering::Equal,
    });
    // Descending is the exact reverse of ascending, ties included.
    if option.order.is_desc() {
        records.reverse();
    }
    Ok(())
}

fn check_uniform<R: Record>(records: &[R], index: usize, field: &str) -> Result<()> {
    let mut kinds = records.iter().filter_map(|r| r.value(index).map(|v| v.kind()));
    let Some(first) = kinds.next() else {
        return Ok(());
    };
    match kinds.find(|kind| *kind != first) {
        Some(other) => Err(Error::Structural(format!(
            "cannot sort by '{}': records hold both {} and {} values",
            field, first, other
        ))),
        None => Ok(()),
    }
}

/// Total order between two values of the same kind.
///
/// Values of different kinds compare equal; callers check uniformity first.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => compare_text(a, b),
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => bool_text(*a).cmp(bool_text(*b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => compare_text(&a.join(","), &b.join(",")),
        _ => Ordering::Equal,
    }
}

/// Alphabetical order: case-insensitive first, then case-sensitive so that
/// "Bruce" and "bruce" sit next to each other in a fixed order. The empty
/// string sorts before everything else.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}
