use std::collections::BTreeMap;

use mergeops::Subset;

use super::Keyed;

/// Reference model of a subset merge over sorted multisets. Equal elements
/// from the two sources are paired off one to one; unpaired occurrences are
/// exclusive to their source.
pub fn model_merge(first: &[i32], second: &[i32], subset: Subset) -> Vec<i32> {
    let mut counts: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    for &value in first {
        counts.entry(value).or_default().0 += 1;
    }
    for &value in second {
        counts.entry(value).or_default().1 += 1;
    }

    let (keep_first, keep_second, keep_shared) = subset.flags();
    let mut result = Vec::new();

    for (value, (count_first, count_second)) in counts {
        let shared = count_first.min(count_second);
        let copies = if subset == Subset::Sum {
            count_first + count_second
        }
        else {
            (count_first - shared) * keep_first as usize +
            (count_second - shared) * keep_second as usize +
            shared * keep_shared as usize
        };
        result.extend(std::iter::repeat(value).take(copies));
    }
    result
}

pub fn prop_non_decreasing<T: Ord>(result: &[T]) -> bool {
    result.windows(2).all(|w| w[0] <= w[1])
}

pub fn prop_keys_non_decreasing(result: &[Keyed]) -> bool {
    result.windows(2).all(|w| w[0].key <= w[1].key)
}

/// Stable reference merge: concatenate and stable-sort by key.
pub fn stable_merge(items: &[Keyed]) -> Vec<Keyed> {
    let mut expected = items.to_vec();
    expected.sort_by_key(|item| item.key);
    expected
}

// Same elements, regardless of order.
pub fn prop_same_elements(result: &[Keyed], input: &[Keyed]) -> bool {
    let mut result = result.to_vec();
    let mut input = input.to_vec();
    result.sort_by_key(|item| item.origin);
    input.sort_by_key(|item| item.origin);
    result == input
}
