/// Binary search for the partition point of `set` under a fallible predicate.
///
/// `pred` must hold for a (possibly empty) prefix of `set` and fail for the
/// rest. Returns the length of that prefix. A predicate error is returned as
/// soon as it occurs.
pub fn try_partition_point<T, E>(
    set: &[T],
    mut pred: impl FnMut(&T) -> Result<bool, E>) -> Result<usize, E>
{
    let mut lo = 0;
    let mut hi = set.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;

        if pred(&set[mid])? {
            lo = mid + 1;
        }
        else {
            hi = mid;
        }
    }

    Ok(lo)
}
