/// Sums `quantity * unit price` over the lines, in minor units.
/// Returns `None` when the total does not fit in an `i64`.
pub fn order_total<I>(lines: I) -> Option<i64>
where
    I: IntoIterator<Item = (i32, i64)>,
{
    lines.into_iter().try_fold(0i64, |acc, (quantity, price)| {
        price
            .checked_mul(i64::from(quantity))
            .and_then(|line| acc.checked_add(line))
    })
}
