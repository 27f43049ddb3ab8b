use hotel_order_api::domain::money::order_total;

#[test]
fn sums_quantity_times_price() {
    assert_eq!(order_total([(2, 4500), (1, 4400)]), Some(13400));
    assert_eq!(order_total(std::iter::empty()), Some(0));
}

#[test]
fn line_overflow_is_reported() {
    assert_eq!(order_total([(3, i64::MAX / 2)]), None);
}

#[test]
fn running_total_overflow_is_reported() {
    assert_eq!(order_total([(1, i64::MAX), (1, 1)]), None);
}
