use hera_types::now_millis;

#[test]
fn now_is_positive_and_monotonic_enough() {
    let a = now_millis();
    let b = now_millis();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn now_is_plausibly_current() {
    // After 2020-01-01 and before 2100-01-01, in milliseconds.
    let now = now_millis();
    assert!(now > 1_577_836_800_000);
    assert!(now < 4_102_444_800_000);
}
