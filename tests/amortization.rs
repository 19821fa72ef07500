//! 할부 상환 공식 회귀 테스트.
use vehicle_finance_toolbox::finance::amortization::{monthly_payment, remaining_balance};

#[test]
fn zero_interest_payment_is_exact_linear() {
    assert_eq!(monthly_payment(12_000.0, 0.0, 12), 1_000.0);
    assert_eq!(monthly_payment(18_000_000.0, 0.0, 48), 375_000.0);
}

#[test]
fn standard_payment_scenario() {
    // 20,000 / 연 5% / 60개월 => 약 377
    let payment = monthly_payment(20_000.0, 5.0, 60);
    assert_eq!(payment.round(), 377.0, "payment={payment}");
}

#[test]
fn degenerate_inputs_return_zero() {
    assert_eq!(monthly_payment(0.0, 5.0, 60), 0.0);
    assert_eq!(monthly_payment(-1.0, 5.0, 60), 0.0);
    assert_eq!(monthly_payment(20_000.0, 5.0, 0), 0.0);
    assert_eq!(remaining_balance(0.0, 5.0, 60, 12), 0.0);
    assert_eq!(remaining_balance(20_000.0, 5.0, 0, 12), 0.0);
}

#[test]
fn balance_starts_at_principal_and_ends_at_zero() {
    let start = remaining_balance(20_000.0, 5.0, 60, 0);
    assert!((start - 20_000.0).abs() < 1e-9, "start={start}");
    let end = remaining_balance(20_000.0, 5.0, 60, 60);
    assert!(end.abs() < 1e-6, "end={end}");
}

#[test]
fn balance_is_monotone_nonincreasing() {
    let mut prev = remaining_balance(20_000.0, 5.0, 60, 0);
    for k in 1..=60 {
        let bal = remaining_balance(20_000.0, 5.0, 60, k);
        assert!(bal <= prev + 1e-9, "k={k} bal={bal} prev={prev}");
        prev = bal;
    }
}

#[test]
fn elapsed_months_are_clamped_to_term() {
    let at_term = remaining_balance(20_000.0, 5.0, 60, 60);
    let past_term = remaining_balance(20_000.0, 5.0, 60, 120);
    assert_eq!(at_term, past_term);
    assert!(past_term.abs() < 1e-6);
}

#[test]
fn zero_interest_balance_is_linear_payoff() {
    // 12,000 / 무이자 / 12개월: 매달 1,000씩 감소
    for k in 0..=12u32 {
        let bal = remaining_balance(12_000.0, 0.0, 12, k);
        assert!((bal - (12_000.0 - 1_000.0 * k as f64)).abs() < 1e-9, "k={k} bal={bal}");
    }
}

#[test]
fn total_paid_exceeds_principal_with_interest() {
    let payment = monthly_payment(20_000.0, 5.0, 60);
    assert!(payment * 60.0 > 20_000.0);
}
