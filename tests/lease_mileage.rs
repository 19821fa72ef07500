//! 리스료 산정과 주행거리 수수료 회귀 테스트.
use vehicle_finance_toolbox::finance::lease::{
    apr_to_money_factor, lease_payment_from_money_factor, LeaseTerms,
};
use vehicle_finance_toolbox::finance::mileage::{self, MileagePlan};

fn plan(allowed: f64, expected: f64, fee: f64) -> MileagePlan {
    MileagePlan {
        allowed_km_per_year: allowed,
        expected_km_per_year: expected,
        excess_fee_per_km: fee,
    }
}

#[test]
fn money_factor_defining_ratio() {
    // APR 2.4% <=> 머니팩터 0.001
    assert_eq!(apr_to_money_factor(2.4), 0.001);
}

#[test]
fn lease_payment_formula() {
    // 감가분 12,000/36 = 333.33..., 금융 수수료 48,000*0.001 = 48
    let payment = lease_payment_from_money_factor(30_000.0, 18_000.0, 0.001, 36);
    let expected = 12_000.0 / 36.0 + 48.0;
    assert!((payment - expected).abs() < 1e-9, "payment={payment}");
}

#[test]
fn lease_payment_degenerate_inputs_return_zero() {
    assert_eq!(lease_payment_from_money_factor(0.0, 18_000.0, 0.001, 36), 0.0);
    assert_eq!(lease_payment_from_money_factor(-5.0, 18_000.0, 0.001, 36), 0.0);
    assert_eq!(lease_payment_from_money_factor(30_000.0, 18_000.0, 0.001, 0), 0.0);
}

#[test]
fn money_factor_terms_apply_tax_on_payment() {
    let terms = LeaseTerms::from_money_factor(
        30_000.0,
        18_000.0,
        0.001,
        10.0,
        36,
        0.0,
        0.0,
        plan(20_000.0, 20_000.0, 100.0),
    );
    let pre_tax = lease_payment_from_money_factor(30_000.0, 18_000.0, 0.001, 36);
    assert!((terms.monthly_payment_with_tax() - pre_tax * 1.1).abs() < 1e-9);
}

#[test]
fn quoted_terms_pass_payment_through() {
    let terms = LeaseTerms::from_quoted_payment(450.0, 36, 0.0, 0.0, plan(1.0, 1.0, 0.0));
    assert_eq!(terms.monthly_payment_with_tax(), 450.0);
    assert_eq!(terms.total_payments(), 450.0 * 36.0);
}

#[test]
fn penalty_is_zero_when_within_allowance() {
    assert_eq!(mileage::penalty(&plan(20_000.0, 20_000.0, 200.0), 36), 0.0);
    assert_eq!(mileage::penalty(&plan(20_000.0, 15_000.0, 200.0), 36), 0.0);
}

#[test]
fn penalty_prorates_whole_years() {
    // 3년 약정, 연 3,000km 초과, km당 0.25
    let penalty = mileage::penalty(&plan(12_000.0, 15_000.0, 0.25), 36);
    assert!((penalty - 2_250.0).abs() < 1e-9, "penalty={penalty}");
}

#[test]
fn penalty_allows_fractional_years() {
    // 30개월 = 2.5년, 초과 7,500km
    let penalty = mileage::penalty(&plan(12_000.0, 15_000.0, 0.25), 30);
    assert!((penalty - 1_875.0).abs() < 1e-9, "penalty={penalty}");
}

#[test]
fn full_term_net_cost_composition() {
    let terms = LeaseTerms::from_quoted_payment(
        500_000.0,
        36,
        1_000_000.0,
        300_000.0,
        plan(12_000.0, 15_000.0, 100.0),
    );
    // 선납금 + 납입액 + 초과 주행(9,000km*100) + 반납 수수료
    let expected = 1_000_000.0 + 500_000.0 * 36.0 + 900_000.0 + 300_000.0;
    assert!((terms.net_cost_full_term() - expected).abs() < 1e-6);
}
