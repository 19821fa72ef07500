//! 시나리오 검증과 월별 투영 회귀 테스트.
use vehicle_finance_toolbox::finance::depreciation::value_at_month;
use vehicle_finance_toolbox::finance::lease::LeaseTerms;
use vehicle_finance_toolbox::finance::mileage::MileagePlan;
use vehicle_finance_toolbox::projection::{project, Verdict};
use vehicle_finance_toolbox::scenario::{
    default_residual_percent, validate, BuyTerms, HorizonSpec, Scenario, ValidationIssue,
};

/// 손으로 검산 가능한 기준 시나리오: 무이자 할부 + 견적 리스료.
///
/// 구매 측이 닫힌 형태로 정리된다:
/// net_buy(m) = 2M + 375k*m + (18M - 375k*m) - (20M - 10M*m/48) = 10M * m / 48
fn base_scenario(horizon_months: u32) -> Scenario {
    Scenario {
        buy: BuyTerms {
            purchase_price: 20_000_000.0,
            upfront_fees: 0.0,
            sales_tax_rate_percent: 0.0,
            down_payment: 2_000_000.0,
            loan_apr_percent: 0.0,
            loan_term_months: 48,
            expected_value_percent: 50.0,
        },
        lease: LeaseTerms::from_quoted_payment(
            500_000.0,
            36,
            1_000_000.0,
            300_000.0,
            MileagePlan {
                allowed_km_per_year: 20_000.0,
                expected_km_per_year: 20_000.0,
                excess_fee_per_km: 100.0,
            },
        ),
        horizon: HorizonSpec {
            months: horizon_months,
        },
    }
}

#[test]
fn depreciation_hits_both_endpoints() {
    assert_eq!(value_at_month(30_000.0, 18_000.0, 36, 0), 30_000.0);
    assert_eq!(value_at_month(30_000.0, 18_000.0, 36, 36), 18_000.0);
    // 범위 밖 개월은 잘린다
    assert_eq!(value_at_month(30_000.0, 18_000.0, 36, 99), 18_000.0);
}

#[test]
fn depreciation_degenerate_horizon_returns_end_value() {
    assert_eq!(value_at_month(30_000.0, 18_000.0, 0, 0), 18_000.0);
    assert_eq!(value_at_month(30_000.0, 18_000.0, 0, 12), 18_000.0);
}

#[test]
fn series_is_chronological_and_full_length() {
    let result = project(&base_scenario(48));
    assert_eq!(result.monthly.len(), 48);
    for (i, row) in result.monthly.iter().enumerate() {
        assert_eq!(row.month, i as u32 + 1);
    }
}

#[test]
fn buy_side_matches_hand_computation() {
    let result = project(&base_scenario(48));
    for row in &result.monthly {
        let expected = 10_000_000.0 * row.month as f64 / 48.0;
        assert!(
            (row.buy - expected).abs() < 1e-6,
            "m={} buy={} expected={expected}",
            row.month,
            row.buy
        );
    }
}

#[test]
fn lease_series_accumulates_then_holds_flat() {
    let result = project(&base_scenario(48));
    let full_term = 1_000_000.0 + 500_000.0 * 36.0 + 300_000.0;
    for row in &result.monthly {
        let expected = if row.month < 36 {
            1_000_000.0 + 500_000.0 * row.month as f64
        } else {
            // 만기 월에 반납 수수료가 붙고, 이후는 풀텀 순비용으로 고정
            full_term
        };
        assert!(
            (row.lease - expected).abs() < 1e-6,
            "m={} lease={} expected={expected}",
            row.month,
            row.lease
        );
    }
    assert!((result.lease.net_cost_full_term - full_term).abs() < 1e-6);
}

#[test]
fn lease_end_month_includes_penalty_and_fee() {
    let mut scenario = base_scenario(48);
    scenario.lease = LeaseTerms::from_quoted_payment(
        500_000.0,
        36,
        1_000_000.0,
        300_000.0,
        MileagePlan {
            allowed_km_per_year: 12_000.0,
            expected_km_per_year: 15_000.0,
            excess_fee_per_km: 100.0,
        },
    );
    let result = project(&scenario);
    let penalty = 9_000.0 * 100.0;
    let at_term = 1_000_000.0 + 500_000.0 * 36.0 + penalty + 300_000.0;
    assert!((result.monthly[35].lease - at_term).abs() < 1e-6);
    // 직전 월에는 아직 붙지 않는다
    let before = 1_000_000.0 + 500_000.0 * 35.0;
    assert!((result.monthly[34].lease - before).abs() < 1e-6);
    assert!((result.lease.mileage_penalty - penalty).abs() < 1e-9);
}

#[test]
fn verdict_follows_sign_of_difference() {
    // 기준 시나리오: 구매 10M vs 리스 19.3M => 구매가 저렴
    let result = project(&base_scenario(48));
    match result.verdict {
        Verdict::BuyCheaper(diff) => assert!((diff - 9_300_000.0).abs() < 1e-6, "diff={diff}"),
        other => panic!("expected BuyCheaper, got {other:?}"),
    }

    // 리스료를 0원으로 만들면 리스가 저렴해진다
    let mut cheap_lease = base_scenario(48);
    cheap_lease.lease = LeaseTerms::from_quoted_payment(
        0.0,
        36,
        0.0,
        0.0,
        MileagePlan {
            allowed_km_per_year: 20_000.0,
            expected_km_per_year: 20_000.0,
            excess_fee_per_km: 0.0,
        },
    );
    match project(&cheap_lease).verdict {
        Verdict::LeaseCheaper(diff) => assert!(diff > 0.0),
        other => panic!("expected LeaseCheaper, got {other:?}"),
    }
}

#[test]
fn summary_scalars_match_inputs() {
    let scenario = Scenario {
        buy: BuyTerms {
            purchase_price: 35_000_000.0,
            upfront_fees: 500_000.0,
            sales_tax_rate_percent: 7.0,
            down_payment: 5_000_000.0,
            loan_apr_percent: 5.0,
            loan_term_months: 60,
            expected_value_percent: 60.0,
        },
        ..base_scenario(36)
    };
    let result = project(&scenario);
    let total = 35_500_000.0 * 1.07;
    assert!((result.buy.total_purchase_cost - total).abs() < 1e-6);
    assert!((result.buy.loan_amount - (total - 5_000_000.0)).abs() < 1e-6);
    assert!((result.buy.end_value_at_horizon - 21_000_000.0).abs() < 1e-6);
    assert_eq!(
        result.buy.net_cost_at_horizon,
        result.monthly.last().unwrap().buy
    );
    assert_eq!(
        result.lease.net_cost_at_horizon,
        result.monthly.last().unwrap().lease
    );
}

#[test]
fn loan_amount_floors_at_zero_when_overpaid() {
    let mut scenario = base_scenario(12);
    scenario.buy.down_payment = 50_000_000.0;
    assert_eq!(scenario.buy.loan_amount(), 0.0);
    // 원금 0이면 납입액도 0으로 떨어진다
    assert_eq!(scenario.buy.monthly_payment(), 0.0);
}

#[test]
fn horizon_extends_past_loan_term_with_settled_loan() {
    // 비교 구간 60개월 > 할부 48개월: 납입은 48회에서 멈추고 잔금은 0으로 유지된다.
    // 닫힌 형태 net_buy(m) = 10M * m / 60 은 상환 완료 이후에도 그대로 성립한다.
    let result = project(&base_scenario(60));
    assert_eq!(result.monthly.len(), 60);
    for row in &result.monthly {
        let expected = 10_000_000.0 * row.month as f64 / 60.0;
        assert!(
            (row.buy - expected).abs() < 1e-6,
            "m={} buy={} expected={expected}",
            row.month,
            row.buy
        );
    }
    // 53번째 달을 직접 분해해도 같은 값: 납입 48회 + 잔금 0 - 현재 가치
    let m = 53u32;
    let direct = 2_000_000.0 + 375_000.0 * 48.0 + 0.0
        - (20_000_000.0 - 10_000_000.0 * m as f64 / 60.0);
    assert!((result.monthly[m as usize - 1].buy - direct).abs() < 1e-6);
}

#[test]
fn horizon_shorter_than_loan_keeps_accruing_payments_to_min() {
    // 비교 구간 24개월 < 할부 48개월: 24회까지만 납입이 쌓인다
    let result = project(&base_scenario(24));
    assert_eq!(result.monthly.len(), 24);
    let expected_last = 2_000_000.0 + 375_000.0 * 24.0
        + (18_000_000.0 - 375_000.0 * 24.0)
        - (20_000_000.0 - 10_000_000.0 * 24.0 / 24.0);
    assert!((result.monthly[23].buy - expected_last).abs() < 1e-6);
}

#[test]
fn quoted_and_money_factor_paths_project_identically() {
    // 같은 월 납입액이면 경로와 무관하게 같은 리스 곡선이 나와야 한다
    let mf_terms = LeaseTerms::from_money_factor(
        30_000_000.0,
        18_000_000.0,
        0.001,
        10.0,
        36,
        1_000_000.0,
        300_000.0,
        MileagePlan {
            allowed_km_per_year: 20_000.0,
            expected_km_per_year: 20_000.0,
            excess_fee_per_km: 100.0,
        },
    );
    let resolved_monthly = mf_terms.monthly_payment_with_tax();
    let quoted_terms = LeaseTerms::from_quoted_payment(
        resolved_monthly,
        36,
        1_000_000.0,
        300_000.0,
        MileagePlan {
            allowed_km_per_year: 20_000.0,
            expected_km_per_year: 20_000.0,
            excess_fee_per_km: 100.0,
        },
    );
    let mut a = base_scenario(48);
    a.lease = mf_terms;
    let mut b = base_scenario(48);
    b.lease = quoted_terms;
    let ra = project(&a);
    let rb = project(&b);
    for (x, y) in ra.monthly.iter().zip(rb.monthly.iter()) {
        assert!((x.lease - y.lease).abs() < 1e-9, "m={}", x.month);
    }
}

#[test]
fn validation_accepts_base_scenario() {
    assert!(validate(&base_scenario(36)).is_empty());
}

#[test]
fn validation_flags_bad_fields() {
    let mut scenario = base_scenario(36);
    scenario.buy.down_payment = -1.0;
    scenario.buy.loan_apr_percent = 120.0;
    scenario.lease.mileage.allowed_km_per_year = 0.0;
    scenario.horizon.months = 0;
    let issues = validate(&scenario);
    assert!(issues.contains(&ValidationIssue::Negative("down_payment")));
    assert!(issues.contains(&ValidationIssue::PercentOutOfRange("loan_apr_percent")));
    assert!(issues.contains(&ValidationIssue::NotPositive("allowed_km_per_year")));
    assert!(issues.contains(&ValidationIssue::NotPositive("horizon_months")));
}

#[test]
fn default_residual_table_matches_reference_values() {
    assert_eq!(default_residual_percent(1), 80.0);
    assert_eq!(default_residual_percent(3), 60.0);
    assert_eq!(default_residual_percent(7), 35.0);
    assert_eq!(default_residual_percent(10), 50.0);
}
