use crate::finance::amortization;
use crate::finance::lease::{LeasePricing, LeaseTerms};

/// 구매 시나리오 조건.
#[derive(Debug, Clone, Copy)]
pub struct BuyTerms {
    /// 차량 가격(세전 협상가) [원]
    pub purchase_price: f64,
    /// 등록/서류 등 초기 비용 [원]
    pub upfront_fees: f64,
    /// 취득 세율 [%]
    pub sales_tax_rate_percent: f64,
    /// 선수금 [원]
    pub down_payment: f64,
    /// 할부 연이율 [%]
    pub loan_apr_percent: f64,
    /// 할부 기간 [개월]
    pub loan_term_months: u32,
    /// 비교 구간 종료 시점 예상 잔존가치 [구매가 대비 %]
    pub expected_value_percent: f64,
}

impl BuyTerms {
    /// 세금 포함 총 구매 비용 [원].
    pub fn total_purchase_cost(&self) -> f64 {
        let taxable = self.purchase_price + self.upfront_fees;
        taxable * (1.0 + self.sales_tax_rate_percent / 100.0)
    }

    /// 할부 원금: 총 구매 비용에서 선수금을 뺀 값, 0 하한 [원].
    pub fn loan_amount(&self) -> f64 {
        (self.total_purchase_cost() - self.down_payment).max(0.0)
    }

    /// 월 할부 납입액 [원].
    pub fn monthly_payment(&self) -> f64 {
        amortization::monthly_payment(
            self.loan_amount(),
            self.loan_apr_percent,
            self.loan_term_months,
        )
    }

    /// 비교 구간 종료 시점 예상 차량 가치 [원].
    pub fn end_value_at_horizon(&self) -> f64 {
        self.purchase_price * self.expected_value_percent / 100.0
    }
}

/// 비교 구간. 할부/리스 기간과는 독립이고, 기간을 넘어서는 구간은
/// 말기 값으로 이어서 투영한다.
#[derive(Debug, Clone, Copy)]
pub struct HorizonSpec {
    /// 비교 구간 길이 [개월]
    pub months: u32,
}

/// 한 번의 비교 계산에 들어가는 모든 입력.
///
/// 계산마다 새로 만들어 값으로 넘기고, 만들고 나면 바꾸지 않는다.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub buy: BuyTerms,
    pub lease: LeaseTerms,
    pub horizon: HorizonSpec,
}

/// 계산 전 검증에서 발견된 문제 하나. 필드 식별자를 함께 담는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// 0 이상이어야 하는 값이 음수.
    Negative(&'static str),
    /// 0보다 커야 하는 값이 0 이하.
    NotPositive(&'static str),
    /// 백분율이 0~100 범위를 벗어남.
    PercentOutOfRange(&'static str),
}

impl ValidationIssue {
    /// 문제가 된 입력 필드의 식별자.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationIssue::Negative(f)
            | ValidationIssue::NotPositive(f)
            | ValidationIssue::PercentOutOfRange(f) => f,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::Negative(field) => write!(f, "{field}: 음수는 허용되지 않습니다"),
            ValidationIssue::NotPositive(field) => write!(f, "{field}: 0보다 커야 합니다"),
            ValidationIssue::PercentOutOfRange(field) => {
                write!(f, "{field}: 0~100 범위의 백분율이어야 합니다")
            }
        }
    }
}

fn check_non_negative(issues: &mut Vec<ValidationIssue>, field: &'static str, value: f64) {
    if value < 0.0 {
        issues.push(ValidationIssue::Negative(field));
    }
}

fn check_percent(issues: &mut Vec<ValidationIssue>, field: &'static str, value: f64) {
    if !(0.0..=100.0).contains(&value) {
        issues.push(ValidationIssue::PercentOutOfRange(field));
    }
}

fn check_positive(issues: &mut Vec<ValidationIssue>, field: &'static str, value: f64) {
    if value <= 0.0 {
        issues.push(ValidationIssue::NotPositive(field));
    }
}

/// 계산 전에 시나리오 전체를 점검해 문제 목록을 돌려준다.
///
/// 목록이 비어 있을 때만 투영을 진행한다. 계산 모듈 자체는 퇴화 입력을
/// 0으로 흡수할 뿐 다시 검증하지 않는다.
pub fn validate(scenario: &Scenario) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let buy = &scenario.buy;
    check_non_negative(&mut issues, "purchase_price", buy.purchase_price);
    check_non_negative(&mut issues, "upfront_fees", buy.upfront_fees);
    check_percent(&mut issues, "sales_tax_rate_percent", buy.sales_tax_rate_percent);
    check_non_negative(&mut issues, "down_payment", buy.down_payment);
    check_percent(&mut issues, "loan_apr_percent", buy.loan_apr_percent);
    if buy.loan_term_months == 0 {
        issues.push(ValidationIssue::NotPositive("loan_term_months"));
    }
    check_percent(&mut issues, "expected_value_percent", buy.expected_value_percent);

    let lease = &scenario.lease;
    if lease.term_months == 0 {
        issues.push(ValidationIssue::NotPositive("lease_term_months"));
    }
    check_non_negative(&mut issues, "drive_off", lease.drive_off);
    check_non_negative(&mut issues, "disposition_fee", lease.disposition_fee);
    match lease.pricing {
        LeasePricing::MoneyFactor {
            cap_cost,
            residual_value,
            money_factor,
            tax_rate_percent,
        } => {
            check_non_negative(&mut issues, "cap_cost", cap_cost);
            check_non_negative(&mut issues, "residual_value", residual_value);
            check_non_negative(&mut issues, "money_factor", money_factor);
            check_percent(&mut issues, "lease_tax_rate_percent", tax_rate_percent);
        }
        LeasePricing::Quoted {
            monthly_payment_with_tax,
        } => {
            check_non_negative(
                &mut issues,
                "lease_monthly_payment",
                monthly_payment_with_tax,
            );
        }
    }
    check_positive(&mut issues, "allowed_km_per_year", lease.mileage.allowed_km_per_year);
    check_positive(&mut issues, "expected_km_per_year", lease.mileage.expected_km_per_year);
    check_non_negative(&mut issues, "excess_fee_per_km", lease.mileage.excess_fee_per_km);

    if scenario.horizon.months == 0 {
        issues.push(ValidationIssue::NotPositive("horizon_months"));
    }
    issues
}

/// 비교 구간(년)별 기본 잔존가치 비율 [%]. 표 밖의 구간은 50%.
pub fn default_residual_percent(horizon_years: u32) -> f64 {
    match horizon_years {
        1 => 80.0,
        2 => 70.0,
        3 => 60.0,
        4 => 50.0,
        5 => 45.0,
        6 => 40.0,
        7 => 35.0,
        _ => 50.0,
    }
}
