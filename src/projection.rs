use crate::finance::{amortization, depreciation};
use crate::scenario::Scenario;

/// 월별 순비용 한 행.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyNetCost {
    /// 1부터 시작하는 경과 개월
    pub month: u32,
    /// 구매 시 순비용 [원]
    pub buy: f64,
    /// 리스 시 순비용 [원]
    pub lease: f64,
}

/// 구매 측 요약 지표.
#[derive(Debug, Clone, Copy)]
pub struct BuySummary {
    /// 월 할부 납입액 [원]
    pub monthly_payment: f64,
    /// 세금 포함 총 구매 비용 [원]
    pub total_purchase_cost: f64,
    /// 할부 원금 [원]
    pub loan_amount: f64,
    /// 비교 구간 종료 시점 예상 차량 가치 [원]
    pub end_value_at_horizon: f64,
    /// 비교 구간 종료 시점 순비용 [원]
    pub net_cost_at_horizon: f64,
}

/// 리스 측 요약 지표.
#[derive(Debug, Clone, Copy)]
pub struct LeaseSummary {
    /// 세금 포함 월 리스료 [원]
    pub monthly_payment_with_tax: f64,
    /// 약정 기간 전체 납입액 [원]
    pub total_payments_full_term: f64,
    /// 만기 초과 주행 수수료 [원]
    pub mileage_penalty: f64,
    /// 풀텀 순비용(선납금+납입액+초과주행+반납 수수료) [원]
    pub net_cost_full_term: f64,
    /// 비교 구간 종료 시점 순비용 [원]
    pub net_cost_at_horizon: f64,
}

/// 비교 구간 종료 시점의 결론.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// 리스가 저렴. 금액 차 [원]
    LeaseCheaper(f64),
    /// 구매가 저렴. 금액 차 [원]
    BuyCheaper(f64),
    /// 사실상 동일
    Even,
}

impl Verdict {
    /// `구매 순비용 - 리스 순비용`의 부호로 결론을 정한다.
    fn from_difference(diff: f64) -> Self {
        if diff > 0.0 {
            Verdict::LeaseCheaper(diff)
        } else if diff < 0.0 {
            Verdict::BuyCheaper(-diff)
        } else {
            Verdict::Even
        }
    }
}

/// 시나리오 하나의 투영 결과 전체.
#[derive(Debug, Clone)]
pub struct Projection {
    /// 1..=horizon 월별 순비용. 생성 후 변경하지 않는다.
    pub monthly: Vec<MonthlyNetCost>,
    pub buy: BuySummary,
    pub lease: LeaseSummary,
    pub verdict: Verdict,
}

/// 시나리오를 비교 구간 전체에 걸쳐 월 단위로 투영한다.
///
/// 구매 측: 선수금 + 누적 납입액 + 미상환 잔금 - 현재 차량 가치.
/// 잔금은 아직 갚아야 할 돈이므로 빼지 않고 더한다.
/// 리스 측: 약정 기간 동안 누적 납입이고, 만기 월에 초과 주행 수수료와
/// 반납 수수료가 한 번에 얹히며, 이후는 풀텀 순비용으로 고정된다.
pub fn project(scenario: &Scenario) -> Projection {
    let horizon = scenario.horizon.months;
    let buy = &scenario.buy;
    let lease = &scenario.lease;

    let loan_amount = buy.loan_amount();
    let buy_monthly = buy.monthly_payment();
    let end_value = buy.end_value_at_horizon();

    let lease_monthly = lease.monthly_payment_with_tax();
    let mileage_penalty = lease.mileage_penalty();
    let lease_full_term = lease.net_cost_full_term();

    let mut monthly = Vec::with_capacity(horizon as usize);
    for m in 1..=horizon {
        let payments_made = buy_monthly * m.min(buy.loan_term_months) as f64;
        let remaining = amortization::remaining_balance(
            loan_amount,
            buy.loan_apr_percent,
            buy.loan_term_months,
            m,
        );
        let value = depreciation::value_at_month(buy.purchase_price, end_value, horizon, m);
        let net_buy = buy.down_payment + payments_made + remaining - value;

        let net_lease = if m <= lease.term_months {
            let mut cost = lease.drive_off + lease_monthly * m as f64;
            if m == lease.term_months {
                cost += mileage_penalty + lease.disposition_fee;
            }
            cost
        } else {
            lease_full_term
        };

        monthly.push(MonthlyNetCost {
            month: m,
            buy: net_buy,
            lease: net_lease,
        });
    }

    let net_cost_buy = monthly.last().map_or(0.0, |row| row.buy);
    let net_cost_lease = monthly.last().map_or(0.0, |row| row.lease);

    Projection {
        monthly,
        buy: BuySummary {
            monthly_payment: buy_monthly,
            total_purchase_cost: buy.total_purchase_cost(),
            loan_amount,
            end_value_at_horizon: end_value,
            net_cost_at_horizon: net_cost_buy,
        },
        lease: LeaseSummary {
            monthly_payment_with_tax: lease_monthly,
            total_payments_full_term: lease.total_payments(),
            mileage_penalty,
            net_cost_full_term: lease_full_term,
            net_cost_at_horizon: net_cost_lease,
        },
        verdict: Verdict::from_difference(net_cost_buy - net_cost_lease),
    }
}
