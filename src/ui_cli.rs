use std::io::{self, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::finance::lease::{apr_to_money_factor, LeaseTerms};
use crate::finance::mileage::MileagePlan;
use crate::i18n::{keys, Translator};
use crate::projection::{self, Projection, Verdict};
use crate::scenario::{self, BuyTerms, HorizonSpec, Scenario};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    QuickCompare,
    DetailedCompare,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_QUICK));
    println!("{}", tr.t(keys::MAIN_MENU_DETAILED));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::QuickCompare),
            "2" => return Ok(MenuChoice::DetailedCompare),
            "3" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 간편 비교: 리스 견적서의 월 납입액을 그대로 입력받는다.
pub fn handle_quick_compare(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::QUICK_HEADING));
    println!("{}", tr.t(keys::HELP_QUICK));
    let d = &cfg.defaults;

    let horizon_years = read_u32_or(tr, tr.t(keys::PROMPT_HORIZON_YEARS), d.horizon_years)?;
    let horizon_months = horizon_years * 12;

    println!("{}", tr.t(keys::BUY_SECTION));
    let purchase_price = read_f64_or(tr, tr.t(keys::PROMPT_PURCHASE_PRICE), 35_000_000.0)?;
    let tax_rate = read_f64_or(tr, tr.t(keys::PROMPT_TAX_RATE), d.sales_tax_rate_percent)?;
    let down_payment = read_f64_or(tr, tr.t(keys::PROMPT_DOWN_PAYMENT), 5_000_000.0)?;
    let loan_apr = read_f64_or(tr, tr.t(keys::PROMPT_LOAN_APR), 5.0)?;
    let loan_term = read_u32_or(tr, tr.t(keys::PROMPT_LOAN_TERM), 60)?;
    let expected_pct = read_f64_or(
        tr,
        tr.t(keys::PROMPT_EXPECTED_VALUE_PCT),
        scenario::default_residual_percent(horizon_years),
    )?;

    println!("{}", tr.t(keys::LEASE_SECTION));
    let lease_term = read_u32_or(tr, tr.t(keys::PROMPT_LEASE_TERM), 36)?;
    let lease_monthly = read_f64_or(tr, tr.t(keys::PROMPT_LEASE_MONTHLY), 600_000.0)?;
    let drive_off = read_f64_or(tr, tr.t(keys::PROMPT_DRIVE_OFF), 2_000_000.0)?;
    let disposition_fee = read_f64_or(tr, tr.t(keys::PROMPT_DISPOSITION_FEE), 400_000.0)?;
    let mileage = read_mileage(tr, cfg)?;

    let scenario = Scenario {
        buy: BuyTerms {
            purchase_price,
            // 간편 모드에서는 자잘한 비용을 가격에 포함된 것으로 본다.
            upfront_fees: 0.0,
            sales_tax_rate_percent: tax_rate,
            down_payment,
            loan_apr_percent: loan_apr,
            loan_term_months: loan_term,
            expected_value_percent: expected_pct,
        },
        lease: LeaseTerms::from_quoted_payment(
            lease_monthly,
            lease_term,
            drive_off,
            disposition_fee,
            mileage,
        ),
        horizon: HorizonSpec {
            months: horizon_months,
        },
    };
    run_and_print(tr, &scenario)
}

/// 상세 비교: 머니팩터/잔존가치/취득원가로 월 리스료를 유도한다.
pub fn handle_detailed_compare(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::DETAILED_HEADING));
    println!("{}", tr.t(keys::HELP_DETAILED));
    let d = &cfg.defaults;

    let horizon_years = read_u32_or(tr, tr.t(keys::PROMPT_HORIZON_YEARS), d.horizon_years)?;
    let horizon_months = horizon_years * 12;

    println!("{}", tr.t(keys::BUY_SECTION));
    let purchase_price = read_f64_or(tr, tr.t(keys::PROMPT_PURCHASE_PRICE), 35_000_000.0)?;
    let upfront_fees = read_f64_or(tr, tr.t(keys::PROMPT_UPFRONT_FEES), 500_000.0)?;
    let tax_rate = read_f64_or(tr, tr.t(keys::PROMPT_TAX_RATE), d.sales_tax_rate_percent)?;
    let down_payment = read_f64_or(tr, tr.t(keys::PROMPT_DOWN_PAYMENT), 5_000_000.0)?;
    let loan_apr = read_f64_or(tr, tr.t(keys::PROMPT_LOAN_APR), 5.0)?;
    let loan_term = read_u32_or(tr, tr.t(keys::PROMPT_LOAN_TERM), 60)?;
    let expected_pct = read_f64_or(
        tr,
        tr.t(keys::PROMPT_EXPECTED_VALUE_PCT),
        scenario::default_residual_percent(horizon_years),
    )?;

    println!("{}", tr.t(keys::LEASE_SECTION));
    let msrp = read_f64_or(tr, tr.t(keys::PROMPT_MSRP), 38_000_000.0)?;
    let cap_cost = read_f64_or(tr, tr.t(keys::PROMPT_CAP_COST), 36_000_000.0)?;
    let lease_term = read_u32_or(tr, tr.t(keys::PROMPT_LEASE_TERM), 36)?;
    let residual_pct = read_f64_or(tr, tr.t(keys::PROMPT_RESIDUAL_PCT), 58.0)?;
    let residual_value = msrp * residual_pct / 100.0;
    let money_factor = if read_yes_no(tr, tr.t(keys::PROMPT_USE_APR), true)? {
        let lease_apr = read_f64_or(tr, tr.t(keys::PROMPT_LEASE_APR), 3.0)?;
        apr_to_money_factor(lease_apr)
    } else {
        read_f64_or(tr, tr.t(keys::PROMPT_MONEY_FACTOR), 0.00125)?
    };
    let lease_tax = read_f64_or(tr, tr.t(keys::PROMPT_LEASE_TAX_RATE), tax_rate)?;
    let drive_off = read_f64_or(tr, tr.t(keys::PROMPT_DRIVE_OFF), 2_000_000.0)?;
    let disposition_fee = read_f64_or(tr, tr.t(keys::PROMPT_DISPOSITION_FEE), 400_000.0)?;
    let mileage = read_mileage(tr, cfg)?;

    let scenario = Scenario {
        buy: BuyTerms {
            purchase_price,
            upfront_fees,
            sales_tax_rate_percent: tax_rate,
            down_payment,
            loan_apr_percent: loan_apr,
            loan_term_months: loan_term,
            expected_value_percent: expected_pct,
        },
        lease: LeaseTerms::from_money_factor(
            cap_cost,
            residual_value,
            money_factor,
            lease_tax,
            lease_term,
            drive_off,
            disposition_fee,
            mileage,
        ),
        horizon: HorizonSpec {
            months: horizon_months,
        },
    };
    run_and_print(tr, &scenario)
}

fn read_mileage(tr: &Translator, cfg: &Config) -> Result<MileagePlan, AppError> {
    let d = &cfg.defaults;
    Ok(MileagePlan {
        allowed_km_per_year: read_f64_or(tr, tr.t(keys::PROMPT_ALLOWED_KM), d.allowed_km_per_year)?,
        expected_km_per_year: read_f64_or(
            tr,
            tr.t(keys::PROMPT_EXPECTED_KM),
            d.expected_km_per_year,
        )?,
        excess_fee_per_km: read_f64_or(tr, tr.t(keys::PROMPT_EXCESS_FEE), d.excess_fee_per_km)?,
    })
}

/// 검증을 통과한 시나리오만 투영하고, 실패하면 문제 목록을 보여준다.
fn run_and_print(tr: &Translator, scenario: &Scenario) -> Result<(), AppError> {
    let issues = scenario::validate(scenario);
    if !issues.is_empty() {
        println!("{}", tr.t(keys::VALIDATION_HEADING));
        for issue in &issues {
            println!("  - {issue}");
        }
        return Ok(());
    }
    let projection = projection::project(scenario);
    print_projection(tr, scenario, &projection);
    Ok(())
}

fn print_projection(tr: &Translator, scenario: &Scenario, projection: &Projection) {
    println!("{}", tr.t(keys::RESULT_BUY_HEADING));
    println!(
        "{} {}",
        tr.t(keys::RESULT_MONTHLY_PAYMENT),
        format_won(projection.buy.monthly_payment)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_TOTAL_PURCHASE_COST),
        format_won(projection.buy.total_purchase_cost)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_LOAN_AMOUNT),
        format_won(projection.buy.loan_amount)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_END_VALUE),
        format_won(projection.buy.end_value_at_horizon)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_NET_COST_BUY),
        format_won(projection.buy.net_cost_at_horizon)
    );

    println!("{}", tr.t(keys::RESULT_LEASE_HEADING));
    println!(
        "{} {}",
        tr.t(keys::RESULT_LEASE_MONTHLY),
        format_won(projection.lease.monthly_payment_with_tax)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_TOTAL_LEASE_PAYMENTS),
        format_won(projection.lease.total_payments_full_term)
    );
    if projection.lease.mileage_penalty > 0.0 {
        println!(
            "{} {}",
            tr.t(keys::RESULT_MILEAGE_PENALTY),
            format_won(projection.lease.mileage_penalty)
        );
    }
    println!(
        "{} {}",
        tr.t(keys::RESULT_DISPOSITION_FEE),
        format_won(scenario.lease.disposition_fee)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_NET_COST_LEASE_FULL),
        format_won(projection.lease.net_cost_full_term)
    );
    println!(
        "{} {}",
        tr.t(keys::RESULT_NET_COST_LEASE_HORIZON),
        format_won(projection.lease.net_cost_at_horizon)
    );

    println!("{}", tr.t(keys::TABLE_HEADING));
    println!("{}", tr.t(keys::TABLE_HEADER));
    let horizon = scenario.horizon.months;
    let step = if horizon <= 24 { 1 } else { 6 };
    for row in &projection.monthly {
        if row.month % step == 0 || row.month == horizon {
            println!(
                "{:>4} | {:>16} | {:>16}",
                row.month,
                format_won(row.buy),
                format_won(row.lease)
            );
        }
    }

    let line = match projection.verdict {
        Verdict::LeaseCheaper(diff) => {
            fill_template(tr.t(keys::VERDICT_LEASE_CHEAPER), "amount", &format_won(diff))
        }
        Verdict::BuyCheaper(diff) => {
            fill_template(tr.t(keys::VERDICT_BUY_CHEAPER), "amount", &format_won(diff))
        }
        Verdict::Even => tr.t(keys::VERDICT_EVEN).to_string(),
    };
    println!("\n{line}");
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{}", tr.t(keys::HELP_SETTINGS));
    println!("{}", tr.t(keys::SETTINGS_CURRENT));
    println!("  language = {}", cfg.language);
    println!(
        "  {} = {}",
        tr.t(keys::PROMPT_TAX_RATE),
        cfg.defaults.sales_tax_rate_percent
    );
    println!(
        "  {} = {}",
        tr.t(keys::PROMPT_HORIZON_YEARS),
        cfg.defaults.horizon_years
    );
    println!(
        "  {} = {} / {} = {} / {} = {}",
        tr.t(keys::PROMPT_ALLOWED_KM),
        cfg.defaults.allowed_km_per_year,
        tr.t(keys::PROMPT_EXPECTED_KM),
        cfg.defaults.expected_km_per_year,
        tr.t(keys::PROMPT_EXCESS_FEE),
        cfg.defaults.excess_fee_per_km
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.trim() {
        "" => return Ok(()),
        "1" => {
            let lang = read_line(tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
            if !lang.trim().is_empty() {
                cfg.language = lang.trim().to_string();
            }
        }
        "2" => {
            cfg.defaults.sales_tax_rate_percent = read_f64_or(
                tr,
                tr.t(keys::PROMPT_TAX_RATE),
                cfg.defaults.sales_tax_rate_percent,
            )?;
        }
        "3" => {
            cfg.defaults.horizon_years =
                read_u32_or(tr, tr.t(keys::PROMPT_HORIZON_YEARS), cfg.defaults.horizon_years)?;
        }
        "4" => {
            cfg.defaults.allowed_km_per_year = read_f64_or(
                tr,
                tr.t(keys::PROMPT_ALLOWED_KM),
                cfg.defaults.allowed_km_per_year,
            )?;
            cfg.defaults.expected_km_per_year = read_f64_or(
                tr,
                tr.t(keys::PROMPT_EXPECTED_KM),
                cfg.defaults.expected_km_per_year,
            )?;
            cfg.defaults.excess_fee_per_km = read_f64_or(
                tr,
                tr.t(keys::PROMPT_EXCESS_FEE),
                cfg.defaults.excess_fee_per_km,
            )?;
        }
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(());
        }
    }
    println!("{}", tr.t(keys::SETTINGS_SAVED));
    Ok(())
}

/// 원 단위 금액에 천 단위 구분 기호를 넣는다. 반올림은 표시 단계인 여기서만 한다.
pub fn format_won(value: f64) -> String {
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    let digits = rounded.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

fn fill_template(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{key}}}"), value)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}

/// 기본값이 딸린 실수 입력. 빈 입력은 기본값으로 처리한다.
fn read_f64_or(tr: &Translator, label: &str, default: f64) -> Result<f64, AppError> {
    loop {
        let prompt = format!("{label} ({} {default}): ", tr.t(keys::PROMPT_DEFAULT_WORD));
        let s = read_line(&prompt)?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(default);
        }
        match trimmed.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 기본값이 딸린 정수 입력. 빈 입력은 기본값으로 처리한다.
fn read_u32_or(tr: &Translator, label: &str, default: u32) -> Result<u32, AppError> {
    loop {
        let prompt = format!("{label} ({} {default}): ", tr.t(keys::PROMPT_DEFAULT_WORD));
        let s = read_line(&prompt)?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(default);
        }
        match trimmed.parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_yes_no(tr: &Translator, label: &str, default_yes: bool) -> Result<bool, AppError> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    loop {
        let s = read_line(&format!("{label} [{hint}]: "))?;
        match s.trim().to_lowercase().as_str() {
            "" => return Ok(default_yes),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_won;

    #[test]
    fn format_won_groups_thousands() {
        assert_eq!(format_won(0.0), "0");
        assert_eq!(format_won(950.0), "950");
        assert_eq!(format_won(1_000.0), "1,000");
        assert_eq!(format_won(35_000_000.0), "35,000,000");
    }

    #[test]
    fn format_won_rounds_and_keeps_sign() {
        assert_eq!(format_won(1_234.56), "1,235");
        assert_eq!(format_won(-9_300_000.4), "-9,300,000");
    }
}
