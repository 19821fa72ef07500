use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_QUICK: &str = "main_menu.quick_compare";
    pub const MAIN_MENU_DETAILED: &str = "main_menu.detailed_compare";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const PROMPT_DEFAULT_WORD: &str = "prompt.default_word";

    pub const QUICK_HEADING: &str = "quick.heading";
    pub const DETAILED_HEADING: &str = "detailed.heading";
    pub const BUY_SECTION: &str = "section.buy";
    pub const LEASE_SECTION: &str = "section.lease";

    pub const PROMPT_HORIZON_YEARS: &str = "prompt.horizon_years";
    pub const PROMPT_TAX_RATE: &str = "prompt.tax_rate";

    pub const PROMPT_PURCHASE_PRICE: &str = "prompt.purchase_price";
    pub const PROMPT_UPFRONT_FEES: &str = "prompt.upfront_fees";
    pub const PROMPT_DOWN_PAYMENT: &str = "prompt.down_payment";
    pub const PROMPT_LOAN_APR: &str = "prompt.loan_apr";
    pub const PROMPT_LOAN_TERM: &str = "prompt.loan_term";
    pub const PROMPT_EXPECTED_VALUE_PCT: &str = "prompt.expected_value_pct";

    pub const PROMPT_LEASE_TERM: &str = "prompt.lease_term";
    pub const PROMPT_LEASE_MONTHLY: &str = "prompt.lease_monthly";
    pub const PROMPT_DRIVE_OFF: &str = "prompt.drive_off";
    pub const PROMPT_DISPOSITION_FEE: &str = "prompt.disposition_fee";
    pub const PROMPT_MSRP: &str = "prompt.msrp";
    pub const PROMPT_CAP_COST: &str = "prompt.cap_cost";
    pub const PROMPT_RESIDUAL_PCT: &str = "prompt.residual_pct";
    pub const PROMPT_USE_APR: &str = "prompt.use_apr";
    pub const PROMPT_LEASE_APR: &str = "prompt.lease_apr";
    pub const PROMPT_MONEY_FACTOR: &str = "prompt.money_factor";
    pub const PROMPT_LEASE_TAX_RATE: &str = "prompt.lease_tax_rate";

    pub const PROMPT_ALLOWED_KM: &str = "prompt.allowed_km";
    pub const PROMPT_EXPECTED_KM: &str = "prompt.expected_km";
    pub const PROMPT_EXCESS_FEE: &str = "prompt.excess_fee";

    pub const VALIDATION_HEADING: &str = "validation.heading";

    pub const RESULT_BUY_HEADING: &str = "result.buy_heading";
    pub const RESULT_LEASE_HEADING: &str = "result.lease_heading";
    pub const RESULT_MONTHLY_PAYMENT: &str = "result.monthly_payment";
    pub const RESULT_TOTAL_PURCHASE_COST: &str = "result.total_purchase_cost";
    pub const RESULT_LOAN_AMOUNT: &str = "result.loan_amount";
    pub const RESULT_END_VALUE: &str = "result.end_value";
    pub const RESULT_NET_COST_BUY: &str = "result.net_cost_buy";
    pub const RESULT_LEASE_MONTHLY: &str = "result.lease_monthly";
    pub const RESULT_TOTAL_LEASE_PAYMENTS: &str = "result.total_lease_payments";
    pub const RESULT_MILEAGE_PENALTY: &str = "result.mileage_penalty";
    pub const RESULT_DISPOSITION_FEE: &str = "result.disposition_fee";
    pub const RESULT_NET_COST_LEASE_FULL: &str = "result.net_cost_lease_full";
    pub const RESULT_NET_COST_LEASE_HORIZON: &str = "result.net_cost_lease_horizon";

    pub const TABLE_HEADING: &str = "table.heading";
    pub const TABLE_HEADER: &str = "table.header";

    pub const VERDICT_LEASE_CHEAPER: &str = "verdict.lease_cheaper";
    pub const VERDICT_BUY_CHEAPER: &str = "verdict.buy_cheaper";
    pub const VERDICT_EVEN: &str = "verdict.even";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const HELP_QUICK: &str = "help.quick";
    pub const HELP_DETAILED: &str = "help.detailed";
    pub const HELP_SETTINGS: &str = "help.settings";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
            .or_else(|| built_in_pack(lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 영어 번역이 없으면 한국어 문자열을 폴백한다.
    pub fn t(&self, key: &str) -> &'static str {
        if let Some(ref map) = self.overrides {
            if let Some(v) = map.get(key) {
                return Box::leak(v.clone().into_boxed_str());
            }
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "ko-kr".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" => Some("ko".into()),
        "ko-kr" => Some("ko-kr".into()),
        "en" => Some("en".into()),
        "en-us" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    if let Ok(lang) = std::env::var("LANG") {
        if let Some(code) = normalize_locale_string(&lang) {
            return Some(code);
        }
    }
    if let Ok(lang) = std::env::var("LC_ALL") {
        if let Some(code) = normalize_locale_string(&lang) {
            return Some(code);
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., en-us)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., en)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang.to_lowercase().as_str() {
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        "ko-kr" | "ko" => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        _ => None,
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 자동차 리스 vs 구매 비교 계산기 ===",
        MAIN_MENU_QUICK => "1) 간편 비교 (리스 견적 금액 입력)",
        MAIN_MENU_DETAILED => "2) 상세 비교 (머니팩터/잔존가치 입력)",
        MAIN_MENU_SETTINGS => "3) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        PROMPT_DEFAULT_WORD => "기본",
        QUICK_HEADING => "\n-- 간편 비교 --",
        DETAILED_HEADING => "\n-- 상세 비교 --",
        BUY_SECTION => "[구매 조건]",
        LEASE_SECTION => "[리스 조건]",
        PROMPT_HORIZON_YEARS => "비교 구간 [년]",
        PROMPT_TAX_RATE => "취득 세율 [%]",
        PROMPT_PURCHASE_PRICE => "차량 가격(세전 협상가) [원]",
        PROMPT_UPFRONT_FEES => "등록/서류 등 초기 비용 [원]",
        PROMPT_DOWN_PAYMENT => "선수금 [원]",
        PROMPT_LOAN_APR => "할부 연이율 [%]",
        PROMPT_LOAN_TERM => "할부 기간 [개월]",
        PROMPT_EXPECTED_VALUE_PCT => "비교 구간 종료 시점 예상 잔존가치 [구매가 대비 %]",
        PROMPT_LEASE_TERM => "리스 약정 기간 [개월]",
        PROMPT_LEASE_MONTHLY => "월 리스료(세금 포함, 견적 금액) [원]",
        PROMPT_DRIVE_OFF => "인수 시 납부액(선납금 등) [원]",
        PROMPT_DISPOSITION_FEE => "만기 반납 수수료 [원]",
        PROMPT_MSRP => "차량 정가(MSRP) [원]",
        PROMPT_CAP_COST => "리스 취득원가(협상가) [원]",
        PROMPT_RESIDUAL_PCT => "만기 잔존가치 [정가 대비 %]",
        PROMPT_USE_APR => "머니팩터 대신 리스 이율(APR)로 입력할까요?",
        PROMPT_LEASE_APR => "리스 연이율 [%]",
        PROMPT_MONEY_FACTOR => "머니팩터",
        PROMPT_LEASE_TAX_RATE => "리스료 부가 세율 [%]",
        PROMPT_ALLOWED_KM => "연간 허용 주행거리 [km]",
        PROMPT_EXPECTED_KM => "연간 예상 주행거리 [km]",
        PROMPT_EXCESS_FEE => "초과 주행 수수료 [원/km]",
        VALIDATION_HEADING => "입력값에 문제가 있어 계산을 진행하지 않습니다:",
        RESULT_BUY_HEADING => "\n[구매 요약]",
        RESULT_LEASE_HEADING => "\n[리스 요약]",
        RESULT_MONTHLY_PAYMENT => "월 할부 납입액:",
        RESULT_TOTAL_PURCHASE_COST => "총 구매 비용(가격+초기비용+세금):",
        RESULT_LOAN_AMOUNT => "할부 원금:",
        RESULT_END_VALUE => "비교 구간 종료 시점 예상 차량 가치:",
        RESULT_NET_COST_BUY => "비교 구간 순비용(지출-잔존 가치):",
        RESULT_LEASE_MONTHLY => "월 리스료(세금 포함):",
        RESULT_TOTAL_LEASE_PAYMENTS => "약정 기간 전체 납입액:",
        RESULT_MILEAGE_PENALTY => "만기 초과 주행 수수료(예상):",
        RESULT_DISPOSITION_FEE => "만기 반납 수수료:",
        RESULT_NET_COST_LEASE_FULL => "리스 풀텀 순비용:",
        RESULT_NET_COST_LEASE_HORIZON => "비교 구간 시점 리스 순비용:",
        TABLE_HEADING => "\n[월별 순비용 추이]",
        TABLE_HEADER => "개월 | 구매 순비용 [원] | 리스 순비용 [원]",
        VERDICT_LEASE_CHEAPER => "결론: 이 가정에서는 리스가 약 {amount}원 저렴합니다.",
        VERDICT_BUY_CHEAPER => "결론: 이 가정에서는 구매가 약 {amount}원 저렴합니다.",
        VERDICT_EVEN => "결론: 두 방식의 순비용이 사실상 같습니다.",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT => "현재 설정:",
        SETTINGS_OPTIONS => {
            "1) 언어  2) 기본 취득 세율  3) 기본 비교 구간  4) 주행거리 기본값"
        }
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_PROMPT_LANGUAGE => "언어 코드(auto/ko/ko-kr/en/en-us): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정이 저장되었습니다.",
        HELP_QUICK => "도움말: 리스 견적서의 월 납입액을 그대로 입력하는 방식입니다. 세금이 이미 포함된 금액을 쓰세요.",
        HELP_DETAILED => "도움말: 취득원가/잔존가치/머니팩터로 월 리스료를 유도합니다. APR 입력 시 APR/2400으로 근사 변환합니다.",
        HELP_SETTINGS => "도움말: 폼 기본값(세율/비교 구간/주행거리)과 언어를 바꿉니다. 종료 시 config.toml에 저장됩니다.",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Vehicle Lease vs Buy Calculator ===",
        MAIN_MENU_QUICK => "1) Quick compare (quoted lease payment)",
        MAIN_MENU_DETAILED => "2) Detailed compare (money factor / residual)",
        MAIN_MENU_SETTINGS => "3) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PROMPT_DEFAULT_WORD => "default",
        QUICK_HEADING => "\n-- Quick Compare --",
        DETAILED_HEADING => "\n-- Detailed Compare --",
        BUY_SECTION => "[Buying terms]",
        LEASE_SECTION => "[Lease terms]",
        PROMPT_HORIZON_YEARS => "Comparison horizon [years]",
        PROMPT_TAX_RATE => "Sales tax rate [%]",
        PROMPT_PURCHASE_PRICE => "Vehicle price (pre-tax, negotiated) [KRW]",
        PROMPT_UPFRONT_FEES => "Upfront fees (registration, docs) [KRW]",
        PROMPT_DOWN_PAYMENT => "Down payment [KRW]",
        PROMPT_LOAN_APR => "Loan APR [%]",
        PROMPT_LOAN_TERM => "Loan term [months]",
        PROMPT_EXPECTED_VALUE_PCT => "Expected value at end of horizon [% of price]",
        PROMPT_LEASE_TERM => "Lease term [months]",
        PROMPT_LEASE_MONTHLY => "Monthly lease payment (with tax, from quote) [KRW]",
        PROMPT_DRIVE_OFF => "Drive-off amount (due at signing) [KRW]",
        PROMPT_DISPOSITION_FEE => "Disposition fee at lease end [KRW]",
        PROMPT_MSRP => "MSRP [KRW]",
        PROMPT_CAP_COST => "Lease cap cost (negotiated) [KRW]",
        PROMPT_RESIDUAL_PCT => "Residual value at lease end [% of MSRP]",
        PROMPT_USE_APR => "Enter lease APR instead of money factor?",
        PROMPT_LEASE_APR => "Lease APR [%]",
        PROMPT_MONEY_FACTOR => "Money factor",
        PROMPT_LEASE_TAX_RATE => "Tax on lease payments [%]",
        PROMPT_ALLOWED_KM => "Mileage allowance per year [km]",
        PROMPT_EXPECTED_KM => "Expected distance per year [km]",
        PROMPT_EXCESS_FEE => "Excess mileage fee [KRW/km]",
        VALIDATION_HEADING => "Input problems found; skipping the computation:",
        RESULT_BUY_HEADING => "\n[Buying summary]",
        RESULT_LEASE_HEADING => "\n[Lease summary]",
        RESULT_MONTHLY_PAYMENT => "Monthly loan payment:",
        RESULT_TOTAL_PURCHASE_COST => "Total purchase cost (price + fees + tax):",
        RESULT_LOAN_AMOUNT => "Loan amount financed:",
        RESULT_END_VALUE => "Estimated vehicle value at end of horizon:",
        RESULT_NET_COST_BUY => "Net cost over horizon (cash out - equity):",
        RESULT_LEASE_MONTHLY => "Monthly lease payment (with tax):",
        RESULT_TOTAL_LEASE_PAYMENTS => "Lease payments over full term:",
        RESULT_MILEAGE_PENALTY => "Estimated mileage penalty at lease end:",
        RESULT_DISPOSITION_FEE => "Disposition fee at lease end:",
        RESULT_NET_COST_LEASE_FULL => "Net cost for one full lease:",
        RESULT_NET_COST_LEASE_HORIZON => "Lease net cost at horizon:",
        TABLE_HEADING => "\n[Net cost by month]",
        TABLE_HEADER => "Month | Buy net cost [KRW] | Lease net cost [KRW]",
        VERDICT_LEASE_CHEAPER => "Verdict: leasing is cheaper by about {amount} KRW under these assumptions.",
        VERDICT_BUY_CHEAPER => "Verdict: buying is cheaper by about {amount} KRW under these assumptions.",
        VERDICT_EVEN => "Verdict: both options cost about the same.",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT => "Current settings:",
        SETTINGS_OPTIONS => "1) Language  2) Default tax rate  3) Default horizon  4) Mileage defaults",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_PROMPT_LANGUAGE => "Language code (auto/ko/ko-kr/en/en-us): ",
        SETTINGS_INVALID => "Invalid input; settings unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        HELP_QUICK => "Help: enter the monthly payment straight from your lease quote (tax included).",
        HELP_DETAILED => "Help: derives the lease payment from cap cost / residual / money factor. APR input is approximated as APR/2400.",
        HELP_SETTINGS => "Help: changes form defaults (tax/horizon/mileage) and language. Saved to config.toml on exit.",
        _ => return None,
    })
}
