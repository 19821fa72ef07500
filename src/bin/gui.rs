#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};
use vehicle_finance_toolbox::{
    config,
    finance::lease::{apr_to_money_factor, LeaseTerms},
    finance::mileage::MileagePlan,
    i18n::{self, keys},
    projection::{self, Projection, Verdict},
    scenario::{self, BuyTerms, HorizonSpec, Scenario, ValidationIssue},
    ui_cli::format_won,
};

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/ko/ko-kr/en/en-us)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        }
        i += 1;
    }

    let icon_data = load_app_icon();
    let mut viewport = egui::ViewportBuilder::default()
        .with_always_on_top()
        .with_transparent(true);
    if let Some(icon) = icon_data.clone() {
        viewport = viewport.with_icon(icon);
    }
    let cfg = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_default();
    if let Some(lang_cli) = cli_lang {
        let resolved = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
        app_cfg.language = resolved;
    }
    eframe::run_native(
        "Vehicle Lease vs Buy Calculator",
        cfg,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                eprintln!("Font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../icon.png"];
    let path = search
        .iter()
        .find(|p| Path::new(*p).exists())
        .map(|s| s.to_string())?;
    let bytes = fs::read(&path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn label_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.label(text).on_hover_text(tip)
}

fn heading_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.heading(text).on_hover_text(tip)
}

fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글을 표시하기 위해 기본 폰트를 우선 적용한다.
/// 1) assets/fonts/ 아래의 폰트
/// 2) 시스템 폰트(Windows 맑은 고딕 계열, 리눅스 나눔/Noto 계열)
/// 3) 모두 실패 시 Err를 반환해 사용자 지정 폰트 로드를 유도한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    // 1) 프로젝트 내 폰트
    let asset_path = Path::new("assets/fonts/malgun.ttf");
    if asset_path.exists() {
        let bytes = fs::read(asset_path).map_err(|e| format!("Failed to read font file: {e}"))?;
        apply_font_bytes(ctx, bytes, "korean_font");
        return Ok(());
    }

    // 2) 시스템 폰트 탐색 (Windows 기준)
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        let candidates = [
            "malgun.ttf",
            "malgunsl.ttf",
            "malgunbd.ttf",
            "gulim.ttc",
            "batang.ttc",
        ];
        for cand in candidates {
            let p = fonts.join(cand);
            if p.exists() {
                let bytes = fs::read(&p)
                    .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
                apply_font_bytes(ctx, bytes, "korean_font");
                return Ok(());
            }
        }
    }

    // 2b) 리눅스/맥 계열
    let unix_candidates = [
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    ];
    for cand in unix_candidates {
        let p = Path::new(cand);
        if p.exists() {
            let bytes = fs::read(p)
                .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }

    // 3) 실패: 기본 폰트 유지, 사용자 지정 안내
    Err("Font not found. Please set a user font (.ttf/.ttc) in settings.".into())
}

/// 사용자가 선택한 경로의 폰트를 egui에 등록한다.
fn load_custom_font(ctx: &egui::Context, path: &str) -> Result<(), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("Font file not found: {path}"));
    }
    let bytes = fs::read(p).map_err(|e| format!("Failed to read font file: {e}"))?;
    apply_font_bytes(ctx, bytes, "user_font");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Quick,
    Detailed,
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    lang_input: String,
    lang_save_status: Option<String>,
    tab: Tab,
    window_alpha: f32,
    ui_scale: f32,
    always_on_top: bool,
    show_settings_modal: bool,
    show_help_modal: bool,
    show_formula_modal: bool,
    custom_font_path: String,
    font_load_error: Option<String>,
    apply_initial_view_size: bool,

    // 공통 입력
    horizon_years: u32,
    // 구매 입력
    purchase_price: f64,
    upfront_fees: f64,
    tax_rate_percent: f64,
    down_payment: f64,
    loan_apr_percent: f64,
    loan_term_months: u32,
    expected_value_percent: f64,
    expected_value_auto: bool,
    // 리스 공통 입력
    lease_term_months: u32,
    drive_off: f64,
    disposition_fee: f64,
    allowed_km_per_year: f64,
    expected_km_per_year: f64,
    excess_fee_per_km: f64,
    // 간편 모드 입력
    quick_lease_monthly: f64,
    // 상세 모드 입력
    msrp: f64,
    cap_cost: f64,
    residual_percent: f64,
    use_apr: bool,
    lease_apr_percent: f64,
    money_factor: f64,
    lease_tax_rate_percent: f64,

    // 결과
    issues: Vec<ValidationIssue>,
    result: Option<Projection>,
    csv_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        let lang_input = config.language.clone();
        let d = config.defaults.clone();
        Self {
            tr,
            lang_input,
            lang_save_status: None,
            tab: Tab::Quick,
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            ui_scale: 1.0,
            always_on_top: true,
            show_settings_modal: false,
            show_help_modal: false,
            show_formula_modal: false,
            custom_font_path: String::new(),
            font_load_error: None,
            apply_initial_view_size: true,
            horizon_years: d.horizon_years,
            purchase_price: 35_000_000.0,
            upfront_fees: 500_000.0,
            tax_rate_percent: d.sales_tax_rate_percent,
            down_payment: 5_000_000.0,
            loan_apr_percent: 5.0,
            loan_term_months: 60,
            expected_value_percent: scenario::default_residual_percent(d.horizon_years),
            expected_value_auto: true,
            lease_term_months: 36,
            drive_off: 2_000_000.0,
            disposition_fee: 400_000.0,
            allowed_km_per_year: d.allowed_km_per_year,
            expected_km_per_year: d.expected_km_per_year,
            excess_fee_per_km: d.excess_fee_per_km,
            quick_lease_monthly: 600_000.0,
            msrp: 38_000_000.0,
            cap_cost: 36_000_000.0,
            residual_percent: 58.0,
            use_apr: true,
            lease_apr_percent: 3.0,
            money_factor: 0.00125,
            lease_tax_rate_percent: d.sales_tax_rate_percent,
            issues: Vec::new(),
            result: None,
            csv_status: None,
            config,
        }
    }

    fn buy_terms(&self, include_fees: bool) -> BuyTerms {
        BuyTerms {
            purchase_price: self.purchase_price,
            upfront_fees: if include_fees { self.upfront_fees } else { 0.0 },
            sales_tax_rate_percent: self.tax_rate_percent,
            down_payment: self.down_payment,
            loan_apr_percent: self.loan_apr_percent,
            loan_term_months: self.loan_term_months,
            expected_value_percent: self.expected_value_percent,
        }
    }

    fn mileage_plan(&self) -> MileagePlan {
        MileagePlan {
            allowed_km_per_year: self.allowed_km_per_year,
            expected_km_per_year: self.expected_km_per_year,
            excess_fee_per_km: self.excess_fee_per_km,
        }
    }

    /// 간편 탭: 견적서 월 납입액으로 리스 조건을 만든다.
    fn quick_scenario(&self) -> Scenario {
        Scenario {
            buy: self.buy_terms(false),
            lease: LeaseTerms::from_quoted_payment(
                self.quick_lease_monthly,
                self.lease_term_months,
                self.drive_off,
                self.disposition_fee,
                self.mileage_plan(),
            ),
            horizon: HorizonSpec {
                months: self.horizon_years * 12,
            },
        }
    }

    /// 상세 탭: 머니팩터 경로로 리스 조건을 만든다.
    fn detailed_scenario(&self) -> Scenario {
        let residual_value = self.msrp * self.residual_percent / 100.0;
        let money_factor = if self.use_apr {
            apr_to_money_factor(self.lease_apr_percent)
        } else {
            self.money_factor
        };
        Scenario {
            buy: self.buy_terms(true),
            lease: LeaseTerms::from_money_factor(
                self.cap_cost,
                residual_value,
                money_factor,
                self.lease_tax_rate_percent,
                self.lease_term_months,
                self.drive_off,
                self.disposition_fee,
                self.mileage_plan(),
            ),
            horizon: HorizonSpec {
                months: self.horizon_years * 12,
            },
        }
    }

    fn compute(&mut self) {
        let scenario = match self.tab {
            Tab::Quick => self.quick_scenario(),
            Tab::Detailed => self.detailed_scenario(),
        };
        self.issues = scenario::validate(&scenario);
        self.result = if self.issues.is_empty() {
            Some(projection::project(&scenario))
        } else {
            None
        };
        self.csv_status = None;
    }

    fn export_csv(&mut self) {
        let Some(result) = &self.result else {
            return;
        };
        let txt = {
            let tr = self.tr.clone();
            move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string())
        };
        let Some(path) = FileDialog::new()
            .set_file_name("net_cost_by_month.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        let mut content = String::from("month,net_cost_buy,net_cost_lease\n");
        for row in &result.monthly {
            content.push_str(&format!("{},{:.2},{:.2}\n", row.month, row.buy, row.lease));
        }
        self.csv_status = Some(match fs::write(&path, content) {
            Ok(()) => fill_template(
                &txt("gui.result.csv_saved", "Saved: {path}"),
                &[("path", path.display().to_string())],
            ),
            Err(e) => fill_template(
                &txt("gui.result.csv_error", "CSV save error: {err}"),
                &[("err", e.to_string())],
            ),
        });
    }

    fn ui_nav(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        ui.style_mut().wrap = Some(false);
        ui.vertical_centered(|ui| {
            ui.heading(txt("gui.nav.heading", "Menu"));
            ui.add_space(8.0);
        });
        for (tab, label) in [
            (Tab::Quick, txt("gui.tab.quick", "Quick Compare")),
            (Tab::Detailed, txt("gui.tab.detailed", "Detailed Compare")),
        ] {
            let selected = self.tab == tab;
            let button = egui::Button::new(label)
                .fill(if selected {
                    ui.visuals().selection.bg_fill
                } else {
                    ui.visuals().extreme_bg_color
                })
                .min_size(egui::vec2(ui.available_width(), 32.0));
            let resp = ui
                .add(button)
                .on_hover_text(txt("gui.nav.switch_tip", "Switch menu"));
            if resp.clicked() {
                self.tab = tab;
            }
            ui.add_space(4.0);
        }
    }

    /// 비교 구간과 구매 조건 폼. 두 탭이 공유한다.
    fn ui_buy_inputs<F>(&mut self, ui: &mut egui::Ui, txt: &F, detailed: bool)
    where
        F: Fn(&str, &str) -> String,
    {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("buy_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    label_with_tip(
                        ui,
                        &txt("gui.form.horizon", "Comparison horizon [years]"),
                        &txt(
                            "gui.form.horizon_tip",
                            "A 3-year horizon usually matches a 36-month lease.",
                        ),
                    );
                    if ui
                        .add(egui::DragValue::new(&mut self.horizon_years).clamp_range(1..=7))
                        .changed()
                        && self.expected_value_auto
                    {
                        self.expected_value_percent =
                            scenario::default_residual_percent(self.horizon_years);
                    }
                    ui.end_row();

                    label_with_tip(
                        ui,
                        &txt("gui.form.price", "Vehicle price (pre-tax) [KRW]"),
                        &txt("gui.form.price_tip", "Negotiated price before tax"),
                    );
                    ui.add(egui::DragValue::new(&mut self.purchase_price).speed(100_000.0));
                    ui.end_row();

                    if detailed {
                        label_with_tip(
                            ui,
                            &txt("gui.form.fees", "Upfront fees [KRW]"),
                            &txt(
                                "gui.form.fees_tip",
                                "One-time registration, bond and document costs",
                            ),
                        );
                        ui.add(egui::DragValue::new(&mut self.upfront_fees).speed(50_000.0));
                        ui.end_row();
                    }

                    label_with_tip(
                        ui,
                        &txt("gui.form.tax", "Sales tax rate [%]"),
                        &txt("gui.form.tax_tip", "Applied to price + upfront fees"),
                    );
                    ui.add(egui::DragValue::new(&mut self.tax_rate_percent).speed(0.25));
                    ui.end_row();

                    ui.label(txt("gui.form.down", "Down payment [KRW]"));
                    ui.add(egui::DragValue::new(&mut self.down_payment).speed(100_000.0));
                    ui.end_row();

                    ui.label(txt("gui.form.apr", "Loan APR [%]"));
                    ui.add(egui::DragValue::new(&mut self.loan_apr_percent).speed(0.25));
                    ui.end_row();

                    ui.label(txt("gui.form.loan_term", "Loan term [months]"));
                    ui.add(egui::DragValue::new(&mut self.loan_term_months).clamp_range(12..=96));
                    ui.end_row();

                    label_with_tip(
                        ui,
                        &txt("gui.form.expected_pct", "Expected value [% of price]"),
                        &txt(
                            "gui.form.expected_pct_tip",
                            "Estimated resale value at the end of the horizon",
                        ),
                    );
                    ui.horizontal(|ui| {
                        ui.add_enabled(
                            !self.expected_value_auto,
                            egui::DragValue::new(&mut self.expected_value_percent)
                                .clamp_range(10.0..=80.0),
                        );
                        if ui
                            .checkbox(
                                &mut self.expected_value_auto,
                                txt("gui.form.expected_auto", "Use default residual table"),
                            )
                            .changed()
                            && self.expected_value_auto
                        {
                            self.expected_value_percent =
                                scenario::default_residual_percent(self.horizon_years);
                        }
                    });
                    ui.end_row();
                });
        });
    }

    /// 리스 공통 조건(기간/선납금/반납 수수료)과 주행거리 약정 폼.
    fn ui_lease_common<F>(&mut self, ui: &mut egui::Ui, txt: &F)
    where
        F: Fn(&str, &str) -> String,
    {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("lease_common_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(txt("gui.form.lease_term", "Lease term [months]"));
                    ui.add(egui::DragValue::new(&mut self.lease_term_months).clamp_range(12..=60));
                    ui.end_row();

                    label_with_tip(
                        ui,
                        &txt("gui.form.drive_off", "Drive-off amount [KRW]"),
                        &txt("gui.form.drive_off_tip", "Cash due at signing"),
                    );
                    ui.add(egui::DragValue::new(&mut self.drive_off).speed(100_000.0));
                    ui.end_row();

                    ui.label(txt("gui.form.disposition", "Disposition fee [KRW]"));
                    ui.add(egui::DragValue::new(&mut self.disposition_fee).speed(10_000.0));
                    ui.end_row();
                });
            ui.separator();
            ui.label(txt("gui.form.mileage_heading", "Mileage plan"));
            egui::Grid::new("mileage_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(txt("gui.form.allowed", "Mileage allowance per year [km]"));
                    ui.add(egui::DragValue::new(&mut self.allowed_km_per_year).speed(1000.0));
                    ui.end_row();

                    ui.label(txt("gui.form.expected", "Expected distance per year [km]"));
                    ui.add(egui::DragValue::new(&mut self.expected_km_per_year).speed(1000.0));
                    ui.end_row();

                    ui.label(txt("gui.form.fee", "Excess mileage fee [KRW/km]"));
                    ui.add(egui::DragValue::new(&mut self.excess_fee_per_km).speed(10.0));
                    ui.end_row();
                });
        });
    }

    fn ui_quick(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt =
            move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        heading_with_tip(
            ui,
            &txt("gui.quick.heading", "Quick Compare"),
            &txt(
                "gui.quick.tip",
                "Enter the monthly payment (tax included) straight from your lease quote.",
            ),
        );
        ui.add_space(8.0);
        ui.label(txt("gui.form.buy_heading", "Buying scenario"));
        self.ui_buy_inputs(ui, &txt, false);
        ui.add_space(8.0);
        ui.label(txt("gui.form.lease_heading", "Lease scenario"));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("quick_lease_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    label_with_tip(
                        ui,
                        &txt("gui.form.quick_monthly", "Monthly lease payment [KRW]"),
                        &txt(
                            "gui.form.quick_monthly_tip",
                            "Use the payment shown in your lease quote.",
                        ),
                    );
                    ui.add(egui::DragValue::new(&mut self.quick_lease_monthly).speed(10_000.0));
                    ui.end_row();
                });
        });
        self.ui_lease_common(ui, &txt);
        ui.add_space(8.0);
        if ui.button(txt("gui.form.compute", "Compare")).clicked() {
            self.compute();
        }
        self.ui_results(ui, &txt);
    }

    fn ui_detailed(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt =
            move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        heading_with_tip(
            ui,
            &txt("gui.detailed.heading", "Detailed Compare"),
            &txt(
                "gui.detailed.tip",
                "Derives the monthly lease payment from cap cost / residual / money factor.",
            ),
        );
        ui.add_space(8.0);
        ui.label(txt("gui.form.buy_heading", "Buying scenario"));
        self.ui_buy_inputs(ui, &txt, true);
        ui.add_space(8.0);
        ui.label(txt("gui.form.lease_heading", "Lease scenario"));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("detailed_lease_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(txt("gui.form.msrp", "MSRP [KRW]"));
                    ui.add(egui::DragValue::new(&mut self.msrp).speed(100_000.0));
                    ui.end_row();

                    label_with_tip(
                        ui,
                        &txt("gui.form.cap_cost", "Lease cap cost [KRW]"),
                        &txt(
                            "gui.form.cap_cost_tip",
                            "Negotiated vehicle price on the lessor's books",
                        ),
                    );
                    ui.add(egui::DragValue::new(&mut self.cap_cost).speed(100_000.0));
                    ui.end_row();

                    ui.label(txt("gui.form.residual_pct", "Residual at lease end [% of MSRP]"));
                    ui.add(egui::DragValue::new(&mut self.residual_percent).clamp_range(30.0..=80.0));
                    ui.end_row();

                    ui.label(txt("gui.form.use_apr", "Enter APR (off = money factor)"));
                    ui.checkbox(&mut self.use_apr, "");
                    ui.end_row();

                    if self.use_apr {
                        ui.label(txt("gui.form.lease_apr", "Lease APR [%]"));
                        ui.add(egui::DragValue::new(&mut self.lease_apr_percent).speed(0.25));
                        ui.end_row();
                    } else {
                        label_with_tip(
                            ui,
                            &txt("gui.form.money_factor", "Money factor"),
                            &txt(
                                "gui.form.money_factor_tip",
                                "Use the APR/2400 approximation or the value from your quote",
                            ),
                        );
                        ui.add(
                            egui::DragValue::new(&mut self.money_factor)
                                .speed(0.00005)
                                .max_decimals(5),
                        );
                        ui.end_row();
                    }

                    ui.label(txt("gui.form.lease_tax", "Tax on lease payments [%]"));
                    ui.add(egui::DragValue::new(&mut self.lease_tax_rate_percent).speed(0.25));
                    ui.end_row();
                });
        });
        self.ui_lease_common(ui, &txt);
        ui.add_space(8.0);
        if ui.button(txt("gui.form.compute", "Compare")).clicked() {
            self.compute();
        }
        self.ui_results(ui, &txt);
    }

    /// 검증 실패 목록 또는 계산 결과를 그린다.
    fn ui_results<F>(&mut self, ui: &mut egui::Ui, txt: &F)
    where
        F: Fn(&str, &str) -> String,
    {
        if !self.issues.is_empty() {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(200, 60, 60),
                self.tr.t(keys::VALIDATION_HEADING),
            );
            for issue in &self.issues {
                ui.colored_label(egui::Color32::from_rgb(200, 60, 60), format!("- {issue}"));
            }
            return;
        }
        let Some(result) = &self.result else {
            return;
        };
        ui.separator();
        ui.heading(txt("gui.result.heading", "Results"));

        egui::Grid::new("summary_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label(self.tr.t(keys::RESULT_MONTHLY_PAYMENT));
                ui.label(format_won(result.buy.monthly_payment));
                ui.end_row();
                ui.label(self.tr.t(keys::RESULT_TOTAL_PURCHASE_COST));
                ui.label(format_won(result.buy.total_purchase_cost));
                ui.end_row();
                ui.label(self.tr.t(keys::RESULT_LOAN_AMOUNT));
                ui.label(format_won(result.buy.loan_amount));
                ui.end_row();
                ui.label(self.tr.t(keys::RESULT_END_VALUE));
                ui.label(format_won(result.buy.end_value_at_horizon));
                ui.end_row();
                ui.label(self.tr.t(keys::RESULT_NET_COST_BUY));
                ui.label(format_won(result.buy.net_cost_at_horizon));
                ui.end_row();

                ui.label(self.tr.t(keys::RESULT_LEASE_MONTHLY));
                ui.label(format_won(result.lease.monthly_payment_with_tax));
                ui.end_row();
                ui.label(self.tr.t(keys::RESULT_TOTAL_LEASE_PAYMENTS));
                ui.label(format_won(result.lease.total_payments_full_term));
                ui.end_row();
                if result.lease.mileage_penalty > 0.0 {
                    ui.label(self.tr.t(keys::RESULT_MILEAGE_PENALTY));
                    ui.label(format_won(result.lease.mileage_penalty));
                    ui.end_row();
                }
                ui.label(self.tr.t(keys::RESULT_NET_COST_LEASE_FULL));
                ui.label(format_won(result.lease.net_cost_full_term));
                ui.end_row();
                ui.label(self.tr.t(keys::RESULT_NET_COST_LEASE_HORIZON));
                ui.label(format_won(result.lease.net_cost_at_horizon));
                ui.end_row();
            });

        let (verdict_text, verdict_color) = match result.verdict {
            Verdict::LeaseCheaper(diff) => (
                fill_template(
                    self.tr.t(keys::VERDICT_LEASE_CHEAPER),
                    &[("amount", format_won(diff))],
                ),
                egui::Color32::from_rgb(46, 125, 50),
            ),
            Verdict::BuyCheaper(diff) => (
                fill_template(
                    self.tr.t(keys::VERDICT_BUY_CHEAPER),
                    &[("amount", format_won(diff))],
                ),
                egui::Color32::from_rgb(21, 101, 192),
            ),
            Verdict::Even => (
                self.tr.t(keys::VERDICT_EVEN).to_string(),
                egui::Color32::GRAY,
            ),
        };
        ui.add_space(4.0);
        ui.colored_label(verdict_color, egui::RichText::new(verdict_text).strong());

        ui.add_space(8.0);
        ui.label(txt("gui.result.month_table", "Net cost by month"));
        egui::ScrollArea::vertical()
            .id_source("month_table_scroll")
            .max_height(240.0)
            .show(ui, |ui| {
                egui::Grid::new("month_grid")
                    .num_columns(3)
                    .striped(true)
                    .spacing([24.0, 2.0])
                    .show(ui, |ui| {
                        ui.label(self.tr.t(keys::TABLE_HEADER));
                        ui.end_row();
                        for row in &result.monthly {
                            ui.label(format!("{}", row.month));
                            ui.label(format_won(row.buy));
                            ui.label(format_won(row.lease));
                            ui.end_row();
                        }
                    });
            });

        ui.add_space(4.0);
        if ui
            .button(txt("gui.form.export_csv", "Export monthly series (CSV)"))
            .clicked()
        {
            self.export_csv();
        }
        if let Some(status) = &self.csv_status {
            ui.label(status);
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 최초 1회 화면 크기 조정
        if self.apply_initial_view_size {
            if let Some(screen) = ctx.input(|i| {
                let r = i.screen_rect();
                if r.is_positive() {
                    Some(r.size())
                } else {
                    None
                }
            }) {
                let target = egui::vec2((screen.x * 0.55).max(900.0), (screen.y * 0.60).max(640.0));
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(target));
                self.apply_initial_view_size = false;
            }
        }

        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(if self.always_on_top {
            egui::WindowLevel::AlwaysOnTop
        } else {
            egui::WindowLevel::Normal
        }));

        // 투명도 적용 + 라벨 복사 방지 스타일
        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        let tr = self.tr.clone();
        let txt =
            move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(txt("gui.nav.app_title", "Vehicle Lease vs Buy Calculator"));
                ui.label(" | Desktop GUI");
                ui.separator();
                if ui
                    .button(txt("gui.formula.button", "Formula reference"))
                    .clicked()
                {
                    self.show_formula_modal = true;
                }
                if ui.button(txt("gui.settings.title", "Settings")).clicked() {
                    self.show_settings_modal = true;
                }
                if ui.button(txt("gui.about.title", "Help / About")).clicked() {
                    self.show_help_modal = true;
                }
            });
        });

        // 설정 모달
        if self.show_settings_modal {
            egui::Window::new(txt("gui.settings.title", "Settings"))
                .collapsible(false)
                .resizable(true)
                .open(&mut self.show_settings_modal)
                .show(ctx, |ui| {
                    ui.heading(txt("gui.settings.general", "General"));
                    ui.separator();
                    ui.label(txt("gui.settings.ui_scale", "UI scale"));
                    let scale_slider = egui::Slider::new(&mut self.ui_scale, 0.8..=1.6).suffix(" x");
                    if ui.add(scale_slider).changed() {
                        ctx.set_pixels_per_point(self.ui_scale);
                    }
                    ui.separator();
                    ui.checkbox(
                        &mut self.always_on_top,
                        txt("gui.settings.always_on_top", "Always on top"),
                    );
                    ui.separator();
                    ui.label(txt("gui.settings.alpha", "Window transparency"));
                    ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));

                    ui.separator();
                    ui.label(txt("gui.settings.font_path", "Custom font path (.ttf/.ttc)"));
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut self.custom_font_path);
                        if ui.button(txt("gui.settings.font_load", "Apply font")).clicked() {
                            self.font_load_error =
                                load_custom_font(ctx, &self.custom_font_path).err();
                        }
                    });
                    if let Some(err) = &self.font_load_error {
                        ui.colored_label(egui::Color32::from_rgb(200, 60, 60), err);
                    }

                    ui.separator();
                    ui.heading(txt("gui.settings.defaults_heading", "Form defaults"));
                    egui::Grid::new("defaults_grid")
                        .num_columns(2)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(txt("gui.form.tax", "Sales tax rate [%]"));
                            ui.add(
                                egui::DragValue::new(
                                    &mut self.config.defaults.sales_tax_rate_percent,
                                )
                                .speed(0.25),
                            );
                            ui.end_row();
                            ui.label(txt("gui.form.horizon", "Comparison horizon [years]"));
                            ui.add(
                                egui::DragValue::new(&mut self.config.defaults.horizon_years)
                                    .clamp_range(1..=7),
                            );
                            ui.end_row();
                            ui.label(txt("gui.form.allowed", "Mileage allowance per year [km]"));
                            ui.add(
                                egui::DragValue::new(&mut self.config.defaults.allowed_km_per_year)
                                    .speed(1000.0),
                            );
                            ui.end_row();
                            ui.label(txt("gui.form.expected", "Expected distance per year [km]"));
                            ui.add(
                                egui::DragValue::new(
                                    &mut self.config.defaults.expected_km_per_year,
                                )
                                .speed(1000.0),
                            );
                            ui.end_row();
                            ui.label(txt("gui.form.fee", "Excess mileage fee [KRW/km]"));
                            ui.add(
                                egui::DragValue::new(&mut self.config.defaults.excess_fee_per_km)
                                    .speed(10.0),
                            );
                            ui.end_row();
                        });

                    ui.separator();
                    ui.label(txt("gui.settings.lang_label", "Language"));
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(&self.lang_input)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut self.lang_input,
                                "auto".into(),
                                txt("gui.settings.lang_auto", "System"),
                            );
                            ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                            ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                        });
                    if ui.button(txt("gui.settings.save", "Save settings")).clicked() {
                        self.config.language = self.lang_input.clone();
                        self.config.window_alpha = self.window_alpha;
                        // 즉시 번역기 반영
                        let resolved = i18n::resolve_language(
                            &self.config.language,
                            self.config.language_pack_dir.as_deref(),
                        );
                        self.tr = i18n::Translator::new_with_pack(
                            &resolved,
                            self.config.language_pack_dir.as_deref(),
                        );
                        if let Err(e) = self.config.save() {
                            self.lang_save_status = Some(format!("Save error: {e}"));
                        } else {
                            self.lang_save_status = Some(txt("gui.settings.saved", "Saved."));
                        }
                    }
                    if let Some(msg) = &self.lang_save_status {
                        ui.label(msg);
                    }
                });
        }

        // 도움말 모달
        if self.show_help_modal {
            egui::Window::new(txt("gui.about.title", "Help / About"))
                .collapsible(false)
                .resizable(true)
                .open(&mut self.show_help_modal)
                .show(ctx, |ui| {
                    ui.heading(txt(
                        "gui.about.app",
                        "Offline calculator comparing the total net cost of leasing vs buying a car",
                    ));
                    ui.label(txt("gui.about.version", "Version: 1.0.0"));
                    ui.label(txt("gui.about.author", "Author: ruassu"));
                    ui.separator();
                    ui.label(txt("gui.about.notes_title", "How costs are counted"));
                    ui.label(txt(
                        "gui.about.notes_cost",
                        "- Net cost = cash out (down payment / payments / fees) minus what you own (vehicle equity)",
                    ));
                    ui.label(txt(
                        "gui.about.notes_quirk",
                        "- The buy side adds the unpaid loan balance into the cost total",
                    ));
                    ui.label(txt(
                        "gui.about.notes_advice",
                        "- Educational tool, not personalized financial advice",
                    ));
                });
        }

        if self.show_formula_modal {
            egui::Window::new(txt("gui.formula.title", "Formula reference"))
                .collapsible(true)
                .resizable(true)
                .open(&mut self.show_formula_modal)
                .show(ctx, |ui| {
                    ui.style_mut().wrap = Some(true);
                    ui.heading(txt(
                        "gui.formula.loan",
                        "Loan: payment = P*r(1+r)^n / ((1+r)^n - 1), r = APR/1200. Zero interest: P/n.",
                    ));
                    ui.label(txt(
                        "gui.formula.balance",
                        "Balance: B_k = P(1+r)^k - PMT((1+r)^k - 1)/r, floored at 0.",
                    ));
                    ui.separator();
                    ui.heading(txt(
                        "gui.formula.lease",
                        "Lease: payment = (cap - residual)/term + (cap + residual)*money factor, then tax.",
                    ));
                    ui.label(txt(
                        "gui.formula.mf",
                        "Money factor ~= APR/2400 (industry rule of thumb).",
                    ));
                    ui.separator();
                    ui.label(txt(
                        "gui.formula.depreciation",
                        "Vehicle value: linear interpolation from purchase price to the horizon-end estimate.",
                    ));
                    ui.label(txt(
                        "gui.formula.mileage",
                        "Mileage: (expected - allowed) * years * fee, charged once at lease end.",
                    ));
                    ui.label(txt(
                        "gui.formula.netcost",
                        "Monthly net cost: buy = down + payments + balance - value, lease = drive-off + payments (flat after term).",
                    ));
                });
        }

        // 좌측 네비 + 본문
        egui::SidePanel::left("nav")
            .resizable(true)
            .min_width(140.0)
            .default_width(200.0)
            .max_width(400.0)
            .show(ctx, |ui| {
                self.ui_nav(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.tab {
                    Tab::Quick => self.ui_quick(ui),
                    Tab::Detailed => self.ui_detailed(ui),
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_scenario_bundles_fees_into_price() {
        let app = GuiApp::new(config::Config::default());
        let sc = app.quick_scenario();
        assert_eq!(sc.buy.upfront_fees, 0.0);
        assert_eq!(sc.horizon.months, app.horizon_years * 12);
        assert!(scenario::validate(&sc).is_empty());
    }

    #[test]
    fn detailed_scenario_uses_apr_conversion() {
        let mut app = GuiApp::new(config::Config::default());
        app.use_apr = true;
        app.lease_apr_percent = 2.4;
        let sc = app.detailed_scenario();
        let expected = app.msrp * app.residual_percent / 100.0;
        match sc.lease.pricing {
            vehicle_finance_toolbox::finance::lease::LeasePricing::MoneyFactor {
                money_factor,
                residual_value,
                ..
            } => {
                assert!((money_factor - 0.001).abs() < 1e-12);
                assert!((residual_value - expected).abs() < 1e-9);
            }
            _ => panic!("detailed tab must use the money-factor path"),
        }
    }

    #[test]
    fn horizon_change_tracks_default_residual_table() {
        let mut app = GuiApp::new(config::Config::default());
        assert!(app.expected_value_auto);
        app.horizon_years = 5;
        app.expected_value_percent = scenario::default_residual_percent(app.horizon_years);
        assert_eq!(app.expected_value_percent, 45.0);
    }

    #[test]
    fn compute_fills_result_and_verdict() {
        let mut app = GuiApp::new(config::Config::default());
        app.compute();
        assert!(app.issues.is_empty());
        let result = app.result.expect("valid defaults must produce a projection");
        assert_eq!(result.monthly.len(), (app.horizon_years * 12) as usize);
        match result.verdict {
            Verdict::LeaseCheaper(d) | Verdict::BuyCheaper(d) => assert!(d >= 0.0),
            Verdict::Even => {}
        }
    }

    #[test]
    fn compute_reports_validation_issues_for_bad_input() {
        let mut app = GuiApp::new(config::Config::default());
        app.down_payment = -1.0;
        app.compute();
        assert!(!app.issues.is_empty());
        assert!(app.result.is_none());
        assert!(app.issues.iter().any(|i| i.field() == "down_payment"));
    }
}
