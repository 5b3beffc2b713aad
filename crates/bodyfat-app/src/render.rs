//! Text screens for the terminal front end

use std::fmt::Write;

use bodyfat_core::measurement::{DataForm, UnitSystem};
use bodyfat_core::models::{AdvicePayload, MacroShare, Macros, TimeEstimate};
use bodyfat_core::onboarding::{Onboarding, SLIDES};
use bodyfat_core::subscription::{EntitlementStatus, Offer};
use bodyfat_core::unit_conversion::format_number;
use bodyfat_core::wizard::{Outcome, Wizard, WizardStep};

const TOTAL_STEPS: u8 = 4;
const BAR_WIDTH: usize = 20;

/// "Step N of 4" with a segment bar
pub fn step_header(step: u8) -> String {
    let filled = usize::from(step.min(TOTAL_STEPS));
    format!(
        "Step {} of {}  [{}{}]",
        step,
        TOTAL_STEPS,
        "#".repeat(filled),
        "-".repeat(usize::from(TOTAL_STEPS) - filled)
    )
}

/// Single progress line, e.g. `Calculating [#####---------------]  25%`
pub fn progress_line(label: &str, percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{} [{}{}] {:>3}%",
        label,
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent.round() as u32
    )
}

/// The current wizard screen, with the paywall drawn on top when visible
pub fn screen(wizard: &Wizard, offers: &[Offer]) -> String {
    let mut out = step_header(wizard.step_number());
    out.push_str("\n\n");

    match wizard.step() {
        WizardStep::Photos => out.push_str(&photos(wizard)),
        WizardStep::Data => out.push_str(&data_form(wizard.form())),
        WizardStep::Calculating { .. } => out.push_str("Calculating your body fat..."),
        WizardStep::Result { outcome, advice } => {
            out.push_str(&result(outcome));
            out.push_str(if advice.is_some() {
                "\n\n'advice' to view your plan again, 'start-over' to begin again"
            } else {
                "\n\n'advice' for a personalised plan, 'start-over' to begin again"
            });
        }
        WizardStep::FetchingAdvice { .. } => out.push_str("Loading your personalised advice..."),
        WizardStep::Advice { outcome, advice } => {
            out.push_str(&result(outcome));
            out.push_str("\n\n");
            out.push_str(&advice_text(advice));
            out.push_str("\n'back' to the result, 'start-over' to begin again");
        }
    }

    if wizard.paywall_visible() {
        out.push_str("\n\n");
        out.push_str(&paywall(offers, !wizard.trial_used()));
    }
    out
}

fn photos(wizard: &Wizard) -> String {
    let mut out = String::from("Upload your photos\n");
    if wizard.photos().is_empty() {
        out.push_str("  (no photos yet - 'photo add <path>')\n");
    }
    for (i, photo) in wizard.photos().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, photo);
    }
    out.push_str("\n'next' to enter your details");
    out
}

fn field(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Data entry screen
pub fn data_form(form: &DataForm) -> String {
    let system = form.measurement.system();
    let fields = form.measurement.fields();
    let mut out = String::from("Your details\n");

    let _ = writeln!(
        out,
        "  Gender:  {}",
        form.gender.map(|g| g.as_str()).unwrap_or("-")
    );
    let _ = writeln!(out, "  Age:     {}", field(&form.age));
    let _ = writeln!(out, "  Units:   {}", system);
    match system {
        UnitSystem::Metric => {
            let _ = writeln!(out, "  Height:  {} cm", field(&fields.height_cm));
        }
        UnitSystem::Imperial => {
            let _ = writeln!(
                out,
                "  Height:  {} ft {} in",
                field(&fields.height_feet),
                field(&fields.height_inches)
            );
        }
    }
    let _ = writeln!(
        out,
        "  Weight:  {} {}",
        field(&fields.weight),
        system.weight_unit()
    );
    let _ = writeln!(
        out,
        "  Waist:   {} {} (optional)",
        field(&fields.waist),
        system.waist_unit()
    );
    out.push_str("\n'calculate' when ready, 'back' to photos");
    out
}

/// Body fat with one decimal and the evaluation label
pub fn result(outcome: &Outcome) -> String {
    let mut out = format!(
        "Body fat: {:.1}%\nEvaluation: {}",
        outcome.result.body_fat_percent, outcome.result.evaluation
    );
    if !outcome.result.comment.trim().is_empty() {
        let _ = write!(out, "\n{}", outcome.result.comment.trim());
    }
    out
}

fn share_line(name: &str, share: &MacroShare) -> String {
    match share.grams {
        Some(grams) => format!("    {}: {}% ({}g)", name, format_number(share.percent), format_number(grams)),
        None => format!("    {}: {}%", name, format_number(share.percent)),
    }
}

fn macros_text(macros: &Macros) -> String {
    let mut out = String::new();
    if let Some(calories) = &macros.calories {
        let range = match (calories.min, calories.max) {
            (Some(min), Some(max)) => format!("{}-{} kcal", format_number(min), format_number(max)),
            (Some(v), None) | (None, Some(v)) => format!("{} kcal", format_number(v)),
            (None, None) => String::new(),
        };
        let line = match (&calories.goal, range.is_empty()) {
            (Some(goal), false) => format!("    Calories: {} ({})", range, goal),
            (Some(goal), true) => format!("    Calories: {}", goal),
            (None, false) => format!("    Calories: {}", range),
            (None, true) => String::new(),
        };
        if !line.is_empty() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    for (name, share) in [
        ("Protein", &macros.protein),
        ("Carbs", &macros.carbs),
        ("Fats", &macros.fats),
    ] {
        if let Some(share) = share {
            out.push_str(&share_line(name, share));
            out.push('\n');
        }
    }
    out
}

/// Advice sections, macros and time estimate
pub fn advice_text(advice: &AdvicePayload) -> String {
    let mut out = format!("{}\n", advice.title);
    for section in &advice.sections {
        let _ = writeln!(out, "\n  {}", section.title);
        for paragraph in section.content.lines().filter(|l| !l.trim().is_empty()) {
            let _ = writeln!(out, "  {}", paragraph.trim());
        }
        if let Some(macros) = &section.macros {
            out.push_str(&macros_text(macros));
        }
    }

    match &advice.time_estimate {
        Some(TimeEstimate::Milestones(rows)) if !rows.is_empty() => {
            out.push_str("\n  Time estimate\n");
            for row in rows {
                let _ = writeln!(
                    out,
                    "    {}% in {} months",
                    format_number(row.percent),
                    format_number(row.months)
                );
            }
        }
        Some(TimeEstimate::Text(text)) if !text.trim().is_empty() => {
            let _ = writeln!(out, "\n  Time estimate\n    {}", text.trim());
        }
        _ => {}
    }
    out
}

/// Paywall overlay; the trial line only appears while the trial is available
pub fn paywall(offers: &[Offer], trial_available: bool) -> String {
    let mut out = String::from("== Unlock Premium ==\n");
    if offers.is_empty() {
        out.push_str("  No offers available right now\n");
    }
    for offer in offers {
        let _ = writeln!(
            out,
            "  {:<16} {:<10} {}\n      {}",
            offer.display_title(),
            offer.price(),
            offer.identifier,
            offer.display_description()
        );
    }
    out.push('\n');
    if trial_available {
        out.push_str("'trial' to try one calculation free\n");
    }
    out.push_str("'buy <id>' to subscribe, 'restore' to restore purchases, 'close' to dismiss");
    out
}

/// Entitlement summary for `status`
pub fn status(status: &EntitlementStatus, user_id: Option<&str>) -> String {
    let mut out = if status.is_active {
        String::from("Premium: active")
    } else {
        String::from("Premium: inactive")
    };
    if let Some(product) = &status.product_id {
        let _ = write!(out, "\nProduct: {}", product);
    }
    if let Some(expires) = status.expires_at {
        let _ = write!(out, "\nExpires: {}", expires.format("%Y-%m-%d"));
    }
    if let Some(user) = user_id {
        let _ = write!(out, "\nUser: {}", user);
    }
    out
}

/// Onboarding slide with position dots
pub fn onboarding(carousel: &Onboarding) -> String {
    let slide = carousel.slide();
    let dots: String = (0..SLIDES.len())
        .map(|i| if i == carousel.current() { 'o' } else { '.' })
        .collect();
    let button = if carousel.is_last() { "Start" } else { "Next" };
    format!(
        "{}\n\n{}\n\n{}   [enter] {}  |  1-{} jump  |  'skip'",
        slide.title,
        slide.description,
        dots,
        button,
        SLIDES.len()
    )
}
