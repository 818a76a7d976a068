//! Weekly plan export
//!
//! A per-day summary of the plan, rendered either as plain text for the
//! terminal or as a self-contained printable HTML page.

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::WeeklyPlan;

pub const TITLE: &str = "UGENS MADPAKKE-PLAN";
pub const TAGLINE: &str = "Gør din krop uovervindelig!";
pub const SLOGAN: &str = "Spis som en superhelt! BAM! POW! WOW!";
pub const UNPLANNED: &str = "IKKE PLANLAGT";

const PRINT_TEMPLATE: &str = include_str!("../templates/print.hbs");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLine {
    pub emoji: &'static str,
    pub name: &'static str,
}

/// One weekday in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: &'static str,
    pub planned: bool,
    pub items: Vec<ItemLine>,
    /// Formatted as `n.nn`, without the currency
    pub total: String,
    pub image: Option<String>,
}

/// Whole-week summary, shared by both renderings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub title: &'static str,
    pub tagline: &'static str,
    pub slogan: &'static str,
    pub unplanned: &'static str,
    pub generated: String,
    pub days: Vec<DaySummary>,
    pub week_total: String,
}

/// Summarize a plan; `generated` is the date shown in the header
pub fn summarize(plan: &WeeklyPlan, generated: &str) -> PlanSummary {
    debug!(planned = plan.planned_count(), "summarize: called");
    let days = plan
        .days()
        .map(|(day, lunchbox)| match lunchbox {
            Some(lunchbox) => DaySummary {
                day: day.label(),
                planned: true,
                items: lunchbox
                    .selection
                    .chosen()
                    .map(|item| ItemLine {
                        emoji: item.emoji,
                        name: item.name,
                    })
                    .collect(),
                total: lunchbox.total_price().to_string(),
                image: lunchbox.image.clone(),
            },
            None => DaySummary {
                day: day.label(),
                planned: false,
                items: Vec::new(),
                total: String::new(),
                image: None,
            },
        })
        .collect();

    PlanSummary {
        title: TITLE,
        tagline: TAGLINE,
        slogan: SLOGAN,
        unplanned: UNPLANNED,
        generated: generated.to_string(),
        days,
        week_total: plan.week_total().to_string(),
    }
}

/// Today's date as shown on the printout
pub fn today() -> String {
    chrono::Local::now().format("%d.%m.%Y").to_string()
}

/// Plain-text rendering for the terminal
pub fn render_text(summary: &PlanSummary) -> String {
    let mut out = format!("{}\n{}\n\n", summary.title, summary.tagline);
    for day in &summary.days {
        if day.planned {
            let items: Vec<String> = day.items.iter().map(|i| format!("{} {}", i.emoji, i.name)).collect();
            let thumb = if day.image.is_some() { "  [billede]" } else { "" };
            out.push_str(&format!("{:<8} {}  {} kr{}\n", day.day, items.join(", "), day.total, thumb));
        } else {
            out.push_str(&format!("{:<8} {}\n", day.day, summary.unplanned));
        }
    }
    out.push_str(&format!("\nUgens total: {} kr\n{}\n", summary.week_total, summary.slogan));
    out
}

/// Printable HTML page
pub fn render_html(summary: &PlanSummary) -> Result<String> {
    debug!("render_html: called");
    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(false);
    hbs.register_template_string("print", PRINT_TEMPLATE)
        .context("Failed to parse print template")?;
    hbs.render("print", summary).context("Failed to render print template")
}

/// Render the plan as HTML and write it to `path`
pub fn write_html(plan: &WeeklyPlan, path: &Path) -> Result<()> {
    let html = render_html(&summarize(plan, &today()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, html).context(format!("Failed to write print file: {}", path.display()))?;
    info!(path = %path.display(), "write_html: plan written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SavedLunchbox, Selection, Weekday, catalog};

    fn lunchbox(ids: [&str; 4], image: Option<&str>) -> SavedLunchbox {
        let selection = Selection::from_items(ids.map(|id| catalog::find(id).unwrap()));
        SavedLunchbox::new(selection, image.map(String::from))
    }

    fn sample_plan() -> WeeklyPlan {
        let mut plan = WeeklyPlan::new();
        plan.save(
            Weekday::Mandag,
            lunchbox(["rugbrod", "frikadeller", "gulerod", "aeblebaade"], Some("data:image/png;base64,QUJD")),
        );
        plan.save(Weekday::Onsdag, lunchbox(["grovbolle", "aeg", "agurk", "rosiner"], None));
        plan
    }

    #[test]
    fn test_summarize_marks_unplanned_days() {
        let summary = summarize(&sample_plan(), "18.10.2026");
        assert_eq!(summary.days.len(), 5);
        let planned: Vec<_> = summary.days.iter().map(|d| (d.day, d.planned)).collect();
        assert_eq!(
            planned,
            vec![
                ("Mandag", true),
                ("Tirsdag", false),
                ("Onsdag", true),
                ("Torsdag", false),
                ("Fredag", false)
            ]
        );
        assert_eq!(summary.days[0].items.len(), 4);
        assert_eq!(summary.days[0].items[0].name, "Rugbrødsklapper");
    }

    #[test]
    fn test_render_text() {
        let plan = sample_plan();
        let text = render_text(&summarize(&plan, "18.10.2026"));

        assert!(text.starts_with(TITLE));
        assert_eq!(text.matches(UNPLANNED).count(), 3);
        let monday = text.lines().find(|l| l.starts_with("Mandag")).unwrap();
        assert!(monday.contains("🍞 Rugbrødsklapper"));
        assert!(monday.contains(&format!("{} kr", plan.get(Weekday::Mandag).unwrap().total_price())));
        assert!(monday.contains("[billede]"));
        let wednesday = text.lines().find(|l| l.starts_with("Onsdag")).unwrap();
        assert!(!wednesday.contains("[billede]"));
        assert!(text.contains(&format!("Ugens total: {} kr", plan.week_total())));
    }

    #[test]
    fn test_render_html() {
        let html = render_html(&summarize(&sample_plan(), "18.10.2026")).unwrap();
        assert!(html.contains("<title>UGENS MADPAKKE-PLAN</title>"));
        assert!(html.contains("18.10.2026"));
        assert!(html.contains("Rugbrødsklapper"));
        assert!(html.contains("<img src=\"data:image/png;base64,QUJD"));
        assert!(html.contains("Tirsdag: IKKE PLANLAGT"));
        assert!(html.contains(SLOGAN));
    }

    #[test]
    fn test_render_html_empty_plan() {
        let html = render_html(&summarize(&WeeklyPlan::new(), "01.01.2027")).unwrap();
        assert_eq!(html.matches(UNPLANNED).count(), 5);
        assert!(html.contains("0.00 kr"));
    }

    #[test]
    fn test_write_html_creates_parent_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("print").join("uge.html");
        write_html(&sample_plan(), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(TITLE));
    }
}
