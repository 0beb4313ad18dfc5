//! Timesheet command for rendering time reports.
//!
//! This module implements `mt timesheet` with period options
//! (--today, --week, --month, --from/--to, ...) and two layouts: a
//! day-by-day table for short periods and a monthly calendar for long ones.
//! Both are followed by a summary with totals, off days and percentage
//! breakdowns. `--json` prints the same data as JSON.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use mt_api::{Client, EntryQuery};
use mt_core::calendar::{DayTier, month_grid};
use mt_core::{
    AtFilter, Period, ReportView, Share, TimeEntry, Timesheet, format_duration, parse_date,
    select_view,
};
use serde::Serialize;

use super::util::{self, truncate};
use crate::TimesheetArgs;

const PROJECT_WIDTH: usize = 20;
const SERVICE_WIDTH: usize = 16;
const NOTE_WIDTH: usize = 40;
const SHARE_NAME_WIDTH: usize = 24;
const CELL_WIDTH: usize = 9;

/// A timesheet ready to render.
#[derive(Debug)]
pub struct Report {
    pub period: Period,
    pub view: ReportView,
    pub sheet: Timesheet,
    /// Reference date for off days and future calendar cells.
    pub today: NaiveDate,
}

impl Report {
    pub fn new(period: Period, sheet: Timesheet, today: NaiveDate) -> Self {
        Self {
            view: select_view(&period),
            period,
            sheet,
            today,
        }
    }

    /// The calendar needs at least one dated entry to pick a month.
    fn effective_view(&self) -> ReportView {
        match self.view {
            ReportView::MonthlyCalendar if self.sheet.dated_range().is_none() => {
                ReportView::DailyTable
            }
            view => view,
        }
    }
}

// ========== Period ==========

/// Determines the query period from the command-line flags.
///
/// Defaults to the current week when nothing is given.
pub fn period_from_args(args: &TimesheetArgs) -> Result<Period> {
    if let Some(at) = args.period.at_filter() {
        return Ok(Period::At { at });
    }
    if args.from.is_none() && args.to.is_none() {
        return Ok(Period::At {
            at: AtFilter::ThisWeek,
        });
    }

    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;
    Ok(Period::range(from, to)?)
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: u32, max: u32) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = f64::from(value) / f64::from(max);
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Daily Table ==========

/// One row per entry, grouped by day, with a total row after each day.
pub fn format_daily_table(sheet: &Timesheet) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{:<10}  {:>8}  {:<PROJECT_WIDTH$}  {:<SERVICE_WIDTH$}  Note",
        "Date", "Duration", "Project", "Service"
    )
    .unwrap();
    writeln!(
        output,
        "──────────  ────────  ────────────────────  ────────────────  ────────────────────"
    )
    .unwrap();

    for (date, entries) in &sheet.entries_by_date {
        let label = entries.first().map(TimeEntry::date_label).unwrap_or_default();
        for (i, entry) in entries.iter().enumerate() {
            let date_cell = if i == 0 { label.as_str() } else { "" };
            writeln!(
                output,
                "{:<10}  {:>8}  {:<PROJECT_WIDTH$}  {:<SERVICE_WIDTH$}  {}",
                date_cell,
                format_duration(entry.minutes),
                truncate(entry.project_label(), PROJECT_WIDTH),
                truncate(entry.service_label(), SERVICE_WIDTH),
                truncate(&entry.note, NOTE_WIDTH),
            )
            .unwrap();
        }
        let total = sheet.daily_totals.get(date).copied().unwrap_or_default();
        writeln!(output, "{:<10}  {:>8}  daily total", "", format_duration(total)).unwrap();
    }

    output
}

// ========== Monthly Calendar ==========

const fn tier_icon(tier: DayTier) -> char {
    match tier {
        DayTier::Done => '●',
        DayTier::Partial => '◐',
        DayTier::Light => '○',
        DayTier::Off => '✗',
        DayTier::Neutral => '·',
    }
}

fn calendar_cell(day: NaiveDate, minutes: u32, today: NaiveDate) -> String {
    use chrono::Datelike;

    let icon = tier_icon(DayTier::classify(day, minutes, today));
    let hours = if minutes > 0 {
        format!("{:.1}", f64::from(minutes) / 60.0)
    } else {
        String::new()
    };
    format!("{:>2} {icon} {hours:<4}", day.day())
}

/// Mon–Sun grid for the month of the earliest entry.
pub fn format_calendar(sheet: &Timesheet, today: NaiveDate) -> String {
    let mut output = String::new();
    let Some((first, _)) = sheet.dated_range() else {
        return output;
    };

    writeln!(output, "{}", first.format("%B %Y")).unwrap();
    let header: Vec<String> = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .map(|day| format!("{day:^CELL_WIDTH$}"))
        .collect();
    writeln!(output, "{}", header.join(" ").trim_end()).unwrap();

    for week in month_grid(first) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| match day {
                Some(day) => {
                    let minutes = sheet.daily_totals.get(&Some(*day)).copied().unwrap_or(0);
                    calendar_cell(*day, minutes, today)
                }
                None => " ".repeat(CELL_WIDTH),
            })
            .collect();
        writeln!(output, "{}", cells.join(" ").trim_end()).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "{} ≥8h  {} ≥6h  {} <6h  {} off day  {} weekend/future",
        tier_icon(DayTier::Done),
        tier_icon(DayTier::Partial),
        tier_icon(DayTier::Light),
        tier_icon(DayTier::Off),
        tier_icon(DayTier::Neutral),
    )
    .unwrap();

    output
}

// ========== Summary ==========

fn format_shares(output: &mut String, title: &str, shares: &[Share], total: u32) {
    writeln!(output).unwrap();
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
    for share in shares {
        writeln!(
            output,
            "{:<SHARE_NAME_WIDTH$}  {:>8}  {:>5.1}%  {}",
            truncate(&share.name, SHARE_NAME_WIDTH),
            format_duration(share.minutes),
            share.percent,
            progress_bar(share.minutes, total)
        )
        .unwrap();
    }
}

/// Totals, averages, off days and per-project/per-service shares.
pub fn format_summary(sheet: &Timesheet, today: NaiveDate) -> String {
    let mut output = String::new();

    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total time:   {}", format_duration(sheet.total_minutes)).unwrap();
    writeln!(
        output,
        "Average/day:  {}",
        format_duration(sheet.average_minutes_per_day())
    )
    .unwrap();
    writeln!(output, "Days worked:  {}", sheet.days_worked()).unwrap();

    let off_days = sheet.off_days(today);
    if !off_days.is_empty() {
        let listed: Vec<String> = off_days
            .iter()
            .map(|d| d.format("%a %Y-%m-%d").to_string())
            .collect();
        writeln!(output, "Off days:     {} ({})", off_days.len(), listed.join(", ")).unwrap();
    }

    if let Some(shares) = sheet.project_breakdown() {
        format_shares(&mut output, "BY PROJECT", &shares, sheet.total_minutes);
    }
    if let Some(shares) = sheet.service_breakdown() {
        format_shares(&mut output, "BY SERVICE", &shares, sheet.total_minutes);
    }

    output
}

// ========== Report ==========

/// Formats the human-readable report output.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();

    writeln!(output, "TIMESHEET: {}", report.period).unwrap();
    writeln!(output).unwrap();

    match report.effective_view() {
        ReportView::DailyTable => output.push_str(&format_daily_table(&report.sheet)),
        ReportView::MonthlyCalendar => {
            output.push_str(&format_calendar(&report.sheet, report.today));
        }
    }

    writeln!(output).unwrap();
    output.push_str(&format_summary(&report.sheet, report.today));
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub period: Period,
    pub view: ReportView,
    pub total_minutes: u32,
    pub average_minutes_per_day: u32,
    pub days_worked: usize,
    pub off_days: Vec<NaiveDate>,
    pub days: Vec<JsonDay<'a>>,
    pub projects: Option<Vec<Share>>,
    pub services: Option<Vec<Share>>,
}

#[derive(Debug, Serialize)]
pub struct JsonDay<'a> {
    pub date: Option<NaiveDate>,
    pub minutes: u32,
    pub entries: &'a [TimeEntry],
}

/// Formats report data as JSON.
pub fn format_report_json(report: &Report) -> Result<String> {
    let sheet = &report.sheet;
    let days = sheet
        .entries_by_date
        .iter()
        .map(|(date, entries)| JsonDay {
            date: *date,
            minutes: sheet.daily_totals.get(date).copied().unwrap_or_default(),
            entries,
        })
        .collect();

    let json = JsonReport {
        period: report.period,
        view: report.effective_view(),
        total_minutes: sheet.total_minutes,
        average_minutes_per_day: sheet.average_minutes_per_day(),
        days_worked: sheet.days_worked(),
        off_days: sheet.off_days(report.today),
        days,
        projects: sheet.project_breakdown(),
        services: sheet.service_breakdown(),
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs the timesheet command.
///
/// Issues up to three calls in order: project lookup, service lookup,
/// entry listing.
pub fn run<W: Write>(
    writer: &mut W,
    client: &Client,
    args: &TimesheetArgs,
    today: NaiveDate,
) -> Result<()> {
    let period = period_from_args(args)?;

    let project_id = args
        .project
        .as_deref()
        .map(|project| util::project_id(client, project))
        .transpose()?;
    let service_id = args
        .service
        .as_deref()
        .map(|service| util::service_id(client, service))
        .transpose()?;

    let query = EntryQuery {
        period: Some(period),
        project_id,
        service_id,
        limit: args.limit,
    };
    let entries = client
        .time_entries(&query)
        .context("failed to fetch time entries")?;

    if entries.is_empty() && !args.json {
        writeln!(writer, "No time entries found ({period}).")?;
        return Ok(());
    }

    let report = Report::new(period, Timesheet::from_entries(entries), today);
    tracing::debug!(view = ?report.view, total = report.sheet.total_minutes, "rendering timesheet");

    if args.json {
        writeln!(writer, "{}", format_report_json(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }

    Ok(())
}
