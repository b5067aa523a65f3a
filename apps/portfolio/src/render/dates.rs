//! Date display shared by the site and PDF renderers.

use crate::models::resume::School;

const LONG_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `2020-03` as `March 2020`.
pub fn format_long(date: &str) -> String {
    format_month_year(date, &LONG_MONTHS)
}

/// `2020-03` as `Mar 2020`.
pub fn format_short(date: &str) -> String {
    format_month_year(date, &SHORT_MONTHS)
}

/// `"Present"`, bare years and anything that is not `YYYY-MM` come back unchanged.
fn format_month_year(date: &str, names: &[&str; 12]) -> String {
    let trimmed = date.trim();
    let Some((year, month)) = trimmed.split_once('-') else {
        return trimmed.to_string();
    };
    let valid_year = !year.is_empty() && year.chars().all(|c| c.is_ascii_digit());
    match month.parse::<usize>() {
        Ok(m @ 1..=12) if valid_year => format!("{} {}", names[m - 1], year),
        _ => trimmed.to_string(),
    }
}

/// Year part of `YYYY` or `YYYY-MM`.
pub fn year_of(date: &str) -> &str {
    let trimmed = date.trim();
    trimmed.split('-').next().unwrap_or(trimmed)
}

/// Site display: `2014 - 2018-05` when a start exists, else the raw end date.
pub fn school_span_site(school: &School) -> String {
    match school.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(start) => format!("{} - {}", year_of(start), school.end_date),
        None => school.end_date.clone(),
    }
}

/// PDF display: `2014 - 2018`, or `Graduated 2014` without a start date.
pub fn school_span_pdf(school: &School) -> String {
    let end = year_of(&school.end_date);
    match school.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(start) => format!("{} - {}", year_of(start), end),
        None => format!("Graduated {end}"),
    }
}
