// src/salary.rs
//! Salary parsing: extracting a numeric range from free-text benefits and
//! descriptions, rendering a range back to text, and reducing a salary
//! string to a comparable yearly number for filtering.

use regex::Regex;
use std::sync::OnceLock;

/// Boundary between an hourly rate and an annual salary. A minimum below
/// this is labeled "Hourly", at or above it "Yearly".
const HOURLY_YEARLY_BOUNDARY: f64 = 900.0;

const HOURS_PER_WEEK: f64 = 40.0;
const WEEKS_PER_YEAR: f64 = 52.0;

/// Substrings that mark a salary statement inside a free-text description.
/// Matched case-sensitively, first occurrence wins.
const DESCRIPTION_MARKERS: [&str; 2] = ["salary range", "pay range"];

/// Number of characters scanned after a description marker.
const DESCRIPTION_WINDOW: usize = 50;

fn grouped_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Comma-grouped decimals like "40,000" as well as plain "55.5".
    RE.get_or_init(|| Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").expect("invalid number pattern"))
}

fn leading_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9K.]+").expect("invalid amount pattern"))
}

/// Extract every numeric token from `text`, commas removed.
fn numeric_tokens(text: &str) -> Vec<f64> {
    grouped_number_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect()
}

/// Extract a (min, max) salary range from a "Benefits" highlight section,
/// falling back to the free-text description. Used only when the source
/// carried no explicit salary field.
///
/// Returns (0, 0) when nothing salary-like is found.
pub fn extract_salary_range(benefits: &[String], description: &str) -> (f64, f64) {
    if !benefits.is_empty() {
        // Any benefits item mentioning "range" is scanned for numbers.
        for item in benefits {
            if item.to_lowercase().contains("range") {
                let nums = numeric_tokens(item);
                if let Some(&min) = nums.first() {
                    // A single number means min == max.
                    return (min, nums.get(1).copied().unwrap_or(min));
                }
            }
        }

        // No "range" item: only the first benefits item is examined, and a
        // bare pair of numbers is trusted only when the first exceeds 30
        // (filters out "4 weeks vacation" style items). Intentional
        // asymmetry with the "range" scan above.
        if let Some(first) = benefits.first() {
            let nums = numeric_tokens(first);
            if nums.len() == 2 && nums[0] > 30.0 {
                return (nums[0], nums[1]);
            }
        }
        return (0.0, 0.0);
    }

    for marker in DESCRIPTION_MARKERS {
        if let Some(pos) = description.find(marker) {
            let window: String = description[pos + marker.len()..]
                .chars()
                .take(DESCRIPTION_WINDOW)
                .collect();
            let nums = numeric_tokens(&window);
            if let Some(&min) = nums.first() {
                return (min, nums.get(1).copied().unwrap_or(min));
            }
        }
    }

    (0.0, 0.0)
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

/// Render a numeric salary range back to display text: a single number when
/// the bounds are equal, otherwise "min - max", with an " Hourly" or
/// " Yearly" label inferred from the minimum.
pub fn format_salary(min: f64, max: f64) -> String {
    let mut text = if min == max {
        format_amount(min)
    } else {
        format!("{} - {}", format_amount(min), format_amount(max))
    };

    if min > 0.0 && min < HOURLY_YEARLY_BOUNDARY {
        text.push_str(" Hourly");
    } else if min > 0.0 {
        text.push_str(" Yearly");
    }

    text
}

/// Reduce a free-text salary string to a yearly number for threshold
/// comparisons. Reads only the first number of a range ("100K - 120K" is
/// 100,000): minimum-of-range semantics for conservative filtering.
pub fn to_yearly(salary: &str) -> f64 {
    let salary = salary.trim();
    if salary.is_empty() {
        return 0.0;
    }

    let Some(token) = leading_amount_re().find(salary) else {
        return 0.0;
    };

    let token = token.as_str();
    let mut amount = match token.strip_suffix('K') {
        Some(base) => base.parse::<f64>().unwrap_or(0.0) * 1000.0,
        None => token.parse::<f64>().unwrap_or(0.0),
    };

    // The pay period hangs off the last word ("60 hourly", "500 weekly").
    if let Some(rate) = salary.split_whitespace().last() {
        if rate.starts_with("hour") {
            amount *= HOURS_PER_WEEK * WEEKS_PER_YEAR;
        } else if rate.starts_with("week") {
            amount *= WEEKS_PER_YEAR;
        }
    }

    amount
}
