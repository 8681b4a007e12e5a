//! Billing-cycle calculations
//!
//! Works on local wall-clock time (`NaiveDateTime`); callers convert stored
//! UTC timestamps with [`to_local`] before comparing.
//!
//! Day numbers are never clamped to the length of a month. Day `d` of a
//! month means "the 1st plus `d - 1` days", so day 31 of a 30-day month is
//! the 1st of the following month, and a statement day of 31 starts the
//! next cycle on the 2nd. Stored data was produced under this rule and the
//! calculation keeps it.
//!
//! Imported cards are not validated, so every function here accepts any
//! `u32` day, including 0 and values far past 31.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::models::{Card, Money, Transaction};

/// Build the date for `day` of the month `month_offset` months away from
/// `(year, month)`, letting days past the month's end roll forward.
///
/// Dates outside chrono's range saturate to `NaiveDate::MIN`/`MAX`.
fn overflowing_date(year: i32, month: u32, month_offset: i32, day: i64) -> NaiveDate {
    let months = year as i64 * 12 + (month as i64 - 1) + month_offset as i64;
    let edge = |backwards: bool| if backwards { NaiveDate::MIN } else { NaiveDate::MAX };

    let first = i32::try_from(months.div_euclid(12))
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, months.rem_euclid(12) as u32 + 1, 1));
    let Some(first) = first else {
        return edge(months < 0);
    };

    Duration::try_days(day.saturating_sub(1))
        .and_then(|delta| first.checked_add_signed(delta))
        .unwrap_or_else(|| edge(day < 1))
}

/// Month offset (0 or -1) of the month the current cycle started in
fn cycle_month_offset(statement_day: u32, now: NaiveDateTime) -> i32 {
    if now.day() <= statement_day {
        -1
    } else {
        0
    }
}

/// Start (inclusive, midnight) of the billing cycle containing `now`
pub fn current_cycle_start(statement_day: u32, now: NaiveDateTime) -> NaiveDateTime {
    let offset = cycle_month_offset(statement_day, now);
    overflowing_date(now.year(), now.month(), offset, i64::from(statement_day) + 1)
        .and_time(NaiveTime::MIN)
}

/// Start of the billing cycle before the current one
pub fn previous_cycle_start(statement_day: u32, now: NaiveDateTime) -> NaiveDateTime {
    let offset = cycle_month_offset(statement_day, now) - 1;
    overflowing_date(now.year(), now.month(), offset, i64::from(statement_day) + 1)
        .and_time(NaiveTime::MIN)
}

/// Next payment due date on or after today
pub fn next_due_date(due_day: u32, now: NaiveDateTime) -> NaiveDate {
    let offset = if now.day() > due_day { 1 } else { 0 };
    overflowing_date(now.year(), now.month(), offset, i64::from(due_day))
}

/// Whole days until the next due date, rounded up
///
/// Zero on the due date itself.
pub fn days_until_due(due_day: u32, now: NaiveDateTime) -> i64 {
    let due = next_due_date(due_day, now).and_time(NaiveTime::MIN);
    let millis = (due - now).num_milliseconds();
    let day = Duration::days(1).num_milliseconds();
    millis.div_euclid(day) + i64::from(millis.rem_euclid(day) != 0)
}

/// Convert a stored timestamp to local wall-clock time
pub fn to_local(ts: DateTime<Utc>) -> NaiveDateTime {
    ts.with_timezone(&Local).naive_local()
}

/// The current and previous cycle boundaries for one card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWindow {
    pub previous_start: NaiveDateTime,
    pub current_start: NaiveDateTime,
}

impl CycleWindow {
    pub fn for_statement_day(statement_day: u32, now: NaiveDateTime) -> Self {
        Self {
            previous_start: previous_cycle_start(statement_day, now),
            current_start: current_cycle_start(statement_day, now),
        }
    }

    /// Whether a local timestamp falls in the current cycle
    pub fn in_current(&self, ts: NaiveDateTime) -> bool {
        ts >= self.current_start
    }

    /// Whether a local timestamp falls in the previous cycle
    pub fn in_previous(&self, ts: NaiveDateTime) -> bool {
        ts >= self.previous_start && ts < self.current_start
    }
}

/// Spending totals for a card's current and previous cycle
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub window: CycleWindow,
    /// Transactions in the current cycle, newest first
    pub current_transactions: Vec<Transaction>,
    pub transaction_total: Money,
    /// Subscriptions are charged to every cycle
    pub subscription_total: Money,
    pub current_total: Money,
    pub previous_total: Money,
}

impl CycleSummary {
    /// Summarize a card's spending, reading timestamps as local time
    pub fn for_card(card: &Card, now: NaiveDateTime) -> Self {
        Self::for_card_with(card, now, to_local)
    }

    /// Summarize with an explicit timestamp conversion
    pub fn for_card_with<F>(card: &Card, now: NaiveDateTime, local: F) -> Self
    where
        F: Fn(DateTime<Utc>) -> NaiveDateTime,
    {
        let window = CycleWindow::for_statement_day(card.statement_date, now);

        let mut current_transactions: Vec<Transaction> = card
            .transactions
            .iter()
            .filter(|t| window.in_current(local(t.date)))
            .cloned()
            .collect();
        current_transactions.sort_by(|a, b| b.date.cmp(&a.date));

        let previous_transactions: Money = card
            .transactions
            .iter()
            .filter(|t| window.in_previous(local(t.date)))
            .map(|t| t.amount)
            .sum();

        let transaction_total: Money = current_transactions.iter().map(|t| t.amount).sum();
        let subscription_total = card.subscription_total();

        Self {
            window,
            current_transactions,
            transaction_total,
            subscription_total,
            current_total: transaction_total + subscription_total,
            previous_total: previous_transactions + subscription_total,
        }
    }
}
