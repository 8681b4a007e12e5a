//! Calendar export
//!
//! Renders a single all-day event on a card's next due date, with one
//! display alarm the day before. Lines end in CR+LF, which iOS Calendar
//! requires.

use chrono::NaiveDate;

const LINE_END: &str = "\r\n";

/// Escape a TEXT value (RFC 5545, 3.3.11)
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Build the calendar document for a payment reminder
pub fn due_reminder_ics(card_name: &str, due: NaiveDate) -> String {
    let date = due.format("%Y%m%d").to_string();
    let name = escape_text(card_name);

    [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//CardManager PWA//TW".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("DTSTART;VALUE=DATE:{}", date),
        format!("DTEND;VALUE=DATE:{}", date),
        format!("SUMMARY:Credit card payment: {}", name),
        format!(
            "DESCRIPTION:Pay the {} bill today. Open the wallet to check this cycle's amount.",
            name
        ),
        "BEGIN:VALARM".to_string(),
        "TRIGGER:-P1D".to_string(),
        "ACTION:DISPLAY".to_string(),
        "DESCRIPTION:Payment reminder".to_string(),
        "END:VALARM".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ]
    .join(LINE_END)
}

/// File name for a card's reminder
///
/// Path separators in the card name are replaced so the result is always a
/// single file name.
pub fn ics_filename(card_name: &str) -> String {
    let safe: String = card_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            _ => c,
        })
        .collect();
    format!("{}_payment_reminder.ics", safe)
}
