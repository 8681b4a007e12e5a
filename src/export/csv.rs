//! CSV export functionality
//!
//! Exports transactions and per-card cycle summaries in a
//! spreadsheet-friendly format.

use std::io::Write;

use chrono::NaiveDateTime;

use crate::error::{WalletError, WalletResult};
use crate::models::Card;
use crate::services::cycle::{self, to_local, CycleSummary};

fn export_err(e: csv::Error) -> WalletError {
    WalletError::Export(e.to_string())
}

/// Export every transaction of every card, one row each
///
/// Rows follow collection order, then the order charges were recorded.
/// Dates are local time.
pub fn export_transactions_csv<W: Write>(cards: &[Card], writer: W) -> WalletResult<()> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(["Card", "Transaction ID", "Date", "Description", "Amount"])
        .map_err(export_err)?;

    for card in cards {
        for txn in &card.transactions {
            let date = to_local(txn.date).format("%Y-%m-%d %H:%M:%S").to_string();
            let amount = txn.amount.units().to_string();
            out.write_record([
                card.name.as_str(),
                txn.id.as_str(),
                date.as_str(),
                txn.label(),
                amount.as_str(),
            ])
            .map_err(export_err)?;
        }
    }

    out.flush()
        .map_err(|e| WalletError::Export(e.to_string()))
}

/// Export one summary row per card
pub fn export_cards_csv<W: Write>(cards: &[Card], now: NaiveDateTime, writer: W) -> WalletResult<()> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record([
        "ID",
        "Name",
        "Bank",
        "Network",
        "Statement Day",
        "Due Day",
        "Next Due",
        "Credit Limit",
        "Current Cycle",
        "Previous Cycle",
        "Subscriptions",
    ])
    .map_err(export_err)?;

    for card in cards {
        let summary = CycleSummary::for_card(card, now);
        out.write_record([
            card.id.to_string(),
            card.name.clone(),
            card.bank_name.clone(),
            card.network.map(|n| n.to_string()).unwrap_or_default(),
            card.statement_date.to_string(),
            card.due_date.to_string(),
            cycle::next_due_date(card.due_date, now)
                .format("%Y-%m-%d")
                .to_string(),
            card.credit_limit
                .map(|limit| limit.units().to_string())
                .unwrap_or_default(),
            summary.current_total.units().to_string(),
            summary.previous_total.units().to_string(),
            summary.subscription_total.units().to_string(),
        ])
        .map_err(export_err)?;
    }

    out.flush()
        .map_err(|e| WalletError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardNetwork, Money, Subscription, Transaction};
    use chrono::NaiveDate;

    #[test]
    fn test_export_transactions_csv() {
        let mut card = Card::new("Travel, Plus", "Bank", 5, 20);
        card.transactions
            .push(Transaction::new(Money::new(1200), Some("Hotel \"Grand\"".into())));
        card.transactions.push(Transaction::new(Money::new(80), None));
        let empty = Card::new("Empty", "Bank", 5, 20);

        let mut output = Vec::new();
        export_transactions_csv(&[card.clone(), empty], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Card,Transaction ID,Date,Description,Amount");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"Travel, Plus\","));
        assert!(lines[1].contains("\"Hotel \"\"Grand\"\"\""));
        assert!(lines[1].ends_with(",1200"));
        assert!(lines[2].contains(card.transactions[1].id.as_str()));
    }

    #[test]
    fn test_export_transactions_csv_parses_back() {
        let mut card = Card::new("Daily", "Bank", 5, 20);
        card.transactions.push(Transaction::new(Money::new(42), Some("Coffee".into())));

        let mut output = Vec::new();
        export_transactions_csv(&[card], &mut output).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "Coffee");
        assert_eq!(&rows[0][4], "42");
    }

    #[test]
    fn test_export_cards_csv() {
        let mut card = Card::new("Streaming", "Metro Bank", 5, 20);
        card.network = Some(CardNetwork::Jcb);
        card.credit_limit = Some(Money::new(50_000));
        card.subscriptions.push(Subscription::new("Netflix", Money::new(390)));

        let now = NaiveDate::from_ymd_opt(2024, 10, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let mut output = Vec::new();
        export_cards_csv(&[card.clone()], now, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ID,Name,Bank,Network"));
        assert_eq!(
            lines[1],
            format!(
                "{},Streaming,Metro Bank,JCB,5,20,2024-10-20,50000,390,390,390",
                card.id
            )
        );
    }
}
