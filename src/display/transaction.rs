//! Transaction and subscription display formatting

use crate::models::{Money, Subscription, Transaction};
use crate::services::cycle::to_local;

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, symbol: &str) -> String {
    format!(
        "{:<13} {} {} {:>12}",
        txn.id.short(),
        to_local(txn.date).format("%Y-%m-%d %H:%M"),
        truncate(txn.label(), 28),
        txn.amount.format_with_symbol(symbol)
    )
}

/// Format a list of transactions as a register with a total line
pub fn format_transaction_register(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<13} {:<16} {:<28} {:>12}\n",
        "ID", "Date", "Description", "Amount"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, symbol));
        output.push('\n');
    }

    let total: Money = transactions.iter().map(|t| t.amount).sum();
    output.push_str(&"-".repeat(72));
    output.push('\n');
    output.push_str(&format!(
        "{:>59} {:>12}\n",
        "Total:",
        total.format_with_symbol(symbol)
    ));

    output
}

/// Format a card's subscriptions with their monthly total
pub fn format_subscription_list(subscriptions: &[Subscription], symbol: &str) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions.\n".to_string();
    }

    let mut output = String::new();
    for sub in subscriptions {
        output.push_str(&format!(
            "  {:<13} {} {:>12}/month\n",
            sub.id.short(),
            truncate(&sub.name, 28),
            sub.amount.format_with_symbol(symbol)
        ));
    }

    let total: Money = subscriptions.iter().map(|s| s.amount).sum();
    output.push_str(&format!(
        "  {:>42} {:>12}/month\n",
        "Total:",
        total.format_with_symbol(symbol)
    ));

    output
}

/// Pad or cut a string to exactly `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionId;

    #[test]
    fn test_register_with_total() {
        let mut lunch = Transaction::new(Money::new(350), Some("Lunch".into()));
        lunch.id = TransactionId::from("abcdef1234");
        let taxi = Transaction::new(Money::new(1200), Some("Taxi".into()));

        let output = format_transaction_register(&[lunch, taxi], "$");
        assert!(output.contains("txn-abcdef12"));
        assert!(output.contains("Lunch"));
        assert!(output.contains("$1,550"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(
            format_transaction_register(&[], "$"),
            "No transactions found.\n"
        );
    }

    #[test]
    fn test_subscription_list() {
        let subs = vec![
            Subscription::new("Netflix", Money::new(390)),
            Subscription::new("Spotify", Money::new(149)),
        ];
        let output = format_subscription_list(&subs, "$");
        assert!(output.contains("Netflix"));
        assert!(output.contains("$539/month"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("短い名前です長い名前", 6), "短い名...");
        assert_eq!(truncate("abc", 5), "abc  ");
    }
}
