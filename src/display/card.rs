//! Card display formatting
//!
//! Formats cards for terminal output in table and detail views.

use crate::services::card::CardSummary;

use super::transaction::{format_subscription_list, format_transaction_register};

/// Format a list of cards with their cycle figures as a table
///
/// Cards whose payment is at most `due_soon_days` away are flagged.
pub fn format_card_list(summaries: &[CardSummary], symbol: &str, due_soon_days: i64) -> String {
    if summaries.is_empty() {
        return "No cards found.".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.card.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let bank_width = summaries
        .iter()
        .map(|s| s.card.bank_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<bank_width$}  {:<16}  {:>4}  {:>4}  {:>12}  {}\n",
        "Name",
        "Bank",
        "Network",
        "Stmt",
        "Due",
        "This Cycle",
        "Next Payment",
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:-<bank_width$}  {:-<16}  {:->4}  {:->4}  {:->12}  {:-<20}\n",
        "", "", "", "", "", "", "",
    ));

    for summary in summaries {
        let card = &summary.card;
        let network = card.network.map(|n| n.to_string()).unwrap_or_default();

        let due_marker = if summary.is_due_soon(due_soon_days) {
            "  DUE SOON"
        } else {
            ""
        };

        output.push_str(&format!(
            "{:<name_width$}  {:<bank_width$}  {:<16}  {:>4}  {:>4}  {:>12}  {} ({}){}\n",
            card.name,
            card.bank_name,
            network,
            card.statement_date,
            card.due_date,
            summary.cycle.current_total.format_with_symbol(symbol),
            summary.next_due.format("%Y-%m-%d"),
            format_days(summary.days_until_due),
            due_marker,
        ));
    }

    output
}

/// Format a single card's details, its current cycle and subscriptions
pub fn format_card_details(summary: &CardSummary, symbol: &str) -> String {
    let card = &summary.card;
    let cycle = &summary.cycle;

    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", card.name));
    output.push_str(&format!("  ID:             {}\n", card.id));
    output.push_str(&format!("  Bank:           {}\n", card.bank_name));
    if let Some(network) = card.network {
        output.push_str(&format!("  Network:        {}\n", network));
    }
    if !card.expiry_date.is_empty() {
        output.push_str(&format!("  Expires:        {}\n", card.expiry_date));
    }
    output.push_str(&format!("  Theme:          {}\n", card.theme));
    if card.background_image.is_some() {
        output.push_str("  Card Face:      custom image\n");
    }
    if let Some(limit) = card.credit_limit {
        output.push_str(&format!(
            "  Credit Limit:   {}\n",
            limit.format_with_symbol(symbol)
        ));
    }

    output.push('\n');
    output.push_str(&format!("  Statement Day:  {}\n", card.statement_date));
    output.push_str(&format!("  Due Day:        {}\n", card.due_date));
    output.push_str(&format!(
        "  Next Payment:   {} ({})\n",
        summary.next_due.format("%Y-%m-%d"),
        format_days(summary.days_until_due)
    ));
    output.push_str(&format!(
        "  Current Cycle:  since {}\n",
        cycle.window.current_start.format("%Y-%m-%d")
    ));

    if !card.rewards_info.is_empty() || !card.reward_cap.is_empty() {
        output.push('\n');
        if !card.rewards_info.is_empty() {
            output.push_str(&format!("  Rewards:        {}\n", card.rewards_info));
        }
        if !card.reward_cap.is_empty() {
            output.push_str(&format!("  Reward Cap:     {}\n", card.reward_cap));
        }
    }

    let tags = card.channel_tags();
    if !tags.is_empty() {
        output.push_str(&format!("  Channels:       {}\n", tags.join(" | ")));
    }

    if !card.annual_fee_condition.is_empty() {
        output.push_str(&format!("  Annual Fee:     {}\n", card.annual_fee_condition));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Transactions:   {}\n",
        cycle.transaction_total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Subscriptions:  {}\n",
        cycle.subscription_total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  This Cycle:     {}\n",
        cycle.current_total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Last Cycle:     {}\n",
        cycle.previous_total.format_with_symbol(symbol)
    ));

    output.push('\n');
    output.push_str("Current cycle transactions:\n");
    output.push_str(&format_transaction_register(
        &cycle.current_transactions,
        symbol,
    ));

    output.push('\n');
    output.push_str("Subscriptions:\n");
    output.push_str(&format_subscription_list(&card.subscriptions, symbol));

    output.push('\n');
    output.push_str(&format!(
        "  Created: {}\n",
        card.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

fn format_days(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        n => format!("in {} days", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, CardNetwork, Money, Subscription, Transaction};
    use crate::services::cycle::CycleSummary;
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn summary(card: Card, days_until_due: i64) -> CardSummary {
        CardSummary {
            cycle: CycleSummary::for_card_with(&card, now(), |ts| ts.naive_utc()),
            next_due: NaiveDate::from_ymd_opt(2024, 10, 20).unwrap(),
            days_until_due,
            card,
        }
    }

    #[test]
    fn test_format_card_list() {
        let mut travel = Card::new("Travel", "First Bank", 5, 20);
        travel.network = Some(CardNetwork::Visa);
        travel
            .subscriptions
            .push(Subscription::new("Netflix", Money::new(1390)));
        let daily = Card::new("Daily", "Metro Bank", 1, 12);

        let output = format_card_list(&[summary(travel, 10), summary(daily, 2)], "$", 3);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Name"));
        assert!(lines[2].contains("Travel") && lines[2].contains("VISA"));
        assert!(lines[2].contains("$1,390"));
        assert!(!lines[2].contains("DUE SOON"));
        assert!(lines[3].contains("DUE SOON"));
        assert!(lines[3].contains("in 2 days"));
    }

    #[test]
    fn test_format_empty_list() {
        let output = format_card_list(&[], "$", 3);
        assert!(output.contains("No cards found"));
    }

    #[test]
    fn test_format_card_details() {
        let mut card = Card::new("Travel", "First Bank", 5, 20);
        card.credit_limit = Some(Money::new(80_000));
        card.applicable_channels = Some("Amazon, Uber".into());
        card.transactions.push(Transaction::at(
            Money::new(1200),
            Some("Hotel".into()),
            NaiveDate::from_ymd_opt(2024, 10, 8)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                .and_utc(),
        ));

        let output = format_card_details(&summary(card, 0), "NT$");

        assert!(output.contains("Card: Travel"));
        assert!(output.contains("NT$80,000"));
        assert!(output.contains("Amazon | Uber"));
        assert!(output.contains("since 2024-10-06"));
        assert!(output.contains("Hotel"));
        assert!(output.contains("2024-10-20 (today)"));
        assert!(output.contains("No subscriptions."));
    }
}
