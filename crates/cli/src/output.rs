//! Terminal tables.

use dexflow_domain::prelude::*;
use dexflow_execution::prelude::SessionTicket;
use prettytable::{Table, row};

pub fn print_rows(rows: &[(String, String)]) {
    let mut table = Table::new();
    table.set_titles(row!["Field", "Value"]);
    for (label, value) in rows {
        table.add_row(row![label, value]);
    }
    table.printstd();
}

pub fn print_ticket(ticket: &SessionTicket) {
    println!("Session:     {}", ticket.session_id);
    println!("Signing URL: {}", ticket.signing_url);
    print_steps(&ticket.steps);
}

pub fn print_session(session: &TransactionSession, signing_url: &str) {
    println!("Session:     {} ({})", session.id, session.status);
    println!("Chain:       {} {}", session.chain_type, session.chain_id);
    println!("Created:     {}", session.created_at.to_rfc3339());
    println!("Signing URL: {signing_url}");
    print_steps(&session.steps);

    if !session.metadata.is_empty() {
        let rows: Vec<(String, String)> = session
            .metadata
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.to_string()))
            .collect();
        print_rows(&rows);
    }
}

fn print_steps(steps: &[TransactionStep]) {
    let mut table = Table::new();
    table.set_titles(row!["#", "Title", "Type", "To", "Value", "Selector"]);
    for (i, step) in steps.iter().enumerate() {
        let to = step
            .receiver()
            .map_or_else(|| "(create)".to_string(), |a| a.to_string());
        table.add_row(row![
            i + 1,
            step.title(),
            step.transaction_type(),
            to,
            step.value(),
            step.selector().unwrap_or("-")
        ]);
    }
    table.printstd();
}
