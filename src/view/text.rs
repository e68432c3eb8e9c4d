//! Terminal rendering of a [`Screen`].

use super::{QuoteCard, QuoteTable, Screen};
use crate::models::Field;
use prettytable::format::{self, Alignment};
use prettytable::{Cell, Row, Table};
use std::fmt::Write;

pub const LOADING_TEXT: &str = "Loading...";

pub fn render_text(screen: &Screen) -> String {
    match screen {
        Screen::Loading => format!("{}\n", LOADING_TEXT),
        Screen::Cards(cards) => cards
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n"),
        Screen::Table(table) => render_table(table),
    }
}

fn render_card(card: &QuoteCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", card.symbol);
    let _ = writeln!(out, "{}", card.name);
    for (field, value) in &card.fields {
        // The original page prints "DayHigh" without a colon.
        let sep = if *field == Field::DayHigh { "" } else { ":" };
        let _ = writeln!(out, "  {}{} {}", field.label(), sep, value);
    }
    out
}

fn render_table(quotes: &QuoteTable) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.set_titles(Row::new(
        quotes.header.iter().map(|f| Cell::new(&f.label())).collect(),
    ));

    // Symbol and name stay left-aligned, figures are right-aligned.
    for values in &quotes.rows {
        table.add_row(Row::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    if i < 2 {
                        Cell::new(v)
                    } else {
                        Cell::new_align(v, Alignment::RIGHT)
                    }
                })
                .collect(),
        ));
    }

    table.to_string()
}
