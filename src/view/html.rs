//! HTML markup for a [`Screen`], matching the structure of the web page the
//! view was first written as: a loading div, a `.wrapper` of `.card` blocks,
//! or a single `<table>`. Breakpoint styling is carried in an inline sheet.

use super::{QuoteCard, QuoteTable, Screen};
use crate::models::Field;
use std::fmt::Write;

const LOADING_STYLE: &str = "\
div {
  display: flex;
  justify-content: center;
  align-items: center;
  width: calc(100vw - 16px);
  height: calc(100vh - 16px);
}";

const WRAPPER_STYLE: &str = "\
.wrapper {
  font-family: -apple-system, \"BlinkMacSystemFont\", \"Segoe UI\", \"Roboto\";
  width: 100%;
  color: #333;
  margin: 80px auto 40px;
  display: flex;
  flex-flow: row wrap;
  align-items: center;
  justify-content: space-around;
}
.card { padding: 18px; margin: 8px; flex: 1 1 280px; text-align: left; color: #434343; border: 1px solid #9b9b9b; }
.card h3 { margin: 0; color: #067df7; font-size: 18px; }
.card > span { display: inline-block; font-size: 12px; background: black; color: white; border-radius: 4px; padding: 4px 6px; margin-bottom: 4px; }
.card p { margin: 0; padding: 12px 0 0; font-size: 13px; color: #333; column-count: 2; }
.card p > span { display: block; margin-bottom: 4px; }
table { border-collapse: collapse; }
th, td { border: 1px solid lightgray; padding: 8px 12px; white-space: nowrap; }
th { text-transform: capitalize; background: darkgray; color: white; }
td:nth-child(n + 3) { text-align: right; }
@media screen and (max-width: 480px) {
  .card p { column-count: 1; }
}
@media screen and (max-width: 1280px) {
  th:nth-child(n + 10), td:nth-child(n + 10) { display: none; }
}";

pub fn render_html(screen: &Screen) -> String {
    let mut out = String::new();
    match screen {
        Screen::Loading => {
            out.push_str("<div>Loading...</div>\n");
            push_style(&mut out, LOADING_STYLE);
        }
        Screen::Cards(cards) => {
            out.push_str("<div class=\"wrapper\">\n");
            for card in cards {
                push_card(&mut out, card);
            }
            out.push_str("</div>\n");
            push_style(&mut out, WRAPPER_STYLE);
        }
        Screen::Table(table) => {
            out.push_str("<div class=\"wrapper\">\n");
            push_table(&mut out, table);
            out.push_str("</div>\n");
            push_style(&mut out, WRAPPER_STYLE);
        }
    }
    out
}

fn push_card(out: &mut String, card: &QuoteCard) {
    let _ = writeln!(out, "  <div class=\"card\">");
    let _ = writeln!(out, "    <span>{}</span>", escape(&card.symbol));
    let _ = writeln!(out, "    <h3>{}</h3>", escape(&card.name));
    out.push_str("    <p>\n");
    for (field, value) in &card.fields {
        let sep = if *field == Field::DayHigh { "" } else { ":" };
        let _ = writeln!(
            out,
            "      <span>{}{} {}</span>",
            field.label(),
            sep,
            escape(value)
        );
    }
    out.push_str("    </p>\n  </div>\n");
}

fn push_table(out: &mut String, table: &QuoteTable) {
    out.push_str("  <table>\n    <thead>\n      <tr>");
    for field in &table.header {
        let _ = write!(out, "<th>{}</th>", field.key());
    }
    out.push_str("</tr>\n    </thead>\n    <tbody>\n");
    for row in &table.rows {
        out.push_str("      <tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("    </tbody>\n  </table>\n");
}

fn push_style(out: &mut String, css: &str) {
    let _ = writeln!(out, "<style>\n{}\n</style>", css);
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
