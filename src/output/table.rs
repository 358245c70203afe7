use comfy_table::{Cell, Color};
use serde_json::Value;

use crate::cli::SearchKind;
use crate::router::{GuardDecision, Route};
use crate::session::Profile;

use super::format::{
    create_styled_table, display_value, format_timestamp, header_cell, right_cell, styled_cell,
    truncate,
};

#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Text(usize),
    Time,
    Number,
}

#[derive(Debug, Clone, Copy)]
struct Column {
    header: &'static str,
    key: &'static str,
    kind: ColumnKind,
}

const fn col(header: &'static str, key: &'static str, kind: ColumnKind) -> Column {
    Column { header, key, kind }
}

const HISTORY_COLUMNS: &[Column] = &[
    col("ID", "id", ColumnKind::Number),
    col("Question", "question", ColumnKind::Text(48)),
    col("Type", "questionType", ColumnKind::Text(16)),
    col("Asked", "createTime", ColumnKind::Time),
];

const ARTICLE_COLUMNS: &[Column] = &[
    col("ID", "id", ColumnKind::Number),
    col("Law", "title", ColumnKind::Text(24)),
    col("Article", "articleNumber", ColumnKind::Text(12)),
    col("Content", "content", ColumnKind::Text(60)),
];

const CASE_COLUMNS: &[Column] = &[
    col("ID", "id", ColumnKind::Number),
    col("Title", "title", ColumnKind::Text(40)),
    col("Court", "courtName", ColumnKind::Text(24)),
    col("Judged", "judgeDate", ColumnKind::Time),
];

const CONCEPT_COLUMNS: &[Column] = &[
    col("ID", "id", ColumnKind::Number),
    col("Concept", "name", ColumnKind::Text(20)),
    col("Field", "lawType", ColumnKind::Text(12)),
    col("Definition", "definition", ColumnKind::Text(60)),
];

/// Items of a paged (`content`) or plain array payload
pub(crate) fn records(data: &Value) -> &[Value] {
    match data {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

fn total_elements(data: &Value) -> Option<i64> {
    data.get("totalElements").and_then(Value::as_i64)
}

fn print_records_table(title: &str, data: &Value, columns: &[Column], use_color: bool) {
    let items = records(data);
    if items.is_empty() {
        println!("No {} found.", title.to_lowercase());
        return;
    }

    let mut table = create_styled_table();
    table.set_header(
        columns
            .iter()
            .map(|c| header_cell(c.header, use_color))
            .collect::<Vec<_>>(),
    );

    for item in items {
        let row: Vec<Cell> = columns
            .iter()
            .map(|c| {
                let value = item.get(c.key);
                match c.kind {
                    ColumnKind::Number => right_cell(&display_value(value)),
                    ColumnKind::Time => Cell::new(
                        value
                            .and_then(Value::as_str)
                            .map(format_timestamp)
                            .unwrap_or_else(|| display_value(value)),
                    ),
                    ColumnKind::Text(max) => Cell::new(truncate(&display_value(value), max)),
                }
            })
            .collect();
        table.add_row(row);
    }

    println!("\n  {title}\n");
    println!("{table}");
    match total_elements(data) {
        Some(total) => println!("\n  {} shown of {total}\n", items.len()),
        None => println!("\n  {} shown\n", items.len()),
    }
}

pub(crate) fn print_history_table(data: &Value, use_color: bool) {
    print_records_table("Questions", data, HISTORY_COLUMNS, use_color);
}

pub(crate) fn print_search_table(kind: SearchKind, data: &Value, use_color: bool) {
    let columns = match kind {
        SearchKind::Articles => ARTICLE_COLUMNS,
        SearchKind::Cases => CASE_COLUMNS,
        SearchKind::Concepts => CONCEPT_COLUMNS,
    };
    print_records_table(kind.label(), data, columns, use_color);
}

pub(crate) fn print_stats(data: &Value, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Metric", use_color),
        header_cell("Value", use_color),
    ]);
    for (label, key) in [
        ("Questions today", "todayQuestions"),
        ("Questions total", "totalQuestions"),
        ("Users", "userCount"),
        ("Satisfaction %", "satisfaction"),
    ] {
        table.add_row(vec![Cell::new(label), right_cell(&display_value(data.get(key)))]);
    }
    println!("{table}");

    let hot = data.get("hotQuestions").map(records).unwrap_or(&[]);
    if !hot.is_empty() {
        let mut table = create_styled_table();
        table.set_header(vec![
            header_cell("Popular question", use_color),
            header_cell("Count", use_color),
        ]);
        for item in hot {
            table.add_row(vec![
                Cell::new(truncate(&display_value(item.get("question")), 60)),
                right_cell(&display_value(item.get("count"))),
            ]);
        }
        println!("{table}");
    }
}

pub(crate) fn print_routes_table(routes: &[Route], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Path", use_color),
        header_cell("Page", use_color),
        header_cell("Access", use_color),
    ]);

    let mut add = |path: String, route: &Route| {
        let access = match (route.meta.requires_auth, route.meta.requires_admin) {
            (_, true) => "administrator",
            (true, false) => "signed in",
            (false, false) => "anyone",
        };
        let page = match route.redirect {
            Some(target) => format!("→ {target}"),
            None => route.meta.title.to_string(),
        };
        table.add_row(vec![Cell::new(path), Cell::new(page), Cell::new(access)]);
    };

    for route in routes {
        add(route.path.to_string(), route);
        for child in &route.children {
            add(format!("{}/{}", route.path, child.path), child);
        }
    }
    println!("{table}");
}

pub(crate) fn print_guard_decision(path: &str, decision: &GuardDecision, use_color: bool) {
    let (text, color) = match decision {
        GuardDecision::Allowed => (format!("allowed  {path}"), Color::Green),
        GuardDecision::RedirectLogin { redirect } => (
            format!("login required  → /login (then back to {redirect})"),
            Color::Yellow,
        ),
        GuardDecision::RedirectHome => {
            ("administrators only  → /home".to_string(), Color::Red)
        }
    };
    if use_color {
        let mut table = create_styled_table();
        table.add_row(vec![styled_cell(&text, Some(color), true)]);
        println!("{table}");
    } else {
        println!("{text}");
    }
}

pub(crate) fn print_profile(token: &str, profile: Option<&Profile>, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Field", use_color),
        header_cell("Value", use_color),
    ]);
    let role = match profile {
        Some(p) if p.is_admin() => "administrator",
        Some(_) => "user",
        None => "unknown",
    };
    table.add_row(vec![
        Cell::new("User"),
        Cell::new(profile.and_then(Profile::display_name).unwrap_or("-")),
    ]);
    table.add_row(vec![Cell::new("Role"), Cell::new(role)]);
    for (label, key) in [("Email", "email"), ("Phone", "phone")] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(display_value(profile.and_then(|p| p.get(key)))),
        ]);
    }
    table.add_row(vec![Cell::new("Token"), Cell::new(truncate(token, 24))]);
    println!("{table}");
}
