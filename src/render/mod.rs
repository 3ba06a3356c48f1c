//! Plain-text screens for the terminal shell.

use std::fmt::Write as _;

use crate::views::{
    DetailScreen, FormState, Gallery, NotFoundView, ProductRow, Thumbnail,
};

const LIST_HEADERS: [&str; 5] = ["Image", "Name", "Pieces", "Status", "Price"];

pub fn loading() -> String {
    "Loading...\n".to_string()
}

/// Product table, one line per row, in backend order.
pub fn product_table(rows: &[ProductRow]) -> String {
    if rows.is_empty() {
        return "No products\n".to_string();
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                match &row.thumbnail {
                    Thumbnail::Image(url) => url.clone(),
                    Thumbnail::Placeholder => Thumbnail::PLACEHOLDER_LABEL.to_string(),
                },
                row.name.clone(),
                row.pieces.clone(),
                row.visibility.label().to_string(),
                row.price.clone(),
            ]
        })
        .collect();

    let mut widths = LIST_HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, "ID", &LIST_HEADERS.map(String::from), &widths);
    for (row, line) in rows.iter().zip(&cells) {
        push_row(&mut out, &row.key.to_string(), line, &widths);
    }
    out
}

fn push_row(out: &mut String, key: &str, cells: &[String; 5], widths: &[usize; 5]) {
    let _ = write!(out, "{:<6}", key);
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(out, " | {}{}", cell, " ".repeat(pad));
    }
    out.push('\n');
}

pub fn product_details(screen: &DetailScreen) -> String {
    let details = match screen {
        DetailScreen::Loading => return loading(),
        DetailScreen::NotFound => return format!("{}\n", DetailScreen::NOT_FOUND_LABEL),
        DetailScreen::Found(details) => details,
    };

    let mut out = format!("{}\n\n", details.title);
    match &details.gallery {
        Gallery::Empty => {
            let _ = writeln!(out, "{}", Gallery::EMPTY_LABEL);
        }
        Gallery::Slides(urls) => {
            for (index, url) in urls.iter().enumerate() {
                let _ = writeln!(out, "[{}/{}] {}", index + 1, urls.len(), url);
            }
        }
    }
    out.push('\n');

    let label_width = details
        .fields
        .iter()
        .map(|f| f.label.len())
        .max()
        .unwrap_or(0);
    for field in &details.fields {
        let _ = writeln!(out, "{:<width$}  {}", field.label, field.value, width = label_width);
    }
    out
}

pub fn product_form(title: &str, submit_label: &str, state: &FormState) -> String {
    let form = &state.form;
    let inputs = [
        ("product_name", form.product_name.as_str()),
        ("product_name_en", form.product_name_en.as_str()),
        ("product_description", form.product_description.as_str()),
        ("product_description_en", form.product_description_en.as_str()),
        ("number_of_pieces", form.number_of_pieces.as_str()),
        ("product_price", form.product_price.as_str()),
        ("price_after_discount", form.price_after_discount.as_str()),
        ("discount", form.discount.as_str()),
        ("product_hidden", form.product_hidden.as_str()),
    ];

    let mut out = format!("{}\n\n", title);
    for (field, value) in inputs {
        let _ = writeln!(out, "{:<24}{}", field, value);
        for error in state.errors.iter().filter(|e| e.field == field) {
            let _ = writeln!(out, "{:<24}! {}", "", error.message);
        }
    }

    let _ = writeln!(out, "{:<24}{}", "product_image", form.product_image.len());
    for (index, image) in form.product_image.iter().enumerate() {
        let _ = writeln!(out, "{:<24}[{}] {}", "", index, image.describe());
    }

    let _ = writeln!(out, "\n[{}]", submit_label);
    out
}

pub fn not_found(path: &str) -> String {
    format!(
        "{}\n{}\n{}\n({})\n\n[{}]\n",
        NotFoundView::CODE,
        NotFoundView::HEADING,
        NotFoundView::MESSAGE,
        path,
        NotFoundView::ACTION_LABEL
    )
}
