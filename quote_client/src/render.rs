//! Text shown to the user on stdout.
use quote_common::{CategoryFilter, Quote, QuoteError};

/// Quote as displayed after `random`/`filter`.
pub fn quote(quote: &Quote) -> String {
    format!("\"{}\"\nCategory: {}", quote.text, quote.category)
}

/// Quote restored from the session slot.
pub fn last_viewed(quote: &Quote) -> String {
    format!("\"{}\"\nCategory: {} (last viewed)", quote.text, quote.category)
}

/// One line of the quote list.
pub fn quote_line(quote: &Quote) -> String {
    format!("[{}] \"{}\" ({})", quote.id, quote.text, quote.category)
}

/// Every stored quote, one per line.
pub fn quote_list(quotes: &[Quote]) -> String {
    if quotes.is_empty() {
        return String::from("No quotes yet. Add one!");
    }
    quotes.iter().map(quote_line).collect::<Vec<_>>().join("\n")
}

/// Message for an empty random pick.
pub fn no_quotes(filter: &CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => String::from("No quotes available."),
        CategoryFilter::Named(name) => format!("No quotes available in {}.", name),
    }
}

/// Category list with the selected one marked.
pub fn categories(categories: &[String], selected: &CategoryFilter) -> String {
    if categories.is_empty() {
        return String::from("Categories:\nNo categories yet.");
    }
    let mark = |matched: bool| if matched { '*' } else { ' ' };
    let mut lines = vec![
        String::from("Categories:"),
        format!("{} all", mark(*selected == CategoryFilter::All)),
    ];
    for category in categories {
        let matched = matches!(selected, CategoryFilter::Named(name) if name.eq_ignore_ascii_case(category));
        lines.push(format!("{} {}", mark(matched), category));
    }
    lines.join("\n")
}

/// Message shown when a command fails.
pub fn user_message(err: &QuoteError) -> String {
    match err {
        QuoteError::MissingField(_) => String::from("Please enter both a quote and a category!"),
        QuoteError::Json(_) => String::from("Error parsing JSON file."),
        QuoteError::NotAnArray | QuoteError::NoValidQuotes => err.to_string(),
        other => format!("Error: {}", other),
    }
}
