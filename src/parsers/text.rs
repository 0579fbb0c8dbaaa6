use crate::parsers::{QueryFormat, word_count};
use std::collections::HashSet;

/// Summary numbers for a query list
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStats {
    pub total: usize,
    pub unique: usize,
    /// Average words per query, 0.0 for an empty list
    pub average_words: f64,
}

/// Parses a query list in the given format
pub fn parse(content: &str, format: QueryFormat) -> Vec<String> {
    match format {
        QueryFormat::Lines => parse_lines(content),
        QueryFormat::Csv => parse_csv(content),
    }
}

/// One entry per non-empty line, trimmed, input order kept.
///
/// Also used for keyword and competitor URL lists.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Values of the `query` column of a CSV document.
///
/// Without a `query` header the result is empty. Fields may be double-quoted,
/// with `""` as an escaped quote, and quoted fields may span lines. A leading
/// byte-order mark is ignored.
pub fn parse_csv(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = split_csv_records(content)
        .into_iter()
        .filter(|fields| !(fields.len() == 1 && fields[0].trim().is_empty()));

    let Some(header) = records.next() else {
        return Vec::new();
    };
    let Some(column) = header
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case("query"))
    else {
        ::log::warn!("CSV has no 'query' column");
        return Vec::new();
    };

    records
        .filter_map(|fields| fields.into_iter().nth(column))
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect()
}

/// Splits a CSV document into records of fields.
///
/// Line breaks inside quotes belong to the field.
fn split_csv_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }
    records
}

/// Counts used in the query overview
pub fn stats(queries: &[String]) -> QueryStats {
    let unique = queries.iter().collect::<HashSet<_>>().len();
    let average_words = if queries.is_empty() {
        0.0
    } else {
        queries.iter().map(|q| word_count(q)).sum::<usize>() as f64 / queries.len() as f64
    };
    QueryStats {
        total: queries.len(),
        unique,
        average_words,
    }
}
