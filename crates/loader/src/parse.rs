//! Line-oriented parsers for the two input tables.

use crate::error::LoadError;
use cinematch_core::{ItemAttributes, UserRatings};
use std::collections::HashMap;
use std::path::Path;

/// Token marking an unrated item in the ratings table.
pub const NOT_RATED: &str = "NA";

/// Non-blank lines with their 1-based line numbers.
fn lines<'a>(text: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn parse_value(path: &Path, line: usize, token: &str) -> Result<f64, LoadError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LoadError::malformed(
            path,
            line,
            format!("invalid value {token:?}"),
        )),
    }
}

/// Parse `<item> <v1> ... <vD>` lines.
pub fn parse_item_attributes(path: &Path, text: &str) -> Result<ItemAttributes, LoadError> {
    let mut attributes = ItemAttributes::new();
    let mut dimension = None;

    for (line_no, line) in lines(text) {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else { continue };
        let values = tokens
            .map(|t| parse_value(path, line_no, t))
            .collect::<Result<Vec<f64>, _>>()?;

        if values.is_empty() {
            return Err(LoadError::malformed(
                path,
                line_no,
                format!("item {name} has no attribute values"),
            ));
        }
        match dimension {
            None => dimension = Some(values.len()),
            Some(d) if d != values.len() => {
                return Err(LoadError::malformed(
                    path,
                    line_no,
                    format!("item {name} has {} values, expected {d}", values.len()),
                ));
            }
            Some(_) => {}
        }
        if attributes.insert(name.to_string(), values).is_some() {
            return Err(LoadError::malformed(
                path,
                line_no,
                format!("duplicate item {name}"),
            ));
        }
    }

    Ok(attributes)
}

/// Parse a header of item names followed by `<user> <r1> ... <rN>` lines.
pub fn parse_user_ratings(path: &Path, text: &str) -> Result<UserRatings, LoadError> {
    let mut rows = lines(text);
    let (_, header) = rows.next().ok_or_else(|| LoadError::MissingHeader {
        path: path.to_path_buf(),
    })?;
    let canonical_order: Vec<String> = header.split_whitespace().map(str::to_string).collect();

    let mut ratings = HashMap::new();
    for (line_no, line) in rows {
        let mut tokens = line.split_whitespace();
        let Some(user) = tokens.next() else { continue };
        let row = tokens
            .map(|t| {
                if t == NOT_RATED {
                    Ok(0.0)
                } else {
                    parse_value(path, line_no, t)
                }
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if row.len() != canonical_order.len() {
            return Err(LoadError::malformed(
                path,
                line_no,
                format!(
                    "user {user} has {} ratings, expected {}",
                    row.len(),
                    canonical_order.len()
                ),
            ));
        }
        if ratings.insert(user.to_string(), row).is_some() {
            return Err(LoadError::malformed(
                path,
                line_no,
                format!("duplicate user {user}"),
            ));
        }
    }

    Ok(UserRatings {
        canonical_order,
        ratings,
    })
}
