//! Sets of neighbourhood sums, written as `2-3,5,7`.

use crate::error::Error;
use std::collections::BTreeSet;

/// A set of neighbourhood sums.
pub(crate) type Sums = BTreeSet<i32>;

/// Parses a list of items like `2`, `2-5`, with every sum in `0..=max`.
pub(crate) fn parse_sums<'a, I>(items: I, max: i32) -> Result<Sums, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sums = Sums::new();
    for item in items {
        let invalid = || Error::InvalidRule(item.to_owned());
        let (low, high) = match item.split_once('-') {
            Some((low, high)) => (low, high),
            None => (item, item),
        };
        let low: i32 = low.parse().map_err(|_| invalid())?;
        let high: i32 = high.parse().map_err(|_| invalid())?;
        if low > high || high > max {
            return Err(invalid());
        }
        sums.extend(low..=high);
    }
    Ok(sums)
}

/// Writes the canonical form of a set of sums.
///
/// Runs of more than two consecutive sums become ranges; every item is
/// followed by a comma, and an empty set is a single comma.
pub(crate) fn write_sums(sums: &Sums) -> String {
    if sums.is_empty() {
        return ",".to_owned();
    }
    let mut result = String::new();
    let values: Vec<_> = sums.iter().copied().collect();
    let mut i = 0;
    while i < values.len() {
        let mut j = i;
        while j + 1 < values.len() && values[j + 1] == values[j] + 1 {
            j += 1;
        }
        if j - i >= 2 {
            result.push_str(&format!("{}-{},", values[i], values[j]));
        } else {
            for value in &values[i..=j] {
                result.push_str(&format!("{},", value));
            }
        }
        i = j + 1;
    }
    result
}

/// Writes sums in the classic single-digit notation, like `23`.
pub(crate) fn write_digits(sums: &Sums) -> String {
    sums.iter().map(i32::to_string).collect()
}

/// Splits a comma-separated rule string into fields.
///
/// Every field starts with a letter; items starting with a digit, or with
/// a lowercase `l` standing for any count, belong to the preceding field. `R2,C0,S2-3,5,B3,NM` gives
/// `R: [2]`, `C: [0]`, `S: [2-3, 5]`, `B: [3]`, `N: [M]`.
pub(crate) fn split_fields(rule: &str) -> Result<Vec<(char, Vec<&str>)>, Error> {
    let mut fields: Vec<(char, Vec<&str>)> = Vec::new();
    for token in rule.split(',').filter(|t| !t.is_empty()) {
        let first = token.chars().next().unwrap_or(',');
        if first.is_ascii_digit() || first == 'l' {
            match fields.last_mut() {
                Some((_, items)) => items.push(token),
                None => return Err(Error::InvalidRule(rule.to_owned())),
            }
        } else {
            let rest = &token[first.len_utf8()..];
            let items = if rest.is_empty() { Vec::new() } else { vec![rest] };
            fields.push((first.to_ascii_uppercase(), items));
        }
    }
    Ok(fields)
}

/// Takes a field out of the result of [`split_fields`].
pub(crate) fn take_field<'a>(
    fields: &mut Vec<(char, Vec<&'a str>)>,
    name: char,
) -> Option<Vec<&'a str>> {
    let index = fields.iter().position(|(n, _)| *n == name)?;
    Some(fields.remove(index).1)
}

/// Takes a field that holds exactly one number.
pub(crate) fn take_number(
    fields: &mut Vec<(char, Vec<&str>)>,
    name: char,
    rule: &str,
) -> Result<u32, Error> {
    match take_field(fields, name).as_deref() {
        Some([number]) => number
            .parse()
            .map_err(|_| Error::InvalidRule(rule.to_owned())),
        _ => Err(Error::InvalidRule(rule.to_owned())),
    }
}
