//! Name-set helpers shared by the validators

use std::collections::{HashMap, HashSet};

/// Names occurring more than once, each reported once, in order of first
/// appearance
pub(crate) fn duplicates<'a, I>(names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();

    for name in names {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    order.into_iter().filter(|name| counts[name] > 1).collect()
}

/// Distinct names in order of first appearance
pub(crate) fn distinct<'a, I>(names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names.into_iter().filter(|name| seen.insert(*name)).collect()
}

/// Names of `left` absent from `right`, keeping `left`'s order
pub(crate) fn difference<'a>(left: &[&'a str], right: &[&str]) -> Vec<&'a str> {
    left.iter()
        .copied()
        .filter(|name| !right.contains(name))
        .collect()
}

/// Render a name list as `[a, b]`
pub(crate) fn render(names: &[&str]) -> String {
    format!("[{}]", names.join(", "))
}

/// Whether a string is empty or whitespace only
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
