//! Text helpers for behavioural step placeholders.

/// Strips one layer of matching single or double quotes from a value.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    ['"', '\'']
        .iter()
        .find_map(|quote| trimmed.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(trimmed)
}

/// Splits a comma separated placeholder into trimmed, unquoted items.
#[must_use]
pub fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| unquote(item).to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{list, unquote};

    #[test]
    fn unquote_removes_one_layer_of_matching_quotes() {
        assert_eq!(unquote("'Users.get'"), "Users.get");
        assert_eq!(unquote(" \"\"x\"\" "), "\"x\"");
        assert_eq!(unquote("'mismatched\""), "'mismatched\"");
    }

    #[test]
    fn list_splits_and_trims() {
        assert_eq!(list("Users.create, 'Users.get' ,"), ["Users.create", "Users.get"]);
    }
}
