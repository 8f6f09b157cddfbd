// Alias validity and matching.
//
// A bare alias may only contain A-Z, a-z, 0-9 and -_.!~*()' characters.
// Stored aliases usually carry a domain (`jdoe@example.com`); only the part
// before the first `@` is compared.

/// Characters allowed in a bare alias besides ASCII letters and digits.
const ALIAS_PUNCTUATION: &[char] = &['-', '_', '.', '!', '~', '*', '(', ')', '\''];

/// `true` if `candidate` is a non-empty bare alias.
pub fn is_valid_alias(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ALIAS_PUNCTUATION.contains(&c))
}

/// Strip the domain suffix: everything from the first `@` on.
pub fn local_part(alias: &str) -> &str {
    alias.split_once('@').map_or(alias, |(local, _)| local)
}

/// `true` if any alias in `aliases` equals `candidate` once its domain is
/// stripped. Case-sensitive. An invalid candidate matches nothing.
pub fn matches<I, S>(candidate: &str, aliases: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !is_valid_alias(candidate) {
        return false;
    }
    aliases
        .into_iter()
        .any(|alias| local_part(alias.as_ref()) == candidate)
}
