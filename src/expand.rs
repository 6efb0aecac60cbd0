//! Dollar expansion of capture templates.
//!
//! `$n` is replaced by the n-th argument and `$$` is a literal dollar. Any other
//! `$name` (letters, leading zeros, ...) is left in the output untouched so it
//! can be handled by the command interpreter.

const MAX_INDEX: usize = 100_000_000;

/// Returns how many arguments `template` needs (one past the highest index it
/// references) and whether it references `$0`.
pub fn nargs(template: &str) -> (usize, bool) {
    let mut n = 0;
    let mut zero = false;
    let mut rest = template;
    while let Some(i) = rest.find('$') {
        rest = &rest[i..];
        if let Some(tail) = rest.strip_prefix("$$") {
            rest = tail;
            continue;
        }
        match extract(rest) {
            Some((num, tail)) => {
                zero |= num == 0;
                n = n.max(num + 1);
                rest = tail;
            }
            None => rest = &rest[1..],
        }
    }
    (n, zero)
}

/// Substitutes every `$n` in `template` with `args[n]`. Indices past the end of
/// `args` expand to nothing.
pub fn expand(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(i) = rest.find('$') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        if let Some(tail) = rest.strip_prefix("$$") {
            out.push('$');
            rest = tail;
            continue;
        }
        match extract(rest) {
            Some((num, tail)) => {
                if let Some(arg) = args.get(num) {
                    out.push_str(arg);
                }
                rest = tail;
            }
            None => {
                out.push('$');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// Parses the `$n` at the start of `s`, returning the index and what follows.
fn extract(s: &str) -> Option<(usize, &str)> {
    let body = s.strip_prefix('$')?;
    let end = body
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(body.len(), |(i, _)| i);
    let name = &body[..end];
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if name.len() > 1 && name.starts_with('0') {
        return None;
    }
    let num = name.parse::<usize>().ok().filter(|&n| n < MAX_INDEX)?;
    Some((num, &body[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("$0 $1", &["hello", "world"], "hello world", (2, true))]
    #[case("$$1", &[], "$1", (0, false))]
    #[case("$foo $0", &["bar"], "$foo bar", (1, true))]
    #[case("$-2", &[], "$-2", (0, false))]
    #[case("goto $1", &["", "25"], "goto 25", (2, false))]
    #[case("$01 $1", &["a", "b"], "$01 b", (2, false))]
    #[case("cost: $", &[], "cost: $", (0, false))]
    #[case("$3", &["a"], "", (4, false))]
    #[case("$1x", &["a", "b"], "$1x", (0, false))]
    #[case("[$1]", &["a", "b"], "[b]", (2, false))]
    fn expands(
        #[case] template: &str,
        #[case] input: &[&str],
        #[case] expected: &str,
        #[case] counts: (usize, bool),
    ) {
        assert_eq!(expand(template, &args(input)), expected);
        assert_eq!(nargs(template), counts);
    }

    #[test]
    fn huge_index_is_literal() {
        assert_eq!(expand("$123456789012", &[]), "$123456789012");
        assert_eq!(nargs("$123456789012"), (0, false));
    }

    proptest! {
        #[test]
        fn templates_without_dollar_are_unchanged(
            template in "[^$]{0,40}",
            input in prop::collection::vec("[a-z]{0,5}", 0..4),
        ) {
            prop_assert_eq!(expand(&template, &input), template.clone());
            prop_assert_eq!(nargs(&template), (0, false));
        }

        #[test]
        fn expand_never_panics(template in "\\PC{0,40}", input in prop::collection::vec(".{0,5}", 0..4)) {
            let _ = expand(&template, &input);
            let _ = nargs(&template);
        }
    }
}
