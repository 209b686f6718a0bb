//! Multi-line input continuation detection.
//!
//! A line is complete once every brace/bracket/paren it opened has been
//! closed, ignoring delimiters inside string literals and `#` comments --
//! the same balance check the original REPL ran before treating accumulated
//! input as ready to evaluate.

pub fn is_balanced(input: &str) -> bool {
    let mut braces = 0i32;
    let mut brackets = 0i32;
    let mut parens = 0i32;
    let mut in_string = false;
    let mut chars = input.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '"' && prev != Some('\\') {
            in_string = !in_string;
            prev = Some(c);
            continue;
        }
        if in_string {
            prev = Some(c);
            continue;
        }
        if c == '#' {
            for c in chars.by_ref() {
                if c == '\n' {
                    break;
                }
            }
            prev = Some('\n');
            continue;
        }
        match c {
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            '(' => parens += 1,
            ')' => parens -= 1,
            _ => {}
        }
        prev = Some(c);
    }

    braces <= 0 && brackets <= 0 && parens <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_plain_expression_is_balanced() {
        assert!(is_balanced("1 + 2"));
    }

    #[test]
    fn an_open_brace_is_unbalanced() {
        assert!(!is_balanced("match x with { 1 -> 2"));
    }

    #[test]
    fn closing_the_brace_balances_it() {
        assert!(is_balanced("match x with { 1 -> 2 ; _ -> 3 }"));
    }

    #[test]
    fn braces_inside_a_string_are_ignored() {
        assert!(is_balanced("let s = \"{ not a brace\""));
    }

    #[test]
    fn an_open_brace_inside_a_comment_is_ignored() {
        assert!(is_balanced("1 + 2 # note: { unbalanced on purpose"));
    }
}
