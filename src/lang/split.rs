//! Quote- and bracket-aware scanning of statement text.

/// Walks `s` yielding `(byte_index, char, top_level)` where `top_level` is
/// false inside quotes, parentheses or square brackets.
fn scan(s: &str) -> impl Iterator<Item = (usize, char, bool)> + '_ {
    let mut quote: Option<char> = None;
    let mut depth = 0i32;
    s.char_indices().map(move |(i, c)| {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            return (i, c, false);
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                (i, c, false)
            }
            '(' | '[' => {
                depth += 1;
                (i, c, false)
            }
            ')' | ']' => {
                depth -= 1;
                (i, c, false)
            }
            _ => (i, c, depth <= 0),
        }
    })
}

/// Split on any of `separators` found at top level. Each piece carries the
/// separator that ended it, `None` for the final piece.
pub fn split_top_level(s: &str, separators: &[char]) -> Vec<(String, Option<char>)> {
    let mut pieces = vec![];
    let mut start = 0;
    for (i, c, top) in scan(s) {
        if top && separators.contains(&c) {
            pieces.push((s[start..i].to_string(), Some(c)));
            start = i + c.len_utf8();
        }
    }
    pieces.push((s[start..].to_string(), None));
    pieces
}

/// Comma separated list with surrounding whitespace trimmed and empty
/// trailing item dropped.
pub fn split_list(s: &str) -> Vec<String> {
    let mut items: Vec<String> = split_top_level(s, &[','])
        .into_iter()
        .map(|(piece, _)| piece.trim().to_string())
        .collect();
    if items.last().map_or(false, |l| l.is_empty()) {
        items.pop();
    }
    items
}

/// Byte index of the keyword `word` (case-insensitive, whole word, top level).
pub fn find_keyword(s: &str, word: &str) -> Option<usize> {
    let upper = s.to_ascii_uppercase();
    let word = word.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    let is_word_char = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';
    for (i, _, top) in scan(s) {
        if !top || !upper[i..].starts_with(&word) {
            continue;
        }
        let before_ok = i == 0 || !is_word_char(bytes[i - 1]);
        let end = i + word.len();
        let after_ok = end >= bytes.len() || !is_word_char(bytes[end]);
        if before_ok && after_ok {
            return Some(i);
        }
    }
    None
}

/// Split `s` around the first top-level `word`, trimming both halves.
pub fn split_keyword<'a>(s: &'a str, word: &str) -> Option<(&'a str, &'a str)> {
    let at = find_keyword(s, word)?;
    Some((s[..at].trim(), s[at + word.len()..].trim()))
}

/// Index of the first top-level occurrence of `c`.
pub fn find_top_level(s: &str, c: char) -> Option<usize> {
    scan(s).find(|&(_, ch, top)| top && ch == c).map(|(i, _, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_print_list() {
        let pieces = split_top_level(r#""A, B"; X, F(1,2);"#, &[',', ';']);
        assert_eq!(
            pieces,
            vec![
                (r#""A, B""#.to_string(), Some(';')),
                (" X".to_string(), Some(',')),
                (" F(1,2)".to_string(), Some(';')),
                ("".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_find_keyword() {
        assert_eq!(find_keyword("A>B THEN 20", "then"), Some(4));
        assert_eq!(find_keyword(r#"A$="THEN" THEN 20"#, "THEN"), Some(10));
        assert_eq!(find_keyword("ATHENS=1", "THEN"), None);
        assert_eq!(
            split_keyword("I = 1 TO 10", "TO"),
            Some(("I = 1", "10"))
        );
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" A, B(1,2) ,"), vec!["A", "B(1,2)"]);
    }
}
