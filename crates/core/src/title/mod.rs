//! Title normalization.
//!
//! Catalog titles are noisy: they carry release years, alternate foreign
//! titles in parentheses, accented letters and library-style trailing
//! articles ("Matrix, The"). [`normalize_title`] reduces a raw title to a
//! canonical comparison key that the resolver sends upstream and uses for
//! fuzzy scoring.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static TRAILING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\d{4}\s*\)\s*$").expect("valid trailing year regex"));

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("valid parenthesized regex"));

static TRAILING_ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.*),\s*(the|an|a)$").expect("valid trailing article regex"));

/// Produce the canonical comparison form of a raw title.
///
/// Steps, in order:
/// 1. strip a trailing `(YYYY)` year
/// 2. strip every other parenthesized segment
/// 3. fold accented and other non-ASCII letters to ASCII
/// 4. move a trailing `, The` / `, An` / `, A` to the front (lower-cased)
/// 5. replace `&` with `and`
/// 6. drop everything except ASCII letters, digits, whitespace and `:`
/// 7. collapse whitespace runs and trim
///
/// Empty input yields an empty string.
pub fn normalize_title(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        return String::new();
    }

    let t = TRAILING_YEAR.replace(t, "");
    let t = PARENTHESIZED.replace_all(&t, "");
    let t = transliterate(t.trim());

    let fronted = TRAILING_ARTICLE
        .captures(&t)
        .map(|caps| format!("{} {}", caps[2].to_lowercase(), &caps[1]));
    let t = fronted.unwrap_or(t);

    let t = t.replace('&', " and ");

    let t: String = t
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == ':')
        .collect();

    t.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold a string to its closest ASCII spelling.
///
/// Letters with a canonical decomposition lose their combining marks
/// (`é` -> `e`); a handful of letters without one are mapped explicitly.
/// Anything else that is not ASCII passes through and is removed later.
fn transliterate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        if is_combining_mark(c) {
            continue;
        }
        match fold_char(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'ð' => "d",
        'Ð' => "D",
        'þ' => "th",
        'Þ' => "Th",
        'ı' => "i",
        '\u{2018}' | '\u{2019}' | '\u{02BC}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{00A0}' => " ",
        _ => return None,
    };
    Some(folded)
}

/// Split a catalog title such as `"Heat (1995)"` into `("Heat", Some(1995))`.
///
/// Only a final parenthesized integer is treated as a year; any other
/// trailing parenthetical (an alternate title, say) is left in place and no
/// year is returned.
pub fn split_title_year(catalog_title: &str) -> (String, Option<i32>) {
    let t = catalog_title.trim();
    if let Some(body) = t.strip_suffix(')') {
        if let Some(idx) = body.rfind('(') {
            if let Ok(year) = body[idx + 1..].trim().parse::<i32>() {
                return (body[..idx].trim().to_string(), Some(year));
            }
        }
    }
    (t.to_string(), None)
}
