/*!
 * Numeral handling for chapter ordinals.
 *
 * Chapter headings in the wild mix ASCII digits, full-width digits (common in
 * CJK-sourced text) and Roman numerals. This module normalizes all of them
 * into plain integers so the segmenter can reason about chapter ordering.
 */

/// Replace every full-width digit codepoint with its ASCII equivalent.
///
/// All other characters pass through unchanged.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０' => '0',
            '１' => '1',
            '２' => '2',
            '３' => '3',
            '４' => '4',
            '５' => '5',
            '６' => '6',
            '７' => '7',
            '８' => '8',
            '９' => '9',
            _ => c,
        })
        .collect()
}

// Value of a single Roman symbol; unknown characters contribute nothing.
fn roman_value(c: char) -> i64 {
    match c.to_ascii_uppercase() {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    }
}

/// True when `c` is one of the seven Roman numeral letters, either case.
pub fn is_roman_letter(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M')
}

/// Interpret a case-insensitive Roman numeral using subtractive notation.
///
/// The scan runs left to right comparing each symbol to its successor: a
/// symbol smaller than the one that follows is subtracted, otherwise added.
/// Non-canonical sequences such as "IIII" are not rejected; they produce a
/// best-effort value (4 in that case), matching how permissively headings
/// are written in real documents.
pub fn roman_to_integer(token: &str) -> u32 {
    let values: Vec<i64> = token.chars().map(roman_value).collect();
    let mut total: i64 = 0;
    for (i, &current) in values.iter().enumerate() {
        if values.get(i + 1).is_some_and(|&next| current < next) {
            total -= current;
        } else {
            total += current;
        }
    }
    total.max(0) as u32
}

/// Parse a chapter ordinal token written as either Arabic digits or a Roman
/// numeral. Returns `None` for anything else (including the empty string).
pub fn parse_chapter_ordinal(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok();
    }
    if token.chars().all(is_roman_letter) {
        return Some(roman_to_integer(token));
    }
    None
}
