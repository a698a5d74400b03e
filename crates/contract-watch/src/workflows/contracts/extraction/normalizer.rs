use super::super::domain::FactValue;
use chrono::NaiveDate;
use regex::Captures;

/// Signature shared by every rule in the extraction table.
pub type Normalizer = for<'h> fn(&Captures<'h>) -> Option<FactValue>;

pub(crate) fn effective_date(caps: &Captures<'_>) -> Option<FactValue> {
    let month = month_number(caps.get(1)?.as_str())?;
    let day = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let year = caps.get(3)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(FactValue::EffectiveDate)
}

pub(crate) fn term_in_digits(caps: &Captures<'_>) -> Option<FactValue> {
    let value = positive_count(caps.get(1)?.as_str())?;
    term_months(value, caps.get(2)?.as_str())
}

pub(crate) fn term_in_words(caps: &Captures<'_>) -> Option<FactValue> {
    let value = number_word(caps.get(1)?.as_str())?;
    term_months(value, caps.get(2)?.as_str())
}

pub(crate) fn notice_in_digits(caps: &Captures<'_>) -> Option<FactValue> {
    positive_count(caps.get(1)?.as_str()).map(FactValue::NoticeDays)
}

pub(crate) fn notice_in_words(caps: &Captures<'_>) -> Option<FactValue> {
    number_word(caps.get(1)?.as_str()).map(FactValue::NoticeDays)
}

pub(crate) fn renewal_flag(_caps: &Captures<'_>) -> Option<FactValue> {
    Some(FactValue::AutoRenew)
}

fn term_months(value: u32, unit: &str) -> Option<FactValue> {
    let months = if unit.eq_ignore_ascii_case("year") {
        value.checked_mul(12)?
    } else {
        value
    };
    Some(FactValue::TermMonths(months))
}

/// Zero and values that overflow `u32` cannot describe a real term.
fn positive_count(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|value| *value > 0)
}

fn month_number(name: &str) -> Option<u32> {
    let lowered = name.trim_end_matches('.').to_ascii_lowercase();
    let month = match lowered.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parses `"twelve"`, `"sixty"`, `"forty-five"` or `"twenty one"`.
fn number_word(words: &str) -> Option<u32> {
    let mut total = 0u32;
    for part in words
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
    {
        total += word_value(&part.to_ascii_lowercase())?;
    }
    Some(total).filter(|value| *value > 0)
}

fn word_value(word: &str) -> Option<u32> {
    let value = match word {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
pub(crate) fn number_word_for_tests(words: &str) -> Option<u32> {
    number_word(words)
}

#[cfg(test)]
pub(crate) fn month_number_for_tests(name: &str) -> Option<u32> {
    month_number(name)
}
