use super::super::domain::{FactField, FactValue};
use super::normalizer::{self, Normalizer};
use regex::Regex;

const MONTH: &str = "january|february|march|april|may|june|july|august|september|october|\
november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

// Tens before teens before units so the longest spelling wins the alternation.
const NUMBER_WORD: &str = "(?:twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)\
(?:[\\s-]+(?:one|two|three|four|five|six|seven|eight|nine)\\b)?|ten|eleven|twelve|thirteen|\
fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|one|two|three|four|five|six|seven|eight|nine";

/// One entry of the extraction table: a pattern scanned over the whole text
/// and the function that turns its first match into a typed fact.
pub struct ExtractionRule {
    pub name: &'static str,
    pub field: FactField,
    pattern: Regex,
    normalize: Normalizer,
}

impl ExtractionRule {
    pub fn new(
        name: &'static str,
        field: FactField,
        pattern: &str,
        normalize: Normalizer,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            field,
            pattern: Regex::new(pattern)?,
            normalize,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Only the first match in document order is considered. A match the
    /// normalizer rejects leaves the field for lower-priority rules.
    pub(crate) fn evaluate(&self, text: &str) -> Option<FactValue> {
        let caps = self.pattern.captures(text)?;
        (self.normalize)(&caps).filter(|value| value.field() == self.field)
    }
}

impl std::fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionRule")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Digit rules precede word rules for the same field, so a numeric period
/// anywhere in the text beats a spelled-out one that appears earlier.
pub(crate) fn standard_rules() -> Vec<ExtractionRule> {
    let effective_date = format!(
        r"(?i)\b(?:effective\s+date|entered\s+into\s+as\s+of)\b[^.;\n]{{0,60}}?\b({MONTH})\.?\s+(\d{{1,2}}),?\s+(\d{{4}})\b"
    );
    let term_words =
        format!(r"(?i)initial\s+term.*?\b({NUMBER_WORD})[\s-]+(month|year)");
    let notice_words = format!(
        r"(?i)(?:at\s+least\s+)?\b({NUMBER_WORD})[\s-]+days?'?\s*(?:(?:prior|written)\s*)*notice"
    );

    let table: [(&'static str, FactField, String, Normalizer); 8] = [
        (
            "effective_date_phrase",
            FactField::EffectiveDate,
            effective_date,
            normalizer::effective_date,
        ),
        (
            "initial_term_digits",
            FactField::TermMonths,
            r"(?i)initial\s+term.*?(?:\(|\b)(\d+)\)?\s*(month|year)".to_string(),
            normalizer::term_in_digits,
        ),
        (
            "initial_term_words",
            FactField::TermMonths,
            term_words,
            normalizer::term_in_words,
        ),
        (
            "auto_renew_hyphenated",
            FactField::AutoRenew,
            format!("(?i){}", regex::escape("auto-renew")),
            normalizer::renewal_flag,
        ),
        (
            "automatically_renew",
            FactField::AutoRenew,
            format!("(?i){}", regex::escape("automatically renew")),
            normalizer::renewal_flag,
        ),
        (
            "automatically_renews",
            FactField::AutoRenew,
            format!("(?i){}", regex::escape("automatically renews")),
            normalizer::renewal_flag,
        ),
        (
            "notice_period_digits",
            FactField::NoticeDays,
            r"(?i)(?:at\s+least\s+)?(?:\(|\b)(\d+)\)?\s*days?'?\s*(?:(?:prior|written)\s*)*notice"
                .to_string(),
            normalizer::notice_in_digits,
        ),
        (
            "notice_period_words",
            FactField::NoticeDays,
            notice_words,
            normalizer::notice_in_words,
        ),
    ];

    table
        .into_iter()
        .map(|(name, field, pattern, normalize)| {
            ExtractionRule::new(name, field, &pattern, normalize)
                .expect("built-in extraction pattern compiles")
        })
        .collect()
}
