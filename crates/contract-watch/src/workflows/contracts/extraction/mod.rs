mod normalizer;
mod rules;

pub use normalizer::Normalizer;
pub use rules::ExtractionRule;

use super::domain::Facts;
use once_cell::sync::Lazy;
use tracing::debug;

static STANDARD_EXTRACTOR: Lazy<FactExtractor> =
    Lazy::new(|| FactExtractor::new(rules::standard_rules()));

/// Runs the built-in rule table over `text`.
pub fn extract(text: &str) -> Facts {
    FactExtractor::standard().extract(text)
}

/// Ordered table of independent extraction rules.
///
/// Each rule scans the whole text on its own. Rules for the same field are
/// tried in table order and the first one yielding a valid value fills the
/// field; later rules for that field are skipped. Extraction never fails, an
/// unmatched field is simply left absent.
#[derive(Debug)]
pub struct FactExtractor {
    rules: Vec<ExtractionRule>,
}

impl FactExtractor {
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    pub fn standard() -> &'static FactExtractor {
        &STANDARD_EXTRACTOR
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn extract(&self, text: &str) -> Facts {
        let mut facts = Facts::default();

        for rule in &self.rules {
            if facts.has(rule.field) {
                continue;
            }

            if let Some(value) = rule.evaluate(text) {
                debug!(rule = rule.name, ?value, "extraction rule matched");
                facts.record(value);
            }
        }

        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::contracts::domain::{FactField, FactValue};
    use chrono::NaiveDate;

    #[test]
    fn number_words_cover_compounds_and_reject_unknowns() {
        assert_eq!(normalizer::number_word_for_tests("twelve"), Some(12));
        assert_eq!(normalizer::number_word_for_tests("Forty-Five"), Some(45));
        assert_eq!(normalizer::number_word_for_tests("twenty one"), Some(21));
        assert_eq!(normalizer::number_word_for_tests("dozen"), None);
    }

    #[test]
    fn month_names_accept_abbreviations() {
        assert_eq!(normalizer::month_number_for_tests("September"), Some(9));
        assert_eq!(normalizer::month_number_for_tests("Sept."), Some(9));
        assert_eq!(normalizer::month_number_for_tests("DEC"), Some(12));
        assert_eq!(normalizer::month_number_for_tests("Smarch"), None);
    }

    #[test]
    fn standard_table_keeps_digit_rules_ahead_of_word_rules() {
        let names: Vec<_> = FactExtractor::standard()
            .rules()
            .iter()
            .filter(|rule| rule.field == FactField::TermMonths)
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names, vec!["initial_term_digits", "initial_term_words"]);
    }

    #[test]
    fn custom_rules_extend_the_table_without_touching_control_flow() {
        let mut rules = rules::standard_rules();
        rules.push(
            ExtractionRule::new(
                "commencement_date_iso",
                FactField::EffectiveDate,
                r"(?i)commencement\s+date:\s*(\d{4})-(\d{2})-(\d{2})",
                |caps| {
                    let date = NaiveDate::from_ymd_opt(
                        caps[1].parse().ok()?,
                        caps[2].parse().ok()?,
                        caps[3].parse().ok()?,
                    )?;
                    Some(FactValue::EffectiveDate(date))
                },
            )
            .expect("pattern compiles"),
        );
        let extractor = FactExtractor::new(rules);

        let facts = extractor.extract("Commencement Date: 2023-07-15");
        assert_eq!(facts.effective_date, NaiveDate::from_ymd_opt(2023, 7, 15));
    }

    #[test]
    fn rejected_match_falls_through_to_next_rule() {
        let facts = extract("The initial term is zero (0) months, renewable for twelve months.");
        // digit rule rejects 0; the word rule then finds "twelve months"
        assert_eq!(facts.term_months, Some(12));
    }
}
