use crate::data_models::JobLevel;

/// A single classification rule: if `matches` accepts the lowercased
/// experience text, the vacancy gets `level`.
#[derive(Clone, Copy)]
pub struct LevelRule {
    pub level: JobLevel,
    pub matches: fn(&str) -> bool,
}

impl LevelRule {
    pub const fn new(level: JobLevel, matches: fn(&str) -> bool) -> Self {
        Self { level, matches }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn no_experience(text: &str) -> bool {
    contains_any(text, &["нет", "без опыта", "no experience", "0"])
}

fn one_to_three_years(text: &str) -> bool {
    (text.contains('1') && text.contains('3')) || contains_any(text, &["от 1 года", "from 1 year"])
}

fn long_experience(text: &str) -> bool {
    contains_any(text, &["3", "6", "более", "more than"])
}

/// Infers a [`JobLevel`] from the free-text experience requirement.
///
/// Rules are tried top to bottom and the first hit wins, so a text such as
/// "от 1 года до 3 лет" is Middle even though it also mentions "3".
pub struct LevelClassifier {
    rules: Vec<LevelRule>,
}

impl LevelClassifier {
    pub fn new(rules: Vec<LevelRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[LevelRule] {
        &self.rules
    }

    pub fn classify(&self, experience: Option<&str>) -> JobLevel {
        let text = match experience.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_lowercase(),
            _ => return JobLevel::Unspecified,
        };
        self.rules
            .iter()
            .find(|rule| (rule.matches)(&text))
            .map(|rule| rule.level)
            .unwrap_or(JobLevel::Unspecified)
    }
}

impl Default for LevelClassifier {
    fn default() -> Self {
        Self::new(vec![
            LevelRule::new(JobLevel::Junior, no_experience),
            LevelRule::new(JobLevel::Middle, one_to_three_years),
            LevelRule::new(JobLevel::Senior, long_experience),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_experience_names() {
        let classifier = LevelClassifier::default();
        assert_eq!(classifier.classify(Some("Нет опыта")), JobLevel::Junior);
        assert_eq!(classifier.classify(Some("От 1 года до 3 лет")), JobLevel::Middle);
        assert_eq!(classifier.classify(Some("От 3 до 6 лет")), JobLevel::Senior);
        assert_eq!(classifier.classify(Some("Более 6 лет")), JobLevel::Senior);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let classifier = LevelClassifier::default();
        // "от 1 года" is Middle even with a "3" in the text
        assert_eq!(classifier.classify(Some("от 1 года, до 3")), JobLevel::Middle);
        // "без опыта" is Junior whatever else is present
        assert_eq!(classifier.classify(Some("без опыта, или более 6 лет")), JobLevel::Junior);
        // the bare "0" token belongs to the junior rule, "10 лет" included
        assert_eq!(classifier.classify(Some("10 лет")), JobLevel::Junior);
    }

    #[test]
    fn test_english_phrases() {
        let classifier = LevelClassifier::default();
        assert_eq!(classifier.classify(Some("No experience")), JobLevel::Junior);
        assert_eq!(classifier.classify(Some("From 1 year")), JobLevel::Middle);
        assert_eq!(classifier.classify(Some("More than six years")), JobLevel::Senior);
    }

    #[test]
    fn test_unmatched_and_empty_text() {
        let classifier = LevelClassifier::default();
        assert_eq!(classifier.classify(None), JobLevel::Unspecified);
        assert_eq!(classifier.classify(Some("   ")), JobLevel::Unspecified);
        assert_eq!(classifier.classify(Some("по договорённости")), JobLevel::Unspecified);
    }

    #[test]
    fn test_custom_rule_order() {
        let classifier = LevelClassifier::new(vec![LevelRule::new(JobLevel::Senior, |t| {
            t.contains("lead")
        })]);
        assert_eq!(classifier.classify(Some("Team Lead")), JobLevel::Senior);
        assert_eq!(classifier.classify(Some("Нет опыта")), JobLevel::Unspecified);
        assert_eq!(classifier.rules().len(), 1);
    }
}
