use crate::config::AcademicConfig;

/// Recognizes scholarly text by counting distinct domain terms it mentions
#[derive(Debug, Clone)]
pub struct AcademicContextDetector {
    terms: Vec<String>,
    min_terms: usize,
}

impl AcademicContextDetector {
    pub fn new(config: &AcademicConfig) -> Self {
        let mut terms: Vec<String> = config.terms.iter().map(|t| t.trim().to_lowercase()).collect();
        terms.sort();
        terms.dedup();

        Self {
            terms,
            min_terms: config.min_terms,
        }
    }

    /// Distinct terms appearing anywhere in the text, case-insensitively
    pub fn count_terms(&self, text: &str) -> usize {
        let lower_text = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| !term.is_empty() && lower_text.contains(term.as_str()))
            .count()
    }

    pub fn is_academic_context(&self, text: &str) -> bool {
        self.count_terms(text) >= self.min_terms
    }
}

impl Default for AcademicContextDetector {
    fn default() -> Self {
        Self::new(&AcademicConfig::default())
    }
}
