use serde::{Deserialize, Serialize};

/// Score every category receives when the model's rubric cannot be trusted.
pub const DEFAULT_CATEGORY_SCORE: u8 = 3;
pub const MIN_CATEGORY_SCORE: u8 = 1;
pub const MAX_CATEGORY_SCORE: u8 = 5;
pub const MIN_TOTAL_SCORE: u8 = 4;
pub const MAX_TOTAL_SCORE: u8 = 20;

/// Placeholder used when the model returned scores without explanations.
pub const NO_DETAILED_EVALUATION: &str = "Walang detalyadong ebalwasyon";
/// Placeholder used when the model output could not be parsed at all.
pub const PARSE_ERROR_FEEDBACK: &str = "Error sa pag-parse";

/// The four fixed dimensions of the Konseptong Papel rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricCategory {
    Nilalaman,
    Kaisahan,
    Kaayusan,
    Kaangkupan,
}

impl RubricCategory {
    pub const ALL: [RubricCategory; 4] = [
        RubricCategory::Nilalaman,
        RubricCategory::Kaisahan,
        RubricCategory::Kaayusan,
        RubricCategory::Kaangkupan,
    ];

    /// JSON key used by the model contract.
    pub fn key(self) -> &'static str {
        match self {
            RubricCategory::Nilalaman => "nilalaman",
            RubricCategory::Kaisahan => "kaisahan",
            RubricCategory::Kaayusan => "kaayusan",
            RubricCategory::Kaangkupan => "kaangkupan",
        }
    }
}

/// Per-category scores, each within `1..=5` once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricScores {
    pub nilalaman: u8,
    pub kaisahan: u8,
    pub kaayusan: u8,
    pub kaangkupan: u8,
}

impl RubricScores {
    pub fn uniform(score: u8) -> Self {
        Self {
            nilalaman: score,
            kaisahan: score,
            kaayusan: score,
            kaangkupan: score,
        }
    }

    pub fn get(&self, category: RubricCategory) -> u8 {
        match category {
            RubricCategory::Nilalaman => self.nilalaman,
            RubricCategory::Kaisahan => self.kaisahan,
            RubricCategory::Kaayusan => self.kaayusan,
            RubricCategory::Kaangkupan => self.kaangkupan,
        }
    }

    pub(crate) fn set(&mut self, category: RubricCategory, score: u8) {
        let slot = match category {
            RubricCategory::Nilalaman => &mut self.nilalaman,
            RubricCategory::Kaisahan => &mut self.kaisahan,
            RubricCategory::Kaayusan => &mut self.kaayusan,
            RubricCategory::Kaangkupan => &mut self.kaangkupan,
        };
        *slot = score;
    }

    pub fn total(&self) -> u8 {
        RubricCategory::ALL
            .iter()
            .map(|category| self.get(*category))
            .sum()
    }
}

impl Default for RubricScores {
    fn default() -> Self {
        Self::uniform(DEFAULT_CATEGORY_SCORE)
    }
}

/// Per-category explanations written by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricFeedback {
    pub nilalaman: String,
    pub kaisahan: String,
    pub kaayusan: String,
    pub kaangkupan: String,
}

impl RubricFeedback {
    pub fn uniform(text: &str) -> Self {
        Self {
            nilalaman: text.to_string(),
            kaisahan: text.to_string(),
            kaayusan: text.to_string(),
            kaangkupan: text.to_string(),
        }
    }

    pub fn get(&self, category: RubricCategory) -> &str {
        match category {
            RubricCategory::Nilalaman => &self.nilalaman,
            RubricCategory::Kaisahan => &self.kaisahan,
            RubricCategory::Kaayusan => &self.kaayusan,
            RubricCategory::Kaangkupan => &self.kaangkupan,
        }
    }

    pub(crate) fn set(&mut self, category: RubricCategory, text: String) {
        let slot = match category {
            RubricCategory::Nilalaman => &mut self.nilalaman,
            RubricCategory::Kaisahan => &mut self.kaisahan,
            RubricCategory::Kaayusan => &mut self.kaayusan,
            RubricCategory::Kaangkupan => &mut self.kaangkupan,
        };
        *slot = text;
    }
}

/// A flagged span of the essay, anchored to a character offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub original: String,
    pub suggestion: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: usize,
    pub index: usize,
}

/// Canonical evaluation returned for every model response, parsable or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub feedback: String,
    pub corrections: Vec<Correction>,
    pub rubric_scores: RubricScores,
    pub rubric_feedback: RubricFeedback,
    pub total_score: u8,
    pub grade: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl EvaluationResult {
    /// Result used when the model output is not a JSON object at all.
    pub fn parse_fallback(raw_response: &str) -> Self {
        let scores = RubricScores::default();
        let total_score = scores.total();
        Self {
            feedback: raw_response.to_string(),
            corrections: Vec::new(),
            rubric_scores: scores,
            rubric_feedback: RubricFeedback::uniform(PARSE_ERROR_FEEDBACK),
            total_score,
            grade: twenty_point_grade(total_score),
            strengths: Vec::new(),
            improvements: Vec::new(),
        }
    }
}

pub(crate) fn twenty_point_grade(total: u8) -> String {
    format!("{total}/{MAX_TOTAL_SCORE}")
}
