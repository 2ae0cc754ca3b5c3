use serde::{Deserialize, Deserializer, Serialize};

/// A paper stored by the backend after upload and analysis.
///
/// Listing responses omit `results`; fetch-by-id responses include them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub public_url: String,
    #[serde(default)]
    pub uploaded_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    #[serde(default)]
    pub stat_tests: Vec<StatTestResult>,
    #[serde(default)]
    pub grim_checks: Vec<GrimResult>,
}

/// One StatCheck row: a reported test statistic with its recomputed p-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTestResult {
    pub test: String,
    #[serde(default)]
    pub p_value: Option<f64>,
    #[serde(default)]
    pub reported_p: Option<f64>,
    pub significant: bool,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub df1: Option<f64>,
    #[serde(default)]
    pub df2: Option<f64>,
    #[serde(default)]
    pub test_statistic: Option<f64>,
}

/// One GRIM check on a reported mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrimResult {
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub n: Option<u64>,
    /// `None` means the backend could not decide.
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrimOutcome {
    Passed,
    Failed,
    Inconclusive,
}

/// A recent arXiv paper fetched and auto-analyzed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivPaper {
    #[serde(default, deserialize_with = "opaque_id_opt")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub summary: String,
    pub pdf_url: String,
    pub arxiv_id: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub analysis_complete: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Pass/fail tallies shown under the result lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub stat_total: usize,
    pub stat_passed: usize,
    pub grim_total: usize,
    pub grim_passed: usize,
    pub grim_failed: usize,
}

impl AnalysisResults {
    pub fn is_empty(&self) -> bool {
        self.stat_tests.is_empty() && self.grim_checks.is_empty()
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            stat_total: self.stat_tests.len(),
            stat_passed: self.stat_tests.iter().filter(|t| t.significant).count(),
            grim_total: self.grim_checks.len(),
            grim_passed: self
                .grim_checks
                .iter()
                .filter(|g| g.outcome() == GrimOutcome::Passed)
                .count(),
            grim_failed: self
                .grim_checks
                .iter()
                .filter(|g| g.outcome() == GrimOutcome::Failed)
                .count(),
        }
    }
}

impl StatTestResult {
    /// Symbol used when printing the test statistic, e.g. `t = 2.310`.
    pub fn statistic_symbol(&self) -> &'static str {
        if self.test.contains('t') {
            "t"
        } else if self.test.contains('F') {
            "F"
        } else {
            "stat"
        }
    }

    pub fn degrees_of_freedom(&self) -> Option<(Option<f64>, Option<f64>)> {
        match (self.df1, self.df2) {
            (None, None) => None,
            pair => Some(pair),
        }
    }
}

impl GrimResult {
    pub fn outcome(&self) -> GrimOutcome {
        match self.passed {
            Some(true) => GrimOutcome::Passed,
            Some(false) => GrimOutcome::Failed,
            None => GrimOutcome::Inconclusive,
        }
    }

    /// Confidence as a whole percentage, clamped to 0..=100.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl GrimOutcome {
    pub fn label(self) -> &'static str {
        match self {
            GrimOutcome::Passed => "GRIM Test Passed",
            GrimOutcome::Failed => "GRIM Test Failed",
            GrimOutcome::Inconclusive => "GRIM Test Inconclusive",
        }
    }
}

impl ArxivPaper {
    /// Stored document id when the backend finished analyzing this paper.
    pub fn analysis_id(&self) -> Option<&str> {
        if self.analysis_complete {
            self.id.as_deref()
        } else {
            None
        }
    }
}

// Backends disagree on whether ids are strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(i) => i.to_string(),
            RawId::Uint(u) => u.to_string(),
        }
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn opaque_id_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
