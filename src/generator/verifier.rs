use std::fmt::Display;

use crate::generator::orchestrator::generic_summary;
use crate::types::analysis::AnalysisResult;
use crate::types::resource::Backend;

/// Summaries shorter than this are considered missing
pub const MIN_SUMMARY_CHARS: usize = 10;

/// A completeness gap found and repaired by the verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationIssue {
    ShortSummary { length: usize },
    NoUseCases,
    MissingResources {
        index: usize,
        use_case: String,
        backend: Backend,
    },
}

impl Display for VerificationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationIssue::ShortSummary { length } => {
                write!(f, "company summary too short ({} chars)", length)
            }
            VerificationIssue::NoUseCases => write!(f, "no use cases"),
            VerificationIssue::MissingResources {
                index,
                use_case,
                backend,
            } => write!(
                f,
                "use case #{} `{}` has no {} resources",
                index + 1,
                use_case,
                backend
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub issues: Vec<VerificationIssue>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of placeholder resources injected
    pub fn placeholders_added(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, VerificationIssue::MissingResources { .. }))
            .count()
    }
}

/// Completeness check, placeholder repair and normalization.
///
/// Never fails. Applying it to its own output changes nothing.
pub struct ResultVerifier;

impl ResultVerifier {
    /// Lists completeness gaps without touching the result
    pub fn check(result: &AnalysisResult) -> VerificationReport {
        let mut issues = Vec::new();

        let length = result.company_summary.trim().chars().count();
        if length < MIN_SUMMARY_CHARS {
            issues.push(VerificationIssue::ShortSummary { length });
        }
        if result.use_case_results.is_empty() {
            issues.push(VerificationIssue::NoUseCases);
        }
        for (index, use_case) in result.use_case_results.iter().enumerate() {
            for backend in use_case.resources.missing_backends() {
                issues.push(VerificationIssue::MissingResources {
                    index,
                    use_case: use_case.use_case.clone(),
                    backend,
                });
            }
        }

        VerificationReport { issues }
    }

    /// Repairs every gap and projects resources onto their canonical shape
    pub fn verify(raw: AnalysisResult) -> (AnalysisResult, VerificationReport) {
        let report = Self::check(&raw);
        for issue in &report.issues {
            tracing::warn!(%issue, "repairing analysis result");
        }

        let mut result = raw;
        for issue in &report.issues {
            match issue {
                VerificationIssue::ShortSummary { .. } => {
                    result.company_summary = generic_summary(&result.company);
                }
                VerificationIssue::NoUseCases => {}
                VerificationIssue::MissingResources {
                    index,
                    use_case,
                    backend,
                } => {
                    if let Some(entry) = result.use_case_results.get_mut(*index) {
                        entry.resources.insert_placeholder(*backend, use_case);
                    }
                }
            }
        }

        for use_case in &mut result.use_case_results {
            use_case.resources = std::mem::take(&mut use_case.resources).canonical();
        }

        (result, report)
    }

    pub fn finalize(raw: AnalysisResult) -> AnalysisResult {
        Self::verify(raw).0
    }
}
