use anyhow::{Context, Result};
use chrono::Local;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::types::analysis::AnalysisResult;
use crate::types::resource::Backend;

pub trait Outlet {
    async fn save(&self, result: &AnalysisResult) -> Result<Vec<PathBuf>>;
}

/// Writes `<company>_ai_analysis.json` and `<company>_ai_analysis.txt`
pub struct DiskOutlet {
    output_dir: PathBuf,
    json: bool,
    report: bool,
}

impl DiskOutlet {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            output_dir: config.output_path.clone(),
            json: config.json,
            report: config.report,
        }
    }

    fn file_path(&self, company: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_ai_analysis.{}", file_stem(company), extension))
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, result: &AnalysisResult) -> Result<Vec<PathBuf>> {
        println!("\n🖊️ Exporting analysis...");
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let mut written = Vec::new();
        if self.json {
            let path = self.file_path(&result.company, "json");
            let body = serde_json::to_string_pretty(result)?;
            write_file(&path, body).await?;
            written.push(path);
        }
        if self.report {
            let path = self.file_path(&result.company, "txt");
            write_file(&path, render_report(result)).await?;
            written.push(path);
        }

        for path in &written {
            println!("💾 Saved {}", path.display());
        }
        Ok(written)
    }
}

async fn write_file(path: &Path, body: String) -> Result<()> {
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Company name reduced to characters safe in a file name
pub fn file_stem(company: &str) -> String {
    let stem: String = company
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "company".to_string()
    } else {
        stem.to_string()
    }
}

/// Plain text report with per-backend resource counts and links
pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(out, "AI Use-Case Analysis: {}", result.company);
    let _ = writeln!(
        out,
        "Generated: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{}\n", rule);
    let _ = writeln!(out, "COMPANY OVERVIEW\n{}\n", result.company_summary);
    let _ = writeln!(out, "NEWS & FUNDING\n{}\n", result.news_summary);
    let _ = writeln!(out, "AI USE CASES ({})", result.use_case_results.len());

    for (i, use_case) in result.use_case_results.iter().enumerate() {
        let resources = &use_case.resources;
        let _ = writeln!(out, "\n{}. {}", i + 1, use_case.use_case);
        let _ = writeln!(out, "   {}", use_case.description);
        let _ = writeln!(out, "   Search keywords: {}", use_case.search_keywords);
        let counts = Backend::ALL
            .iter()
            .map(|b| format!("{} {}", b.display_name(), resources.len_of(*b)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "   Resources: {}", counts);

        for item in &resources.arxiv {
            let _ = writeln!(out, "   - [arXiv] {} <{}>", item.inner().title, item.inner().url);
        }
        for item in &resources.huggingface {
            let _ = writeln!(out, "   - [Hugging Face] {} <{}>", item.inner().name, item.inner().url);
        }
        for item in &resources.kaggle {
            let _ = writeln!(out, "   - [Kaggle] {} <{}>", item.inner().title, item.inner().url);
        }
        for item in &resources.github {
            let repo = item.inner();
            if repo.stars > 0 {
                let _ = writeln!(out, "   - [GitHub] {} ⭐ {} <{}>", repo.name, repo.stars, repo.url);
            } else {
                let _ = writeln!(out, "   - [GitHub] {} <{}>", repo.name, repo.url);
            }
        }
    }

    out
}

/// Console summary printed at the end of a run
pub fn print_summary(result: &AnalysisResult) {
    println!("\n📊 {}", result.company);
    println!("   AI use cases:       {}", result.use_case_results.len());
    println!("   Total resources:    {}", result.total_resources());
    println!("   Platforms searched: {}", Backend::ALL.len());
}
