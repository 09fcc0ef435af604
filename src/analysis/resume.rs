//! Resume bullet extraction from free-form analysis text.

use std::fmt;

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::domain::{BulletSummary, TextGenerator};

use super::{dispatch, Generation};

const BULLET_COUNT: usize = 3;
const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];
const MIN_FRAGMENT_CHARS: usize = 10;

/// Emphasis of the generated resume statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Technical,
    Leadership,
    Impact,
    Learning,
}

impl FocusArea {
    /// Unknown values fall back to [`FocusArea::Technical`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("leadership") => FocusArea::Leadership,
            Some("impact") => FocusArea::Impact,
            Some("learning") => FocusArea::Learning,
            _ => FocusArea::Technical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FocusArea::Technical => "technical",
            FocusArea::Leadership => "leadership",
            FocusArea::Impact => "impact",
            FocusArea::Learning => "learning",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            FocusArea::Technical => {
                "Emphasize technical skills, technologies, architecture and implementation details."
            }
            FocusArea::Leadership => {
                "Emphasize ownership, project management, collaboration and decision making."
            }
            FocusArea::Impact => {
                "Emphasize measurable outcomes, value delivered and problems solved."
            }
            FocusArea::Learning => {
                "Emphasize new skills acquired, technologies explored and growth shown."
            }
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns an analysis into exactly three resume bullets.
pub struct ResumeSummarizer<'a> {
    generator: Option<&'a dyn TextGenerator>,
}

impl<'a> ResumeSummarizer<'a> {
    pub fn new(generator: Option<&'a dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Fails only when the backend cannot answer; any answer yields three points.
    pub async fn summarize(
        &self,
        repo: &str,
        analysis_text: &str,
        focus: FocusArea,
    ) -> Result<BulletSummary> {
        let prompt = build_prompt(repo, analysis_text, focus);
        let text = match dispatch(self.generator, &prompt).await {
            Generation::Text(text) => text,
            Generation::Unavailable(reason) => return Err(anyhow!(reason)),
        };

        let points = normalize_points(extract_points(&text), repo);
        info!("📌 Summarized {} into {} {} bullets", repo, points.len(), focus);

        Ok(BulletSummary {
            repo_identifier: repo.to_string(),
            focus_area: focus.as_str().to_string(),
            points,
        })
    }
}

fn build_prompt(repo: &str, analysis_text: &str, focus: FocusArea) -> String {
    format!(
        "Based on the following analysis of the GitHub repository \"{}\", write exactly \
         {} concise resume bullet points describing the work.\n{}\n\
         Start each bullet point with \"• \" on its own line, keep each under 30 words, \
         use strong action verbs, and output nothing but the bullet points.\n\n\
         Analysis:\n{}",
        repo,
        BULLET_COUNT,
        focus.guidance(),
        analysis_text
    )
}

/// Best-effort bullet parsing.
///
/// Lines starting with a bullet glyph are taken first. When that finds fewer
/// than three, the whole text is split on the glyphs and fragments longer than
/// ten characters are used instead, if that recovers more points.
pub fn extract_points(text: &str) -> Vec<String> {
    let by_line: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(|c: char| BULLET_GLYPHS.contains(&c)))
        .map(|rest| rest.trim().to_string())
        .filter(|point| !point.is_empty())
        .collect();
    if by_line.len() >= BULLET_COUNT {
        return by_line;
    }

    let fragments: Vec<String> = text
        .split(|c: char| BULLET_GLYPHS.contains(&c))
        .map(|fragment| fragment.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|fragment| fragment.chars().count() > MIN_FRAGMENT_CHARS)
        .take(BULLET_COUNT)
        .collect();
    if fragments.len() > by_line.len() {
        debug!("Recovered {} bullets from fragments", fragments.len());
        return fragments;
    }
    by_line
}

fn filler(repo: &str, idx: usize) -> String {
    match idx {
        0 => format!("Developed and maintained the {} project on GitHub", repo),
        1 => format!("Applied software engineering best practices throughout {}", repo),
        _ => format!("Documented and shared the {} codebase for collaborators", repo),
    }
}

/// Pad with fillers or truncate so exactly three points remain.
fn normalize_points(mut points: Vec<String>, repo: &str) -> Vec<String> {
    points.truncate(BULLET_COUNT);
    while points.len() < BULLET_COUNT {
        points.push(filler(repo, points.len()));
    }
    points
}

/// Human-readable rendering of a summary.
pub fn formatted_summary(summary: &BulletSummary) -> String {
    let mut out = format!(
        "{} ({} focus)\n",
        summary.repo_identifier, summary.focus_area
    );
    for point in &summary.points {
        out.push_str("\n• ");
        out.push_str(point);
    }
    out
}
