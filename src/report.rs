use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::time::Instant;
use tracing::{info, warn};

use crate::analyzer::AnalysisResult;
use crate::error::RenderError;
use crate::renderer::{ChartRenderer, Image};
use crate::utils::escape_markup;

pub const DEFAULT_TITLE: &str = "Post Analysis Report";
pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub top_k: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A chart slot in a section: the image, or why it could not be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chart {
    Rendered(Image),
    Unavailable(String),
}

impl Chart {
    fn from_render(result: Result<Image, RenderError>, record_id: i64) -> Self {
        match result {
            Ok(image) => Chart::Rendered(image),
            Err(e) => {
                warn!(
                    action = "placeholder",
                    component = "report",
                    record_id,
                    error = %e,
                    "Chart rendering failed, using placeholder"
                );
                Chart::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Chart::Rendered(_))
    }

    fn to_html(&self, alt: &str) -> String {
        match self {
            Chart::Rendered(image) => format!(
                "<img src='data:{};base64,{}' alt='{}'>",
                image.mime_type,
                STANDARD.encode(&image.bytes),
                alt
            ),
            Chart::Unavailable(reason) => format!(
                "<div class=\"placeholder\">{} unavailable: {}</div>",
                alt,
                escape_markup(reason)
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub id: i64,
    pub unique_title: Vec<String>,
    pub unique_body: Vec<String>,
    pub common: Vec<String>,
    pub wordcloud: Chart,
    pub bar_chart: Chart,
}

/// The finished report, independent of where it is written.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

/// Builds one section per result, in the order given.
///
/// Renderer failures never abort the report: the affected chart becomes
/// [`Chart::Unavailable`].
pub fn assemble(
    results: &[AnalysisResult],
    renderer: &dyn ChartRenderer,
    options: &ReportOptions,
) -> Document {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "report",
        section_count = results.len(),
        "Assembling report"
    );

    let sections: Vec<Section> = results
        .iter()
        .map(|result| Section {
            id: result.id,
            unique_title: result.unique_title.iter().cloned().collect(),
            unique_body: result.unique_body.iter().cloned().collect(),
            common: result.common.iter().cloned().collect(),
            wordcloud: Chart::from_render(renderer.render_wordcloud(&result.all_words), result.id),
            bar_chart: Chart::from_render(
                renderer.render_bar_chart(&result.all_words, options.top_k),
                result.id,
            ),
        })
        .collect();

    let document = Document {
        title: options.title.clone(),
        generated_at: Utc::now(),
        sections,
    };

    info!(
        action = "complete",
        component = "report",
        section_count = document.sections.len(),
        placeholders = document.placeholder_count(),
        duration_ms = start_time.elapsed().as_millis(),
        "Report assembled"
    );

    document
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; padding: 20px; max-width: 1200px; margin: 0 auto; }
        h1 { color: #333; text-align: center; }
        h2 { color: #444; border-bottom: 1px solid #ddd; padding-bottom: 10px; }
        .post { background-color: #f9f9f9; border: 1px solid #ddd; border-radius: 5px; padding: 20px; margin-bottom: 20px; }
        .word-list { columns: 3; }
        .chart-container { display: flex; justify-content: space-between; margin-top: 20px; }
        .chart { width: 48%; }
        .placeholder { color: #999; font-style: italic; }
        .generated { color: #777; text-align: center; font-size: 0.9em; }
        img { max-width: 100%; height: auto; }
"#;

fn word_list(words: &[String]) -> String {
    escape_markup(&words.join(", "))
}

impl Document {
    /// Charts that fell back to a placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| [&s.wordcloud, &s.bar_chart])
            .filter(|chart| !chart.is_rendered())
            .count()
    }

    pub fn to_html(&self) -> String {
        let title = escape_markup(&self.title);
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <h1>{title}</h1>
    <p class="generated">Generated {generated}</p>
"#,
            generated = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        for section in &self.sections {
            let _ = write!(
                html,
                r#"    <div class="post">
        <h2>Post {id}</h2>
        <h3>Unique words in title:</h3>
        <div class="word-list">{unique_title}</div>
        <h3>Unique words in body:</h3>
        <div class="word-list">{unique_body}</div>
        <h3>Common words:</h3>
        <div class="word-list">{common}</div>
        <div class="chart-container">
            <div class="chart">
                <h3>Word Cloud</h3>
                {wordcloud}
            </div>
            <div class="chart">
                <h3>Top Words</h3>
                {bar_chart}
            </div>
        </div>
    </div>
"#,
                id = section.id,
                unique_title = word_list(&section.unique_title),
                unique_body = word_list(&section.unique_body),
                common = word_list(&section.common),
                wordcloud = section.wordcloud.to_html("Word Cloud"),
                bar_chart = section.bar_chart.to_html("Bar Chart"),
            );
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}
