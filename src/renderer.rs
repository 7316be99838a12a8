use std::fmt::Write as _;
use std::sync::Mutex;

use crate::error::RenderError;
use crate::tokenize::FrequencyMap;
use crate::utils::escape_markup;

/// Rendered chart bytes plus the MIME type needed to embed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a frequency map into chart images.
///
/// Both methods must behave as pure functions of their input. Implementations
/// that hold non-reentrant drawing state should be wrapped in
/// [`SerializedRenderer`].
pub trait ChartRenderer {
    fn render_wordcloud(&self, freq: &FrequencyMap) -> Result<Image, RenderError>;

    fn render_bar_chart(&self, freq: &FrequencyMap, top_k: usize) -> Result<Image, RenderError>;
}

/// Gives one caller at a time exclusive access to a stateful renderer.
pub struct SerializedRenderer<R> {
    inner: Mutex<R>,
}

impl<R> SerializedRenderer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<R: ChartRenderer> SerializedRenderer<R> {
    fn with_inner<T>(
        &self,
        chart: &'static str,
        f: impl FnOnce(&R) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        let guard = self.inner.lock().map_err(|_| RenderError::Backend {
            chart,
            reason: "renderer lock poisoned".to_string(),
        })?;
        f(&*guard)
    }
}

impl<R: ChartRenderer> ChartRenderer for SerializedRenderer<R> {
    fn render_wordcloud(&self, freq: &FrequencyMap) -> Result<Image, RenderError> {
        self.with_inner("word cloud", |r| r.render_wordcloud(freq))
    }

    fn render_bar_chart(&self, freq: &FrequencyMap, top_k: usize) -> Result<Image, RenderError> {
        self.with_inner("bar chart", |r| r.render_bar_chart(freq, top_k))
    }
}

/// Stateless SVG charts.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
    /// Words drawn in the cloud, most frequent first.
    pub max_cloud_words: usize,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            max_cloud_words: 100,
        }
    }
}

const SVG_MIME: &str = "image/svg+xml";
const PALETTE: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];
const MIN_FONT: f64 = 14.0;
const MAX_FONT: f64 = 64.0;

impl SvgRenderer {
    fn svg(&self, height: u32, content: &str) -> Image {
        let mut out = String::with_capacity(content.len() + 256);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = height
        );
        let _ = write!(
            out,
            r#"<rect width="100%" height="100%" fill="white"/>{content}</svg>"#
        );
        Image {
            mime_type: SVG_MIME,
            bytes: out.into_bytes(),
        }
    }
}

impl ChartRenderer for SvgRenderer {
    /// Flows words left to right in rows, font size scaled by frequency.
    fn render_wordcloud(&self, freq: &FrequencyMap) -> Result<Image, RenderError> {
        let words = freq.top_k(self.max_cloud_words);
        if words.is_empty() {
            return Err(RenderError::EmptyVocabulary {
                chart: "word cloud",
            });
        }

        let max = f64::from(words[0].1);
        let min = f64::from(words[words.len() - 1].1);
        let span = (max - min).max(1.0);
        let width = f64::from(self.width);
        let margin = 10.0;

        let mut body = String::new();
        let (mut x, mut baseline, mut row_height) = (margin, margin, 0.0_f64);
        for (index, (word, count)) in words.iter().enumerate() {
            let font = MIN_FONT + (f64::from(*count) - min) / span * (MAX_FONT - MIN_FONT);
            // glyph width estimate for a sans-serif face
            let advance = font * 0.6 * word.chars().count() as f64 + font * 0.4;
            if x + advance > width - margin && x > margin {
                x = margin;
                baseline += row_height;
                row_height = 0.0;
            }
            row_height = row_height.max(font * 1.2);
            let _ = write!(
                body,
                r#"<text x="{x:.1}" y="{y:.1}" font-family="sans-serif" font-size="{font:.1}" fill="{color}">{word}</text>"#,
                y = baseline + font,
                color = PALETTE[index % PALETTE.len()],
                word = escape_markup(word),
            );
            x += advance;
        }

        let height = (baseline + row_height + margin).ceil().max(f64::from(self.height)) as u32;
        Ok(self.svg(height, &body))
    }

    fn render_bar_chart(&self, freq: &FrequencyMap, top_k: usize) -> Result<Image, RenderError> {
        let top = freq.top_k(top_k);
        if top.is_empty() {
            return Err(RenderError::EmptyVocabulary { chart: "bar chart" });
        }

        let (left, right, top_pad, bottom) = (60.0, 20.0, 40.0, 90.0);
        let plot_w = f64::from(self.width) - left - right;
        let plot_h = f64::from(self.height) - top_pad - bottom;
        let max = f64::from(top[0].1);
        let slot = plot_w / top.len() as f64;
        let bar_w = slot * 0.7;
        let axis_y = top_pad + plot_h;

        let mut body = String::new();
        let _ = write!(
            body,
            r#"<text x="{cx:.1}" y="24" text-anchor="middle" font-family="sans-serif" font-size="18">Top {n} Words</text>"#,
            cx = f64::from(self.width) / 2.0,
            n = top.len()
        );
        let _ = write!(
            body,
            r#"<line x1="{left}" y1="{top_pad}" x2="{left}" y2="{axis_y}" stroke="black"/><line x1="{left}" y1="{axis_y}" x2="{x2}" y2="{axis_y}" stroke="black"/>"#,
            x2 = left + plot_w
        );

        for (index, (word, count)) in top.iter().enumerate() {
            let bar_h = f64::from(*count) / max * plot_h;
            let x = left + slot * index as f64 + (slot - bar_w) / 2.0;
            let cx = x + bar_w / 2.0;
            let _ = write!(
                body,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{fill}"/>"#,
                y = axis_y - bar_h,
                fill = PALETTE[0],
            );
            let _ = write!(
                body,
                r#"<text x="{cx:.1}" y="{vy:.1}" text-anchor="middle" font-family="sans-serif" font-size="11">{count}</text>"#,
                vy = axis_y - bar_h - 4.0,
            );
            let _ = write!(
                body,
                r#"<text x="{cx:.1}" y="{ly:.1}" text-anchor="end" font-family="sans-serif" font-size="12" transform="rotate(-45 {cx:.1} {ly:.1})">{word}</text>"#,
                ly = axis_y + 14.0,
                word = escape_markup(word),
            );
        }

        let _ = write!(
            body,
            r#"<text x="{cx:.1}" y="{y:.1}" text-anchor="middle" font-family="sans-serif" font-size="13">Words</text>"#,
            cx = left + plot_w / 2.0,
            y = f64::from(self.height) - 8.0
        );
        let _ = write!(
            body,
            r#"<text x="16" y="{cy:.1}" text-anchor="middle" font-family="sans-serif" font-size="13" transform="rotate(-90 16 {cy:.1})">Frequency</text>"#,
            cy = top_pad + plot_h / 2.0
        );

        Ok(self.svg(self.height, &body))
    }
}
