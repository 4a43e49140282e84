//! Summary renderer
//!
//! Maps each annotated sentence to a presentation (visual class + hint)
//! and lays the sentences out in the order received. The mapping is a pure
//! function of the status; no state is carried from one sentence to the
//! next.

use crate::types::{AnnotatedSentence, SentenceStatus};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

/// Visual treatment of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualClass {
    /// Hallucination risk
    Flagged,
    /// Verified against the source
    Verified,
    /// Everything else
    Plain,
}

impl VisualClass {
    /// Marker prefixed to a sentence in plain-text output
    pub fn marker(&self) -> &'static str {
        match self {
            VisualClass::Flagged => "⚠",
            VisualClass::Verified => "✓",
            VisualClass::Plain => "·",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            VisualClass::Flagged => Style::default()
                .fg(Color::Rgb(185, 28, 28))
                .bg(Color::Rgb(254, 226, 226))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            VisualClass::Verified => Style::default().fg(Color::LightGreen),
            VisualClass::Plain => Style::default(),
        }
    }
}

/// Hint text template, filled with the sentence confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTemplate {
    HallucinationWarning,
    Confidence,
}

impl HintTemplate {
    pub fn render(&self, confidence: f64) -> String {
        match self {
            HintTemplate::HallucinationWarning => format!(
                "⚠ Potential hallucination detected (confidence {})",
                format_percentage(confidence)
            ),
            HintTemplate::Confidence => format!("Confidence: {}", format_percentage(confidence)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub class: VisualClass,
    pub hint: HintTemplate,
}

/// Presentation for a status
pub fn presentation_for(status: &SentenceStatus) -> Presentation {
    match status {
        SentenceStatus::HallucinationRisk => Presentation {
            class: VisualClass::Flagged,
            hint: HintTemplate::HallucinationWarning,
        },
        SentenceStatus::Verified => Presentation {
            class: VisualClass::Verified,
            hint: HintTemplate::Confidence,
        },
        SentenceStatus::Unverified | SentenceStatus::Other(_) => Presentation {
            class: VisualClass::Plain,
            hint: HintTemplate::Confidence,
        },
    }
}

/// Confidence as a percentage with one decimal, unclamped
pub fn format_percentage(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// One rendered sentence
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan<'a> {
    /// Position in the summary
    pub index: usize,
    pub text: &'a str,
    pub class: VisualClass,
    pub hint: String,
}

/// Lazy iterator over styled sentences; clone it to restart
#[derive(Debug, Clone)]
pub struct SummarySpans<'a> {
    sentences: &'a [AnnotatedSentence],
    next: usize,
}

impl<'a> Iterator for SummarySpans<'a> {
    type Item = StyledSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let sentence = self.sentences.get(self.next)?;
        let presentation = presentation_for(&sentence.status);
        let span = StyledSpan {
            index: self.next,
            text: &sentence.text,
            class: presentation.class,
            hint: presentation.hint.render(sentence.confidence),
        };
        self.next += 1;
        Some(span)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sentences.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SummarySpans<'_> {}

pub fn summary_spans(sentences: &[AnnotatedSentence]) -> SummarySpans<'_> {
    SummarySpans { sentences, next: 0 }
}

/// Flowing paragraph of sentences, with `selected` highlighted
pub fn summary_text<'a>(spans: SummarySpans<'a>, selected: Option<usize>) -> Text<'a> {
    let mut line = Vec::with_capacity(spans.len() * 2);
    for span in spans {
        if span.index > 0 {
            line.push(Span::raw(" "));
        }
        let mut style = span.class.style();
        if selected == Some(span.index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        line.push(Span::styled(span.text, style));
    }
    Text::from(Line::from(line))
}

/// Legend explaining the visual classes
pub fn legend_line() -> Line<'static> {
    // Each entry is drawn in the style it explains
    Line::from(vec![
        Span::styled("⚠ Hallucination Risk", VisualClass::Flagged.style()),
        Span::raw("   "),
        Span::styled("✓ Verified Text", VisualClass::Verified.style()),
    ])
}

/// Plain-text rendering: one line per sentence with marker and hint
pub fn plain_lines(sentences: &[AnnotatedSentence]) -> Vec<String> {
    summary_spans(sentences)
        .map(|span| format!("{} {}  [{}]", span.class.marker(), span.text, span.hint))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str, status: SentenceStatus, confidence: f64) -> AnnotatedSentence {
        AnnotatedSentence {
            text: text.to_string(),
            status,
            confidence,
        }
    }

    #[test]
    fn test_hallucination_risk_is_flagged_with_percentage() {
        let sentences = [sentence("Acme is on Mars.", SentenceStatus::HallucinationRisk, 0.42)];
        let span = summary_spans(&sentences).next().unwrap();
        assert_eq!(span.class, VisualClass::Flagged);
        assert!(span.hint.contains("42.0%"));
        assert!(span.hint.contains("Potential hallucination"));
    }

    #[test]
    fn test_verified_is_never_flagged() {
        let sentences = [sentence("Alice founded Acme.", SentenceStatus::Verified, 0.42)];
        let span = summary_spans(&sentences).next().unwrap();
        assert_eq!(span.class, VisualClass::Verified);
        assert_eq!(span.hint, "Confidence: 42.0%");
    }

    #[test]
    fn test_other_statuses_are_plain_with_confidence() {
        for status in [
            SentenceStatus::Unverified,
            SentenceStatus::Other("Disputed".to_string()),
        ] {
            let p = presentation_for(&status);
            assert_eq!(p.class, VisualClass::Plain);
            assert_eq!(p.hint.render(0.5), "Confidence: 50.0%");
        }
    }

    #[test]
    fn test_out_of_range_confidence_is_not_clamped() {
        assert_eq!(format_percentage(1.234), "123.4%");
        assert_eq!(format_percentage(-0.1), "-10.0%");
    }

    #[test]
    fn test_empty_summary_renders_nothing() {
        let spans = summary_spans(&[]);
        assert_eq!(spans.len(), 0);
        let text = summary_text(spans, None);
        assert_eq!(text.lines.len(), 1);
        assert!(text.lines[0].spans.is_empty());
    }

    #[test]
    fn test_spans_are_restartable() {
        let sentences = [
            sentence("a", SentenceStatus::Verified, 0.9),
            sentence("b", SentenceStatus::Unverified, 0.5),
        ];
        let spans = summary_spans(&sentences);
        let first: Vec<_> = spans.clone().map(|s| s.text).collect();
        let second: Vec<_> = spans.map(|s| s.text).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_selected_sentence_is_highlighted() {
        let sentences = [
            sentence("a", SentenceStatus::Verified, 0.9),
            sentence("b", SentenceStatus::HallucinationRisk, 0.5),
        ];
        let text = summary_text(summary_spans(&sentences), Some(1));
        let spans = &text.lines[0].spans;
        // a, separator, b
        assert_eq!(spans.len(), 3);
        assert!(!spans[0].style.add_modifier.contains(Modifier::REVERSED));
        assert!(spans[2].style.add_modifier.contains(Modifier::REVERSED));
        assert!(spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_legend_matches_sentence_styles() {
        let legend = legend_line();
        let flagged = legend
            .spans
            .iter()
            .find(|s| s.content.contains("Hallucination Risk"))
            .unwrap();
        assert_eq!(flagged.style, VisualClass::Flagged.style());
        let verified = legend
            .spans
            .iter()
            .find(|s| s.content.contains("Verified Text"))
            .unwrap();
        assert_eq!(verified.style, VisualClass::Verified.style());
    }

    #[test]
    fn test_flagged_style_has_light_red_tint() {
        let style = VisualClass::Flagged.style();
        match style.bg {
            Some(Color::Rgb(r, g, b)) => assert!(r > 200 && g > 150 && b > 150 && r > g),
            other => panic!("expected an rgb tint, got {:?}", other),
        }
        assert!(style.add_modifier.contains(Modifier::BOLD | Modifier::UNDERLINED));
    }

    #[test]
    fn test_plain_lines() {
        let sentences = [sentence("Acme is on Mars.", SentenceStatus::HallucinationRisk, 0.42)];
        assert_eq!(
            plain_lines(&sentences),
            vec!["⚠ Acme is on Mars.  [⚠ Potential hallucination detected (confidence 42.0%)]"]
        );
    }
}
