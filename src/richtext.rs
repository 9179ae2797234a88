//! Bold labels inside report paragraphs.
//!
//! Paragraphs and list items are written as plain strings with `**bold**`
//! runs, such as `**Staffing:** Hire a Club Manager`. [`parse_markup`] splits
//! them into [`Span`]s, which the layout layer turns into `genpdf` styled
//! strings.

use std::fmt;

use genpdf::style::{Style, StyledString};

const BOLD_DELIMITER: &str = "**";

/// A run of text that is either bold or inherits the paragraph weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Converts the span to a [`StyledString`].
    ///
    /// Only the weight is set; size and colour come from the paragraph style.
    pub fn to_styled_string(&self) -> StyledString {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        StyledString::new(self.text.clone(), style)
    }
}

/// Concatenates the text of all spans, dropping styles.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// A `**` without a partner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
}

impl ParseError {
    /// Byte index of the unmatched delimiter.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated bold span (at byte {})", self.index)
    }
}

impl std::error::Error for ParseError {}

/// Splits `input` on `**` delimiters into alternating plain and bold spans.
///
/// Empty runs are dropped. An odd number of delimiters is an error pointing
/// at the last one.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let delimiters: Vec<usize> = input
        .match_indices(BOLD_DELIMITER)
        .map(|(index, _)| index)
        .collect();
    if delimiters.len() % 2 == 1 {
        let index = delimiters.last().copied().unwrap_or_default();
        return Err(ParseError { index });
    }

    Ok(input
        .split(BOLD_DELIMITER)
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(position, text)| {
            let span = Span::new(text);
            if position % 2 == 1 {
                span.bold()
            } else {
                span
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_style_reflects_weight() {
        let styled = Span::new("Hello").bold().to_styled_string();
        assert_eq!(styled.s, "Hello");
        assert!(styled.style.is_bold());
        assert!(!Span::new("Hello").to_styled_string().style.is_bold());
    }

    #[test]
    fn parse_plain_text() {
        let spans = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(spans, vec![Span::new("Hello world")]);
    }

    #[test]
    fn parse_bold_label_prefix() {
        let spans = parse_markup("**Staffing:** Hire a Club Manager").expect("parse succeeds");
        assert_eq!(
            spans,
            vec![Span::new("Staffing:").bold(), Span::new(" Hire a Club Manager")]
        );
        assert_eq!(plain_text(&spans), "Staffing: Hire a Club Manager");
    }

    #[test]
    fn bold_runs_inside_a_sentence() {
        let spans =
            parse_markup("Revenue reaches **$699,986** by **Year 4**.").expect("parse succeeds");
        let bold: Vec<&str> = spans
            .iter()
            .filter(|span| span.is_bold())
            .map(Span::text)
            .collect();
        assert_eq!(bold, vec!["$699,986", "Year 4"]);
        assert_eq!(spans.last().map(Span::text), Some("."));
    }

    #[test]
    fn single_asterisks_and_brackets_are_plain_text() {
        let spans = parse_markup("The Winner's Circle costs $2,000 [20% off] * 4").expect("parse succeeds");
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].is_bold());
    }

    #[test]
    fn error_on_unterminated_bold() {
        let err = parse_markup("**Done** and **oops").unwrap_err();
        assert_eq!(err.index(), 13);
        assert!(err.to_string().contains("unterminated bold"));
    }
}
