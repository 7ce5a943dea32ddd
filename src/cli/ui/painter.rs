use owo_colors::{OwoColorize, Style as OwoStyle};

/// Styles report text for the terminal, or passes it through untouched.
#[derive(Debug)]
pub(crate) struct Painter {
    use_colour: bool,
}

impl Painter {
    pub(crate) fn new(use_colour: bool) -> Self {
        Self { use_colour }
    }

    pub(crate) fn heading<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold().cyan())
    }

    pub(crate) fn success<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold().green())
    }

    pub(crate) fn muted<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().dimmed())
    }

    /// Emphasises a value such as a byte count.
    pub(crate) fn value<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold())
    }

    fn paint(&self, text: &str, style: OwoStyle) -> String {
        if self.use_colour {
            text.style(style).to_string()
        } else {
            text.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn apply(painter: &Painter, style: &str, text: &str) -> String {
        match style {
            "heading" => painter.heading(text),
            "success" => painter.success(text),
            "muted" => painter.muted(text),
            "value" => painter.value(text),
            other => panic!("unknown style: {other}"),
        }
    }

    #[rstest]
    #[case::heading("heading")]
    #[case::success("success")]
    #[case::muted("muted")]
    #[case::value("value")]
    fn colour_off_leaves_text_alone(#[case] style: &str) {
        let painter = Painter::new(false);
        assert_eq!("0x0A", apply(&painter, style, "0x0A"));
    }

    #[rstest]
    #[case::heading("heading")]
    #[case::success("success")]
    #[case::muted("muted")]
    #[case::value("value")]
    fn colour_on_wraps_text_in_escapes(#[case] style: &str) {
        let painter = Painter::new(true);
        let styled = apply(&painter, style, "frames");
        assert_ne!("frames", styled);
        assert!(styled.contains("frames"));
        assert!(styled.starts_with('\u{1b}'));
    }
}
