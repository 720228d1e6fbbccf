use std::fmt;

/// Which field supplies the visible label when a [`Link`] is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// Use the link's own text, keeping any title as a hover title.
    #[default]
    Text,
    /// Use the title as the label when there is one. Reference definitions
    /// render this way so their title replaces the occurrence's text.
    Title,
}

/// A single link occurrence or definition, independent of the syntax it was
/// written in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Link {
    pub image: bool,
    pub text: String,
    /// Logical target name until resolved, then a relative path.
    pub target: String,
    pub anchor: String,
    pub title: String,
}

impl Link {
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn as_image(mut self) -> Self {
        self.image = true;
        self
    }

    /// True when there is nothing to point at.
    pub fn is_empty(&self) -> bool {
        self.target.is_empty() && self.anchor.is_empty()
    }

    /// Serialize back into inline markdown link syntax.
    pub fn render(&self, mode: LabelMode) -> String {
        let img = if self.image { "!" } else { "" };
        let anchor = if self.anchor.is_empty() {
            String::new()
        } else {
            format!("#{}", self.anchor)
        };

        if mode == LabelMode::Title && !self.title.is_empty() {
            return format!("{img}[{}]({}{anchor})", self.title, self.target);
        }

        let title = if self.title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", self.title)
        };
        format!("{img}[{}]({}{anchor}{title})", self.text, self.target)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(LabelMode::Text))
    }
}
