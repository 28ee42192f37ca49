use crate::nodes::Color;

/// The severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlertType {
    /// Useful information that users should know, even when skimming
    /// content.
    #[default]
    Note,

    /// Neutral supplementary information.
    Info,

    /// Helpful advice for doing things better or more easily.
    Tip,

    /// Key information users need to know to achieve their goal.
    Important,

    /// Urgent info that needs immediate user attention to avoid problems.
    Warning,

    /// Advises about risks or negative outcomes of certain actions.
    Caution,
}

impl AlertType {
    /// Parse a `[!TAG]` severity word, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<AlertType> {
        let t = match tag.to_ascii_lowercase().as_str() {
            "note" => AlertType::Note,
            "info" => AlertType::Info,
            "tip" => AlertType::Tip,
            "important" => AlertType::Important,
            "warning" => AlertType::Warning,
            "caution" => AlertType::Caution,
            _ => return None,
        };
        Some(t)
    }

    /// The default title for an alert type.
    pub fn default_title(&self) -> &'static str {
        match *self {
            AlertType::Note => "Note",
            AlertType::Info => "Info",
            AlertType::Tip => "Tip",
            AlertType::Important => "Important",
            AlertType::Warning => "Warning",
            AlertType::Caution => "Caution",
        }
    }

    /// The CSS class the HTML renderer uses for an alert type.
    pub fn css_class(&self) -> &'static str {
        match *self {
            AlertType::Note => "alert-note",
            AlertType::Info => "alert-info",
            AlertType::Tip => "alert-tip",
            AlertType::Important => "alert-important",
            AlertType::Warning => "alert-warning",
            AlertType::Caution => "alert-caution",
        }
    }

    /// The border and title color the console renderer uses.
    pub fn color(&self) -> Color {
        match *self {
            AlertType::Note => Color::Blue,
            AlertType::Info => Color::Teal,
            AlertType::Tip => Color::Green,
            AlertType::Important => Color::Purple,
            AlertType::Warning => Color::Orange,
            AlertType::Caution => Color::Red,
        }
    }
}
