//! Status badge

use std::fmt;

/// Visual tone of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Primary,
    Accent,
    Warning,
    Destructive,
    Outline,
}

impl BadgeTone {
    /// Tone for a status string, matched case-insensitively
    pub fn for_status(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "completed" | "sent" => Self::Success,
            "processing" => Self::Primary,
            "scheduled" => Self::Accent,
            "sending" => Self::Warning,
            "failed" => Self::Destructive,
            _ => Self::Outline,
        }
    }

    fn marker(&self) -> char {
        match self {
            Self::Success => '+',
            Self::Primary => '~',
            Self::Accent => '*',
            Self::Warning => '!',
            Self::Destructive => 'x',
            Self::Outline => ' ',
        }
    }
}

/// A status label rendered as `[marker label]`; the label keeps the casing it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge<'a> {
    label: &'a str,
    tone: BadgeTone,
}

impl<'a> StatusBadge<'a> {
    pub fn new(status: &'a str) -> Self {
        Self {
            label: status,
            tone: BadgeTone::for_status(status),
        }
    }

    /// Badge for an `is_active` flag
    pub fn active(is_active: bool) -> StatusBadge<'static> {
        StatusBadge::new(if is_active { "Active" } else { "Inactive" })
    }

    pub fn tone(&self) -> BadgeTone {
        self.tone
    }
}

impl fmt::Display for StatusBadge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.tone.marker(), self.label)
    }
}
