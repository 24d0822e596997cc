//! Organization branding used for default block colors and the footer.

use serde::{Deserialize, Serialize};

/// Brand palette and footer copy.
///
/// Omitted keys fall back to the built-in program branding when loaded from
/// a config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    /// Organization name, shown bold in the footer and in the copyright line.
    pub organization: String,
    /// First footer description line.
    pub tagline: String,
    /// Second footer description line.
    pub description: String,
    /// Headings, buttons and links.
    pub primary_color: String,
    /// Body text.
    pub body_color: String,
    /// Secondary text such as the footer copy and the social label.
    pub muted_color: String,
    pub footer_background: String,
    pub border_color: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            organization: "National Biodiversity Conservation Program".into(),
            tagline: "Protecting our parks, ICCAs and biosphere reserves for future generations."
                .into(),
            description: "You are receiving this email because you subscribed to program updates."
                .into(),
            primary_color: "#166534".into(),
            body_color: "#374151".into(),
            muted_color: "#6b7280".into(),
            footer_background: "#f3f4f6".into(),
            border_color: "#e5e7eb".into(),
        }
    }
}
