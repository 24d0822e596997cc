//! Brand configuration.
//!
//! A brand file is a small KDL document, one node per setting:
//!
//! ```kdl
//! organization "Friends of Kalinga Park"
//! primary-color "#0f766e"
//! ```
//!
//! Settings that are left out keep the built-in program branding.

use std::path::{Path, PathBuf};

use kdl::KdlDocument;
use miette::Diagnostic;
use missive_core::Brand;
use thiserror::Error;

/// Brand file errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read brand file {}", path.display())]
    #[diagnostic(code(missive::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("brand file is not valid KDL")]
    #[diagnostic(
        code(missive::config::parse),
        help("Write one node per setting with a quoted value, e.g. tagline \"...\"")
    )]
    Parse(#[from] kdl::KdlError),

    #[error("brand setting `{key}` must be a single string")]
    #[diagnostic(
        code(missive::config::invalid),
        help("Quote the value, e.g. {key} \"#166534\"")
    )]
    NotAString { key: String },
}

/// Read and parse a brand file.
pub fn load_brand(path: &Path) -> Result<Brand, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let brand = parse_brand(&text)?;
    tracing::debug!(path = %path.display(), organization = %brand.organization, "loaded brand");
    Ok(brand)
}

/// Parse brand settings from KDL text on top of the default brand.
pub fn parse_brand(text: &str) -> Result<Brand, ConfigError> {
    let doc: KdlDocument = text.parse()?;
    let mut brand = Brand::default();

    for node in doc.nodes() {
        let key = node.name().value();
        let slot = match key {
            "organization" => &mut brand.organization,
            "tagline" => &mut brand.tagline,
            "description" => &mut brand.description,
            "primary-color" => &mut brand.primary_color,
            "body-color" => &mut brand.body_color,
            "muted-color" => &mut brand.muted_color,
            "footer-background" => &mut brand.footer_background,
            "border-color" => &mut brand.border_color,
            other => {
                tracing::warn!(key = other, "ignoring unknown brand setting");
                continue;
            }
        };

        let value = match node.entries() {
            [entry] if entry.name().is_none() => entry.value().as_string(),
            _ => None,
        };
        *slot = value
            .ok_or_else(|| ConfigError::NotAString {
                key: key.to_owned(),
            })?
            .to_owned();
    }

    Ok(brand)
}
