use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};

use crate::core::{FiskalError, FontConfig};

const REGULAR: &[&str] = &["-Regular", ""];
const BOLD: &[&str] = &["-Bold"];
const ITALIC: &[&str] = &["-Italic", "-Oblique"];
const BOLD_ITALIC: &[&str] = &["-BoldItalic", "-BoldOblique"];

fn candidates(dir: &Path, family: &str, suffixes: &[&str]) -> Vec<PathBuf> {
    suffixes
        .iter()
        .map(|suffix| dir.join(format!("{family}{suffix}.ttf")))
        .collect()
}

fn load_face(config: &FontConfig, suffixes: &[&str]) -> Result<Option<FontData>, FiskalError> {
    let Some(path) = candidates(&config.dir, &config.family, suffixes)
        .into_iter()
        .find(|p| p.is_file())
    else {
        return Ok(None);
    };
    let data = std::fs::read(&path)
        .map_err(|e| FiskalError::Render(format!("font {}: {e}", path.display())))?;
    let font = FontData::new(data, None)
        .map_err(|e| FiskalError::Render(format!("font {}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded font face");
    Ok(Some(font))
}

/// Load the TrueType family named by `config`.
///
/// Regular and bold faces are required. A missing italic face falls back
/// to the upright one of the same weight.
pub fn load_font_family(config: &FontConfig) -> Result<FontFamily<FontData>, FiskalError> {
    let required = |suffixes: &[&str]| {
        load_face(config, suffixes)?.ok_or_else(|| {
            FiskalError::Render(format!(
                "font {}{} not found in {}",
                config.family,
                suffixes[0],
                config.dir.display()
            ))
        })
    };
    let regular = required(REGULAR)?;
    let bold = required(BOLD)?;
    let italic = load_face(config, ITALIC)?.unwrap_or_else(|| regular.clone());
    let bold_italic = load_face(config, BOLD_ITALIC)?.unwrap_or_else(|| bold.clone());

    Ok(FontFamily {
        regular,
        bold,
        italic,
        bold_italic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_names() {
        let names = candidates(Path::new("/f"), "DejaVuSans", ITALIC);
        assert_eq!(
            names,
            vec![
                PathBuf::from("/f/DejaVuSans-Italic.ttf"),
                PathBuf::from("/f/DejaVuSans-Oblique.ttf")
            ]
        );
        assert_eq!(candidates(Path::new("/f"), "X", REGULAR)[1], PathBuf::from("/f/X.ttf"));
    }

    #[test]
    fn missing_family_is_render_error() {
        let config = FontConfig {
            dir: PathBuf::from("/nonexistent/fonts"),
            family: "Nope".into(),
        };
        let err = load_font_family(&config).unwrap_err();
        assert!(matches!(err, FiskalError::Render(ref m) if m.contains("Nope-Regular")), "{err:?}");
    }

    #[test]
    fn loads_default_family() {
        assert!(load_font_family(&FontConfig::default()).is_ok());
    }
}
