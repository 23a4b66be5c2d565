//! Stylesheet for the landing page.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the landing page CSS.
    pub fn generate_css() -> String {
        INDEX_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Dark card grid, one column per 280px of viewport
const INDEX_CSS: &str = r#"
* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  min-height: 100vh;
  background: #0f0f0f;
  color: white;
  padding: 2rem;
}

h1 {
  text-align: center;
  margin-bottom: 2rem;
  font-size: 2.5rem;
}

.grid {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
  gap: 1.5rem;
  max-width: 1200px;
  margin: 0 auto;
}

.card {
  background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
  border-radius: 12px;
  padding: 1.5rem;
  text-decoration: none;
  color: white;
  transition: transform 0.2s, box-shadow 0.2s;
  border: 1px solid #333;
}

.card:hover {
  transform: translateY(-4px);
  box-shadow: 0 10px 40px rgba(0, 0, 0, 0.4);
  border-color: #667eea;
}

.card h2 {
  font-size: 1.3rem;
  margin-bottom: 0.5rem;
}

.card p {
  opacity: 0.7;
  font-size: 0.9rem;
}

.empty {
  text-align: center;
  opacity: 0.5;
  padding: 4rem;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(".grid"));
        assert!(css.contains(".card:hover"));
        assert!(css.contains(".empty"));
    }

    #[test]
    fn minifies_css() {
        let minified = AssetPipeline::minify_css(&AssetPipeline::generate_css()).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".card"));
    }
}
