//! Landing page rendering.

use minijinja::{context, Environment};

use crate::assets::AssetPipeline;

/// A project card on the landing page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectCard {
    /// Directory name, used as the link path
    pub name: String,
    /// Display label
    pub label: String,
}

impl ProjectCard {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: format_label(name),
        }
    }
}

/// Renders the index page that links every published project.
pub struct IndexPage {
    env: Environment<'static>,
    title: String,
    styles: String,
}

impl IndexPage {
    /// Create an index page with the given title.
    ///
    /// With `minify` set the inlined stylesheet is minified; if minification
    /// fails the stylesheet is inlined unchanged.
    pub fn new(title: impl Into<String>, minify: bool) -> Self {
        let mut env = Environment::new();

        env.add_template("index.html", INDEX_TEMPLATE)
            .expect("Failed to add index template");

        let css = AssetPipeline::generate_css();
        let styles = if minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Using unminified stylesheet: {}", e);
                css
            })
        } else {
            css
        };

        Self {
            env,
            title: title.into(),
            styles,
        }
    }

    /// Render the page for the given project names, in order.
    pub fn render(&self, projects: &[String]) -> Result<String, minijinja::Error> {
        let cards: Vec<ProjectCard> = projects.iter().map(|p| ProjectCard::new(p)).collect();

        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            title => &self.title,
            styles => &self.styles,
            projects => cards,
        })
    }
}

impl Default for IndexPage {
    fn default() -> Self {
        Self::new("Intern Projects", false)
    }
}

/// Turn a directory slug into a display label: `cool-project` -> `Cool Project`.
pub fn format_label(slug: &str) -> String {
    slug.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
  <style>{{ styles | safe }}</style>
</head>
<body>
  <h1>🚀 {{ title }}</h1>
  <div class="grid">
  {%- for project in projects %}
    <a href="/{{ project.name }}/" class="card">
      <h2>{{ project.label }}</h2>
      <p>View project &rarr;</p>
    </a>
  {%- else %}
    <p class="empty">No projects deployed yet</p>
  {%- endfor %}
  </div>
</body>
</html>
"##;
