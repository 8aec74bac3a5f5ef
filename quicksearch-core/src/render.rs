//! HTML rendering of normalized results, one group per category.
//!
//! Each hit is decorated before rendering with a `summary` (the highlighted
//! `content` snippet, falling back to the `summary` snippet) and a `section`
//! label from its category. Groups are rendered in registry order and
//! concatenated.

use minijinja::{context, Environment};

use crate::category::IndexCategory;
use crate::error::SearchError;
use crate::types::{Hit, IndexResult, NormalizedResults};

/// Name of the result group template inside the environment. The `.html`
/// suffix turns on HTML auto-escaping.
const RESULT_GROUP_TEMPLATE: &str = "result-group.html";

/// Default result group markup. Snippet values come pre-escaped and
/// highlighted by the service, so `summary` is emitted as-is.
pub const DEFAULT_RESULT_GROUP_TEMPLATE: &str = r#"<section class="quicksearch-group {{ css_class }}">
  <h3>{{ title }}</h3>
  <ul>
  {%- for result in results %}
    <li>
      <a href="{{ result.url }}">{{ result.title }}</a>
      {%- if result.section %}
      <span class="section">{{ result.section }}</span>
      {%- endif %}
      {%- if result.summary %}
      <p>{{ result.summary|safe }}</p>
      {%- endif %}
    </li>
  {%- endfor %}
  </ul>
</section>
"#;

/// Renders result groups with a fixed per-category hit limit.
pub struct ResultRenderer {
    env: Environment<'static>,
    limit: usize,
}

impl ResultRenderer {
    /// A renderer using [`DEFAULT_RESULT_GROUP_TEMPLATE`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Render`] if the template fails to compile.
    pub fn new(limit: usize) -> Result<Self, SearchError> {
        Self::with_template(limit, DEFAULT_RESULT_GROUP_TEMPLATE)
    }

    /// A renderer using a custom result group template.
    ///
    /// The template receives `title`, `css_class`, and `results` (the
    /// decorated hits).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Render`] if the template fails to compile.
    pub fn with_template(limit: usize, source: impl Into<String>) -> Result<Self, SearchError> {
        let mut env = Environment::new();
        env.add_template_owned(RESULT_GROUP_TEMPLATE, source.into())?;
        Ok(Self { env, limit })
    }

    /// Render every category present in `results`, in registry order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Render`] if a group fails to render.
    pub fn render(&self, results: &NormalizedResults) -> Result<String, SearchError> {
        let mut html = String::new();
        for category in IndexCategory::all() {
            if let Some(result) = results.category(*category) {
                html.push_str(&self.render_group(*category, result)?);
            }
        }
        Ok(html)
    }

    /// Render one category's group.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Render`] if the template fails to render.
    pub fn render_group(
        &self,
        category: IndexCategory,
        result: &IndexResult,
    ) -> Result<String, SearchError> {
        let template = self.env.get_template(RESULT_GROUP_TEMPLATE)?;
        let rendered = template.render(context! {
            title => category.title(),
            css_class => category.css_class(),
            results => prepare_hits(category, result, self.limit),
        })?;
        Ok(rendered)
    }
}

/// Truncate to `limit` and decorate each hit with `summary` and `section`.
pub fn prepare_hits(category: IndexCategory, result: &IndexResult, limit: usize) -> Vec<Hit> {
    result
        .hits
        .iter()
        .take(limit)
        .map(|hit| prepare_hit(category, hit))
        .collect()
}

fn prepare_hit(category: IndexCategory, hit: &Hit) -> Hit {
    let mut prepared = hit.clone();
    if let Some(summary) = hit.snippet("content").or_else(|| hit.snippet("summary")) {
        prepared.set("summary", summary);
    }
    prepared.set("section", category.section_label(hit));
    prepared
}
