//! Template renderer.

use super::{ReleaseContext, TemplateError};
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (label names and titles are plain text)
/// - Strict mode (catches misspelled variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs.register_helper("eq", Box::new(eq_helper));
    hbs
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq owner "acme")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Renders label names and attachment titles for a release.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the version label name.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or produces an empty name.
    pub fn render_label_name(
        &self,
        format: &str,
        context: &ReleaseContext,
    ) -> Result<String, TemplateError> {
        self.render_line(format, context)
    }

    /// Renders the title of the release attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or produces an empty title.
    pub fn render_attachment_title(
        &self,
        format: &str,
        context: &ReleaseContext,
    ) -> Result<String, TemplateError> {
        self.render_line(format, context)
    }

    /// Renders a single-line template and trims surrounding whitespace.
    fn render_line(
        &self,
        template: &str,
        context: &ReleaseContext,
    ) -> Result<String, TemplateError> {
        let rendered = self.handlebars.render_template(template, context)?;
        let rendered = rendered.trim();
        if rendered.is_empty() {
            return Err(TemplateError::Empty {
                template: template.to_string(),
            });
        }
        Ok(rendered.to_string())
    }
}
