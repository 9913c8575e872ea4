//! What to do to every issue of a release.

use crate::config::{SyncMode, TreatmentSettings};
use crate::templates::{ReleaseContext, TemplateError, TemplateRenderer};
use serde::Serialize;

/// A link attached to each issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseAttachment {
    /// Release page URL; Linear keys attachments by it.
    pub url: String,

    /// Rendered attachment title.
    pub title: String,
}

/// Treatment rendered for one release, shared by every issue in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreatmentPlan {
    /// Whether issues are also moved to a completed state.
    pub mode: SyncMode,

    /// Name of the version label.
    pub label_name: String,

    /// Parent group of the version label.
    pub label_group: Option<String>,

    /// Color for a newly created label.
    pub label_color: Option<String>,

    /// Release link, unless attachments are disabled.
    pub attachment: Option<ReleaseAttachment>,

    /// Preferred completed state name.
    pub done_state_name: Option<String>,
}

impl TreatmentPlan {
    /// Renders the plan for a release from the configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if a format fails to render.
    pub fn render(
        settings: &TreatmentSettings,
        mode: SyncMode,
        context: &ReleaseContext,
        renderer: &TemplateRenderer,
    ) -> Result<Self, TemplateError> {
        let label_name = renderer.render_label_name(&settings.label_name_format, context)?;

        let attachment = if settings.attach_release_link {
            Some(ReleaseAttachment {
                url: context.release_url.clone(),
                title: renderer
                    .render_attachment_title(&settings.attachment_title_format, context)?,
            })
        } else {
            None
        };

        Ok(Self {
            mode,
            label_name,
            label_group: settings.label_group().map(str::to_string),
            label_color: settings.label_color.clone(),
            attachment,
            done_state_name: settings.done_state_name.clone(),
        })
    }
}
