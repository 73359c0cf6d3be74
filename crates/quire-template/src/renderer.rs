//! Template renderer.

use std::path::Path;

use minijinja::Environment;
use quire_commit::RenderData;
use tracing::debug;

use crate::functions;
use crate::{TemplateError, TemplateResult};

const TEMPLATE_NAME: &str = "changelog";

/// A parsed changelog template with the function library installed.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Loads a template file.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the path does not exist,
    /// [`TemplateError::IsDirectory`] if it is a directory and
    /// [`TemplateError::Syntax`] if the template does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> TemplateResult<Self> {
        let path = path.as_ref();
        debug!(?path, "loading template");

        if !path.exists() {
            return Err(TemplateError::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(TemplateError::IsDirectory(path.to_path_buf()));
        }

        let source = std::fs::read_to_string(path)?;
        Self::from_source(source)
    }

    /// Parses a template from memory.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] if the template does not parse.
    pub fn from_source(source: impl Into<String>) -> TemplateResult<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        minijinja_contrib::add_to_environment(&mut env);
        env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
        functions::register(&mut env);

        env.add_template_owned(TEMPLATE_NAME, source.into())
            .map_err(TemplateError::Syntax)?;

        Ok(Self { env })
    }

    /// Renders `data` into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render_to_string(&self, data: &RenderData) -> TemplateResult<String> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(TemplateError::Render)?;
        let rendered = template.render(data).map_err(TemplateError::Render)?;
        debug!(
            versions = data.versions.len(),
            bytes = rendered.len(),
            "rendered template"
        );
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_commit::{Commit, CommitGroup, Info, Tag, Version};
    use tempfile::TempDir;

    fn data() -> RenderData {
        let date = "2024-02-01T00:00:00Z".parse().unwrap();
        let commit = Commit::builder("abcdef1234")
            .r#type("feat")
            .subject("add parser")
            .build();
        let mut version = Version {
            tag: Tag::new("v1.0.0", "Release", date),
            ..Version::default()
        };
        version.changes.commit_groups.push(CommitGroup {
            raw_title: "feat".into(),
            title: "Features".into(),
            commits: vec![commit],
        });
        RenderData {
            info: Info {
                title: "CHANGELOG".into(),
                repository_url: "https://example.com/repo".into(),
            },
            versions: vec![version],
            ..RenderData::default()
        }
    }

    #[test]
    fn test_render_data_shape() {
        let renderer = TemplateRenderer::from_source(
            "# {{ info.title }}\n\
             {% for v in versions %}## {{ v.tag.name }} ({{ datetime('%Y-%m-%d', v.tag.date) }})\n\
             {% for g in v.commit_groups %}### {{ g.title }}\n\
             {% for c in g.commits %}- {{ c.subject | upper_first }} ({{ c.hash.short }})\n\
             {% endfor %}{% endfor %}{% endfor %}",
        )
        .unwrap();

        let out = renderer.render_to_string(&data()).unwrap();
        assert_eq!(
            out,
            "# CHANGELOG\n## v1.0.0 (2024-02-01)\n### Features\n- Add parser (abcdef1)\n"
        );
    }

    #[test]
    fn test_repository_url_is_exposed() {
        let renderer = TemplateRenderer::from_source("{{ info.repository_url }}").unwrap();
        assert_eq!(
            renderer.render_to_string(&data()).unwrap(),
            "https://example.com/repo"
        );
    }

    #[test]
    fn test_pycompat_methods() {
        let renderer =
            TemplateRenderer::from_source("{{ info.title.lower() }}").unwrap();
        assert_eq!(renderer.render_to_string(&data()).unwrap(), "changelog");
    }

    #[test]
    fn test_unreleased_is_exposed() {
        let renderer = TemplateRenderer::from_source(
            "{{ unreleased.commits | length }}/{{ unreleased.commit_groups | length }}/{{ unreleased.note_groups | length }}",
        )
        .unwrap();
        assert_eq!(renderer.render_to_string(&data()).unwrap(), "0/0/0");
    }

    #[test]
    fn test_from_path_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.tpl.md");
        assert!(matches!(
            TemplateRenderer::from_path(&path),
            Err(TemplateError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_from_path_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            TemplateRenderer::from_path(temp_dir.path()),
            Err(TemplateError::IsDirectory(_))
        ));
    }

    #[test]
    fn test_from_path_syntax_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.tpl.md");
        std::fs::write(&path, "{% for v in versions %}unterminated").unwrap();
        assert!(matches!(
            TemplateRenderer::from_path(&path),
            Err(TemplateError::Syntax(_))
        ));
    }

    #[test]
    fn test_from_path_renders() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CHANGELOG.tpl.md");
        std::fs::write(&path, "{{ versions[0].tag.name }}\n").unwrap();

        let renderer = TemplateRenderer::from_path(&path).unwrap();
        assert_eq!(renderer.render_to_string(&data()).unwrap(), "v1.0.0\n");
    }

    #[test]
    fn test_render_error() {
        let renderer = TemplateRenderer::from_source("{{ datetime('%Y', info.title) }}").unwrap();
        assert!(matches!(
            renderer.render_to_string(&data()),
            Err(TemplateError::Render(_))
        ));
    }
}
