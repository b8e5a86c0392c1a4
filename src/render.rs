use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::env::EnvVars;
use crate::error::BuildError;

/// The token `__KEY__` that marks a substitution site in a template.
pub fn placeholder(key: &str) -> String {
    format!("__{key}__")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    /// Keys whose `__KEY__` token occurred in the template and was replaced.
    pub replaced: Vec<String>,
}

/// Replaces every `__KEY__` token for the keys in `vars`.
///
/// Tokens with no matching key are left as they are.
pub fn render_template(template: &str, vars: &EnvVars) -> Rendered {
    let mut content = template.to_owned();
    let mut replaced = Vec::new();
    for (key, value) in vars {
        let token = placeholder(key);
        if content.contains(&token) {
            content = content.replace(&token, value);
            replaced.push(key.clone());
        }
    }
    Rendered { content, replaced }
}

/// Renders `template_path` into `output_path`, overwriting any existing file.
pub fn build_html_file(
    template_path: &Path,
    output_path: &Path,
    vars: &EnvVars,
) -> Result<Rendered, BuildError> {
    if !template_path.exists() {
        return Err(BuildError::TemplateNotFound {
            path: template_path.to_path_buf(),
        });
    }

    let template = fs::read_to_string(template_path).map_err(BuildError::io(template_path))?;
    let rendered = render_template(&template, vars);
    for key in &rendered.replaced {
        debug!(template = %template_path.display(), "Replaced {}", placeholder(key));
    }

    fs::write(output_path, &rendered.content).map_err(BuildError::io(output_path))?;
    info!("Generated: {}", output_path.display());
    Ok(rendered)
}
