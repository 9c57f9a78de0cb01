//! Bundled configuration templates

use crate::error::Result;
use crate::error::fs::installation;

/// `system.yaml` enabling the embedded database
pub const SYSTEM_YAML: &str = include_str!("../../templates/system.yaml");

/// Access service import document
pub const ACCESS_IMPORT: &str = include_str!("../../templates/access.config.import.yml");

/// Node id written into `system.yaml`
pub const NODE_ID: &str = "local-rt-setup";

/// No cap on token lifetime for test instances
pub const TOKEN_MAX_EXPIRES_IN: &str = "0";

/// Replace each `{{KEY}}` in `template` with its value.
///
/// Precondition: every key occurs in the template and no placeholder is left
/// afterwards. Either violation means the bundled template and this code have
/// drifted apart.
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut rendered = template.to_string();
    for (key, value) in values {
        let placeholder = format!("{{{{{key}}}}}");
        if !rendered.contains(&placeholder) {
            return Err(installation(format!(
                "template has no {placeholder} placeholder"
            )));
        }
        rendered = rendered.replace(&placeholder, value);
    }

    if let Some(start) = rendered.find("{{") {
        let rest = &rendered[start..];
        let end = rest.find("}}").map_or(rest.len(), |i| i + 2);
        return Err(installation(format!(
            "template placeholder {} was not substituted",
            &rest[..end]
        )));
    }

    Ok(rendered)
}

pub fn system_yaml() -> Result<String> {
    render(SYSTEM_YAML, &[("NODE_ID", NODE_ID)])
}

pub fn access_import() -> Result<String> {
    render(
        ACCESS_IMPORT,
        &[("TOKEN_MAX_EXPIRES_IN", TOKEN_MAX_EXPIRES_IN)],
    )
}
