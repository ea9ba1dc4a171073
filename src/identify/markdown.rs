// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Markdown summary of an identification result

use minijinja::Environment;

use super::IdentificationResult;
use crate::Result;

const TEMPLATE_NAME: &str = "summary.md";

const TEMPLATE: &str = r#"#### Magic
| Field       | Value |
|-------------|-------|
| Mime        | {{ magic.mime | cell }} |
| Description | {{ magic.description | cell }} |

#### SSDeep
{% if ssdeep %}
- `{{ ssdeep }}`
{% else %}
- none
{% endif %}
{% if trid %}

#### TRiD
{% for line in trid %}
- {{ line }}
{% endfor %}
{% endif %}
{% if exiftool %}

#### Exiftool
| Field | Value |
|-------|-------|
{% for key, value in exiftool | dictsort %}
| {{ key | cell }} | {{ value | cell }} |
{% endfor %}
{% endif %}
"#;

/// Keep pipes from breaking table cells
fn cell(value: String) -> String {
    value.replace('|', "\\|")
}

/// Render `result` as a markdown report
pub fn render(result: &IdentificationResult) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("cell", cell);
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;

    let rendered = env.get_template(TEMPLATE_NAME)?.render(result)?;
    Ok(rendered)
}
