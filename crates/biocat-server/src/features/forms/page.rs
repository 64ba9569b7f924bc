//! Rendering of the protein entry form

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::features::proteins::types::{ProteinPayload, TaxonomyPayload};

/// Fields posted by the form; browsers send empty strings for blank inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProteinForm {
    #[serde(default)]
    pub protein_id: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub id_custom: String,
    #[serde(default)]
    pub taxa_id: String,
    #[serde(default)]
    pub clade: String,
    #[serde(default)]
    pub genus: String,
    #[serde(default)]
    pub species: String,
}

fn optional_int(field: &str, value: &str) -> Result<Option<i32>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("{} must be an integer", field))
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ProteinForm {
    /// Payload without domain assignments; blank inputs count as missing
    pub fn to_payload(&self) -> Result<ProteinPayload, String> {
        Ok(ProteinPayload {
            protein_id: optional_text(&self.protein_id),
            sequence: optional_text(&self.sequence),
            length: optional_int("length", &self.length)?,
            id_custom: optional_int("id_custom", &self.id_custom)?,
            taxonomy: Some(TaxonomyPayload {
                taxa_id: Some(optional_int("taxa_id", &self.taxa_id)?),
                clade: optional_text(&self.clade),
                genus: optional_text(&self.genus),
                species: optional_text(&self.species),
            }),
            domains: Vec::new(),
        })
    }
}

/// Outcome shown above the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

const PAGE: &str = "create_protein.html";

static TEMPLATES: LazyLock<Result<Tera, tera::Error>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html"]);
    tera.add_raw_template(PAGE, include_str!("../../../templates/create_protein.html"))?;
    Ok(tera)
});

#[derive(Serialize)]
struct NoticeView<'a> {
    kind: &'static str,
    message: &'a str,
}

#[derive(Serialize)]
struct FieldView<'a> {
    label: &'static str,
    name: &'static str,
    value: &'a str,
}

/// Full page; `form` pre-fills the inputs after a failed submission
pub fn render(form: &ProteinForm, notice: Option<&Notice>) -> Result<String, tera::Error> {
    let tera = TEMPLATES
        .as_ref()
        .map_err(|e| tera::Error::msg(format!("Form template failed to compile: {}", e)))?;

    let notice = notice.map(|notice| match notice {
        Notice::Success(message) => NoticeView {
            kind: "success",
            message,
        },
        Notice::Error(message) => NoticeView {
            kind: "error",
            message,
        },
    });
    let fields = [
        FieldView { label: "Protein ID", name: "protein_id", value: &form.protein_id },
        FieldView { label: "Sequence", name: "sequence", value: &form.sequence },
        FieldView { label: "Length", name: "length", value: &form.length },
        FieldView { label: "Custom ID", name: "id_custom", value: &form.id_custom },
        FieldView { label: "Taxa ID", name: "taxa_id", value: &form.taxa_id },
        FieldView { label: "Clade", name: "clade", value: &form.clade },
        FieldView { label: "Genus", name: "genus", value: &form.genus },
        FieldView { label: "Species", name: "species", value: &form.species },
    ];

    let mut context = Context::new();
    context.insert("notice", &notice);
    context.insert("fields", &fields);
    tera.render(PAGE, &context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_form_payload_misses_required_fields() {
        let payload = ProteinForm::default().to_payload().unwrap();
        let errors = payload.into_input().unwrap_err();
        assert_eq!(
            errors.missing,
            vec![
                "protein_id",
                "sequence",
                "taxonomy.clade",
                "taxonomy.genus",
                "taxonomy.species"
            ]
        );
    }

    #[test]
    fn test_non_numeric_length_is_rejected() {
        let form = ProteinForm {
            length: "long".to_string(),
            ..ProteinForm::default()
        };
        assert_eq!(form.to_payload().unwrap_err(), "length must be an integer");
    }

    #[test]
    fn test_render_prefills_and_escapes() {
        let form = ProteinForm {
            protein_id: "P<1>".to_string(),
            ..ProteinForm::default()
        };
        let html = render(&form, Some(&Notice::Error("bad & worse".to_string()))).unwrap();
        assert!(html.contains("value=\"P&lt;1&gt;\""));
        assert!(html.contains("<p class=\"error\">bad &amp; worse</p>"));
        assert!(html.contains("name=\"species\""));
    }

    #[test]
    fn test_render_without_notice() {
        let html = render(&ProteinForm::default(), None).unwrap();
        assert!(html.contains("action=\"/protein/create_new_protein/\""));
        assert!(!html.contains("class=\"error\""));
        assert!(!html.contains("class=\"success\""));
    }

    #[test]
    fn test_render_escapes_script_in_values() {
        let form = ProteinForm {
            genus: "\"><script>alert(1)</script>".to_string(),
            ..ProteinForm::default()
        };
        let html = render(&form, None).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
