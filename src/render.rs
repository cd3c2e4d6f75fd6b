use thiserror::Error;

use crate::types::CustomerPayload;

/// Fixed shape of every message published to the topic.
pub const PUBLISH_TEMPLATE: &str = r#"{ "number":"{{ .Number }}", "email":"{{ .Email }}" }"#;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unterminated action at offset {0}")]
    Unterminated(usize),
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("no request payload to evaluate field {0:?}")]
    MissingPayload(String),
}

/// Substitutes `{{ .Field }}` actions with payload values.
///
/// Values are copied verbatim: quotes or control characters in a value are
/// not escaped, so a crafted value can break the JSON shape of the output.
#[derive(Debug, Clone)]
pub struct Renderer {
    template: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(PUBLISH_TEMPLATE)
    }
}

impl Renderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, payload: Option<&CustomerPayload>) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or(RenderError::Unterminated(offset + start))?;

            let action = after_open[..end].trim();
            out.push_str(evaluate(action, payload)?);

            let consumed = start + OPEN.len() + end + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn evaluate<'a>(
    action: &str,
    payload: Option<&'a CustomerPayload>,
) -> Result<&'a str, RenderError> {
    let name = action
        .strip_prefix('.')
        .filter(|name| !name.is_empty())
        .ok_or_else(|| RenderError::UnknownField(action.to_string()))?;

    let payload = payload.ok_or_else(|| RenderError::MissingPayload(name.to_string()))?;
    payload
        .field(name)
        .ok_or_else(|| RenderError::UnknownField(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(number: &str, email: &str) -> CustomerPayload {
        CustomerPayload {
            number: number.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[test]
    fn renders_number_and_email() {
        let out = Renderer::default()
            .render(Some(&payload("1234567", "a@b.com")))
            .unwrap();
        assert_eq!(out, r#"{ "number":"1234567", "email":"a@b.com" }"#);
    }

    #[test]
    fn empty_fields_render_as_empty_strings() {
        let out = Renderer::default()
            .render(Some(&CustomerPayload::default()))
            .unwrap();
        assert_eq!(out, r#"{ "number":"", "email":"" }"#);
    }

    #[test]
    fn output_is_deterministic() {
        let renderer = Renderer::default();
        let p = payload("42", "x@y.z");
        assert_eq!(
            renderer.render(Some(&p)).unwrap(),
            renderer.render(Some(&p)).unwrap()
        );
    }

    #[test]
    fn values_are_not_escaped() {
        let out = Renderer::default()
            .render(Some(&payload("1", r#"a"b"#)))
            .unwrap();
        assert_eq!(out, r#"{ "number":"1", "email":"a"b" }"#);
    }

    #[test]
    fn missing_payload_fails() {
        let err = Renderer::default().render(None).unwrap_err();
        assert_eq!(err, RenderError::MissingPayload("Number".into()));
    }

    #[test]
    fn literal_template_needs_no_payload() {
        let out = Renderer::new("static").render(None).unwrap();
        assert_eq!(out, "static");
    }

    #[test]
    fn unknown_field_fails() {
        let err = Renderer::new("{{ .Phone }}")
            .render(Some(&CustomerPayload::default()))
            .unwrap_err();
        assert_eq!(err, RenderError::UnknownField("Phone".into()));
    }

    #[test]
    fn unterminated_action_reports_offset() {
        let err = Renderer::new("ab{{ .Email }} {{ .Number")
            .render(Some(&CustomerPayload::default()))
            .unwrap_err();
        assert_eq!(err, RenderError::Unterminated(15));
    }
}
