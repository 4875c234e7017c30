//! Embed payload passed to the client-side viewer.

use serde::Serialize;

/// Static display options merged into every embed payload.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// Hovering toolbar option string (e.g. `"pages zoom layers lightbox"`).
    /// Empty disables the toolbar.
    pub toolbar: String,
    /// Show tooltips when hovering over diagram elements.
    pub tooltips: bool,
    /// Border width around the diagram in pixels.
    pub border: u32,
    /// Offer an edit link opening the diagram in a new tab.
    pub edit: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            toolbar: String::new(),
            tooltips: false,
            border: 5,
            edit: false,
        }
    }
}

/// Configuration blob serialized into the container's `data-mxgraph`
/// attribute.
///
/// Field order is the serialization order. Optional fields are omitted
/// entirely when absent, never serialized as `null` or an empty value,
/// and a payload carries exactly one of `url` and `xml`, fixed at
/// construction.
#[derive(Debug, Serialize)]
pub struct EmbedPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    toolbar: Option<String>,
    tooltips: &'static str,
    border: u32,
    resize: &'static str,
    lightbox: u8,
    appearance: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xml: Option<String>,
}

impl EmbedPayload {
    /// Payload for a remotely hosted diagram, loaded by the viewer itself.
    #[must_use]
    pub fn remote(options: &EmbedOptions, url: impl Into<String>) -> Self {
        let mut payload = Self::base(options);
        payload.url = Some(url.into());
        payload
    }

    /// Payload carrying inline diagram markup, with an optional page index
    /// for multi-page documents.
    #[must_use]
    pub fn local(options: &EmbedOptions, xml: impl Into<String>, page: Option<usize>) -> Self {
        let mut payload = Self::base(options);
        payload.xml = Some(xml.into());
        payload.page = page;
        payload
    }

    fn base(options: &EmbedOptions) -> Self {
        Self {
            toolbar: Some(options.toolbar.clone()).filter(|toolbar| !toolbar.is_empty()),
            tooltips: if options.tooltips { "1" } else { "0" },
            border: options.border,
            resize: "1",
            lightbox: 1,
            appearance: "automatic",
            edit: options.edit.then_some("_blank"),
            page: None,
            url: None,
            xml: None,
        }
    }

    /// Compact JSON form, ready for attribute embedding (after escaping).
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("embed payload serializes to JSON")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_remote_payload_field_order() {
        let payload = EmbedPayload::remote(&EmbedOptions::default(), "https://example.com/d.drawio");

        assert_eq!(
            payload.to_json(),
            r#"{"tooltips":"0","border":5,"resize":"1","lightbox":1,"appearance":"automatic","url":"https://example.com/d.drawio"}"#
        );
    }

    #[test]
    fn test_empty_toolbar_is_omitted_not_empty_string() {
        let payload = EmbedPayload::local(&EmbedOptions::default(), "<mxfile />", None);
        let json = payload.to_json();

        assert!(!json.contains("toolbar"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_toolbar_present_when_configured() {
        let options = EmbedOptions {
            toolbar: "pages zoom".to_owned(),
            ..EmbedOptions::default()
        };
        let json = EmbedPayload::local(&options, "<mxfile />", None).to_json();

        assert!(json.starts_with(r#"{"toolbar":"pages zoom","#));
    }

    #[test]
    fn test_edit_flag_only_when_enabled() {
        let disabled = EmbedPayload::local(&EmbedOptions::default(), "<mxfile />", None).to_json();
        assert!(!disabled.contains("edit"));

        let options = EmbedOptions {
            edit: true,
            ..EmbedOptions::default()
        };
        let enabled = EmbedPayload::local(&options, "<mxfile />", None).to_json();
        assert!(enabled.contains(r#""edit":"_blank""#));
    }

    #[test]
    fn test_page_index_serialized_as_number() {
        let json = EmbedPayload::local(&EmbedOptions::default(), "<mxfile />", Some(2)).to_json();
        assert!(json.contains(r#""page":2"#));
    }

    #[test]
    fn test_tooltips_and_resize_are_string_flags() {
        let options = EmbedOptions {
            tooltips: true,
            ..EmbedOptions::default()
        };
        let json = EmbedPayload::local(&options, "<mxfile />", None).to_json();

        assert!(json.contains(r#""tooltips":"1""#));
        assert!(json.contains(r#""resize":"1""#));
        assert!(json.contains(r#""lightbox":1"#));
    }

    #[test]
    fn test_remote_payload_has_no_xml_field() {
        let json = EmbedPayload::remote(&EmbedOptions::default(), "https://e.com/d.drawio").to_json();
        assert!(!json.contains(r#""xml""#));
    }

    #[test]
    fn test_local_payload_has_no_url_field() {
        let json = EmbedPayload::local(&EmbedOptions::default(), "<mxfile />", None).to_json();
        assert!(!json.contains(r#""url""#));
    }
}
