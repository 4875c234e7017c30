//! Markdown pre-pass tagging diagram images for lightbox exclusion.
//!
//! Rendered diagram containers are interactive widgets; an image lightbox
//! wrapping them breaks zoom and pan. This pass runs on the raw Markdown,
//! before rendering, and marks diagram image references with the
//! `off-glb` class so the lightbox skips them.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Class token recognized by the lightbox as an opt-out.
pub const LIGHTBOX_OPT_OUT_CLASS: &str = "off-glb";

/// Image reference with a diagram path, an optional quoted title and an
/// optional trailing attribute block.
static DIAGRAM_IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(!\[[^\]]*\]\([^)\s]+\.drawio(?:\.svg)?(?:\s+"[^"]*")?\))(\{[^}]*\})?"#)
        .expect("invalid diagram image regex")
});

/// Append the lightbox opt-out class to every diagram image reference.
///
/// An existing attribute block gains the class before its closing brace;
/// references without one get a fresh block. A block already carrying the
/// class is left alone, so re-running the pass is harmless.
#[must_use]
pub fn tag_diagram_images(markdown: &str) -> String {
    DIAGRAM_IMAGE_PATTERN
        .replace_all(markdown, |caps: &Captures<'_>| {
            let image = &caps[1];
            match caps.get(2) {
                Some(block) => {
                    let inner = block
                        .as_str()
                        .trim_start_matches('{')
                        .trim_end_matches('}');
                    if has_opt_out_class(inner) {
                        caps[0].to_owned()
                    } else {
                        format!("{image}{{{inner} .{LIGHTBOX_OPT_OUT_CLASS}}}")
                    }
                }
                None => format!("{image}{{ .{LIGHTBOX_OPT_OUT_CLASS} }}"),
            }
        })
        .into_owned()
}

fn has_opt_out_class(block_inner: &str) -> bool {
    block_inner
        .split_whitespace()
        .any(|token| token.trim_start_matches('.') == LIGHTBOX_OPT_OUT_CLASS)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_reference_without_block_gets_fresh_block() {
        assert_eq!(
            tag_diagram_images("![x](a.drawio)"),
            "![x](a.drawio){ .off-glb }"
        );
    }

    #[test]
    fn test_existing_block_gains_class_before_closing_brace() {
        assert_eq!(
            tag_diagram_images("![x](a.drawio){.foo}"),
            "![x](a.drawio){.foo .off-glb}"
        );
    }

    #[test]
    fn test_rendered_svg_suffix_matches() {
        assert_eq!(
            tag_diagram_images("![x](a.drawio.svg)"),
            "![x](a.drawio.svg){ .off-glb }"
        );
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert_eq!(
            tag_diagram_images("![x](a.DRAWIO)"),
            "![x](a.DRAWIO){ .off-glb }"
        );
    }

    #[test]
    fn test_title_is_preserved() {
        assert_eq!(
            tag_diagram_images(r#"![x](a.drawio "Architecture")"#),
            r#"![x](a.drawio "Architecture"){ .off-glb }"#
        );
    }

    #[test]
    fn test_non_diagram_images_untouched() {
        let markdown = "![x](photo.png) and ![y](chart.svg)";
        assert_eq!(tag_diagram_images(markdown), markdown);
    }

    #[test]
    fn test_already_tagged_reference_is_left_alone() {
        let tagged = "![x](a.drawio){.foo .off-glb}";
        assert_eq!(tag_diagram_images(tagged), tagged);
    }

    #[test]
    fn test_rerun_on_own_output_is_stable() {
        let once = tag_diagram_images("![x](a.drawio){.foo}\n![y](b.drawio)");
        assert_eq!(tag_diagram_images(&once), once);
    }

    #[test]
    fn test_multiple_references_on_one_line() {
        assert_eq!(
            tag_diagram_images("![a](a.drawio) ![b](b.drawio){#id}"),
            "![a](a.drawio){ .off-glb } ![b](b.drawio){#id .off-glb}"
        );
    }

    #[test]
    fn test_surrounding_prose_untouched() {
        let markdown = "Intro text.\n\n![x](a.drawio)\n\nMore text about a.drawio exports.";
        assert_eq!(
            tag_diagram_images(markdown),
            "Intro text.\n\n![x](a.drawio){ .off-glb }\n\nMore text about a.drawio exports."
        );
    }
}
