//! The tree visitor that drives path optimization.

use crate::Options;
use crate::ast::{Document, Element};
use crate::path::optimize_path_data;
use crate::style::{StyleContext, StyleInfo, Stylesheet};

/// Element names whose `d` attribute holds path data.
const PATH_ELEMENTS: [&str; 3] = ["path", "glyph", "missing-glyph"];

/// Optimize the `d` attribute of every path-bearing element in the
/// document.
pub fn optimize_paths(doc: &mut Document, options: &Options) {
    let stylesheet = Stylesheet::collect(&doc.root);
    visit(&mut doc.root, &StyleContext::default(), &stylesheet, options);
}

fn visit(elem: &mut Element, inherited: &StyleContext, sheet: &Stylesheet, options: &Options) {
    let ctx = inherited.descend(elem, sheet);

    if PATH_ELEMENTS.contains(&elem.name.local.as_str())
        && let Some(d) = elem.get_attr("d").map(|s| s.to_string())
    {
        let info = StyleInfo::from_styles(elem, &ctx);
        match optimize_path_data(&d, options, &info) {
            Ok(optimized) => {
                if optimized != d {
                    log::debug!("rewrote path data: {} -> {}", d, optimized);
                }
                elem.set_attr("d", optimized);
            }
            Err(err) => {
                // unparseable path data is left exactly as it was
                log::debug!("skipping path: {}", err);
            }
        }
    }

    for child in elem.child_elements_mut() {
        visit(child, &ctx, sheet, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    fn optimized_d(svg: &str) -> String {
        let mut doc = parse_svg(svg).unwrap();
        optimize_paths(&mut doc, &Options::default());
        find_path(&doc.root).unwrap()
    }

    fn find_path(elem: &Element) -> Option<String> {
        if elem.is("path") {
            return elem.get_attr("d").map(|s| s.to_string());
        }
        elem.child_elements().find_map(find_path)
    }

    #[test]
    fn test_rewrites_path_element() {
        let d = optimized_d(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0 L50 0 L50 50 L0 50 L0 0"/></svg>"#,
        );
        assert_eq!(d, "M0 0h50v50H0z");
    }

    #[test]
    fn test_inherited_stroke_blocks_close_conversion() {
        // a squared-off stroke makes z change the final join, so the
        // closing line survives
        let d = optimized_d(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g stroke="red"><path d="M0 0 L50 0 L50 50 L0 50 L0 0"/></g></svg>"#,
        );
        assert_eq!(d, "M0 0h50v50H0V0");
    }

    #[test]
    fn test_invalid_path_left_alone() {
        let d = optimized_d(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M10 oops"/></svg>"#,
        );
        assert_eq!(d, "M10 oops");
    }

    #[test]
    fn test_non_path_elements_untouched() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect d="M0 0 L5 5"/></svg>"#;
        let mut doc = parse_svg(svg).unwrap();
        optimize_paths(&mut doc, &Options::default());
        let rect = doc.root.child_elements().next().unwrap();
        assert_eq!(rect.get_attr("d"), Some("M0 0 L5 5"));
    }
}
