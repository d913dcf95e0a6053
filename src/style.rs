//! Computed-style resolution for the properties the path optimizer
//! consults.
//!
//! Only a small, inherited subset matters here: the marker properties and
//! the stroke trio. Values come from presentation attributes and inline
//! `style` declarations, resolved down the ancestor chain. Anything that
//! cannot be resolved statically is reported as dynamic, which pushes every
//! consumer onto its pessimistic path.

use std::collections::HashMap;

use crate::ast::{Element, Node};

/// Properties resolved for path optimization.
const TRACKED: [&str; 6] = [
    "marker-start",
    "marker-mid",
    "marker-end",
    "stroke",
    "stroke-linecap",
    "stroke-linejoin",
];

/// A resolved property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleValue {
    /// Statically known value.
    Static(String),
    /// The value depends on stylesheets or animation and cannot be
    /// resolved here.
    Dynamic,
}

/// Document-wide style knowledge collected before visiting elements.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// The document carries `<style>` content, so attribute-level
    /// resolution may be overridden by selectors we do not evaluate.
    has_style_rules: bool,
}

impl Stylesheet {
    pub fn collect(root: &Element) -> Self {
        let mut sheet = Stylesheet::default();
        collect_styles(root, &mut sheet);
        sheet
    }
}

fn collect_styles(elem: &Element, sheet: &mut Stylesheet) {
    if elem.is("style") {
        let has_content = elem.children.iter().any(|node| match node {
            Node::Text(t) | Node::CData(t) => !t.trim().is_empty(),
            _ => false,
        });
        if has_content {
            sheet.has_style_rules = true;
        }
    }
    for child in elem.child_elements() {
        collect_styles(child, sheet);
    }
}

/// The inherited tracked properties at one point of the tree walk.
///
/// Cloned per child, so sibling subtrees cannot observe each other's
/// declarations.
#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    values: HashMap<&'static str, StyleValue>,
}

impl StyleContext {
    /// Fold one element's presentation attributes and inline style into
    /// the inherited context.
    pub fn descend(&self, elem: &Element, sheet: &Stylesheet) -> StyleContext {
        let mut ctx = self.clone();
        for name in TRACKED {
            if let Some(value) = elem.get_attr(name) {
                ctx.values.insert(name, resolve_value(value));
            }
        }
        if let Some(style) = elem.get_attr("style") {
            for decl in style.split(';') {
                if let Some((prop, value)) = decl.split_once(':') {
                    let prop = prop.trim();
                    if let Some(&name) = TRACKED.iter().find(|&&n| n == prop) {
                        ctx.values.insert(name, resolve_value(value.trim()));
                    }
                }
            }
        }
        if sheet.has_style_rules {
            // selectors could override any of these; report everything as
            // unresolvable
            for name in TRACKED {
                ctx.values.insert(name, StyleValue::Dynamic);
            }
        }
        ctx
    }

    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.values.get(name)
    }
}

fn resolve_value(value: &str) -> StyleValue {
    if value.contains("var(") || value.contains("attr(") {
        StyleValue::Dynamic
    } else {
        StyleValue::Static(value.to_string())
    }
}

/// The style-derived flags the filter pipeline consumes, computed once per
/// path element.
#[derive(Debug, Clone)]
pub struct StyleInfo {
    /// A mid-marker would render on every vertex, so vertices cannot be
    /// merged away.
    pub has_marker_mid: bool,
    /// The element carries a start or end marker.
    pub has_marker: bool,
    /// The element may render stroke caps on zero-length segments.
    pub maybe_has_stroke_and_linecap: bool,
    /// Closing with `z` cannot change how joins and caps render.
    pub is_safe_to_use_z: bool,
}

impl Default for StyleInfo {
    fn default() -> Self {
        Self {
            has_marker_mid: false,
            has_marker: false,
            maybe_has_stroke_and_linecap: false,
            is_safe_to_use_z: true,
        }
    }
}

impl StyleInfo {
    pub fn from_styles(elem: &Element, ctx: &StyleContext) -> Self {
        let has_marker_mid = ctx.get("marker-mid").is_some();
        let has_marker =
            elem.get_attr("marker-start").is_some() || elem.get_attr("marker-end").is_some();

        let maybe_has_stroke = match ctx.get("stroke") {
            None => false,
            Some(StyleValue::Dynamic) => true,
            Some(StyleValue::Static(v)) => v != "none",
        };
        let is_safe_to_use_z = if maybe_has_stroke {
            matches!(ctx.get("stroke-linecap"), Some(StyleValue::Static(v)) if v == "round")
                && matches!(ctx.get("stroke-linejoin"), Some(StyleValue::Static(v)) if v == "round")
        } else {
            true
        };
        // only a statically butt-capped (or unstroked) path can lose
        // zero-length segments
        let maybe_has_linecap = match ctx.get("stroke-linecap") {
            None => false,
            Some(StyleValue::Dynamic) => true,
            Some(StyleValue::Static(v)) => v != "butt",
        };

        Self {
            has_marker_mid,
            has_marker,
            maybe_has_stroke_and_linecap: maybe_has_stroke && maybe_has_linecap,
            is_safe_to_use_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elem_with(attrs: &[(&str, &str)]) -> Element {
        let mut e = Element::new("path");
        for (k, v) in attrs {
            e.set_attr(*k, *v);
        }
        e
    }

    #[test]
    fn test_unstroked_defaults() {
        let elem = elem_with(&[]);
        let ctx = StyleContext::default().descend(&elem, &Stylesheet::default());
        let info = StyleInfo::from_styles(&elem, &ctx);
        assert!(info.is_safe_to_use_z);
        assert!(!info.maybe_has_stroke_and_linecap);
        assert!(!info.has_marker_mid);
    }

    #[test]
    fn test_stroke_blocks_z_unless_round() {
        let elem = elem_with(&[("stroke", "red")]);
        let ctx = StyleContext::default().descend(&elem, &Stylesheet::default());
        assert!(!StyleInfo::from_styles(&elem, &ctx).is_safe_to_use_z);

        let elem = elem_with(&[
            ("stroke", "red"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "round"),
        ]);
        let ctx = StyleContext::default().descend(&elem, &Stylesheet::default());
        let info = StyleInfo::from_styles(&elem, &ctx);
        assert!(info.is_safe_to_use_z);
        // round caps render on zero-length segments
        assert!(info.maybe_has_stroke_and_linecap);
    }

    #[test]
    fn test_stroke_none_is_safe() {
        let elem = elem_with(&[("stroke", "none")]);
        let ctx = StyleContext::default().descend(&elem, &Stylesheet::default());
        assert!(StyleInfo::from_styles(&elem, &ctx).is_safe_to_use_z);
    }

    #[test]
    fn test_inline_style_overrides() {
        let elem = elem_with(&[("style", "stroke: blue; stroke-linecap: square")]);
        let ctx = StyleContext::default().descend(&elem, &Stylesheet::default());
        let info = StyleInfo::from_styles(&elem, &ctx);
        assert!(!info.is_safe_to_use_z);
        assert!(info.maybe_has_stroke_and_linecap);
    }

    #[test]
    fn test_inheritance() {
        let parent = elem_with(&[("stroke", "black")]);
        let child = elem_with(&[]);
        let sheet = Stylesheet::default();
        let ctx = StyleContext::default()
            .descend(&parent, &sheet)
            .descend(&child, &sheet);
        assert!(!StyleInfo::from_styles(&child, &ctx).is_safe_to_use_z);
    }

    #[test]
    fn test_stylesheet_forces_dynamic() {
        let mut root = Element::new("svg");
        let mut style = Element::new("style");
        style.children.push(Node::Text(".a { stroke: red }".into()));
        root.children.push(Node::Element(style));
        let sheet = Stylesheet::collect(&root);

        let elem = elem_with(&[]);
        let ctx = StyleContext::default().descend(&elem, &sheet);
        let info = StyleInfo::from_styles(&elem, &ctx);
        assert!(!info.is_safe_to_use_z);
        assert!(info.maybe_has_stroke_and_linecap);
        assert!(info.has_marker_mid);
    }
}
