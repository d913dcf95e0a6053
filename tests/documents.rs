//! Whole-document optimization tests.

use pathmin::{Options, optimize, optimize_with_options, parse_svg};

#[test]
fn test_optimizes_all_path_elements() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M10 10 L20 20"/><path d="M0 0 h5 h10"/></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.contains(r#"d="M10 10l10 10""#));
    assert!(out.contains(r#"d="M0 0h15""#));
}

#[test]
fn test_document_structure_preserved() {
    let svg = r#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><!-- note --><g fill="red"><path d="M0 0 L50 0 L50 50 L0 50 L0 0"/></g><text>hi</text></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(out.contains("<!-- note -->"));
    assert!(out.contains(r#"viewBox="0 0 100 100""#));
    assert!(out.contains(r#"d="M0 0h50v50H0z""#));
    assert!(out.contains("<text>hi</text>"));
    // re-parses cleanly
    parse_svg(&out).unwrap();
}

#[test]
fn test_glyph_elements_are_visited() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><glyph d="M0 0 h5 h10"/><missing-glyph d="M10 10 L20 20"/></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.contains(r#"<glyph d="M0 0h15""#));
    assert!(out.contains(r#"<missing-glyph d="M10 10l10 10""#));
}

#[test]
fn test_stylesheet_forces_conservative_rewrites() {
    // with selectors in play every style query is dynamic: zero segments
    // stay, mid-markers are assumed, z conversion is off
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style>path { stroke: red }</style><path d="M0 0 h10 l0 0"/></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.contains(r#"d="M0 0h10 0""#), "got {}", out);
}

#[test]
fn test_marker_mid_blocks_collapse() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path marker-mid="url(#dot)" d="M0 0 h5 h10"/></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.contains(r#"d="M0 0h5 10""#), "got {}", out);
}

#[test]
fn test_markers_only_path_keeps_closepath() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path marker-start="url(#dot)" d="M0 0 l0 0"/></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.contains(r#"d="M0 0z""#), "got {}", out);
}

#[test]
fn test_unparseable_path_data_is_kept() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M10 oops"/></svg>"#;
    let out = optimize(svg).unwrap();
    assert!(out.contains(r#"d="M10 oops""#));
}

#[test]
fn test_custom_precision_through_options() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0 L10.12345 10.54321"/></svg>"#;
    let options = Options {
        float_precision: Some(1),
        ..Options::default()
    };
    let out = optimize_with_options(svg, &options).unwrap();
    assert!(out.contains(r#"d="M0 0l10.1 10.5""#));
}

#[test]
fn test_document_optimization_is_idempotent() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0 L50 0 L50 50 L0 50 L0 0"/><path d="M0 0 C5 0 10 5 10 10 C10 15 5 20 0 20"/></svg>"#;
    let once = optimize(svg).unwrap();
    let twice = optimize(&once).unwrap();
    assert_eq!(once, twice);
}
