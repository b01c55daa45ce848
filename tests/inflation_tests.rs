//! End-to-end inflation tests
//!
//! Drives the public API the way a host would:
//! - Custom factories registered on a shared registry
//! - The built-in layer catalogue
//! - Settings files feeding the inflater grammar

use std::io::Write;
use std::sync::Arc;

use rhythm_inflater::config::{DuplicatePolicy, EffectiveConfig};
use rhythm_inflater::layers::{Color, Dimension, Direction, Fill, Gravity};
use rhythm_inflater::{
    builtin_registry, ArgumentsBundle, ErrorKind, InflationError, LayerError, LayerRegistry,
    OverlayInflater, SpecLayer, LINE_NOT_SPECIFIED,
};
use serde_json::json;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq)]
struct TestGuide {
    edge: String,
    width: i64,
}

fn test_guide(args: &ArgumentsBundle) -> Result<TestGuide, LayerError> {
    let edge = ["left", "top", "right", "bottom"]
        .into_iter()
        .find(|edge| args.contains_key(edge))
        .unwrap_or("left");
    Ok(TestGuide {
        edge: edge.to_string(),
        width: args.require_int("width", "4")?,
    })
}

fn guide_inflater() -> OverlayInflater<TestGuide> {
    let registry = LayerRegistry::new();
    registry.register_fn("guide", test_guide);
    OverlayInflater::new(Arc::new(registry))
}

const TWO_GUIDES: &str = "color=red\n\nguide left\nwidth=4\n\nguide top\nwidth=4\n";

// =============================================================================
// Custom factories
// =============================================================================

#[test]
fn test_two_guides_one_overlay() {
    let overlays = guide_inflater().inflate_str(TWO_GUIDES).unwrap();

    assert_eq!(overlays.len(), 1);
    assert_eq!(
        overlays[0].layers(),
        &[
            TestGuide {
                edge: "left".into(),
                width: 4
            },
            TestGuide {
                edge: "top".into(),
                width: 4
            },
        ]
    );
}

#[test]
fn test_marked_and_bare_declarations_agree() {
    let bare = guide_inflater().inflate_str(TWO_GUIDES).unwrap();
    let marked = guide_inflater()
        .inflate_str(&TWO_GUIDES.replacen("color", "@color", 1))
        .unwrap();
    assert_eq!(bare[0].layers(), marked[0].layers());
}

#[test]
fn test_nested_variable_in_builtin_layer() {
    let overlays = OverlayInflater::with_builtins()
        .inflate_str("@accent=#FF4081
@tint=color=@accent

fill @tint
")
        .unwrap();
    assert_eq!(
        overlays[0].layers()[0],
        SpecLayer::Fill(Fill {
            color: Color(0xFFFF_4081)
        })
    );
}

#[test]
fn test_misspelled_type() {
    let text = TWO_GUIDES.replace("guide left", "guid left");
    let err = guide_inflater().inflate_str(&text).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownLayerType);
    assert_eq!(err.error_code(), 6);
    assert_eq!(err.args(), &[json!("guid"), json!(["guide"])]);
    assert_eq!(err.line_number(), 2);
}

#[test]
fn test_n_blocks_give_n_layers() {
    for n in [1usize, 2, 5, 12] {
        let text: Vec<String> = (0..n).map(|i| format!("guide\n  width={}\n", i)).collect();
        let overlays = guide_inflater().inflate_str(&text.join("\n")).unwrap();

        let widths: Vec<i64> = overlays[0].layers().iter().map(|g| g.width).collect();
        assert_eq!(widths, (0..n as i64).collect::<Vec<_>>());
    }
}

#[test]
fn test_undeclared_variable_line() {
    let text = "@w=4\n\nguide left\n  width=@w\n\nguide top\n  width=@height\n";
    let err = guide_inflater().inflate_str(text).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::VariableNotFound);
    assert_eq!(err.args(), &[json!("height")]);
    assert_eq!(err.line_number(), 6);
}

#[test]
fn test_late_variable_declaration() {
    let err = guide_inflater()
        .inflate_str("guide\n  width=1\n\n@w=4\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedVariableDeclaration);
    assert_eq!(err.line_number(), 3);
}

#[test]
fn test_headers_need_blank_line() {
    let err = guide_inflater()
        .inflate_str("guide left width=1\nguide top width=2\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedListSyntax);
    assert_eq!(err.args(), &[json!("guide top width=2")]);
    assert_eq!(err.line_number(), 1);
}

#[test]
fn test_wrong_type_argument() {
    let err = guide_inflater()
        .inflate_str("guide left\n  width=wide\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentMissingOrNotExpectedType);
    assert_eq!(
        err.args(),
        &[json!("guide"), json!("width"), json!("integer"), json!("4")]
    );
    assert_eq!(err.line_number(), 0);
}

#[test]
fn test_last_registration_wins() {
    let registry = Arc::new(LayerRegistry::new());
    registry.register_fn("guide", test_guide);
    registry.register_fn("guide", |_: &ArgumentsBundle| {
        Ok(TestGuide {
            edge: "override".into(),
            width: 0,
        })
    });
    let inflater = OverlayInflater::new(Arc::clone(&registry));

    let overlays = inflater.inflate_str(TWO_GUIDES).unwrap();
    assert!(overlays[0].layers().iter().all(|g| g.edge == "override"));
}

#[test]
fn test_registration_after_inflater_creation() {
    let registry = Arc::new(LayerRegistry::new());
    let inflater = OverlayInflater::new(Arc::clone(&registry));
    assert!(inflater.inflate_str(TWO_GUIDES).is_err());

    registry.register_fn("guide", test_guide);
    assert_eq!(inflater.inflate_str(TWO_GUIDES).unwrap()[0].len(), 2);
}

#[test]
fn test_no_partial_results() {
    let text = "guide\n  width=1\n\nguide\n  width=2\n\nguide\n  width=three\n";
    let result = guide_inflater().inflate_str(text);
    assert!(result.is_err());
}

#[test]
fn test_error_round_trip() {
    let err = InflationError::new(
        ErrorKind::ArgumentMissingOrNotOneOf,
        vec![json!("keyline"), json!("from"), json!("middle"), json!(["left", "right"])],
    );
    assert_eq!(err.error_code(), 13);
    assert_eq!(err.args()[2], "middle");
    assert_eq!(err.line_number(), LINE_NOT_SPECIFIED);
    assert_eq!(err.at_line(7).line_number(), 7);
}

#[test]
fn test_shared_registry_across_threads() {
    let inflater = Arc::new(guide_inflater());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let inflater = Arc::clone(&inflater);
            std::thread::spawn(move || {
                let text = format!("guide right\n  width={}\n", i);
                inflater.inflate_str(&text).unwrap()[0].layers()[0].width
            })
        })
        .collect();

    let mut widths: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    widths.sort();
    assert_eq!(widths, vec![0, 1, 2, 3]);
}

// =============================================================================
// Built-in catalogue
// =============================================================================

const MATERIAL: &str = "\
// Material baseline grid with keylines
@step=8dp
@accent=#80FF4081

# Baseline
grid-lines direction=horizontal step=@step
    color=@accent

keyline from=left distance=16dp

keyline from=right distance=16dp

# Content
guide top distance=56dp outside

fill color=#2000FF00

dimensions-label gravity=top-right
";

#[test]
fn test_builtin_catalogue() {
    let inflater = OverlayInflater::with_builtins();
    let overlays = inflater.inflate_str(MATERIAL).unwrap();

    assert_eq!(overlays.len(), 2);
    assert_eq!(overlays[0].title(), Some("Baseline"));
    assert_eq!(overlays[1].title(), Some("Content"));

    let types: Vec<_> = overlays
        .iter()
        .flat_map(|o| o.layers().iter().map(SpecLayer::type_name))
        .collect();
    assert_eq!(
        types,
        vec!["grid-lines", "keyline", "keyline", "guide", "fill", "dimensions-label"]
    );

    let SpecLayer::GridLines(grid) = &overlays[0].layers()[0] else {
        panic!("expected grid lines");
    };
    assert_eq!(grid.direction, Direction::Horizontal);
    assert_eq!(grid.step, Dimension::dp(8.0));
    assert_eq!(grid.color, Color(0x80FF_4081));

    let SpecLayer::Guide(guide) = &overlays[1].layers()[0] else {
        panic!("expected guide");
    };
    assert_eq!(guide.gravity, Gravity::Top);
    assert!(guide.align_outside);
}

#[test]
fn test_builtin_json_output() {
    let overlays = OverlayInflater::with_builtins()
        .inflate_str("# Tint\nfill color=red\n")
        .unwrap();
    let value = serde_json::to_value(&overlays).unwrap();

    assert_eq!(
        value,
        json!([{ "title": "Tint", "layers": [{ "type": "fill", "color": "#FFFF0000" }] }])
    );
}

#[test]
fn test_builtin_bad_value_is_wrapped() {
    let err = OverlayInflater::with_builtins()
        .inflate_str("fill color=red\n\nkeyline from=top\n  distance=far\n")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InflatingLayerGeneric);
    assert_eq!(err.line_number(), 2);
    assert!(err.cause().unwrap().to_string().contains("far"));
}

#[test]
fn test_builtin_missing_argument() {
    let err = OverlayInflater::with_builtins()
        .inflate_str("grid-lines step=8dp\n")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ArgumentMissingOrNotOneOf);
    assert_eq!(err.args()[1], "direction");
    assert_eq!(err.args()[2], serde_json::Value::Null);
    assert_eq!(err.args()[3], json!(["horizontal", "vertical"]));
}

#[test]
fn test_override_builtin_type() {
    let registry = builtin_registry();
    registry.register_fn("fill", |_: &ArgumentsBundle| {
        Ok(SpecLayer::Fill(Fill { color: Color(0) }))
    });
    let inflater = OverlayInflater::new(Arc::new(registry));

    let overlays = inflater.inflate_str("fill color=red\n").unwrap();
    assert_eq!(overlays[0].layers()[0], SpecLayer::Fill(Fill { color: Color(0) }));
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn test_settings_file_drives_grammar() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[grammar]\nvariable_marker = \"$\"\ntitle_marker = \"==\"\nduplicate_arguments = \"reject\""
    )
    .unwrap();

    let effective = EffectiveConfig::build(Some(file.path()), None).unwrap();
    assert_eq!(
        effective.config.grammar.duplicate_arguments,
        DuplicatePolicy::Reject
    );

    let inflater = OverlayInflater::with_builtins().with_config(effective.config.grammar);
    let overlays = inflater
        .inflate_str("$tint=blue\n== Tinted\nfill color=$tint\n")
        .unwrap();
    assert_eq!(overlays[0].title(), Some("Tinted"));

    let err = inflater
        .inflate_str("fill color=red\n  color=blue\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedLayerDeclaration);
}
