mod common;

use common::init_test_logging;
use esdf::diagnostics::Arg;
use esdf::{from_str, from_str_with, Builder, Diagnostics, IntType, ReadOptions, RealType, Severity};

#[test]
fn test_zero_args_reports_exactly_one_error() {
    init_test_logging();
    let tree = from_str("flag\n");
    let node = tree.top_level().next().unwrap();

    for kind in ["string", "int", "long", "double"] {
        let diagnostics = Diagnostics::non_terminating();
        let builder = Builder::new(&diagnostics);
        match kind {
            "string" => assert_eq!(builder.build_string(node, 0, "test"), ""),
            "int" => assert_eq!(builder.build_int(node, 0, "test"), 0),
            "long" => assert_eq!(builder.build_long(node, 0, "test"), 0),
            _ => assert_eq!(builder.build_double(node, 0, "test"), 0.0),
        }
        assert_eq!(diagnostics.error_count(), 1, "{}", kind);
        assert_eq!(diagnostics.records().len(), 1, "{}", kind);
    }
}

#[test]
fn test_negative_natural_is_returned_with_one_warning() {
    let tree = from_str("crew -5\n");
    let node = tree.top_level().next().unwrap();
    let diagnostics = Diagnostics::non_terminating();

    let crew = Builder::new(&diagnostics).build_int_as(node, 0, "ship", IntType::Natural);

    assert_eq!(crew, -5);
    assert_eq!(diagnostics.count(Severity::Warn), 1);
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(
        diagnostics.records()[0].text,
        "crew argument in ship should be a natural number, but is less than 0. (line 1 of <string>)"
    );
}

#[test]
fn test_colour_components() {
    let diagnostics = Diagnostics::non_terminating();
    let tree = from_str_with(
        "color 0.2 1.0 1.25 -1\n",
        "colors.txt",
        ReadOptions::new(),
        &diagnostics,
    );
    let color = tree.top_level().next().unwrap();
    let builder = Builder::new(&diagnostics);

    let components: Vec<f64> = (0..color.count_args())
        .map(|i| builder.build_double_as(color, i, "color", RealType::SmallReal))
        .collect();

    assert_eq!(components, [0.2, 1.0, 1.25, -1.0]);
    assert_eq!(diagnostics.warning_count(), 2);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn test_error_count_decides_success() {
    let diagnostics = Diagnostics::non_terminating();
    let tree = from_str_with(
        "outfit Laser\n\tcost 1200\n\tmass\n\tspeed fast\n",
        "outfits.txt",
        ReadOptions::new(),
        &diagnostics,
    );
    let builder = Builder::new(&diagnostics);
    let outfit = tree.top_level().next().unwrap();

    diagnostics.reset();
    let cost = builder.get::<i64>(outfit.find_child("cost").unwrap(), 0, "outfit");
    let mass = builder.get::<f64>(outfit.find_child("mass").unwrap(), 0, "outfit");
    let speed = builder.get::<i32>(outfit.find_child("speed").unwrap(), 0, "outfit");

    assert_eq!((cost, mass, speed), (1200, 0.0, 0));
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 2);
}

#[test]
fn test_reports_can_go_to_an_output_target() {
    let tree = from_str("roll 150\n");
    let node = tree.top_level().next().unwrap();
    let diagnostics = Diagnostics::non_terminating();
    let value = Builder::new(&diagnostics).build_int_as(node, 0, "event", IntType::PossibleRoll);
    assert_eq!(value, 150);

    let mut out = Vec::new();
    let report = diagnostics.records().remove(0);
    diagnostics.report(
        &esdf::diagnostics::Message::new(report.severity, "$CONTEXT"),
        [Arg::Text(&report.text), Arg::Output(&mut out)],
    );
    assert!(String::from_utf8(out).unwrap().starts_with("Warning: roll argument in event"));
}
