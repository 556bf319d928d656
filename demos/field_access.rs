//! Typed arguments and range checks with Builder.
//!
//! Run with: cargo run --example field_access

use esdf::{from_str_with, Builder, Diagnostics, IntType, ReadOptions, RealType};

const OUTFITS: &str = "\
outfit Laser
\tcost 12000
\tmass 6
\tcolor 1.0 0.4 1.5
\t\"random roll\" 120
\tspeed fast
";

#[derive(Debug, Default)]
struct Outfit {
    name: String,
    cost: i64,
    mass: f64,
    color: [f64; 3],
    roll: i32,
    speed: f64,
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let diagnostics = Diagnostics::new();
    let tree = from_str_with(OUTFITS, "outfits.txt", ReadOptions::new(), &diagnostics);
    let builder = Builder::new(&diagnostics);

    for node in tree.top_level() {
        diagnostics.reset();
        let mut outfit = Outfit {
            name: builder.build_string(node, 0, "outfit"),
            ..Outfit::default()
        };

        for child in node.children() {
            match child.name() {
                "cost" => outfit.cost = builder.build_long(child, 0, "outfit"),
                "mass" => outfit.mass = builder.build_double_as(child, 0, "outfit", RealType::PosReal),
                "color" => {
                    for (i, component) in outfit.color.iter_mut().enumerate() {
                        *component = builder.build_double_as(child, i, "outfit", RealType::SmallReal);
                    }
                }
                "random roll" => {
                    outfit.roll = builder.build_int_as(child, 0, "outfit", IntType::PossibleRoll)
                }
                "speed" => outfit.speed = builder.build_double(child, 0, "outfit"),
                _ => {}
            }
        }

        println!("{:#?}", outfit);
        println!(
            "{} errors, {} warnings: {}",
            diagnostics.error_count(),
            diagnostics.warning_count(),
            if diagnostics.has_errors() { "rejected" } else { "accepted" }
        );
    }
}
