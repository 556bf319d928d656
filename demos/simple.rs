//! Read a data file, inspect it, and write it back.
//!
//! Run with: cargo run --example simple

use esdf::{from_str_with, to_string, Diagnostics, ReadOptions};
use std::error::Error;

const SHIPS: &str = "\
# A single ship
ship \"Much Confused Wardragon\"
\tmass 35
\tdrag 0.3
\tweapon
\t\t\"hit force\" 308
\t\t\"hull damage\" 6100
";

fn main() -> Result<(), Box<dyn Error>> {
    let diagnostics = Diagnostics::new();
    let tree = from_str_with(SHIPS, "ships.txt", ReadOptions::new(), &diagnostics);

    for node in tree.iter() {
        println!("{}{}", "  ".repeat(node.depth()), node);
    }

    let ship = tree.top_level().next().ok_or("no ship")?;
    let weapon = ship.find_child("weapon").ok_or("no weapon")?;
    println!("\n{} has {} weapon stats", ship.arg(0).unwrap_or("?"), weapon.count_children());

    // Write it back
    let text = to_string(tree.root_node())?;
    println!("\nWritten:\n{}", text);

    let reread = esdf::from_str(&text);
    assert_eq!(reread.root_node(), tree.root_node());
    println!("✓ Round-trip successful ({} errors)", diagnostics.error_count());

    Ok(())
}
