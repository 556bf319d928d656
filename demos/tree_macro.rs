//! Building trees with the esdf! macro.
//!
//! Run with: cargo run --example tree_macro

use esdf::{esdf, to_string};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mass = 35;
    let tree = esdf! {
        ("ship", "Much Confused Wardragon") {
            ("mass", mass)
            ("drag", 0.3)
            (add "outfit", "Hyperdrive")
            ("description", "Says \"hello\" to everyone.")
        }
        (remove "ship", "Old Hauler")
    }?;

    print!("{}", to_string(tree.root_node())?);
    println!("{} nodes", tree.len());

    Ok(())
}
