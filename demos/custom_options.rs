//! Customizing reading and writing with ReadOptions and WriteOptions.
//!
//! Run with: cargo run --example custom_options

use esdf::{from_str, from_str_with, to_string_with_options, Diagnostics, ReadOptions, WriteOptions};
use std::error::Error;

const TEXT: &str = "\
add ship Wardragon
\tmass 35
\tremove outfit Hyperdrive
";

fn main() -> Result<(), Box<dyn Error>> {
    let tree = from_str(TEXT);

    // Default format (one tab per level, blank line after each top-level node)
    println!("Default:");
    print!("{}", esdf::to_string(tree.root_node())?);

    // Two spaces per level, no separator
    println!("Two spaces:");
    let options = WriteOptions::new().with_spaces(2).without_separator();
    print!("{}", to_string_with_options(tree.root_node(), options)?);

    // Flags as plain names
    println!("\nFlags ignored:");
    let diagnostics = Diagnostics::new();
    let plain = from_str_with(TEXT, "text", ReadOptions::new().ignore_node_flags(), &diagnostics);
    for node in plain.iter() {
        println!("{:?} {} {:?}", node.flag(), node.name(), node.args());
    }

    Ok(())
}
