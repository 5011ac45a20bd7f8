//! Example: Decode a document and walk the tree
//!
//! Usage: cargo run --example decode <input.xml>

use std::env;

use sxml::{Node, NodeRef, TreeCodec};

fn print_node(node: &NodeRef, depth: usize) {
    let node = node.borrow();
    let qualified = match node.prefix() {
        Some(prefix) => format!("{}:{}", prefix, node.name()),
        None => node.name().to_string(),
    };
    let line = node
        .source_line()
        .map_or_else(|| "?".to_string(), |l| l.to_string());
    println!("{}{} (line {})", "  ".repeat(depth), qualified, line);

    for key in node.attribute_keys() {
        let value = node.attribute_string(key).unwrap_or_default();
        println!("{}  @{} = {}", "  ".repeat(depth), key, value);
    }
    if !node.has_children() {
        if let Some(text) = node.text_value() {
            println!("{}  text: {}", "  ".repeat(depth), text);
        }
    }
    for child in node.children() {
        print_node(child, depth + 1);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.xml>", args[0]);
        std::process::exit(1);
    }

    let root = TreeCodec::decode_file(&args[1])?;
    print_node(&root, 0);
    eprintln!("{} elements", Node::subtree_size(&root));
    Ok(())
}
