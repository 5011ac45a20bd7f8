//! Example: Build a tree in code and encode it
//!
//! Prints the same small inventory document compact and pretty printed.
//!
//! Usage: cargo run --example encode

use sxml::{new_node_ref, Namespace, Node, NodeRef, TreeCodec};

fn element(name: &str, ns: &Namespace) -> NodeRef {
    new_node_ref(Node::with_namespace(name, ns.clone()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let inv = Namespace::new("inv", "urn:example:inventory");
    let geo = Namespace::new("geo", "urn:example:geo");

    let root = element("inventory", &inv);
    root.borrow_mut().add_attribute_string("site", "North \"B\" warehouse");

    for (sku, qty) in [("A-100", 12), ("B-200", 0)] {
        let item = element("item", &inv);
        {
            let mut item = item.borrow_mut();
            item.add_attribute_string("sku", sku);
            item.add_attribute_integer_unless_default("quantity", qty, 0);
            item.add_attribute_boolean("stocked", qty > 0);
        }
        let shelf = element("shelf", &geo);
        shelf.borrow_mut().set_text_value(Some("R4".to_string()));
        Node::add_child(&item, shelf);
        Node::add_child(&root, item);
    }

    println!("{}", TreeCodec::encode_to_string(&root, false)?);
    println!();
    print!("{}", TreeCodec::encode_to_string(&root, true)?);
    Ok(())
}
