//! The types command

use colored::Colorize;
use envr_types::{Primitive, TypeDescriptor};
use serde_json::json;

use crate::error::Result;

/// Built-in names with a short description, in display order.
pub fn builtin_types() -> Vec<(String, &'static str)> {
    let mut types = vec![
        ("any".to_string(), "top type; text is supplied as a string"),
        ("void".to_string(), "type of the root element only"),
        (TypeDescriptor::STRING.to_string(), "text"),
    ];
    types.extend(Primitive::ALL.iter().map(|p| (p.as_str().to_string(), "primitive")));
    types.push((
        TypeDescriptor::QUALIFIERS.to_string(),
        "root qualifiers, resolved at /:Qualifiers",
    ));
    types.push((
        TypeDescriptor::AMBIGUITY_HANDLER.to_string(),
        "tie breaker, resolved at /:AmbiguityHandler",
    ));
    types
}

/// Run the types command
pub fn run_types(json: bool) -> Result<()> {
    let types = builtin_types();

    if json {
        let output: Vec<_> = types
            .iter()
            .map(|(name, description)| json!({ "name": name, "description": description }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Built-in Types".bold());
    println!();
    for (name, description) in &types {
        println!("  {:<18} {}", name.green(), description.dimmed());
    }
    println!();
    println!(
        "{} Other names are nominal types, e.g. {} or {}.",
        "Note:".dimmed(),
        "Clock".cyan(),
        "map<string,int>".cyan()
    );
    Ok(())
}
