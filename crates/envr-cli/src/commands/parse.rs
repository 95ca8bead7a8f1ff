//! The parse command

use colored::Colorize;
use envr_types::{Element, Path};
use serde_json::json;

use crate::error::Result;

/// Run the parse command
pub fn run_parse(input: &str, json: bool) -> Result<()> {
    let path = Path::parse(input)?;

    if json {
        let elements: Vec<_> = path.iter().map(element_json).collect();
        let output = json!({
            "path": path.to_string(),
            "absolute": path.is_absolute(),
            "type": path.ty().to_string(),
            "elements": elements,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Path:".bold(), path.to_string().cyan());
    println!(
        "{} {}",
        "Kind:".bold(),
        if path.is_absolute() { "absolute" } else { "relative" }
    );
    println!();
    for (index, element) in path.iter().enumerate() {
        println!("  {:>2}  {}", index, describe(element));
    }
    Ok(())
}

fn describe(element: &Element) -> String {
    if element.is_root() {
        return "(root)".dimmed().to_string();
    }
    let name = if element.name().is_empty() {
        "(unnamed)".dimmed().to_string()
    } else {
        element.name().green().to_string()
    };
    let ty = element
        .ty()
        .map_or_else(|| "-".dimmed().to_string(), |ty| ty.to_string().yellow().to_string());
    match element.arguments() {
        Some(arguments) => format!("{name} : {ty}  arguments: [{}]", arguments.join(", ")),
        None => format!("{name} : {ty}"),
    }
}

fn element_json(element: &Element) -> serde_json::Value {
    json!({
        "name": element.name(),
        "type": element.ty().map(|ty| ty.to_string()),
        "parameters": element
            .parameters()
            .map(|params| params.iter().map(|p| p.to_string()).collect::<Vec<_>>()),
        "arguments": element.arguments(),
    })
}
