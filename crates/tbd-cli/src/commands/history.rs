use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use tbd_core::render::format_timestamp;
use tbd_core::surface::plain_text;
use tbd_core::{OutputElement, Passage};

pub fn run(dir: &Path) -> Result<(), String> {
    let Some(session) = super::load_saved(dir)? else {
        println!("  No saved game in {}.", dir.display());
        return Ok(());
    };

    if session.log.is_empty() {
        println!("  No passages.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Time", "Opening", "Choices"]);

    for (index, passage) in session.log.passages().iter().enumerate() {
        let time = passage
            .timestamp()
            .map(|t| format_timestamp(&t))
            .unwrap_or_else(|| "-".to_string());
        let choices = passage
            .continuations()
            .flat_map(|c| c.labels())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            (index + 1).to_string(),
            time,
            opening(passage),
            choices,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} passages", session.log.len());

    Ok(())
}

/// First words of a passage.
fn opening(passage: &Passage) -> String {
    let text = passage
        .elements()
        .iter()
        .filter_map(|e| match e {
            OutputElement::Container { content, .. } | OutputElement::RawMarkup { content, .. } => {
                Some(plain_text(content))
            }
            _ => None,
        })
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    if text.chars().count() > 50 {
        format!("{}...", text.chars().take(47).collect::<String>())
    } else {
        text
    }
}
