//! Rich editing example
//!
//! Demonstrates styling, structural edits, change subscriptions and undo by replay.

use richtext_core::{Bias, EditableStyledDocument, PlainTextChange, StyledDocument};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Style {
    Plain,
    Heading,
    Code,
}

fn print_document(doc: &StyledDocument<Style>) {
    for (i, par) in doc.paragraphs().iter().enumerate() {
        let runs: Vec<String> = par
            .style_spans()
            .iter()
            .map(|span| format!("{:?}x{}", span.style(), span.length()))
            .collect();
        println!("  [{i}] {:?} {}", par.text(), runs.join(" "));
    }
}

fn main() {
    println!("=== Rich editing ===\n");

    let mut doc = EditableStyledDocument::with_text("Title\nSome text here", Style::Plain);

    let history: Arc<Mutex<Vec<PlainTextChange>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&history);
    doc.subscribe_plain(move |change| {
        println!(
            "  change at {}: -{:?} +{:?}",
            change.position(),
            change.removed(),
            change.inserted()
        );
        sink.lock().unwrap().push(change.clone());
    });
    doc.subscribe_paragraphs(|change| {
        println!(
            "  paragraphs {}..{} replaced by {}",
            change.index,
            change.index + change.removed,
            change.added
        );
    });

    println!("1. Styling:");
    doc.set_paragraph_style(0, Style::Heading).unwrap();
    doc.set_style(11, 15, Style::Code).unwrap();
    print_document(doc.document());

    println!("\n2. Inserting a paragraph:");
    let inserted = StyledDocument::from_text("Subtitle\n", Style::Heading);
    doc.replace(6, 6, &inserted).unwrap();
    print_document(doc.document());

    println!("\n3. Typing:");
    let end = doc.len();
    doc.insert_text(end, "!").unwrap();
    print_document(doc.document());

    println!("\n4. Navigation:");
    for offset in [5, 6, doc.len()] {
        let forward = doc.offset_to_position(offset, Bias::Forward).unwrap();
        let backward = doc.offset_to_position(offset, Bias::Backward).unwrap();
        println!("  offset {offset}: forward {forward:?}, backward {backward:?}");
    }

    println!("\n5. Undo the typing:");
    let last = history.lock().unwrap().last().cloned();
    if let Some(change) = last {
        doc.apply_plain_change(&change.invert()).unwrap();
    }
    println!("  text: {:?}", doc.text());
    println!("  version: {}", doc.version());
}
