use provider_directory::{extract_document_text, ExtractOptions, TextMode};
use provider_directory::{ParseOptions, ProviderParser};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: debug_blocks <pdf_or_txt_path> [max_blocks] [--plain]");
        std::process::exit(1);
    }

    let path = &args[1];
    let max_blocks: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(usize::MAX);
    let mode = if args.iter().any(|a| a == "--plain") {
        TextMode::Plain
    } else {
        TextMode::Layout
    };

    let text = if path.ends_with(".txt") {
        std::fs::read_to_string(path).expect("Failed to read text file")
    } else {
        let options = ExtractOptions {
            mode,
            ..ExtractOptions::default()
        };
        extract_document_text(path, &options).expect("Failed to extract")
    };

    let parser = ProviderParser::new(ParseOptions::default()).expect("Failed to build parser");
    println!(
        "{} chars, {} name lines",
        text.len(),
        parser.segmenter().boundary_count(&text)
    );

    for (index, block) in parser.segmenter().segment(&text).enumerate().take(max_blocks) {
        println!("=== BLOCK {} ({} lines) ===", index, block.lines().count());
        for line in block.lines() {
            println!("  | {}", line);
        }
        match parser.parse_block(block) {
            Ok(Some(record)) => println!("  -> {:?}", record.to_row()),
            Ok(None) => println!("  -> rejected (no phone/gender labels)"),
            Err(e) => println!("  -> skipped: {}", e),
        }
        println!();
    }
}
