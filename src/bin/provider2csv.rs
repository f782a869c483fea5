//! CLI tool for converting a provider directory PDF to CSV

use provider_directory::{convert_pdf, ConvertOptions};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <input_pdf_path> <output_csv_path>", args[0]);
        eprintln!();
        eprintln!("Extracts provider entries (name, service type, medical group, phone,");
        eprintln!("gender, languages, specialties) from a directory PDF into CSV.");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let csv_path = &args[2];

    println!("Reading text from {}...", pdf_path);
    println!("Parsing provider data...");
    let summary = match convert_pdf(pdf_path, csv_path, &ConvertOptions::default()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let report = &summary.report;

    for skipped in &report.skipped {
        eprintln!(
            "Skipping block {}: {}\n  starts with: {:?}",
            skipped.index, skipped.error, skipped.prefix
        );
    }
    if report.is_unsupported_input() {
        eprintln!("Unsupported input layout: no 'Name, MD' or 'Name, DO' lines were found.");
    }
    println!("Found {} providers.", report.records.len());

    if summary.written {
        println!("Data written to {}", csv_path);
        println!("Processing time: {}ms", summary.processing_time_ms);
    } else {
        println!("No provider data to write.");
    }
}
