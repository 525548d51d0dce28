use prism_core::validate_css;
use serde_json::json;
use std::fs;

pub fn run(css_path: String, json_output: bool) {
    let css = fs::read_to_string(&css_path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {css_path}: {e}");
        std::process::exit(1);
    });
    let report = validate_css(&css);

    if json_output {
        let payload = json!({
            "css": &css_path,
            "clean": report.is_clean(),
            "report": &report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("prism validate {css_path}");
        println!("  Tokens: {}", report.token_count);
        if report.is_clean() {
            println!("  All tokens are valid.");
        }
        if !report.issues.is_empty() {
            println!("  Issues ({}):", report.issues.len());
            for issue in &report.issues {
                println!("    {issue}");
            }
        }
        if !report.warnings.is_empty() {
            println!("  Warnings ({}):", report.warnings.len());
            for warning in &report.warnings {
                println!("    {warning}");
            }
        }
        println!("  Breakdown:");
        for entry in &report.breakdown {
            println!("    {:<14} {}", entry.category, entry.count);
        }
    }

    if report.has_issues() {
        std::process::exit(1);
    }
}
