use crate::support::{load_compiler_or_exit, parse_theme_or_exit, slug};
use prism_core::emit::css::{CssOptions, render_css};
use prism_core::emit::json::render_json;
use prism_core::{BuildTarget, TargetOutcome, Theme};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Args {
    pub tokens: String,
    pub aliases: Vec<String>,
    pub themes: Vec<String>,
    pub out: String,
    pub decompose_composites: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let compiler = load_compiler_or_exit(&args.tokens);

    let themes: Vec<Theme> = if args.themes.is_empty() {
        vec![Theme::Light, Theme::Dark]
    } else {
        args.themes.iter().map(|t| parse_theme_or_exit(t)).collect()
    };
    let targets: Vec<BuildTarget> = args
        .aliases
        .iter()
        .flat_map(|alias| themes.iter().map(move |theme| BuildTarget::new(alias, *theme)))
        .collect();

    let out_dir = PathBuf::from(&args.out);
    fs::create_dir_all(&out_dir).unwrap_or_else(|e| {
        eprintln!("error: failed to create {}: {e}", out_dir.display());
        std::process::exit(1);
    });

    let css_options = CssOptions {
        decompose_composites: args.decompose_composites,
    };
    let outcomes = compiler.build_all(&targets);

    let mut rows = Vec::new();
    let mut failures = 0usize;
    for outcome in &outcomes {
        rows.push(write_target(outcome, &out_dir, &css_options));
        if outcome.result.is_err() {
            failures += 1;
        }
    }

    if args.json {
        let payload = json!({
            "tokens": args.tokens,
            "out": out_dir.display().to_string(),
            "baseOrder": compiler.base_order(),
            "targets": rows,
            "failedTargets": failures,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("prism build ({} targets)", outcomes.len());
        println!("  Source: {}", args.tokens);
        println!("  Output: {}", out_dir.display());
        for (outcome, row) in outcomes.iter().zip(&rows) {
            match &outcome.result {
                Ok(tree) => {
                    println!(
                        "  {}: {} tokens, {} warnings",
                        outcome.target,
                        tree.token_count(),
                        outcome.warnings.len()
                    );
                    if let Some(css) = row.get("css").and_then(|v| v.as_str()) {
                        println!("    css:  {css}");
                    }
                    if let Some(path) = row.get("json").and_then(|v| v.as_str()) {
                        println!("    json: {path}");
                    }
                }
                Err(error) => println!("  {}: failed: {error}", outcome.target),
            }
            for warning in &outcome.warnings {
                println!("    warning: {warning}");
            }
        }
    }

    if failures == outcomes.len() && !outcomes.is_empty() {
        std::process::exit(1);
    }
}

fn write_target(
    outcome: &TargetOutcome,
    out_dir: &Path,
    css_options: &CssOptions,
) -> serde_json::Value {
    let warnings: Vec<String> = outcome.warnings.iter().map(|w| w.to_string()).collect();
    let tree = match &outcome.result {
        Ok(tree) => tree,
        Err(error) => {
            return json!({
                "alias": &outcome.target.alias,
                "theme": outcome.target.theme.to_string(),
                "ok": false,
                "error": error.to_string(),
                "warnings": warnings,
            });
        }
    };

    let stem = format!(
        "tokens.{}.{}",
        slug(&outcome.target.alias),
        outcome.target.theme
    );
    let css_path = out_dir.join(format!("{stem}.css"));
    let json_path = out_dir.join(format!("{stem}.json"));
    write_or_exit(&css_path, &render_css(tree, css_options));
    write_or_exit(&json_path, &render_json(tree));

    json!({
        "alias": &outcome.target.alias,
        "theme": outcome.target.theme.to_string(),
        "ok": true,
        "tokenCount": tree.token_count(),
        "warnings": warnings,
        "css": css_path.display().to_string(),
        "json": json_path.display().to_string(),
    })
}

fn write_or_exit(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap_or_else(|e| {
        eprintln!("error: failed to write {}: {e}", path.display());
        std::process::exit(1);
    });
}
