use prism_core::{Compiler, Theme, layer};

pub fn load_compiler_or_exit(tokens: &str) -> Compiler {
    let store = layer::load(tokens).unwrap_or_else(|e| {
        eprintln!("error: failed to load {tokens}: {e}");
        std::process::exit(1);
    });
    Compiler::new(store)
}

pub fn parse_theme_or_exit(raw: &str) -> Theme {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Filename-safe slug for an alias or layer name.
pub fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = true;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}
