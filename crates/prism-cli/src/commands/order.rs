use crate::support::{load_compiler_or_exit, parse_theme_or_exit};
use prism_core::BuildTarget;
use serde_json::json;

pub fn run(tokens: String, alias: String, theme: String, json_output: bool) {
    let compiler = load_compiler_or_exit(&tokens);
    let target = BuildTarget::new(alias, parse_theme_or_exit(&theme));

    let effective = compiler.effective_order(&target).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "tokens": tokens,
            "alias": target.alias,
            "theme": target.theme.to_string(),
            "baseOrder": compiler.base_order(),
            "effectiveOrder": effective,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("prism order {target}");
        println!("  Base order:");
        for name in compiler.base_order() {
            println!("    {name}");
        }
        println!("  Effective order:");
        for name in &effective {
            println!("    {name}");
        }
    }
}
