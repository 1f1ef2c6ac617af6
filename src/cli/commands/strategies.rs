//! List strategies command.

use anyhow::Result;
use replay_strategies::{StrategyRegistry, DEFAULT_STRATEGY};

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        let marker = if info.name == DEFAULT_STRATEGY { " (default)" } else { "" };
        println!("  {}{}", info.name, marker);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", info.default_config);
        println!();
    }

    println!("Use --strategy <name> to select a strategy and --params <file.json> to override defaults.");

    Ok(())
}
