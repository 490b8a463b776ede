/// Example program to print the loaded configuration
///
/// Run with: cargo run -p smartbidi-config --example print_config

fn main() {
    // Load configuration from smartbidi.toml plus SMARTBIDI_* overrides
    let config = smartbidi_config::SmartBidiConfig::load();

    println!("=== SmartBiDi Configuration ===\n");

    println!("Direction:");
    println!("  Enabled: {}", config.direction.enabled);
    println!("  Admin Bypass: {}", config.direction.admin_bypass);
    println!("  Force RTL: {}", config.direction.force_rtl);
    println!();

    let range = config.script_range();
    println!("Script Range: U+{:04X}..=U+{:04X}", range.low(), range.high());
    println!();

    println!("Channels:");
    for name in smartbidi_config::ChannelsSection::NAMES {
        if let Some(channel) = config.channels.get(name) {
            println!(
                "  {name}: escape={} normalize_ltr={}",
                channel.escape, channel.normalize_ltr
            );
        }
    }
    println!();

    println!("Zones:");
    println!("  Navbar: {}", config.zones.force_navbar);
    println!("  Content: {}", config.zones.force_content);
    println!("  Footer: {}", config.zones.force_footer);
    println!();

    println!("Binder:");
    let binder_range = config.binder_script_range();
    println!("  Script Range High: U+{:04X}", binder_range.high());
    println!("  Debounce: {}ms", config.binder.debounce_ms);
    println!("  Legacy Class Names: {}", config.binder.legacy_class_names);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
