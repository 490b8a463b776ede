//! Command-line front end for SmartBiDi.
//!
//! Configuration comes from `smartbidi.toml` in the working directory (or
//! `--config`), with `SMARTBIDI_*` environment overrides on top. Set
//! `RUST_LOG=smartbidi=debug` to see decisions as they are made.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use smartbidi_binder::{BinderConfig, Capabilities, HostPage, InputBinder};
use smartbidi_config::SmartBidiConfig;
use smartbidi_markup::{BidiPipeline, RenderChannel, RenderContext};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smartbidi", version, about = "Bidirectional text direction hints")]
struct Cli {
    /// Read configuration from this file instead of ./smartbidi.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report script flags and the direction decision for some text
    Classify {
        /// Text to classify; read from stdin when omitted
        text: Option<String>,
        /// Decide as an administrative surface
        #[arg(long)]
        admin: bool,
    },
    /// Run text through a content channel's filter
    Filter {
        #[arg(long, short, default_value = "content")]
        channel: RenderChannel,
        /// Render as an administrative surface
        #[arg(long)]
        admin: bool,
        text: Option<String>,
    },
    /// Print the forced-RTL zone stylesheet
    Zones {
        /// Emit only the CSS, without the <style> element
        #[arg(long)]
        raw: bool,
    },
    /// Expand [smartbidi]...[/smartbidi] shortcodes
    Shortcode { text: Option<String> },
    /// Bind an HTML page's editable fields and report their directions
    Bind {
        file: PathBuf,
        /// Skip the mutation observer and editor store
        #[arg(long)]
        bare: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    let pipeline = BidiPipeline::from_config(&config);

    match cli.command {
        Command::Classify { text, admin } => {
            let text = text_or_stdin(text)?;
            let ctx = render_context(admin);
            let report = json!({
                "classification": pipeline.classify(&text),
                "decision": pipeline.decide(&text, ctx),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Filter {
            channel,
            admin,
            text,
        } => {
            let text = text_or_stdin(text)?;
            println!("{}", pipeline.filter(channel, &text, render_context(admin)));
        }
        Command::Zones { raw } => {
            if raw {
                print!("{}", pipeline.zone_styles());
            } else if let Some(element) = pipeline.zone_style_element() {
                println!("{element}");
            } else {
                debug!("no zones forced; nothing to emit");
            }
        }
        Command::Shortcode { text } => {
            let text = text_or_stdin(text)?;
            println!("{}", pipeline.expand_shortcodes(&text));
        }
        Command::Bind { file, bare } => {
            let html = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let report = bind_report(&config, &html, bare);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SmartBidiConfig> {
    match path {
        Some(path) => {
            let mut config = SmartBidiConfig::load_from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            config.merge_with_env();
            Ok(config)
        }
        None => Ok(SmartBidiConfig::load()),
    }
}

fn render_context(admin: bool) -> RenderContext {
    if admin {
        RenderContext::admin()
    } else {
        RenderContext::public()
    }
}

fn text_or_stdin(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    // Drop the newline a shell pipe appends.
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

/// Attach a binder to the page, settle every bound field once and describe it.
fn bind_report(config: &SmartBidiConfig, html: &str, bare: bool) -> serde_json::Value {
    let capabilities = if bare {
        Capabilities::none()
    } else {
        Capabilities::all()
    };
    let mut page = HostPage::from_html(html, capabilities);
    let mut binder = InputBinder::new(BinderConfig::from(config));
    binder.attach(&mut page);

    let nodes: Vec<_> = binder.bound_elements().collect();
    let fields: Vec<_> = nodes
        .into_iter()
        .map(|node| {
            let variant = binder.apply(&mut page, node);
            let doc = page.document();
            json!({
                "tag": doc.tag_name(node),
                "id": doc.attr(node, "id"),
                "text": doc.text_value(node),
                "variant": variant,
                "dir": doc.dir(node),
                "classes": doc.classes(node),
            })
        })
        .collect();

    json!({
        "bound": binder.bound_count(),
        "mutation_observer": binder.is_observing_mutations(),
        "editor_store": binder.is_subscribed_to_store(),
        "fields": fields,
    })
}
