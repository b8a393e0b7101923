//! hekate-query - run a selector against an HTML file

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use hekate_dom::{DomTree, NodeId};
use hekate_select::{EngineConfig, SelectorEngine};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: hekate-query <file.html> <selector> [--config <file.json>] [--strict]";

struct Args {
    file: PathBuf,
    selector: String,
    config: Option<PathBuf>,
    strict: bool,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut strict = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "--strict" => strict = true,
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    let [file, selector]: [String; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!(USAGE))?;
    Ok(Args {
        file: PathBuf::from(file),
        selector,
        config,
        strict,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// `<tag#id.class>` followed by trimmed text
fn describe(tree: &DomTree, el: NodeId) -> String {
    let mut out = format!("<{}", tree.tag_name(el).unwrap_or("?"));
    if let Some(id) = tree.element_id(el) {
        out.push('#');
        out.push_str(id);
    }
    if let Some(classes) = tree.attribute(el, "class") {
        for class in classes.split_ascii_whitespace() {
            out.push('.');
            out.push_str(class);
        }
    }
    out.push('>');

    let text = tree.text_content(el);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        out.push(' ');
        out.push_str(&text);
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;

    let html = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let url = format!("file://{}", args.file.display());
    let document = hekate_html::HtmlParser::new()
        .parse_with_url(&html, &url)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    let tree = document.tree();

    let engine = SelectorEngine::with_config(config);
    let roots = [tree.root()];
    let result = if args.strict {
        engine
            .try_query(tree, &args.selector, &roots)
            .with_context(|| format!("invalid selector '{}'", args.selector))?
    } else {
        engine.query(tree, &args.selector, &roots)
    };

    tracing::info!(selector = %result.selector, matches = result.len(), "query finished");
    println!("{} ({} matches)", result.selector, result.len());
    for &el in &result.elements {
        println!("  {}", describe(tree, el));
    }
    Ok(())
}
