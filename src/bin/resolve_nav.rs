use std::env;

use anyhow::Context;
use examtree::content::{resolve_path, universal_nav, Api, NavContext, NavItem};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: cargo run --bin resolve_nav <exam[/subject[/unit/...]]>");
            return Err(anyhow::anyhow!("a slash path is required"));
        }
    };

    let ctx = NavContext::from_path(&path)?;
    let api = Api::from_env();

    let resolved = resolve_path(&api, &ctx)
        .context(format!("failed to resolve '{}' against {}", path, api.base()))?;
    let resolved = match resolved {
        Some(resolved) => resolved,
        None => {
            println!("exam '{}' not found, no navigation available", ctx.exam);
            return Ok(());
        }
    };

    let (level, node) = resolved.current();
    println!(
        "current: {BOLD}{}{RESET} ({}, {} of {} requested levels matched)",
        node.name,
        level.label(),
        resolved.steps.len(),
        path.split('/').filter(|s| !s.is_empty()).count() - 1,
    );

    let nav = universal_nav(&api, &ctx).context("failed to compute prev/next")?;
    print_link("prev", &nav.prev);
    print_link("next", &nav.next);

    Ok(())
}

fn print_link(which: &str, item: &Option<NavItem>) {
    match item {
        Some(item) => println!("{}: {BOLD}{}{RESET} {}", which, item.label, item.href),
        None => println!("{}: -", which),
    }
}
