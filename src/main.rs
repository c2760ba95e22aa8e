use std::collections::BTreeMap;
use std::io::Write;
use std::{
    env,
    fs::{self, OpenOptions},
};

use anyhow::Context;
use examtree::content::{
    build_hierarchy, Api, BranchFailure, ContentSource, Entity, Hierarchy, SubjectNode,
};
use serde::Serialize;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_OUTPUT_DIR: &str = "output";

pub struct Config {
    pub exam: String,
    pub output_dir: String,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let exam = args
        .next()
        .context("exam slug or id is required, see GET /api/exams for the available ones")?;
    let output_dir = args.next().unwrap_or(DEFAULT_OUTPUT_DIR.to_string());

    Ok(Config { exam, output_dir })
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: cargo run <exam> [output_dir]");
            return Err(e);
        }
    };

    let api = Api::from_env();
    let exam = api
        .exam(&config.exam)?
        .context(format!("no exam '{}' at {}", config.exam, api.base()))?;

    let tree = build_hierarchy(&api, &exam.id)
        .context(format!("failed to build hierarchy for '{}'", exam.slug))?;

    for failure in &tree.incomplete {
        eprintln!(
            "warning: could not fetch {} of '{}': {}",
            failure.level.collection(),
            failure.parent,
            failure.error
        );
    }

    create_output_dir(&config.output_dir).context("failed to create output directory")?;
    let snapshot = write_snapshot(&exam, &tree, &config.output_dir)
        .context("failed to write hierarchy snapshot")?;

    println!("Fetched exam hierarchy\n");
    println!("---");
    println!("{}", snapshot);
    println!("---\n");

    let units: usize = tree.subjects.iter().map(|s| s.units.len()).sum();
    println!(
        "wrote {BOLD}{}{RESET} subjects and {BOLD}{}{RESET} units to {BOLD}{}/{}.yaml{RESET}",
        tree.subjects.len(),
        units,
        &config.output_dir,
        exam.slug
    );

    Ok(())
}

fn write_snapshot(exam: &Entity, tree: &Hierarchy, output_dir: &str) -> anyhow::Result<String> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(format!("{}/{}.yaml", output_dir, exam.slug))
        .context(format!("failed to open file for {}", exam.slug))?;

    let mut map = BTreeMap::<&str, Snapshot>::new();
    map.insert("name", Snapshot::Name(exam.name.as_str()));
    map.insert("slug", Snapshot::Slug(exam.slug.as_str()));
    map.insert("subjects", Snapshot::Subjects(tree.subjects.as_slice()));
    if !tree.incomplete.is_empty() {
        map.insert("incomplete", Snapshot::Incomplete(&tree.incomplete));
    }

    let content = serde_yaml_ng::to_string(&map).context("failed to serialize hierarchy")?;
    write!(file, "{}", content).context("failed to write hierarchy")?;

    Ok(content)
}

fn create_output_dir(output_dir: &str) -> anyhow::Result<()> {
    if fs::metadata(output_dir).is_ok() {
        fs::remove_dir_all(output_dir)?;
    }

    fs::create_dir(output_dir)?;
    Ok(())
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Snapshot<'a> {
    Name(&'a str),
    Slug(&'a str),
    Subjects(&'a [SubjectNode]),
    Incomplete(&'a [BranchFailure]),
}
