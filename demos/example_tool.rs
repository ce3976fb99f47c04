//! A script that frobs or displays bazzes.
//!
//! ```text
//! cargo run --example example_tool -- -v display qux --csv
//! cargo run --example example_tool -- remember --db /tmp/bazzes.db
//! ```

use termkit::prelude::*;

#[derive(Debug, Default)]
struct Example {
    frobbed: Vec<String>,
}

fn loglevel(_: &mut Example, _: &Invocation) -> anyhow::Result<()> {
    observability::critical("critical");
    observability::error("error");
    observability::warning("warning");
    observability::info("info");
    observability::debug("debug");
    Ok(())
}

fn frob(tool: &mut Example, inv: &Invocation) -> anyhow::Result<()> {
    let baz = inv.require_str("baz")?;
    let times = inv.int("times").unwrap_or(1).max(0) as u64;
    for round in progress(0..times, times) {
        observability::debug(&format!("frob round {} of {}", round + 1, times));
        tool.frobbed.push(baz.to_string());
    }
    observability::info(&format!("frobbed {} {} times", baz, times));
    Ok(())
}

fn display(_: &mut Example, inv: &Invocation) -> anyhow::Result<()> {
    let baz = inv.require_str("baz")?;
    if baz.is_empty() {
        return Err(ToolError::new("cannot display an empty baz").into());
    }
    let db = inv
        .path("db")
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());

    if inv.flag("csv") {
        println!("baz,length,db");
        println!("{},{},{}", baz, baz.len(), db);
    } else {
        let mut table = Table::new(["baz", "length", "db"]);
        table.add_row([baz.to_string(), baz.len().to_string(), db]);
        println!("{}", table);
    }
    Ok(())
}

fn remember(_: &mut Example, inv: &Invocation) -> anyhow::Result<()> {
    let Some(file) = inv.config_file() else {
        return Err(ToolError::new("persisted arguments are disabled").into());
    };
    let Some(db) = inv.path("db") else {
        return Err(ToolError::new("nothing to remember; pass --db").into());
    };
    file.write(["--db".to_string(), db.display().to_string()])?;
    observability::warning(&format!("saved --db to {}", file.path().display()));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    ToolBuilder::new("example")
        .about("A script that frobs or displays bazzes.")
        .version(env!("CARGO_PKG_VERSION"))
        .global_arg(
            ArgumentSpec::flag(["--db"])
                .value_type(ValueType::Path)
                .metavar("FILE")
                .help("the baz database"),
        )
        .subcommand(Handler::new(loglevel).subcommand(SubcommandMeta::new()))
        .subcommand(
            Handler::new(frob)
                .subcommand(
                    SubcommandMeta::new()
                        .help("frob a baz")
                        .description("Do the work to frob a baz."),
                )
                .arg(ArgumentSpec::positional("baz").help("the baz to frob"))
                .arg(
                    ArgumentSpec::flag(["-n", "--times"])
                        .value_type(ValueType::Integer)
                        .default_value("1")
                        .help("how many times to frob"),
                ),
        )
        .subcommand(
            Handler::new(display)
                .annotate(ArgumentSpec::flag(["--csv"]).store_true().help("sets display mode to CSV"))
                .annotate(ArgumentSpec::positional("baz").help("the baz to display"))
                .annotate(
                    SubcommandMeta::new()
                        .help("display a baz")
                        .description("Display a baz.")
                        .alias("show"),
                ),
        )
        .subcommand(
            Handler::new(remember)
                .subcommand(SubcommandMeta::new().help("save the current --db for later runs")),
        )
        .build()?
        .into_tool(Example::default())
        .run()
}
