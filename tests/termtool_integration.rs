//! End-to-end runs of a complete tool through `Termtool::main`

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use termkit::prelude::*;

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
    levels: Vec<LogLevel>,
    configured: usize,
}

fn display(state: &mut Recorder, inv: &Invocation) -> anyhow::Result<()> {
    state.calls.push(format!(
        "display baz={} flag={} global={}",
        inv.require_str("baz")?,
        inv.flag("flag"),
        inv.int("global_opt").map_or("-".to_string(), |n| n.to_string()),
    ));
    state.levels.push(inv.log_level());
    Ok(())
}

fn sub(state: &mut Recorder, inv: &Invocation) -> anyhow::Result<()> {
    state.calls.push(format!(
        "sub flag={:?} global={:?}",
        inv.str("flag"),
        inv.int("global_opt")
    ));
    Ok(())
}

fn save(_: &mut Recorder, inv: &Invocation) -> anyhow::Result<()> {
    let file = inv
        .config_file()
        .ok_or_else(|| ToolError::new("no config file"))?;
    let tokens: Vec<String> = inv.strings("tokens").iter().map(|s| s.to_string()).collect();
    file.write(&tokens)?;
    Ok(())
}

fn refuse(_: &mut Recorder, _: &Invocation) -> anyhow::Result<()> {
    Err(ToolError::new("refusing").with_code(4).into())
}

fn crash(_: &mut Recorder, _: &Invocation) -> anyhow::Result<()> {
    Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into())
}

fn tool_at(config: &Path) -> Termtool<Recorder> {
    ToolBuilder::new("Example")
        .config_path(config)
        .global_arg(
            ArgumentSpec::flag(["--global-opt"]).value_type(ValueType::Integer),
        )
        .on_configure(|state: &mut Recorder, _: &Invocation| {
            state.configured += 1;
            Ok(())
        })
        .subcommand(
            Handler::new(display)
                .subcommand(SubcommandMeta::new().alias("show"))
                .arg(ArgumentSpec::positional("baz"))
                .arg(ArgumentSpec::flag(["--flag"]).store_true()),
        )
        .subcommand(
            Handler::new(sub)
                .subcommand(SubcommandMeta::new())
                .arg(ArgumentSpec::flag(["--flag"])),
        )
        .subcommand(
            Handler::new(save)
                .subcommand(SubcommandMeta::new())
                .arg(ArgumentSpec::positional("tokens").nargs(Arity::ZeroOrMore)),
        )
        .subcommand(Handler::new(refuse).subcommand(SubcommandMeta::new()))
        .subcommand(Handler::new(crash).subcommand(SubcommandMeta::new()))
        .build()
        .unwrap()
        .into_tool(Recorder::default())
}

fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".example");
    (dir, path)
}

#[test]
fn test_config_tokens_precede_argv() {
    let (_dir, path) = setup();
    ConfigFile::at(&path).write(["--global-opt", "1"]).unwrap();

    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["sub", "--flag", "x"]).unwrap(), 0);
    assert_eq!(tool.state().calls, vec!["sub flag=Some(\"x\") global=Some(1)"]);
}

#[test]
fn test_argv_overrides_config() {
    let (_dir, path) = setup();
    ConfigFile::at(&path).write(["--global-opt", "1"]).unwrap();

    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["display", "qux", "--global-opt", "7"]).unwrap(), 0);
    assert_eq!(tool.state().calls, vec!["display baz=qux flag=false global=7"]);
}

#[test]
fn test_missing_config_file_is_empty() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["show", "qux", "--flag"]).unwrap(), 0);
    assert_eq!(tool.state().calls, vec!["display baz=qux flag=true global=-"]);
    assert_eq!(tool.state().configured, 1);
}

#[test]
fn test_unknown_subcommand_never_dispatches() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["frobnicate", "qux"]).unwrap(), 2);
    assert!(tool.state().calls.is_empty());
    assert_eq!(tool.state().configured, 0);
}

#[test]
fn test_bad_value_is_usage_error() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["--global-opt", "many", "sub"]).unwrap(), 2);
    assert!(tool.state().calls.is_empty());
}

#[test]
fn test_verbosity_reaches_handler() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    tool.main(["display", "a"]).unwrap();
    tool.main(["-v", "display", "b"]).unwrap();
    tool.main(["display", "c", "-vvvvv", "-qqqq"]).unwrap();
    tool.main(["-qqqqq", "display", "d"]).unwrap();
    assert_eq!(
        tool.state().levels,
        vec![
            LogLevel::Warning,
            LogLevel::Info,
            LogLevel::Info,
            LogLevel::Critical,
        ]
    );
}

#[test]
fn test_handler_writes_config_for_next_run() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["save", "--", "--global-opt", "5"]).unwrap(), 0);
    assert_eq!(
        ConfigFile::at(&path).read().unwrap(),
        vec!["--global-opt", "5"]
    );

    assert_eq!(tool.main(["display", "qux"]).unwrap(), 0);
    assert_eq!(tool.state().calls, vec!["display baz=qux flag=false global=5"]);
}

#[test]
fn test_tool_error_exit_code() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["refuse"]).unwrap(), 4);
}

#[test]
fn test_unexpected_error_propagates() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    let err = tool.main(["crash"]).unwrap_err();
    assert!(err.downcast_ref::<std::io::Error>().is_some());
    assert!(err.downcast_ref::<ToolError>().is_none());
}

#[test]
fn test_help_exits_zero() {
    let (_dir, path) = setup();
    let mut tool = tool_at(&path);
    assert_eq!(tool.main(["--help"]).unwrap(), 0);
    assert_eq!(tool.main(["display", "--help"]).unwrap(), 0);
    assert!(tool.state().calls.is_empty());
}
