/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Serve,
    ListActions,
    RunAction {
        action: String,
        label: Option<String>,
    },
    Help,
    Unknown(String),
}

pub const USAGE: &str = "Usage: jabref-actions <command>

Commands:
  serve                    Start the action server webhook
  actions                  List the registered actions
  run <action> [label]     Run one action and print its reply
  help                     Show this message";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Help,
        2 => match args[1].as_str() {
            "serve" => Command::Serve,
            "actions" => Command::ListActions,
            "help" | "--help" | "-h" => Command::Help,
            "run" => Command::Unknown(
                "Missing action argument. Usage: jabref-actions run <action> [label]".to_string(),
            ),
            cmd => Command::Unknown(cmd.to_string()),
        },
        3 => match args[1].as_str() {
            "run" => Command::RunAction {
                action: args[2].clone(),
                label: None,
            },
            cmd => Command::Unknown(format!("{} {}", cmd, args[2])),
        },
        _ => match args[1].as_str() {
            // multi-word labels arrive unquoted, e.g. `run action_get_issues_by_label good first issue`
            "run" => Command::RunAction {
                action: args[2].clone(),
                label: Some(args[3..].join(" ")),
            },
            cmd => Command::Unknown(format!("{} {}", cmd, args[2])),
        },
    }
}
