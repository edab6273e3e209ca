use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::{info, warn};

use promptkit::{
    Config, ConfigureArgs, Confirm, GroupMultiSelect, KeyedOption, Logging, MultiSelect,
    MultiSelectPath, OptionGroup, PROJECT_NAME, PROJECT_VERSION, Password, PathInput,
    PromptError, Select, SelectKey, SelectOption, SelectPath, Text, Theme, configure,
    show_configuration,
};

#[derive(Parser)]
#[command(version = PROJECT_VERSION, about, long_about = None)]
pub struct UserArgs {
    #[command(subcommand)]
    command: Command,

    /// Verbose (debug logging to stderr)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Ask for a line of text
    Text {
        #[arg(long, default_value = "What is your name?")]
        message: String,
        #[arg(long)]
        placeholder: Option<String>,
        #[arg(long)]
        required: bool,
    },

    /// Ask for a secret
    Password {
        #[arg(long, default_value = "Password?")]
        message: String,
        #[arg(long)]
        mask: Option<char>,
    },

    /// Ask a yes/no question
    Confirm {
        #[arg(long, default_value = "Continue?")]
        message: String,
        /// Start on "Yes"
        #[arg(long)]
        yes: bool,
    },

    /// Pick one of the given options
    Select {
        #[arg(long, default_value = "Pick one")]
        message: String,
        #[arg(required = true)]
        options: Vec<String>,
    },

    /// Pick any of the given options
    #[command(visible_alias = "multi")]
    MultiSelect {
        #[arg(long, default_value = "Pick any")]
        message: String,
        #[arg(long)]
        required: bool,
        #[arg(required = true)]
        options: Vec<String>,
    },

    /// Pick options from groups given as `name=opt1,opt2`
    GroupMultiSelect {
        #[arg(long, default_value = "Pick any")]
        message: String,
        /// Only options can be focused, not group headers
        #[arg(long)]
        disabled_groups: bool,
        #[arg(required = true)]
        groups: Vec<String>,
    },

    /// Pick an option by key, given as `k=label`
    SelectKey {
        #[arg(long, default_value = "Press a key")]
        message: String,
        #[arg(required = true)]
        options: Vec<String>,
    },

    /// Type a path with completion
    Path {
        #[arg(long, default_value = "Where to?")]
        message: String,
        #[arg(long)]
        only_directories: bool,
    },

    /// Pick a path from the directory tree
    SelectPath {
        #[arg(long, default_value = "Pick a path")]
        message: String,
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        only_directories: bool,
        /// Type to filter the current level
        #[arg(long)]
        filter: bool,
    },

    /// Pick any number of paths from the directory tree
    MultiSelectPath {
        #[arg(long, default_value = "Pick paths")]
        message: String,
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        only_directories: bool,
        #[arg(long)]
        filter: bool,
        #[arg(long)]
        required: bool,
    },

    /// Show Config
    #[command(visible_alias = "show-config")]
    ShowConfiguration,

    /// Update Config
    Configure(ConfigureArgs),
}

fn init_logging(verbose: bool, config: &Config) -> Result<()> {
    if verbose {
        Logging::new().with_debug_mode(true).start()
    } else {
        let file_name = format!("{PROJECT_NAME}.log");
        Logging::new()
            .with_file(file_name)
            .with_level(config.level_filter())
            .start()
    }
}

fn labelled(values: Vec<String>) -> Vec<SelectOption<String>> {
    values
        .into_iter()
        .map(|v| SelectOption::new(v.clone(), v))
        .collect()
}

fn parse_group(arg: &str) -> Result<OptionGroup<String>> {
    let (name, options) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Group must look like name=opt1,opt2: {arg}"))?;
    let options = options
        .split(',')
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    Ok(OptionGroup::new(name, labelled(options)))
}

fn parse_keyed(arg: &str) -> Result<KeyedOption<String>> {
    let (key, label) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Option must look like k=label: {arg}"))?;
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(k), None) => Ok(KeyedOption::new(k, label.to_string(), label)),
        _ => Err(anyhow!("Option key must be a single character: {arg}")),
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn run_prompt(command: Command) -> Result<()> {
    let outcome: Result<String, PromptError> = match command {
        Command::Text {
            message,
            placeholder,
            required,
        } => {
            let mut text = Text::new(message).with_required(required);
            if let Some(placeholder) = placeholder {
                text = text.with_placeholder(placeholder);
            }
            text.run()
        }
        Command::Password { message, mask } => {
            let mut password = Password::new(message).with_required(true);
            if let Some(mask) = mask {
                password = password.with_mask(mask);
            }
            password.run().map(|secret| format!("({} characters)", secret.chars().count()))
        }
        Command::Confirm { message, yes } => Confirm::new(message)
            .with_initial_value(yes)
            .run()
            .map(|value| value.to_string()),
        Command::Select { message, options } => Select::new(message, labelled(options)).run(),
        Command::MultiSelect {
            message,
            required,
            options,
        } => MultiSelect::new(message, labelled(options))
            .with_required(required)
            .run()
            .map(|values| values.join(", ")),
        Command::GroupMultiSelect {
            message,
            disabled_groups,
            groups,
        } => {
            let groups = groups
                .iter()
                .map(|g| parse_group(g))
                .collect::<Result<Vec<_>>>()?;
            GroupMultiSelect::new(message, groups)
                .with_disabled_groups(disabled_groups)
                .run()
                .map(|values| values.join(", "))
        }
        Command::SelectKey { message, options } => {
            let options = options
                .iter()
                .map(|o| parse_keyed(o))
                .collect::<Result<Vec<_>>>()?;
            SelectKey::new(message, options).run()
        }
        Command::Path {
            message,
            only_directories,
        } => PathInput::new(message)
            .with_only_directories(only_directories)
            .run(),
        Command::SelectPath {
            message,
            root,
            only_directories,
            filter,
        } => {
            let mut select = SelectPath::new(message)
                .with_only_directories(only_directories)
                .with_filter(filter);
            if let Some(root) = root {
                select = select.with_root(root);
            }
            select.run().map(|path| display_path(&path))
        }
        Command::MultiSelectPath {
            message,
            root,
            only_directories,
            filter,
            required,
        } => {
            let mut select = MultiSelectPath::new(message)
                .with_only_directories(only_directories)
                .with_filter(filter)
                .with_required(required);
            if let Some(root) = root {
                select = select.with_root(root);
            }
            select.run().map(|paths| join_paths(&paths))
        }
        Command::ShowConfiguration | Command::Configure(_) => {
            return Err(anyhow!("not a prompt command"));
        }
    };

    match outcome {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            info!("prompt cancelled by user");
            println!("Operation cancelled.");
            Ok(())
        }
        Err(e) => Err(e).context("Prompt failed"),
    }
}

fn main() -> Result<()> {
    let args = UserArgs::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(args.verbose, &config)?;

    if let Some(e) = config_error {
        warn!("unable to load configuration, using defaults: {e:#}");
    }

    Theme::from_config(&config).install();

    match args.command {
        Command::ShowConfiguration => show_configuration(),
        Command::Configure(configure_args) => configure(&configure_args),
        command => run_prompt(command),
    }
}
