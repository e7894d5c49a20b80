use std::io;
use std::path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::application::repl::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const SPEECH_VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Serve,
    Chat,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| return format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn arg_config(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    let mut help = help.to_string();
    let default = Config::default(key);
    if !default.is_empty() {
        help = format!("{help} [default: {default}]");
    }

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('/') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("parley")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("serve").about("Runs the chat HTTP server. This is the default when no subcommand is given."))
        .subcommand(Command::new("chat").about("Starts a terminal chat session against a running server."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("PARLEY_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_config(ConfigKey::Host, "PARLEY_HOST", "Address the server binds to."))
        .arg(arg_config(ConfigKey::Port, "PARLEY_PORT", "Port the server listens on."))
        .arg(arg_config(ConfigKey::ServerURL, "PARLEY_SERVER_URL", "Chat server URL used by the terminal client."))
        .arg(arg_config(ConfigKey::OpenAiURL, "PARLEY_OPENAI_URL", "OpenAI API URL. Can be swapped to a compatible proxy."))
        .arg(arg_config(ConfigKey::OpenAiToken, "PARLEY_OPENAI_TOKEN", "OpenAI API token."))
        .arg(arg_config(ConfigKey::Model, "PARLEY_MODEL", "Model used for text completions."))
        .arg(arg_config(ConfigKey::ImageModel, "PARLEY_IMAGE_MODEL", "Model used for image generation."))
        .arg(arg_config(ConfigKey::ImageSize, "PARLEY_IMAGE_SIZE", "Size of generated images."))
        .arg(arg_config(ConfigKey::SpeechModel, "PARLEY_SPEECH_MODEL", "Model used for speech synthesis."))
        .arg(
            arg_config(ConfigKey::SpeechVoice, "PARLEY_SPEECH_VOICE", "Voice used for speech synthesis.")
                .value_parser(PossibleValuesParser::new(SPEECH_VOICES)),
        )
        .arg(arg_config(ConfigKey::RequestTimeout, "PARLEY_REQUEST_TIMEOUT", "Time in milliseconds a chat request may take before it fails."))
        .arg(arg_config(ConfigKey::AttachmentMaxBytes, "PARLEY_ATTACHMENT_MAX_BYTES", "Largest attachment, in bytes, the client will send."))
        .arg(arg_config(ConfigKey::InlineUploadMaxBytes, "PARLEY_INLINE_UPLOAD_MAX_BYTES", "Largest inline voice clip, in bytes, the client will send."));
}

/// Parses arguments and loads config. Returns the mode to run, or `None` when
/// the command was fully handled here.
pub async fn parse() -> Result<Option<RunMode>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("serve", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Some(RunMode::Serve));
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Some(RunMode::Chat));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
            return Ok(Some(RunMode::Serve));
        }
    }
}
