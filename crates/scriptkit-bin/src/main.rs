//! scriptkit - command-line front end for the scriptkit helpers.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::{parse_field, parse_header, parse_url, Context};
use scriptkit_config_and_utils::{hash, init_logging};
use scriptkit_http::{DataType, ImageParams, Method};
use scriptkit_ui::{WidgetPosition, WidgetSize};
use std::path::PathBuf;
use tracing::debug;

/// Storage, settings, HTTP, and widget helpers for automation scripts.
#[derive(Parser)]
#[command(name = "scriptkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true, env = "SCRIPTKIT_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the storage key for a string
    Hash {
        value: String,
    },

    /// Durable and temporary key-value storage
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },

    /// Per-script settings document
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Issue an HTTP request, caching the response
    Fetch {
        #[arg(value_parser = parse_url)]
        url: String,
        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: Method,
        /// Request header (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        /// Request body
        #[arg(short, long)]
        body: Option<String>,
        /// Response decoding: json, text, image, data
        #[arg(short, long, default_value = "json")]
        data_type: DataType,
        /// Serve a cached response without touching the network
        #[arg(long)]
        use_cache: bool,
        /// Timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Write the decoded body to a file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Upload a file or image as multipart form data
    Upload {
        #[arg(value_parser = parse_url)]
        url: String,
        /// Form field for the file
        #[arg(short, long, default_value = "file")]
        name: String,
        /// File to upload as is
        #[arg(long, conflicts_with = "image")]
        file: Option<PathBuf>,
        /// Image to decode and upload as PNG
        #[arg(long)]
        image: Option<PathBuf>,
        /// File name sent with the part (default: current timestamp)
        #[arg(long)]
        filename: Option<String>,
        /// Extra form field KEY=VALUE (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Request header (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },

    /// Resolve an image from a path, the cache, or a URL
    Image {
        #[arg(long, value_parser = parse_url)]
        url: Option<String>,
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        use_cache: bool,
        /// Where to write the PNG
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Cut a widget background out of a home-screen screenshot
    Crop {
        #[arg(long)]
        screenshot: PathBuf,
        /// small, medium, or large
        #[arg(long)]
        size: WidgetSize,
        /// e.g. top-left, middle-right, top, bottom
        #[arg(long)]
        position: WidgetPosition,
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Schedule a local notification
    Notify {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        sound: Option<String>,
        #[arg(long)]
        open_url: Option<String>,
        /// Extra payload field KEY=VALUE (repeatable)
        #[arg(long = "extra", value_parser = parse_field)]
        extra: Vec<(String, String)>,
    },

    /// Pick one option from a list
    Choose {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: Option<String>,
        #[arg(required = true)]
        options: Vec<String>,
    },

    /// Ask for one or more text values
    Prompt {
        #[arg(long)]
        title: String,
        /// Field labels
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
enum StorageCommands {
    /// Store a value (JSON or plain string) or a file
    Set {
        key: String,
        #[arg(required_unless_present = "file")]
        value: Option<String>,
        /// Store file contents (image or raw bytes) instead of a value
        #[arg(long)]
        file: Option<PathBuf>,
        /// Use the temporary store
        #[arg(long)]
        temporary: bool,
    },
    /// Print a stored value
    Get {
        key: String,
        /// Write image or binary values to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        temporary: bool,
    },
    /// Remove a stored value
    Remove {
        key: String,
        #[arg(long)]
        temporary: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Read one key
    Get {
        key: String,
        /// Settings document name
        #[arg(long)]
        name: Option<String>,
        /// Script whose settings to use when no name is given
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Write one key (value parsed as JSON, else a string)
    Set {
        key: String,
        value: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

async fn run(cli: Cli, ctx: Context) -> anyhow::Result<()> {
    let format = cli.format;

    match cli.command {
        Commands::Hash { value } => {
            let key = hash(&value);
            output::print(&serde_json::json!({ "input": value, "key": key }), &key, format)
        }
        Commands::Storage { command } => match command {
            StorageCommands::Set {
                key,
                value,
                file,
                temporary,
            } => commands::storage_set(
                &ctx,
                &key,
                value.as_deref(),
                file.as_deref(),
                temporary,
                format,
            ),
            StorageCommands::Get {
                key,
                out,
                temporary,
            } => commands::storage_get(&ctx, &key, out.as_deref(), temporary, format),
            StorageCommands::Remove { key, temporary } => {
                commands::storage_remove(&ctx, &key, temporary, format)
            }
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Get { key, name, script } => {
                commands::settings_get(&ctx, &key, name.as_deref(), script.as_deref(), format)
            }
            SettingsCommands::Set {
                key,
                value,
                name,
                script,
            } => commands::settings_set(
                &ctx,
                &key,
                &value,
                name.as_deref(),
                script.as_deref(),
                format,
            ),
        },
        Commands::Fetch {
            url,
            method,
            headers,
            body,
            data_type,
            use_cache,
            timeout_ms,
            out,
        } => {
            let args = commands::FetchArgs {
                url,
                method,
                headers,
                body,
                data_type,
                use_cache,
                timeout_ms,
                out,
            };
            commands::fetch(&ctx, args, format).await
        }
        Commands::Upload {
            url,
            name,
            file,
            image,
            filename,
            fields,
            headers,
        } => {
            let args = commands::UploadArgs {
                url,
                name,
                file,
                image,
                filename,
                fields,
                headers,
            };
            commands::upload(&ctx, args, format).await
        }
        Commands::Image {
            url,
            path,
            use_cache,
            out,
        } => {
            let params = ImageParams {
                filepath: path,
                url,
                use_cache,
            };
            commands::image(&ctx, params, &out, format).await
        }
        Commands::Crop {
            screenshot,
            size,
            position,
            out,
        } => commands::crop(&screenshot, size, position, &out, format),
        Commands::Notify {
            title,
            body,
            subtitle,
            sound,
            open_url,
            extra,
        } => commands::notify(
            commands::NotifyArgs {
                title,
                body,
                subtitle,
                sound,
                open_url,
                extra,
            },
            format,
        ),
        Commands::Choose {
            title,
            message,
            options,
        } => commands::choose(&title, message.as_deref(), &options, format),
        Commands::Prompt { title, fields } => commands::prompt(&title, &fields, format),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let ctx = match Context::load() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| ctx.config.log_level.clone());
    init_logging(&level, Some(ctx.paths.log_file()));
    debug!(script = ctx.script_name(), "scriptkit starting");

    if let Err(e) = run(cli, ctx).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
