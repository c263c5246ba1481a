use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub help: bool,
    pub version: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "-V" | "--version" => options.version = true,
            "-c" | "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path\n\n{}", help_text()))?;
                options.config_path = Some(PathBuf::from(value));
            }
            other => {
                if let Some(value) = other.strip_prefix("--config=") {
                    if value.is_empty() {
                        return Err(format!("--config requires a path\n\n{}", help_text()));
                    }
                    options.config_path = Some(PathBuf::from(value));
                } else {
                    return Err(format!("unknown argument `{other}`\n\n{}", help_text()));
                }
            }
        }
    }
    Ok(options)
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: aws-profile-switcher [--config <path>]".to_string(),
        String::new(),
        "Pick a profile from the AWS config file and copy its keys into [default].".to_string(),
        String::new(),
        "Options:".to_string(),
        "  -c, --config <path>   AWS config file (default: $AWS_CONFIG_FILE or ~/.aws/config)"
            .to_string(),
        "  -h, --help            Show this help".to_string(),
        "  -V, --version         Show version".to_string(),
    ]
}

pub fn help_text() -> String {
    cli_help_lines().join("\n")
}

pub fn version_text() -> String {
    format!("aws-profile-switcher {}", env!("CARGO_PKG_VERSION"))
}
