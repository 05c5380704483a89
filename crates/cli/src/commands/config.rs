use crate::CommonArgs;

use super::score::load_config;
use super::CommandResult;

/// Print the effective configuration as TOML, defaults merged with any
/// `--config` overrides. Unlike the other subcommands the output is the
/// document itself, not a JSON outcome.
pub fn run(common: &CommonArgs) -> CommandResult {
    match render(common) {
        Ok(document) => CommandResult { exit_code: 0, output: document },
        Err(error) => CommandResult::failure("config", "config", format!("{error:#}")),
    }
}

fn render(common: &CommonArgs) -> anyhow::Result<String> {
    let config = load_config(common)?;
    Ok(toml::to_string_pretty(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_renders_as_toml() {
        let common = CommonArgs { config: None, as_of: None };
        let result = run(&common);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("[scoring]"));
        assert!(result.output.contains("[alerts]"));
    }

    #[test]
    fn missing_config_file_fails_cleanly() {
        let common =
            CommonArgs { config: Some("/nonexistent/config.toml".into()), as_of: None };
        let result = run(&common);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("\"error_class\":\"config\""));
    }
}
