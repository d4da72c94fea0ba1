//! Shell completion generation for the `shortcuts` binary
//!
//! Generates completion scripts for bash, zsh and fish. Key names for the
//! `--key` flag are completed from the configured candidate pool.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "shortcuts";

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
/// * `keys` - Candidate key names offered for `--key`
///
/// # Returns
/// * `Result<String>` - Completion script or error
pub fn generate_completion(shell_name: &str, keys: &[String]) -> Result<String> {
    let shell = parse_shell(shell_name)?;
    let base = base_completion(shell);
    let keys = keys.join(" ");

    let extra = match shell {
        Shell::Bash => format!(
            r#"
# Offer configured key names after --key
_shortcuts_enhanced() {{
    local cur prev words cword
    _init_completion || return

    if [[ "$prev" == "--key" ]]; then
        COMPREPLY=($(compgen -W "{keys}" -- "$cur"))
        return 0
    fi

    _shortcuts "$@"
}}

complete -F _shortcuts_enhanced {BIN_NAME}
"#
        ),
        Shell::Zsh => format!(
            r#"
# Offer configured key names after --key
_shortcuts_enhanced() {{
    if [[ ${{words[CURRENT-1]}} == "--key" ]]; then
        local -a keys
        keys=({keys})
        _describe 'keys' keys
        return 0
    fi

    _shortcuts "$@"
}}

compdef _shortcuts_enhanced {BIN_NAME}
"#
        ),
        _ => format!(
            r#"
# Offer configured key names after --key
complete -c {BIN_NAME} -n "__fish_seen_subcommand_from suggest" -l key -f -a "{keys}" -d "Candidate key"
"#
        ),
    };

    Ok(format!("{base}{extra}"))
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{shell_name} (supported shells: bash, zsh, fish)"),
        }
        .into()),
    }
}

/// Completion script generated by clap_complete
fn base_completion(shell: Shell) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("invalid").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("Zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_generated_script_lists_keys() {
        let keys = vec!["ctrl".to_string(), "alt".to_string()];
        let script = generate_completion("bash", &keys).unwrap();
        assert!(script.contains("compgen -W \"ctrl alt\""));
        assert!(script.contains("complete -F _shortcuts_enhanced shortcuts"));
    }
}
