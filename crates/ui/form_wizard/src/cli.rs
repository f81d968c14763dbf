use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "form-wizard", version, about = "Build form definitions and fill them in")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Edit a form definition (created if missing); every change is saved
    Build {
        /// JSON file holding the field definition
        file: PathBuf,
    },
    /// Fill in the form described by a definition file
    Fill {
        file: PathBuf,
        /// Write the submitted responses here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        submit_label: Option<String>,
        #[arg(long)]
        reset_label: Option<String>,
        /// No submit button; submit with Ctrl+S only
        #[arg(long)]
        hide_submit: bool,
    },
    /// Validate a definition file and print its layout rows
    Check { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fill_flags() {
        let cli = Cli::try_parse_from([
            "form-wizard",
            "fill",
            "form.json",
            "-o",
            "out.json",
            "--submit-label",
            "Send",
            "--hide-submit",
        ])
        .unwrap();
        let Cmd::Fill {
            file,
            output,
            submit_label,
            reset_label,
            hide_submit,
        } = cli.cmd
        else {
            panic!("expected fill");
        };
        assert_eq!(file, PathBuf::from("form.json"));
        assert_eq!(output, Some(PathBuf::from("out.json")));
        assert_eq!(submit_label.as_deref(), Some("Send"));
        assert_eq!(reset_label, None);
        assert!(hide_submit);
    }

    #[test]
    fn build_requires_a_file() {
        assert!(Cli::try_parse_from(["form-wizard", "build"]).is_err());
    }
}
