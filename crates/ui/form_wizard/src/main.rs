mod action;
mod app;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod pages;
mod report;
mod store;
mod tui;

use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use form_engine::{GeneratorOptions, ResponseMap};
use tracing::info;

use crate::{
    app::App,
    cli::{Cli, Cmd},
    config::{Config, FormConfig},
    pages::{BuilderPage, FillPage},
    store::DefinitionFile,
};

/// Command line flags win over the config file.
fn generator_options(
    form: &FormConfig,
    submit_label: Option<String>,
    reset_label: Option<String>,
    hide_submit: bool,
) -> GeneratorOptions {
    GeneratorOptions {
        hide_submit: hide_submit || form.hide_submit,
        submit_btn_label: submit_label.or_else(|| form.submit_label.clone()),
        reset_btn_label: reset_label.or_else(|| form.reset_label.clone()),
        ..Default::default()
    }
}

fn write_responses(responses: &ResponseMap, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(responses)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "responses written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    errors::init()?;
    config::ensure_data_and_config_dirs_exist()?;
    logging::init()?;
    let config = Config::new()?;

    match args.cmd {
        Cmd::Build { file } => {
            let page = BuilderPage::new(DefinitionFile::open(file)?);
            App::new(&config, Box::new(page))?.run().await?;
        }
        Cmd::Fill {
            file,
            output,
            submit_label,
            reset_label,
            hide_submit,
        } => {
            let definition = store::load(&file)?;
            let options = generator_options(&config.form, submit_label, reset_label, hide_submit);
            let mut app = App::new(&config, Box::new(FillPage::new(definition, options)))?;
            app.run().await?;
            match app.take_responses() {
                Some(responses) => write_responses(&responses, output.as_deref())?,
                None => info!("form closed without submitting"),
            }
        }
        Cmd::Check { file } => {
            let definition = store::load(&file)?;
            print!("{}", report::layout_report(&definition));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_config() {
        let form = FormConfig {
            submit_label: Some("Send".into()),
            reset_label: Some("Clear".into()),
            hide_submit: false,
        };
        let options = generator_options(&form, Some("Go".into()), None, true);
        assert_eq!(options.submit_btn_label.as_deref(), Some("Go"));
        assert_eq!(options.reset_btn_label.as_deref(), Some("Clear"));
        assert!(options.hide_submit);
        assert!(options.reset_values.is_empty());
    }
}
