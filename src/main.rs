//! `schema-to-zod`: compile a JSON Schema document into a Zod module.
use clap::Parser;
use miette::{bail, IntoDiagnostic, Result, WrapErr};
use schema_to_zod::{compile_file, GeneratorConfig};
use std::path::PathBuf;

/// Compile a JSON or YAML JSON-Schema document into TypeScript types and Zod validators
#[derive(Parser, Debug)]
#[command(name = "schema-to-zod", version)]
struct CommandLineInterface {
    /// input schema (.json, .yaml or .yml)
    input: PathBuf,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// generator config file (.json, .yaml or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// root name used when the schema has no title
    #[arg(long)]
    fallback_name: Option<String>,

    /// do not treat a definition named like the root as the root itself
    #[arg(long, default_value_t = false)]
    lenient: bool,
}

impl CommandLineInterface {
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(name) = &self.fallback_name {
            config.fallback_name = name.clone();
        }
        if self.lenient {
            config.strict = false;
        }
        Ok(config)
    }

    fn run(self) -> Result<()> {
        if let Some(out) = &self.out {
            if out.extension().and_then(|e| e.to_str()) != Some("ts") {
                bail!("output must be a .ts file, got `{}`", out.display());
            }
        }

        let config = self.generator_config()?;
        // Warnings are already logged as generation finds them.
        let bundle = compile_file(&self.input, &config)?;
        log::debug!(
            "{}: {} warning(s)",
            self.input.display(),
            bundle.warnings.len()
        );

        match &self.out {
            Some(out) => {
                if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .into_diagnostic()
                        .wrap_err_with(|| format!("creating `{}`", parent.display()))?;
                }
                std::fs::write(out, format!("{bundle}\n"))
                    .into_diagnostic()
                    .wrap_err_with(|| format!("writing `{}`", out.display()))?;
                println!("Generated: {}", out.display());
            }
            None => println!("{bundle}"),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    CommandLineInterface::parse().run()
}
