//! Generate command.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use quire_commit::Info;
use quire_config::Style;
use quire_core::{Forge, ForgeLinkProcessor, Generator, Options};
use quire_git::GitCli;
use quire_template::TemplateRenderer;
use tracing::{info, warn};

use super::Workspace;

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Tag query: empty, `old..new`, `old..`, `..new` or a single tag
    #[arg(default_value = "")]
    pub query: String,

    /// Configuration file (default: nearest quire.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Template file, overriding the configured one
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat unreleased commits as this tag
    #[arg(long)]
    pub next_tag: Option<String>,

    /// Only include commits touching this path (repeatable)
    #[arg(long = "path")]
    pub paths: Vec<String>,

    /// Link issue numbers and mentions to the repository host
    #[arg(long)]
    pub link_references: bool,
}

/// Runs the generate command.
pub fn run(args: GenerateArgs) -> Result<()> {
    let Workspace {
        repository,
        root,
        mut config,
    } = Workspace::load(args.config.as_deref())?;

    if let Some(template) = &args.template {
        config.template = template.to_string_lossy().into_owned();
    }
    if args.next_tag.is_some() {
        config.options.next_tag = args.next_tag;
    }
    if !args.paths.is_empty() {
        config.options.paths = args.paths;
    }
    if config.info.repository_url.is_empty() {
        config.info.repository_url = repository
            .remote_url("origin")
            .context("failed to read origin remote")?
            .unwrap_or_default();
    }

    let options = Options::from_config(&config.options).context("invalid options")?;
    let renderer = TemplateRenderer::from_path(&config.template)
        .with_context(|| format!("failed to load template {}", config.template))?;
    let source = GitCli::new(root).with_bin(&config.bin);

    let mut generator = Generator::new(options, source).with_info(Info {
        title: config.info.title.clone(),
        repository_url: config.info.repository_url.clone(),
    });

    if args.link_references {
        let forge = match config.style {
            Style::Github => Some(Forge::Github),
            Style::Gitlab => Some(Forge::Gitlab),
            Style::Bitbucket | Style::None => None,
        };
        match forge {
            Some(forge) if !config.info.repository_url.is_empty() => {
                let processor = ForgeLinkProcessor::new(forge, &config.info.repository_url)?;
                generator = generator.with_processor(Box::new(processor));
            }
            _ => warn!(
                style = ?config.style,
                "reference links need a github or gitlab style and a repository url"
            ),
        }
    }

    // Render fully before touching the destination
    let mut document = Vec::new();
    generator
        .render(&args.query, &renderer, &mut document)
        .context("failed to generate changelog")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("failed to write changelog to {}", path.display()))?;
            info!(path = %path.display(), "changelog written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&document)
                .and_then(|()| stdout.flush())
                .context("failed to write changelog to stdout")?;
        }
    }

    Ok(())
}
