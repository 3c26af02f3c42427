//! Generate command - load certificates, render the template, write the manifest

use std::io::Write;
use std::path::PathBuf;

use console::style;
use deploygen_core::{OutputTarget, RawOptions, RenderContext, RenderedDocument, load_certificates};
use deploygen_engine::{Engine, TemplateSource};

use crate::error::Result;

/// Everything the generate command needs from the command line
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub options: RawOptions,
    pub output_file: Option<String>,
    pub certs_dir: PathBuf,
    pub template: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, stdout: &mut impl Write) -> Result<()> {
    // Option errors are reported before touching the filesystem
    let options = args.options.resolve()?;
    let target = OutputTarget::resolve(args.output_file.as_deref(), &options);

    let certs = load_certificates(&args.certs_dir)?;
    tracing::info!(
        count = certs.len(),
        "loaded certificates from {}",
        args.certs_dir.display()
    );

    let template = TemplateSource::locate(args.template.as_deref())?.load()?;
    let context = RenderContext::new(&options, certs);
    let text = Engine::new().render(&template, &context)?;

    let document = RenderedDocument::new(text, target);
    document.write(stdout)?;

    if let Some(path) = document.target.path() {
        eprintln!("{} {}", style("wrote").green(), path.display());
    }

    Ok(())
}
