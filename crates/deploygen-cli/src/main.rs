//! deploygen CLI - Generate deployment YAML for customer or internal environments

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgGroup, Parser};
use deploygen_core::options::{
    DEFAULT_CERTS_DIR, DEFAULT_DOCKERHUB_IMAGE_PATH, DEFAULT_DOCKERHUB_SECRET_NAME,
    DEFAULT_IMAGE_TAG,
};
use deploygen_core::{CloudProvider, RawOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

const LONG_ABOUT: &str = "\
Generate deployment YAML for customer or internal environments.

The customer environment YAML will create a placeholder Kubernetes secret
which will be referenced as the ImagePullSecret for Nuvoloso images
obtained from the Nuvoloso DockerHub repository. The same secret will be
created in the managed cluster deployment YAML that can be obtained from
the management server.

The internal YAML does not use an image pull secret as images are fetched
from an internal repository such as AWS ECR or Google GCR.";

#[derive(Parser, Debug)]
#[command(name = "deploygen")]
#[command(version)]
#[command(about = "Generate deployment YAML for customer or internal environments")]
#[command(long_about = LONG_ABOUT)]
#[command(group(ArgGroup::new("mode").required(true).args(["customer", "internal"])))]
struct Cli {
    /// Generate the customer deployment YAML
    #[arg(short, long)]
    customer: bool,

    /// Generate the internal deployment YAML
    #[arg(short, long)]
    internal: bool,

    /// The type of cloud service provider to which this deployment is targeted
    #[arg(
        short = 'T',
        long = "csp-type",
        default_value = "AWS",
        value_parser = PossibleValuesParser::new(["AWS", "Azure", "GCP"])
            .try_map(|s| s.parse::<CloudProvider>())
    )]
    csp_type: CloudProvider,

    /// Number of replicas for the configuration database (1 or 3).
    /// If unspecified, 1 is used for internal and 3 for customer
    #[arg(short = 'r', long)]
    configdb_replicas: Option<u32>,

    /// The image tag version
    #[arg(short = 't', long, default_value = DEFAULT_IMAGE_TAG)]
    image_tag: String,

    /// Output file name, '-' for stdout.
    /// Defaults to {customer|internal}-<CSP_TYPE>-<IMAGE_TAG>.yaml, printed when used
    #[arg(short = 'o', long)]
    output_file: Option<String>,

    /// The directory containing the generated SSL certificates and keys
    #[arg(long, env = "DEPLOYGEN_CERTS_DIR", default_value = DEFAULT_CERTS_DIR)]
    certs_dir: PathBuf,

    /// The repository path for customer image access
    #[arg(long, default_value = DEFAULT_DOCKERHUB_IMAGE_PATH)]
    dockerhub_image_path: String,

    /// The repository path for internal image access.
    /// If unspecified a CSP-specific value is used
    #[arg(long)]
    internal_image_path: Option<String>,

    /// The name of the Kubernetes secret object with the DockerHub
    /// credentials in a customer deployment
    #[arg(long, default_value = DEFAULT_DOCKERHUB_SECRET_NAME)]
    dockerhub_secret_name: String,

    /// Enable error injection in the centrald service
    #[arg(long)]
    enable_rei: bool,

    /// Template to render instead of the installed deployment.yaml.j2
    #[arg(long, env = "DEPLOYGEN_TEMPLATE")]
    template: Option<PathBuf>,

    /// Enable debug output on stderr
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn into_generate_args(self) -> commands::generate::GenerateArgs {
        commands::generate::GenerateArgs {
            options: RawOptions {
                customer: self.customer,
                internal: self.internal,
                csp: self.csp_type,
                configdb_replicas: self.configdb_replicas,
                image_tag: self.image_tag,
                dockerhub_image_path: self.dockerhub_image_path,
                internal_image_path: self.internal_image_path,
                dockerhub_secret_name: self.dockerhub_secret_name,
                enable_rei: self.enable_rei,
            },
            output_file: self.output_file,
            certs_dir: self.certs_dir,
            template: self.template,
        }
    }
}

/// Log to stderr; stdout carries the manifest or the generated file name
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let stdout = std::io::stdout();
    match commands::generate::run(cli.into_generate_args(), &mut stdout.lock()) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
