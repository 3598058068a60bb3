//! rigging - run CI/CD tools inside containers
//!
//! ## Quick Start
//!
//! ```bash
//! # Lint with biome
//! rigging biome lint --dir web
//!
//! # Deploy a static site to Cloudflare Pages
//! CLOUDFLARE_API_TOKEN=... CLOUDFLARE_ACCOUNT_ID=... \
//!     rigging cloudflare upload --project docs --dir dist --branch main
//!
//! # Build and push an image for two platforms
//! DOCKER_PASSWORD=... rigging docker publish --username bot \
//!     --repository ghcr.io/acme/app --tag 1.4.0 --tag latest --variant linux/arm64
//!
//! # Generate shell completions
//! rigging completions bash > /etc/bash_completion.d/rigging
//! ```
//!
//! Credentials missing from the environment are fetched from Infisical
//! when `INFISICAL_TOKEN` and `INFISICAL_WORKSPACE_ID` are set.

use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if std::env::var("RIGGING_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
