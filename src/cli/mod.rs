//! Command line front end for rigging
//!
//! Each subcommand maps onto one adapter operation. Credentials are read
//! from the environment, falling back to Infisical when it is configured.

pub mod completions;
mod credentials;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use credentials::Credentials;
use rigging::engine::{ExecOutput, PipelineClient, Platform};
use rigging::infrastructure::{Config, ContainerCliClient, ContainerRuntime, EnvContext, init_logging};
use rigging::plugins::{self, SourceOptions};
use std::path::PathBuf;

/// CLI arguments for rigging
#[derive(Parser, Debug)]
#[command(name = "rigging")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Container runtime
    #[arg(long, global = true)]
    runtime: Option<ContainerRuntime>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lint and format with biome
    #[command(subcommand)]
    Biome(BiomeCommand),

    /// Deno tooling, JSR publishing and Deno Deploy
    #[command(subcommand)]
    Deno(DenoCommand),

    /// Cloudflare Pages
    #[command(subcommand)]
    Cloudflare(CloudflareCommand),

    /// Build and publish images
    #[command(subcommand)]
    Docker(DockerCommand),

    /// Helm releases
    #[command(subcommand)]
    Helm(HelmCommand),

    /// Netlify sites
    #[command(subcommand)]
    Netlify(NetlifyCommand),

    /// S3 buckets
    #[command(subcommand)]
    S3(S3Command),

    /// Pulumi stacks
    #[command(subcommand)]
    Pulumi(PulumiCommand),

    /// Read secrets from Infisical
    #[command(subcommand)]
    Secrets(SecretsCommand),

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct DirArg {
    /// Source directory
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

impl DirArg {
    fn source(&self) -> SourceOptions {
        SourceOptions::new(self.dir.clone())
    }
}

#[derive(Subcommand, Debug)]
enum BiomeCommand {
    /// `biome lint`
    Lint(DirArg),
    /// `biome format`
    Fmt(DirArg),
    /// `biome check`
    Check(DirArg),
}

#[derive(Subcommand, Debug)]
enum DenoCommand {
    /// `deno lint`
    Lint(DirArg),
    /// `deno fmt --check`
    Fmt(DirArg),
    /// `deno check`
    Check {
        #[command(flatten)]
        dir: DirArg,
        /// Entrypoints to type-check
        #[arg(default_value = "src/mod.ts")]
        entrypoints: Vec<String>,
    },
    /// `deno publish`, with DENO_PUBLISH_TOKEN or the CI identity
    Publish(DirArg),
    /// `deployctl deploy`, with DENO_DEPLOY_TOKEN
    Deploy {
        #[command(flatten)]
        dir: DirArg,
        /// Deno Deploy project
        #[arg(long)]
        project: String,
        /// Deploy a preview instead of production
        #[arg(long)]
        preview: bool,
        /// Entrypoint module
        #[arg(long, default_value = "main.ts")]
        entrypoint: String,
    },
}

#[derive(Subcommand, Debug)]
enum CloudflareCommand {
    /// `wrangler pages deploy`
    Upload {
        #[command(flatten)]
        dir: DirArg,
        /// Pages project name
        #[arg(long)]
        project: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        commit_hash: Option<String>,
        #[arg(long)]
        commit_message: Option<String>,
        #[arg(long)]
        commit_dirty: bool,
    },
    /// `wrangler whoami`
    Whoami,
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    dir: DirArg,
    /// Dockerfile relative to the context
    #[arg(long, default_value = "Dockerfile")]
    dockerfile: String,
    /// Target platform
    #[arg(long, default_value = "linux/amd64")]
    platform: Platform,
}

impl BuildArgs {
    fn options(&self, platform: Platform) -> plugins::docker::BuildOptions {
        plugins::docker::BuildOptions::default()
            .with_dir(self.dir.dir.clone())
            .with_dockerfile(self.dockerfile.as_str())
            .with_platform(platform)
    }
}

#[derive(Subcommand, Debug)]
enum DockerCommand {
    /// Build an image
    Build(BuildArgs),
    /// Build and push an image, with DOCKER_PASSWORD
    Publish {
        #[command(flatten)]
        build: BuildArgs,
        /// Target repository
        #[arg(long, default_value = "docker.io")]
        repository: String,
        /// Registry user
        #[arg(long)]
        username: String,
        /// Tags to push
        #[arg(long = "tag", default_value = "latest")]
        tags: Vec<String>,
        /// Extra platforms published under one manifest list
        #[arg(long = "variant")]
        variants: Vec<Platform>,
    },
}

#[derive(Subcommand, Debug)]
enum HelmCommand {
    /// `helm upgrade --install`
    Install {
        #[command(flatten)]
        dir: DirArg,
        /// Release name
        release: String,
        #[arg(long, default_value = "default")]
        namespace: String,
        #[arg(long, default_value = "./values.yaml")]
        values: String,
    },
}

#[derive(Subcommand, Debug)]
enum NetlifyCommand {
    /// `netlify deploy --prod`, with NETLIFY_AUTH_TOKEN
    Deploy {
        #[command(flatten)]
        dir: DirArg,
        /// Site id
        #[arg(long)]
        site: String,
    },
}

#[derive(Subcommand, Debug)]
enum S3Command {
    /// `aws s3 sync`, with AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY
    Upload {
        #[command(flatten)]
        dir: DirArg,
        /// Bucket name
        #[arg(long)]
        bucket: String,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "us-east-1")]
        region: String,
        /// CloudFront distribution to invalidate
        #[arg(long)]
        cloudfront_distribution: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PulumiCommand {
    /// `pulumi up`, with PULUMI_ACCESS_TOKEN when set
    Up {
        #[command(flatten)]
        dir: DirArg,
        #[arg(long)]
        stack: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SecretsCommand {
    /// Print one secret
    Get {
        name: String,
        #[arg(long)]
        path: Option<String>,
    },
    /// Print the secret names under a path
    List {
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Build the CLI command for completion generation
pub fn build_cli() -> clap::Command {
    Args::command()
}

/// Parse and execute CLI arguments
pub async fn run() -> Result<()> {
    let args = Args::parse();

    if let Command::Completions { shell, output } = &args.command {
        use clap_complete::Shell;

        let shell = match shell {
            ShellArg::Bash => Shell::Bash,
            ShellArg::Zsh => Shell::Zsh,
            ShellArg::Fish => Shell::Fish,
            ShellArg::PowerShell => Shell::PowerShell,
        };
        let completions = completions::generate_completions(shell)?;
        match output {
            Some(path) => completions::save_completions(&completions, path)?,
            None => println!("{completions}"),
        }
        return Ok(());
    }

    let env = EnvContext::from_process();
    let mut config = match &args.config {
        Some(path) => Config::load(path, &env),
        None => Config::from_env(&env),
    }
    .context("Failed to load configuration")?;
    if let Some(runtime) = args.runtime {
        config.runtime = runtime;
    }
    if let Some(level) = &args.log_level {
        config.log_level.clone_from(level);
    }

    init_logging(&config.log_level);
    tracing::debug!(?config, "Loaded configuration");

    let client = ContainerCliClient::new(config.runtime);
    let credentials = Credentials::new(&env, &client, &config.infisical)?;

    dispatch(args.command, &client, &credentials, &env).await
}

async fn dispatch(
    command: Command,
    client: &dyn PipelineClient,
    credentials: &Credentials<'_>,
    env: &EnvContext,
) -> Result<()> {
    use plugins::{biome, cloudflare, deno, docker, helm, netlify, pulumi, s3};

    match command {
        Command::Biome(task) => {
            let output = match task {
                BiomeCommand::Lint(dir) => biome::lint(client, &dir.source()).await?,
                BiomeCommand::Fmt(dir) => biome::fmt(client, &dir.source()).await?,
                BiomeCommand::Check(dir) => biome::check(client, &dir.source()).await?,
            };
            print_output(&output);
        }
        Command::Deno(task) => {
            let output = match task {
                DenoCommand::Lint(dir) => deno::lint(client, &dir.source()).await?,
                DenoCommand::Fmt(dir) => deno::fmt(client, &dir.source()).await?,
                DenoCommand::Check { dir, entrypoints } => {
                    let options = deno::CheckOptions::default()
                        .with_dir(dir.dir)
                        .with_entrypoints(entrypoints);
                    deno::check(client, &options).await?
                }
                DenoCommand::Publish(dir) => {
                    let mut options = deno::PublishOptions::new().with_dir(dir.dir);
                    if let Some(token) = credentials.optional("DENO_PUBLISH_TOKEN").await? {
                        options = options.with_token(token);
                    }
                    deno::publish(client, &options, env).await?
                }
                DenoCommand::Deploy {
                    dir,
                    project,
                    preview,
                    entrypoint,
                } => {
                    let token = credentials.require("DENO_DEPLOY_TOKEN").await?;
                    let options = deno::DeployOptions::new(project, token)
                        .with_dir(dir.dir)
                        .with_prod(!preview)
                        .with_entrypoint(entrypoint);
                    deno::deploy(client, &options).await?
                }
            };
            print_output(&output);
        }
        Command::Cloudflare(task) => {
            let auth = cloudflare::CloudflareAuth::new(
                credentials.require("CLOUDFLARE_API_TOKEN").await?,
                credentials.require("CLOUDFLARE_ACCOUNT_ID").await?,
            );
            let output = match task {
                CloudflareCommand::Upload {
                    dir,
                    project,
                    branch,
                    commit_hash,
                    commit_message,
                    commit_dirty,
                } => {
                    let mut options = cloudflare::UploadOptions::new(project, auth)
                        .with_dir(dir.dir)
                        .with_commit_dirty(commit_dirty);
                    options.branch = branch;
                    options.commit_hash = commit_hash;
                    options.commit_message = commit_message;
                    cloudflare::upload(client, &options).await?
                }
                CloudflareCommand::Whoami => cloudflare::whoami(client, &auth).await?,
            };
            print_output(&output);
        }
        Command::Docker(DockerCommand::Build(build)) => {
            docker::build(client, &build.options(build.platform.clone())).await?;
        }
        Command::Docker(DockerCommand::Publish {
            build,
            repository,
            username,
            tags,
            variants,
        }) => {
            let password = credentials.require("DOCKER_PASSWORD").await?;
            let image = docker::build(client, &build.options(build.platform.clone())).await?;
            let mut platform_variants = Vec::with_capacity(variants.len());
            for platform in variants {
                platform_variants.push(docker::build(client, &build.options(platform)).await?);
            }
            let options = docker::PublishOptions::new(image, username, password)
                .with_repository(repository)
                .with_tags(tags)
                .with_platform_variants(platform_variants);
            for reference in docker::publish(client, &options).await? {
                println!("{reference}");
            }
        }
        Command::Helm(HelmCommand::Install {
            dir,
            release,
            namespace,
            values,
        }) => {
            let options = helm::InstallOptions::new(release)
                .with_dir(dir.dir)
                .with_namespace(namespace)
                .with_values(values);
            print_output(&helm::install(client, &options).await?);
        }
        Command::Netlify(NetlifyCommand::Deploy { dir, site }) => {
            let token = credentials.require("NETLIFY_AUTH_TOKEN").await?;
            let options = netlify::DeployOptions::new(site, token).with_dir(dir.dir);
            print_output(&netlify::deploy(client, &options).await?);
        }
        Command::S3(S3Command::Upload {
            dir,
            bucket,
            prefix,
            region,
            cloudfront_distribution,
        }) => {
            let keys = s3::AwsCredentials::new(
                credentials.require("AWS_ACCESS_KEY_ID").await?,
                credentials.require("AWS_SECRET_ACCESS_KEY").await?,
            );
            let mut options = s3::UploadOptions::new(bucket, keys)
                .with_dir(dir.dir)
                .with_prefix(prefix)
                .with_region(region);
            if let Some(distribution) = cloudfront_distribution {
                options = options.with_cloudfront_distribution(distribution);
            }
            print_output(&s3::upload(client, &options).await?);
        }
        Command::Pulumi(PulumiCommand::Up { dir, stack }) => {
            let mut options = pulumi::UpOptions::from(dir.source());
            options.stack = stack;
            options.access_token = credentials.optional("PULUMI_ACCESS_TOKEN").await?;
            print_output(&pulumi::up(client, &options).await?);
        }
        Command::Secrets(task) => {
            let store = credentials.store().context(
                "Infisical is not configured: set INFISICAL_TOKEN and INFISICAL_WORKSPACE_ID",
            )?;
            match task {
                SecretsCommand::Get { name, path } => {
                    println!("{}", store.plaintext(&name, path.as_deref()).await?);
                }
                SecretsCommand::List { path } => {
                    for key in store.list(client, path.as_deref(), "").await?.keys() {
                        println!("{key}");
                    }
                }
            }
        }
        Command::Completions { .. } => {}
    }

    Ok(())
}

fn print_output(output: &ExecOutput) {
    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "rigging",
            "helm",
            "install",
            "api",
            "--runtime",
            "podman",
            "--namespace",
            "staging",
        ])
        .unwrap();

        assert_eq!(args.runtime, Some(ContainerRuntime::Podman));
        match args.command {
            Command::Helm(HelmCommand::Install {
                release, namespace, ..
            }) => {
                assert_eq!(release, "api");
                assert_eq!(namespace, "staging");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_docker_publish_defaults() {
        let args = Args::try_parse_from(["rigging", "docker", "publish", "--username", "bot"])
            .unwrap();

        match args.command {
            Command::Docker(DockerCommand::Publish {
                build,
                repository,
                tags,
                variants,
                ..
            }) => {
                assert_eq!(repository, "docker.io");
                assert_eq!(tags, vec!["latest"]);
                assert!(variants.is_empty());
                assert_eq!(build.platform, Platform::LinuxAmd64);
                assert_eq!(build.dockerfile, "Dockerfile");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_platform_is_rejected() {
        let result = Args::try_parse_from(["rigging", "docker", "build", "--platform", "linux"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_deno_check_default_entrypoint() {
        let args = Args::try_parse_from(["rigging", "deno", "check"]).unwrap();

        match args.command {
            Command::Deno(DenoCommand::Check { entrypoints, .. }) => {
                assert_eq!(entrypoints, vec!["src/mod.ts"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
