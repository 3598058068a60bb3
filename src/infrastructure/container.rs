//! Pipeline client backed by the Docker or Podman CLI
//!
//! Every [`Container`] description is lowered to one or more runtime
//! invocations. Secret plaintexts stay in memory and reach the child
//! process through its environment; logged arguments are masked.

use crate::engine::{BaseImage, BuildSpec, Container, DirectoryRef, ExecOutput, PipelineClient, Secret};
use crate::plugins::PluginError;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

/// Container runtime type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    /// Docker runtime
    #[default]
    Docker,
    /// Podman runtime
    Podman,
}

impl ContainerRuntime {
    /// Runtime executable name
    #[must_use]
    pub fn command(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }
}

impl std::fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

impl std::str::FromStr for ContainerRuntime {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            other => Err(PluginError::Config(format!(
                "unknown container runtime '{other}'"
            ))),
        }
    }
}

/// One call of the runtime executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Invocation {
    args: Vec<String>,
    /// Extra variables for the child process, typically secret plaintexts
    env: Vec<(String, String)>,
    stdin: Option<String>,
}

impl Invocation {
    fn new(args: Vec<String>) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }
}

/// [`PipelineClient`] that shells out to `docker` or `podman`
pub struct ContainerCliClient {
    runtime: ContainerRuntime,
    executable: String,
    /// Plaintexts keyed by secret id
    secrets: RwLock<HashMap<String, String>>,
}

impl std::fmt::Debug for ContainerCliClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerCliClient")
            .field("runtime", &self.runtime)
            .field("secrets", &self.secrets.read().len())
            .finish()
    }
}

impl Default for ContainerCliClient {
    fn default() -> Self {
        Self::new(ContainerRuntime::default())
    }
}

impl ContainerCliClient {
    /// Creates a client for the given runtime
    #[must_use]
    pub fn new(runtime: ContainerRuntime) -> Self {
        Self {
            runtime,
            executable: runtime.command().to_string(),
            secrets: RwLock::new(HashMap::new()),
        }
    }

    /// Runs `executable` in place of the runtime binary
    #[cfg(test)]
    fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    fn secret_env(&self, container: &Container) -> Result<Vec<(String, String)>, PluginError> {
        let secrets = self.secrets.read();
        container
            .secret_env()
            .iter()
            .map(|(name, secret)| {
                secrets
                    .get(secret.id())
                    .map(|plaintext| (name.clone(), plaintext.clone()))
                    .ok_or_else(|| PluginError::UnknownSecret(secret.name().to_string()))
            })
            .collect()
    }

    /// Arguments with every registered plaintext masked
    fn redacted(&self, args: &[String]) -> Vec<String> {
        let secrets = self.secrets.read();
        args.iter()
            .map(|arg| {
                secrets
                    .values()
                    .filter(|plaintext| !plaintext.is_empty())
                    .fold(arg.clone(), |arg, plaintext| arg.replace(plaintext.as_str(), "***"))
            })
            .collect()
    }

    async fn execute(&self, operation: &str, invocation: Invocation) -> Result<ExecOutput, PluginError> {
        tracing::debug!(
            runtime = %self.runtime,
            operation = %operation,
            args = ?self.redacted(&invocation.args),
            "Running container command"
        );

        let mut cmd = Command::new(&self.executable);
        cmd.args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = cmd
            .spawn()
            .map_err(|e| PluginError::Io(format!("{operation}: {e}")))?;

        let written = match (invocation.stdin.as_deref(), child.stdin.take()) {
            (Some(input), Some(mut stdin)) => stdin.write_all(input.as_bytes()).await,
            _ => Ok(()),
        };

        // The child is always reaped, even when feeding stdin failed.
        let output = child.wait_with_output().await?;
        written?;
        let result = ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        if !result.is_success() {
            tracing::error!(operation = %operation, code = result.exit_code, "Container command failed");
            return Err(PluginError::CommandFailed {
                operation: operation.to_string(),
                code: result.exit_code,
                stderr: result.stderr,
            });
        }

        Ok(result)
    }

    /// Produces a local image for `container` tagged `tag`
    async fn materialize(&self, container: &Container, tag: &str) -> Result<(), PluginError> {
        container.ensure_runnable()?;
        let image = match container.base() {
            Some(BaseImage::Build(spec)) => {
                self.execute("build", Invocation::new(build_args(spec, container, Some(tag))))
                    .await?;
                tag.to_string()
            }
            Some(BaseImage::Image(image)) => {
                self.execute("pull", Invocation::new(pull_args(image, container)))
                    .await?;
                image.clone()
            }
            None => return Err(crate::plugins::ValidationError::MissingImage.into()),
        };

        if container.execs().is_empty() {
            if image != tag {
                self.execute("tag", Invocation::new(vec!["tag".into(), image, tag.into()]))
                    .await?;
            }
            return Ok(());
        }

        let name = format!("rigging-{}", Uuid::new_v4());
        let run = Invocation {
            args: run_args(container, &image, Some(&name)),
            env: self.secret_env(container)?,
            stdin: None,
        };
        let ran = self.execute("run", run).await;
        let committed = match ran {
            Ok(_) => self
                .execute("commit", Invocation::new(vec!["commit".into(), name.clone(), tag.into()]))
                .await
                .map(|_| ()),
            Err(err) => Err(err),
        };
        self.cleanup(vec!["rm".into(), "-f".into(), name]).await;
        committed
    }

    /// Runs a cleanup command, logging instead of failing
    async fn cleanup(&self, args: Vec<String>) {
        if let Err(err) = self.execute("cleanup", Invocation::new(args)).await {
            tracing::warn!(error = %err, "Container cleanup failed");
        }
    }
}

#[async_trait]
impl PipelineClient for ContainerCliClient {
    fn host_directory(&self, path: &Path) -> DirectoryRef {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        DirectoryRef::new(absolute.to_string_lossy())
    }

    async fn set_secret(&self, name: &str, plaintext: &str) -> Result<Secret, PluginError> {
        let id = Uuid::new_v4().to_string();
        self.secrets.write().insert(id.clone(), plaintext.to_string());
        tracing::debug!(name = %name, "Registered secret");
        Ok(Secret::new(id, name))
    }

    async fn secret_plaintext(&self, secret: &Secret) -> Result<String, PluginError> {
        self.secrets
            .read()
            .get(secret.id())
            .cloned()
            .ok_or_else(|| PluginError::UnknownSecret(secret.name().to_string()))
    }

    async fn sync(&self, container: &Container) -> Result<ExecOutput, PluginError> {
        container.ensure_runnable()?;
        let pipeline = container.pipeline_name().unwrap_or("sync");
        tracing::info!(runtime = %self.runtime, pipeline = %pipeline, "Syncing container");

        let (image, built) = match container.base() {
            Some(BaseImage::Build(spec)) if container.execs().is_empty() => {
                return self
                    .execute("build", Invocation::new(build_args(spec, container, None)))
                    .await;
            }
            Some(BaseImage::Build(spec)) => {
                let tag = format!("rigging-build:{}", Uuid::new_v4());
                self.execute("build", Invocation::new(build_args(spec, container, Some(&tag))))
                    .await?;
                (tag, true)
            }
            Some(BaseImage::Image(image)) if container.execs().is_empty() => {
                return self
                    .execute("pull", Invocation::new(pull_args(image, container)))
                    .await;
            }
            Some(BaseImage::Image(image)) => (image.clone(), false),
            None => return Err(crate::plugins::ValidationError::MissingImage.into()),
        };

        let run = match self.secret_env(container) {
            Ok(env) => Invocation {
                args: run_args(container, &image, None),
                env,
                stdin: None,
            },
            Err(err) => {
                if built {
                    self.cleanup(vec!["rmi".into(), image]).await;
                }
                return Err(err);
            }
        };
        let output = self.execute(pipeline, run).await;
        if built {
            self.cleanup(vec!["rmi".into(), image]).await;
        }
        tracing::info!(pipeline = %pipeline, success = output.is_ok(), "Container finished");
        output
    }

    async fn publish(
        &self,
        container: &Container,
        address: &str,
        platform_variants: &[Container],
    ) -> Result<String, PluginError> {
        if let Some(auth) = container.registry_auth() {
            let password = self.secret_plaintext(&auth.secret).await?;
            let login = Invocation {
                args: login_args(&auth.address, &auth.username),
                env: Vec::new(),
                stdin: Some(password),
            };
            self.execute("login", login).await?;
        }

        if platform_variants.is_empty() {
            self.materialize(container, address).await?;
            self.execute("push", Invocation::new(vec!["push".into(), address.into()]))
                .await?;
            tracing::info!(address = %address, "Published image");
            return Ok(address.to_string());
        }

        let mut references = Vec::with_capacity(platform_variants.len() + 1);
        for (index, variant) in std::iter::once(container).chain(platform_variants).enumerate() {
            let reference = variant_reference(address, variant, index);
            self.materialize(variant, &reference).await?;
            self.execute("push", Invocation::new(vec!["push".into(), reference.clone()]))
                .await?;
            references.push(reference);
        }

        self.execute("manifest create", Invocation::new(manifest_create_args(address, &references)))
            .await?;
        self.execute(
            "manifest push",
            Invocation::new(vec!["manifest".into(), "push".into(), address.into()]),
        )
        .await?;
        tracing::info!(address = %address, variants = references.len(), "Published manifest list");
        Ok(address.to_string())
    }
}

fn build_args(spec: &BuildSpec, container: &Container, tag: Option<&str>) -> Vec<String> {
    let mut args = vec!["build".to_string()];
    if let Some(platform) = container.platform() {
        args.push("--platform".into());
        args.push(platform.to_string());
    }
    args.push("-f".into());
    args.push(
        Path::new(spec.context.id())
            .join(&spec.dockerfile)
            .to_string_lossy()
            .into_owned(),
    );
    if let Some(tag) = tag {
        args.push("-t".into());
        args.push(tag.to_string());
    }
    args.push(spec.context.id().to_string());
    args
}

fn pull_args(image: &str, container: &Container) -> Vec<String> {
    let mut args = vec!["pull".to_string()];
    if let Some(platform) = container.platform() {
        args.push("--platform".into());
        args.push(platform.to_string());
    }
    args.push(image.to_string());
    args
}

/// Arguments for running `container` on `image`
///
/// A `name` keeps the stopped container around for a later commit;
/// otherwise it is removed on exit.
fn run_args(container: &Container, image: &str, name: Option<&str>) -> Vec<String> {
    let mut args = vec!["run".to_string()];
    match name {
        Some(name) => {
            args.push("--name".into());
            args.push(name.to_string());
        }
        None => args.push("--rm".into()),
    }
    if let Some(platform) = container.platform() {
        args.push("--platform".into());
        args.push(platform.to_string());
    }
    for (path, dir) in container.mounts() {
        args.push("-v".into());
        args.push(format!("{}:{path}", dir.id()));
    }
    if let Some(workdir) = container.workdir() {
        args.push("-w".into());
        args.push(workdir.to_string());
    }
    for (key, value) in container.env() {
        args.push("-e".into());
        args.push(format!("{key}={value}"));
    }
    for (key, _) in container.secret_env() {
        args.push("-e".into());
        args.push(key.clone());
    }

    match container.execs() {
        [] => args.push(image.to_string()),
        [exec] if exec.options.skip_entrypoint && !exec.args.is_empty() => {
            args.push("--entrypoint".into());
            args.push(exec.args[0].clone());
            args.push(image.to_string());
            args.extend(exec.args[1..].iter().cloned());
        }
        [exec] => {
            args.push(image.to_string());
            args.extend(exec.args.iter().cloned());
        }
        execs => {
            let script = execs
                .iter()
                .map(|exec| shell_words::join(&exec.args))
                .collect::<Vec<_>>()
                .join(" && ");
            args.extend(["--entrypoint".into(), "sh".into(), image.to_string()]);
            args.extend(["-c".into(), script]);
        }
    }
    args
}

fn login_args(address: &str, username: &str) -> Vec<String> {
    vec![
        "login".to_string(),
        registry_host(address).to_string(),
        "-u".to_string(),
        username.to_string(),
        "--password-stdin".to_string(),
    ]
}

/// Registry host of a repository reference
///
/// The first path component counts as a host only when it looks like one,
/// following the Docker reference grammar.
fn registry_host(address: &str) -> &str {
    match address.split_once('/') {
        Some((first, _))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            first
        }
        _ if address.contains('.') && !address.contains('/') => address,
        _ => "docker.io",
    }
}

fn variant_reference(address: &str, container: &Container, index: usize) -> String {
    let suffix = container
        .platform()
        .map_or_else(|| format!("variant{index}"), |p| p.to_string().replace('/', "-"));
    format!("{address}-{suffix}")
}

fn manifest_create_args(address: &str, references: &[String]) -> Vec<String> {
    let mut args = vec!["manifest".to_string(), "create".to_string(), address.to_string()];
    args.extend(references.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ExecOptions, Platform};
    use pretty_assertions::assert_eq;

    fn source() -> DirectoryRef {
        DirectoryRef::new("/work/app")
    }

    #[test]
    fn test_container_runtime_display() {
        assert_eq!(ContainerRuntime::Docker.to_string(), "docker");
        assert_eq!(ContainerRuntime::Podman.to_string(), "podman");
    }

    #[test]
    fn test_container_runtime_from_str() {
        assert_eq!("Podman".parse::<ContainerRuntime>(), Ok(ContainerRuntime::Podman));
        assert!("containerd".parse::<ContainerRuntime>().is_err());
    }

    #[test]
    fn test_run_args_skip_entrypoint() {
        let container = Container::new()
            .from("denoland/deno")
            .with_directory("/src", source())
            .with_workdir("/src")
            .with_exec_opts(["deno", "lint"], ExecOptions::skip_entrypoint());

        assert_eq!(
            run_args(&container, "denoland/deno", None),
            vec![
                "run",
                "--rm",
                "-v",
                "/work/app:/src",
                "-w",
                "/src",
                "--entrypoint",
                "deno",
                "denoland/deno",
                "lint"
            ]
        );
    }

    #[test]
    fn test_run_args_keep_image_entrypoint() {
        let container = Container::new()
            .from("wrangler")
            .with_exec(["wrangler", "whoami"]);

        assert_eq!(
            run_args(&container, "wrangler", None),
            vec!["run", "--rm", "wrangler", "wrangler", "whoami"]
        );
    }

    #[test]
    fn test_run_args_secrets_are_referenced_by_name() {
        let container = Container::new()
            .from("node")
            .with_env_variable("NETLIFY_SITE_ID", "site")
            .with_secret_variable("NETLIFY_AUTH_TOKEN", Secret::new("id-1", "token"))
            .with_exec(["true"]);

        let args = run_args(&container, "node", None);

        assert!(args.contains(&"NETLIFY_SITE_ID=site".to_string()));
        assert!(args.contains(&"NETLIFY_AUTH_TOKEN".to_string()));
        assert!(!args.iter().any(|arg| arg.contains("id-1")));
    }

    #[test]
    fn test_run_args_chain_execs_in_shell() {
        let container = Container::new()
            .from("node:20-slim")
            .with_exec_opts(["npm", "install", "-g", "netlify-cli"], ExecOptions::skip_entrypoint())
            .with_exec_opts(["echo", "two words"], ExecOptions::skip_entrypoint());

        let args = run_args(&container, "node:20-slim", Some("job"));

        assert_eq!(
            args,
            vec![
                "run",
                "--name",
                "job",
                "--entrypoint",
                "sh",
                "node:20-slim",
                "-c",
                "npm install -g netlify-cli && echo 'two words'"
            ]
        );
    }

    #[test]
    fn test_build_args_with_platform_and_tag() {
        let spec = BuildSpec {
            context: source(),
            dockerfile: "docker/Dockerfile".to_string(),
        };
        let container = Container::new().with_platform(Platform::LinuxArm64);

        assert_eq!(
            build_args(&spec, &container, Some("app:1")),
            vec![
                "build",
                "--platform",
                "linux/arm64",
                "-f",
                "/work/app/docker/Dockerfile",
                "-t",
                "app:1",
                "/work/app"
            ]
        );
    }

    #[test]
    fn test_registry_host() {
        assert_eq!(registry_host("ghcr.io/acme/app"), "ghcr.io");
        assert_eq!(registry_host("localhost:5000/app"), "localhost:5000");
        assert_eq!(registry_host("acme/app"), "docker.io");
        assert_eq!(registry_host("docker.io"), "docker.io");
        assert_eq!(login_args("quay.io/x", "bot")[1], "quay.io");
    }

    #[test]
    fn test_variant_reference_uses_platform() {
        let arm = Container::new().from("a").with_platform(Platform::LinuxArmV7);

        assert_eq!(variant_reference("app:1", &arm, 1), "app:1-linux-arm-v7");
        assert_eq!(variant_reference("app:1", &Container::new(), 0), "app:1-variant0");
        assert_eq!(
            manifest_create_args("app:1", &["app:1-a".to_string()]),
            vec!["manifest", "create", "app:1", "app:1-a"]
        );
    }

    #[tokio::test]
    async fn test_secrets_stay_in_memory() {
        let client = ContainerCliClient::new(ContainerRuntime::Podman);

        let secret = client.set_secret("TOKEN", "s3cr3t").await.unwrap();

        assert_eq!(client.secret_plaintext(&secret).await.unwrap(), "s3cr3t");
        assert!(!format!("{secret:?}").contains("s3cr3t"));
        let foreign = Secret::new("other", "OTHER");
        assert_eq!(
            client.secret_plaintext(&foreign).await,
            Err(PluginError::UnknownSecret("OTHER".to_string()))
        );
    }

    #[tokio::test]
    async fn test_logged_args_mask_secrets() {
        let client = ContainerCliClient::default();
        client.set_secret("JSR_TOKEN", "tok-1").await.unwrap();

        let shown = client.redacted(&["publish".to_string(), "--token=tok-1".to_string()]);

        assert_eq!(shown, vec!["publish", "--token=***"]);
    }

    #[test]
    fn test_host_directory_is_absolute() {
        let client = ContainerCliClient::default();

        let dir = client.host_directory(Path::new("src"));

        assert!(Path::new(dir.id()).is_absolute());
        assert!(dir.id().ends_with("src"));
    }

    #[tokio::test]
    async fn test_sync_without_image_fails_before_spawning() {
        let client = ContainerCliClient::default();

        let err = client.sync(&Container::new().with_exec(["ls"])).await.unwrap_err();

        assert_eq!(
            err,
            PluginError::Validation(crate::plugins::ValidationError::MissingImage)
        );
    }

    /// Writes a stand-in runtime that logs its arguments and fails on `failing`
    #[cfg(unix)]
    fn fake_runtime(dir: &Path, failing: &[&str]) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("runtime");
        let fail = if failing.is_empty() {
            String::new()
        } else {
            format!(
                "case \"$1\" in {}) echo \"$1 broke\" >&2; exit 3;; esac\n",
                failing.join("|")
            )
        };
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$*\" >> '{}'\n{fail}",
                dir.join("calls.log").display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    fn logged_calls(dir: &Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sync_build_without_execs_leaves_no_tag() {
        let dir = tempfile::tempdir().unwrap();
        let client = ContainerCliClient::default().with_executable(fake_runtime(dir.path(), &[]));
        let container = Container::new().build(DirectoryRef::new("/ctx"), "Dockerfile");

        client.sync(&container).await.unwrap();

        assert_eq!(logged_calls(dir.path()), vec!["build -f /ctx/Dockerfile /ctx"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sync_build_with_execs_removes_temporary_image() {
        let dir = tempfile::tempdir().unwrap();
        let client = ContainerCliClient::default().with_executable(fake_runtime(dir.path(), &[]));
        let container = Container::new()
            .build(DirectoryRef::new("/ctx"), "Dockerfile")
            .with_exec(["make"]);

        client.sync(&container).await.unwrap();

        let calls = logged_calls(dir.path());
        assert_eq!(calls.len(), 3);
        let tag = calls[0].split_whitespace().nth(4).unwrap().to_string();
        assert!(tag.starts_with("rigging-build:"));
        assert_eq!(calls[1], format!("run --rm {tag} make"));
        assert_eq!(calls[2], format!("rmi {tag}"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sync_removes_temporary_image_after_failed_run() {
        let dir = tempfile::tempdir().unwrap();
        let client =
            ContainerCliClient::default().with_executable(fake_runtime(dir.path(), &["run"]));
        let container = Container::new()
            .pipeline("check")
            .build(DirectoryRef::new("/ctx"), "Dockerfile")
            .with_exec(["make"]);

        let err = client.sync(&container).await.unwrap_err();

        assert_eq!(
            err,
            PluginError::CommandFailed {
                operation: "check".to_string(),
                code: 3,
                stderr: "run broke\n".to_string(),
            }
        );
        assert!(logged_calls(dir.path()).last().unwrap().starts_with("rmi rigging-build:"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_cleanup_keeps_run_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = ContainerCliClient::default()
            .with_executable(fake_runtime(dir.path(), &["run", "rm"]));
        let container = Container::new().from("alpine").with_exec(["true"]);

        let err = client.publish(&container, "app:1", &[]).await.unwrap_err();

        assert!(matches!(err, PluginError::CommandFailed { ref operation, .. } if operation == "run"));
        let calls = logged_calls(dir.path());
        assert!(calls.last().unwrap().starts_with("rm -f rigging-"));
        assert!(!calls.iter().any(|call| call.starts_with("push")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unread_stdin_is_reported_after_exit() {
        let dir = tempfile::tempdir().unwrap();
        let client = ContainerCliClient::default().with_executable(fake_runtime(dir.path(), &[]));
        let invocation = Invocation {
            args: vec!["login".into(), "--password-stdin".into()],
            env: Vec::new(),
            stdin: Some("x".repeat(1 << 20)),
        };

        let err = client.execute("login", invocation).await.unwrap_err();

        assert!(matches!(err, PluginError::Io(_)));
        assert_eq!(logged_calls(dir.path()), vec!["login --password-stdin".to_string()]);
    }
}
