//! Argument list assembly
//!
//! Adapters build every command line through [`CommandLine`]: a fixed
//! prefix followed by optional flags in declaration order. Absent or empty
//! values drop the whole flag, so the result never contains empty tokens.

/// Ordered builder for a single CLI invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    /// Starts a command line from its required prefix
    #[must_use]
    pub fn new<I, S>(prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().args(prefix)
    }

    /// Appends a positional argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several positional arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends `flag value` when `value` is present and non-empty
    #[must_use]
    pub fn option<V: AsRef<str>>(mut self, flag: &str, value: Option<V>) -> Self {
        if let Some(value) = value.as_ref().map(|v| v.as_ref()).filter(|v| !v.is_empty()) {
            self.args.push(flag.to_string());
            self.args.push(value.to_string());
        }
        self
    }

    /// Appends `flag=value`
    #[must_use]
    pub fn assign(mut self, flag: &str, value: impl AsRef<str>) -> Self {
        self.args.push(format!("{flag}={}", value.as_ref()));
        self
    }

    /// Appends `flag` when `enabled`
    #[must_use]
    pub fn switch(mut self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.args.push(flag.to_string());
        }
        self
    }

    /// Appends one `flag value` pair per element, in order
    #[must_use]
    pub fn repeated<I, S>(mut self, flag: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self = self.option(flag, Some(value));
        }
        self
    }

    /// Finishes the command line
    #[must_use]
    pub fn build(self) -> Vec<String> {
        self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_option_omitted_when_absent() {
        let args = CommandLine::new(["wrangler", "pages", "deploy"])
            .option("--branch", Some("main"))
            .option::<&str>("--commit-hash", None)
            .build();

        assert_eq!(args, vec!["wrangler", "pages", "deploy", "--branch", "main"]);
    }

    #[test]
    fn test_empty_value_is_treated_as_absent() {
        let args = CommandLine::new(["tool"]).option("--message", Some("")).build();
        assert_eq!(args, vec!["tool"]);
    }

    #[test]
    fn test_switch_and_assign() {
        let args = CommandLine::new(["deployctl", "deploy"])
            .assign("--project", "site")
            .switch("--prod", false)
            .switch("--dry-run", true)
            .build();

        assert_eq!(args, vec!["deployctl", "deploy", "--project=site", "--dry-run"]);
    }

    #[test]
    fn test_repeated_keeps_order() {
        let args = CommandLine::new(["tool"])
            .repeated("--tag", ["v1", "latest", "edge"])
            .build();

        assert_eq!(
            args,
            vec!["tool", "--tag", "v1", "--tag", "latest", "--tag", "edge"]
        );
    }

    proptest! {
        #[test]
        fn prop_never_emits_empty_tokens(
            values in proptest::collection::vec(proptest::option::of(".{0,8}"), 0..8),
            switches in proptest::collection::vec(any::<bool>(), 0..4),
        ) {
            let mut command = CommandLine::new(["tool", "run"]);
            for (index, value) in values.iter().enumerate() {
                command = command.option(&format!("--opt{index}"), value.as_deref());
            }
            for (index, on) in switches.iter().enumerate() {
                command = command.switch(&format!("--flag{index}"), *on);
            }
            let args = command.build();

            prop_assert!(args.iter().all(|arg| !arg.is_empty()));
            let expected = 2
                + 2 * values.iter().filter(|v| v.as_deref().is_some_and(|s| !s.is_empty())).count()
                + switches.iter().filter(|on| **on).count();
            prop_assert_eq!(args.len(), expected);
        }
    }
}
