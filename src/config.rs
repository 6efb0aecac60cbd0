use serde::{Deserialize, Serialize};

/// Options for the textual key codec and key matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Treat Ctrl+J as Enter, both when parsing/formatting descriptors and
    /// when matching raw key events against an Enter literal.
    pub unify_enter_keys: bool,
}

/// How the `$0` argument of a capture is spliced into its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStyle {
    /// Splice the captured text directly: `goto $1` becomes `goto 25`.
    #[default]
    Inline,
    /// Splice a `$<n>` reference into the action's variable list, leaving it to
    /// the command interpreter to bind the value.
    Reference,
}

/// Matching configuration for a [`Vm`](crate::Vm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub codec: CodecConfig,
    pub capture_style: CaptureStyle,
    /// Upper bound on live parse branches; forks past it are dropped.
    pub max_machines: usize,
    /// Upper bound on nested rule calls per branch.
    pub max_call_depth: usize,
    /// Upper bound on instructions a branch may run between two consumed
    /// events; ends loops that never consume.
    pub max_idle_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            capture_style: CaptureStyle::Inline,
            max_machines: 1024,
            max_call_depth: 256,
            max_idle_steps: 10_000,
        }
    }
}
