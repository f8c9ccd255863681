//! Evaluation settings.

use jet_value::Value;

/// Settings fixed when an [`Interpreter`](crate::Interpreter) is created.
///
/// ```text
/// let config = EvalConfig::new()
///     .expose_env(false)
///     .var("limit", Value::from(10));
/// ```
#[derive(Clone, Debug)]
pub struct EvalConfig {
    expose_env: bool,
    vars: Vec<(String, Value)>,
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `$ENV` and `env` see the process environment. When off they
    /// are `{}`.
    #[must_use]
    pub fn expose_env(mut self, expose: bool) -> Self {
        self.expose_env = expose;
        self
    }

    /// Bind a global `$name` visible to every program. Later bindings of
    /// the same name shadow earlier ones.
    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: Value) -> Self {
        self.vars.push((name.into(), value));
        self
    }

    pub fn exposes_env(&self) -> bool {
        self.expose_env
    }

    pub fn vars(&self) -> &[(String, Value)] {
        &self.vars
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            expose_env: true,
            vars: Vec::new(),
        }
    }
}
