//! The contract a test definition fulfils so the harness can run its script.
//!
//! The first three methods configure the script's environment; the last two
//! are callbacks invoked by the harness process, not by the script.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::ContractError;
use crate::telemetry::Telemetry;

pub trait OtelTest {
    /// Environment variables for the script's process.
    fn environment_variables(&self) -> HashMap<String, String>;

    /// Install requirements, each formatted as a package specifier.
    fn requirements(&self) -> Vec<String>;

    /// Command to wrap the script with. Empty runs the script directly.
    fn wrapper_command(&self) -> String;

    /// Called right after the script starts. `Some(d)` force-terminates the
    /// script once `d` has elapsed; `None` waits for it to exit on its own.
    fn on_start(&mut self) -> Option<Duration>;

    /// Called after the script ends with everything the sink received and the
    /// script's output.
    fn on_stop(&mut self, telemetry: &Telemetry, stdout: &str, stderr: &str, returncode: i32);
}

type StartFn = Box<dyn FnMut() -> Option<Duration> + Send>;
type StopFn = Box<dyn FnMut(&Telemetry, &str, &str, i32) + Send>;

/// An `OtelTest` assembled at runtime from values and closures.
pub struct ScriptTest {
    environment_variables: HashMap<String, String>,
    requirements: Vec<String>,
    wrapper_command: String,
    on_start: StartFn,
    on_stop: StopFn,
}

impl ScriptTest {
    pub fn builder() -> ScriptTestBuilder {
        ScriptTestBuilder::default()
    }
}

impl fmt::Debug for ScriptTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptTest")
            .field("environment_variables", &self.environment_variables)
            .field("requirements", &self.requirements)
            .field("wrapper_command", &self.wrapper_command)
            .finish_non_exhaustive()
    }
}

impl OtelTest for ScriptTest {
    fn environment_variables(&self) -> HashMap<String, String> {
        self.environment_variables.clone()
    }

    fn requirements(&self) -> Vec<String> {
        self.requirements.clone()
    }

    fn wrapper_command(&self) -> String {
        self.wrapper_command.clone()
    }

    fn on_start(&mut self) -> Option<Duration> {
        (self.on_start)()
    }

    fn on_stop(&mut self, telemetry: &Telemetry, stdout: &str, stderr: &str, returncode: i32) {
        (self.on_stop)(telemetry, stdout, stderr, returncode)
    }
}

/// Every capability must be supplied, even when empty; `build` names the
/// first one that was not.
#[derive(Default)]
pub struct ScriptTestBuilder {
    environment_variables: Option<HashMap<String, String>>,
    requirements: Option<Vec<String>>,
    wrapper_command: Option<String>,
    on_start: Option<StartFn>,
    on_stop: Option<StopFn>,
}

impl ScriptTestBuilder {
    pub fn environment_variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment_variables = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = Some(requirements.into_iter().map(Into::into).collect());
        self
    }

    pub fn wrapper_command(mut self, command: impl Into<String>) -> Self {
        self.wrapper_command = Some(command.into());
        self
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> Option<Duration> + Send + 'static,
    {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Telemetry, &str, &str, i32) + Send + 'static,
    {
        self.on_stop = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<ScriptTest, ContractError> {
        Ok(ScriptTest {
            environment_variables: self
                .environment_variables
                .ok_or(ContractError::Unimplemented("environment_variables"))?,
            requirements: self
                .requirements
                .ok_or(ContractError::Unimplemented("requirements"))?,
            wrapper_command: self
                .wrapper_command
                .ok_or(ContractError::Unimplemented("wrapper_command"))?,
            on_start: self.on_start.ok_or(ContractError::Unimplemented("on_start"))?,
            on_stop: self.on_stop.ok_or(ContractError::Unimplemented("on_stop"))?,
        })
    }
}
