//! Scripted command runner for collector tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::ScrapeError;
use crate::runner::{CommandRunner, RunFuture};

type Calls = Arc<Mutex<Vec<Vec<String>>>>;

/// Returns canned output per program and records every invocation.
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: HashMap<String, Option<Vec<u8>>>,
    calls: Calls,
}

impl ScriptedRunner {
    pub fn ok(program: &str, stdout: &str) -> Self {
        Self::default().with_output(program, stdout)
    }

    pub fn failing(program: &str) -> Self {
        Self::default().with_failure(program)
    }

    pub fn with_output(mut self, program: &str, stdout: &str) -> Self {
        self.outputs
            .insert(program.to_string(), Some(stdout.as_bytes().to_vec()));
        self
    }

    pub fn with_failure(mut self, program: &str) -> Self {
        self.outputs.insert(program.to_string(), None);
        self
    }

    /// Shared handle on the recorded `[program, args...]` invocations.
    pub fn calls(&self) -> Calls {
        self.calls.clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run<'a>(&'a self, program: &'a str, args: &'a [String]) -> RunFuture<'a> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(call);

        let result = match self.outputs.get(program) {
            Some(Some(stdout)) => Ok(stdout.clone()),
            _ => Err(ScrapeError::Exit {
                command: program.to_string(),
                code: Some(1),
                stderr: "slurm_load_partitions: Unable to contact slurm controller".to_string(),
            }),
        };
        Box::pin(async move { result })
    }
}
