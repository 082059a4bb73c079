//! Test doubles for the worker ports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use pipeinfer_core::ports::{WorkerChannel, WorkerError, WorkerLauncher};

mock! {
    pub Launcher {}

    #[async_trait]
    impl WorkerLauncher for Launcher {
        async fn launch(&self) -> Result<Box<dyn WorkerChannel>, WorkerError>;
    }
}

/// Observable state of a [`ScriptedWorker`].
#[derive(Debug, Default)]
pub struct Script {
    /// Lines the worker will print, in order. Exhausted = end-of-stream.
    pub stdout: VecDeque<String>,
    pub stderr: String,
    /// Lines written to the worker.
    pub written: Vec<String>,
    pub alive: bool,
    pub fail_writes: bool,
    pub terminations: u32,
}

/// In-memory worker that replays a fixed transcript.
#[derive(Debug, Clone)]
pub struct ScriptedWorker {
    script: Arc<Mutex<Script>>,
}

impl ScriptedWorker {
    pub fn new(stdout: &[&str]) -> Self {
        let script = Script {
            stdout: stdout.iter().map(ToString::to_string).collect(),
            alive: true,
            ..Script::default()
        };
        Self {
            script: Arc::new(Mutex::new(script)),
        }
    }

    #[must_use]
    pub fn with_stderr(self, stderr: &str) -> Self {
        self.script.lock().unwrap().stderr = stderr.to_string();
        self
    }

    #[must_use]
    pub fn failing_writes(self) -> Self {
        self.script.lock().unwrap().fail_writes = true;
        self
    }

    /// Simulate the process dying on its own.
    pub fn kill(&self) {
        self.script.lock().unwrap().alive = false;
    }

    pub fn written(&self) -> Vec<String> {
        self.script.lock().unwrap().written.clone()
    }

    pub fn remaining_stdout(&self) -> Vec<String> {
        self.script.lock().unwrap().stdout.iter().cloned().collect()
    }

    pub fn terminations(&self) -> u32 {
        self.script.lock().unwrap().terminations
    }

    pub fn boxed(&self) -> Box<dyn WorkerChannel> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl WorkerChannel for ScriptedWorker {
    fn pid(&self) -> Option<u32> {
        None
    }

    fn is_alive(&mut self) -> bool {
        self.script.lock().unwrap().alive
    }

    async fn write_line(&mut self, line: &str) -> Result<(), WorkerError> {
        let mut script = self.script.lock().unwrap();
        if script.fail_writes || !script.alive {
            return Err(WorkerError::Write("Broken pipe (os error 32)".to_string()));
        }
        script.written.push(line.to_string());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>, WorkerError> {
        let mut script = self.script.lock().unwrap();
        let line = script.stdout.pop_front();
        if line.is_none() {
            // Closing stdout means the process is gone
            script.alive = false;
        }
        Ok(line)
    }

    async fn drain_stderr(&mut self) -> String {
        std::mem::take(&mut self.script.lock().unwrap().stderr)
    }

    async fn terminate(&mut self) {
        let mut script = self.script.lock().unwrap();
        script.alive = false;
        script.terminations += 1;
    }
}

/// Launcher mock that hands out `workers` in order, once each.
pub fn launcher_for(workers: Vec<ScriptedWorker>) -> MockLauncher {
    let count = workers.len();
    let mut queue: VecDeque<ScriptedWorker> = workers.into();
    let mut launcher = MockLauncher::new();
    launcher
        .expect_launch()
        .times(count)
        .returning(move || Ok(queue.pop_front().expect("no scripted worker left").boxed()));
    launcher
}
