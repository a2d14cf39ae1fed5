use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::Context as _;

use super::{Invocation, ProcessOutcome, ProcessRunner};

/// Spawns real subprocesses, polling for exit so a hung encoder can be killed.
#[derive(Clone, Debug)]
pub struct SystemProcessRunner {
    poll_interval: Duration,
}

impl Default for SystemProcessRunner {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&mut self, invocation: &Invocation, timeout: Duration) -> anyhow::Result<ProcessOutcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn '{}'", invocation.program.display()))?;
        let mut stderr = child
            .stderr
            .take()
            .context("failed to open child stderr (unexpected)")?;
        // Drained on a thread so a chatty child never blocks on a full pipe.
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok::<_, std::io::Error>(bytes)
        });

        let started = Instant::now();
        let (code, timed_out) = loop {
            if let Some(status) = child.try_wait().context("failed to poll child process")? {
                break (status.code(), false);
            }
            if started.elapsed() >= timeout {
                tracing::warn!(
                    program = %invocation.program.display(),
                    timeout_secs = timeout.as_secs_f64(),
                    "killing encoder past its timeout"
                );
                // The child may exit between the poll and the kill.
                let _ = child.kill();
                child.wait().context("failed to reap killed child process")?;
                break (None, true);
            }
            std::thread::sleep(self.poll_interval);
        };

        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| anyhow::anyhow!("stderr drain thread panicked"))?
            .context("stderr read failed")?;

        Ok(ProcessOutcome {
            code,
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            timed_out,
        })
    }
}
