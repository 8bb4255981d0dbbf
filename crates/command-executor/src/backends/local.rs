//! Processes on the local machine

use async_process::{Child, Stdio};
use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use futures_lite::io::{AsyncBufReadExt, AsyncRead, BufReader};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::event::{LogSource, ProcessEvent, ProcessEventType};
use crate::launcher::Launcher;
use crate::process::{ExitStatus, ProcessHandle};

/// Launches child processes of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

/// Handle to a launched local process
pub struct LocalProcessHandle {
    child: Child,
}

type LineStream = BoxStream<'static, io::Result<String>>;

/// Output lines of a local process, stdout and stderr interleaved as they arrive
///
/// The first event is always [`ProcessEventType::Started`]. The stream ends
/// once both pipes are closed.
pub struct ProcessEventStream {
    pid: u32,
    started: bool,
    sources: Vec<(LogSource, LineStream)>,
}

#[async_trait]
impl Launcher for LocalLauncher {
    type EventStream = ProcessEventStream;
    type Handle = LocalProcessHandle;

    async fn launch(&self, command: Command) -> Result<(Self::EventStream, Self::Handle)> {
        let mut child = command
            .to_async()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::from_spawn(&command, e))?;

        let pid = child.id();
        debug!(pid, command = %command.command_line(), dir = ?command.working_dir(), "spawned");

        let mut sources: Vec<(LogSource, LineStream)> = Vec::with_capacity(2);
        if let Some(out) = child.stdout.take() {
            sources.push((LogSource::Stdout, line_stream(out)));
        }
        if let Some(err) = child.stderr.take() {
            sources.push((LogSource::Stderr, line_stream(err)));
        }

        let events = ProcessEventStream {
            pid,
            started: false,
            sources,
        };
        Ok((events, LocalProcessHandle { child }))
    }
}

/// Newline-separated lines of a pipe, invalid UTF-8 replaced rather than rejected
fn line_stream<R>(pipe: R) -> LineStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    BufReader::new(pipe)
        .split(b'\n')
        .map(|bytes| {
            bytes.map(|mut bytes| {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                String::from_utf8_lossy(&bytes).into_owned()
            })
        })
        .boxed()
}

#[async_trait]
impl ProcessHandle for LocalProcessHandle {
    fn pid(&self) -> Option<u32> {
        Some(self.child.id())
    }

    async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self
            .child
            .status()
            .await
            .map_err(|e| Error::spawn_failed(format!("Failed to wait for process: {}", e)))?;
        Ok(ExitStatus::from(status))
    }
}

impl Stream for ProcessEventStream {
    type Item = ProcessEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if !self.started {
            self.started = true;
            let pid = self.pid;
            return Poll::Ready(Some(ProcessEvent::new(ProcessEventType::Started { pid })));
        }

        let mut i = 0;
        while i < self.sources.len() {
            let (source, lines) = &mut self.sources[i];
            match lines.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(line))) => {
                    return Poll::Ready(Some(ProcessEvent::new_with_data((*source).into(), line)));
                }
                // EOF or an I/O error closes that pipe only
                Poll::Ready(Some(Err(_))) | Poll::Ready(None) => {
                    self.sources.remove(i);
                }
                Poll::Pending => i += 1,
            }
        }

        if self.sources.is_empty() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
