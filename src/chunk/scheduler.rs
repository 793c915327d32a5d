// ABOUTME: Ordering-preserving scheduler for interleaved sync and async output
// ABOUTME: Allocates placeholder chunks at invocation position and fills them on completion

use futures::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// An ordered node in the output sequence.
#[derive(Debug)]
enum Chunk {
    /// Still accepting synchronous writes; only ever the last chunk.
    Open(String),
    /// Reserved placeholder awaiting an asynchronous fill.
    Pending,
    /// Final literal text, ready to flush.
    Resolved(String),
}

#[derive(Debug, Default)]
struct Sequence {
    chunks: Vec<Chunk>,
    flushed: usize,
    sink: String,
}

impl Sequence {
    /// Seal the trailing open chunk so it becomes flushable.
    fn seal(&mut self) {
        if let Some(last) = self.chunks.last_mut() {
            if let Chunk::Open(text) = last {
                *last = Chunk::Resolved(std::mem::take(text));
            }
        }
    }

    /// Move the contiguous resolved prefix into the sink.
    fn flush(&mut self) {
        while self.flushed < self.chunks.len() {
            match &mut self.chunks[self.flushed] {
                Chunk::Resolved(text) => {
                    self.sink.push_str(&std::mem::take(text));
                    self.flushed += 1;
                }
                Chunk::Open(_) | Chunk::Pending => break,
            }
        }
    }
}

/// Composes helper output in invocation order even when individual fragments
/// depend on asynchronous work of arbitrary latency.
///
/// `write` appends synchronously to the active chunk. `map` reserves a
/// placeholder at the exact position it was invoked and runs its branch
/// without blocking the caller; the placeholder is filled in place on
/// completion. The concatenated output therefore always equals scheduling
/// order, never completion order.
pub struct ChunkScheduler {
    state: Arc<Mutex<Sequence>>,
    handles: Vec<JoinHandle<()>>,
}

impl ChunkScheduler {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Sequence::default())),
            handles: Vec::new(),
        }
    }

    /// Append text to the currently active chunk.
    pub fn write(&mut self, text: &str) {
        let mut seq = self.state.lock().expect("chunk sequence poisoned");
        match seq.chunks.last_mut() {
            Some(Chunk::Open(buffer)) => buffer.push_str(text),
            _ => seq.chunks.push(Chunk::Open(text.to_string())),
        }
    }

    /// Allocate a placeholder at the current output position and run `branch`
    /// without blocking the caller. Sequential calls receive distinct
    /// placeholders in call order.
    ///
    /// A failing branch degrades to empty output and still completes its
    /// chunk; sibling branches are unaffected.
    pub fn map<F, E>(&mut self, branch: F)
    where
        F: Future<Output = std::result::Result<String, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let index = {
            let mut seq = self.state.lock().expect("chunk sequence poisoned");
            seq.seal();
            seq.chunks.push(Chunk::Pending);
            seq.chunks.len() - 1
        };

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let text = match branch.await {
                Ok(text) => text,
                Err(e) => {
                    warn!(chunk = index, "async chunk degraded to empty output: {e}");
                    String::new()
                }
            };
            let mut seq = state.lock().expect("chunk sequence poisoned");
            seq.chunks[index] = Chunk::Resolved(text);
            seq.flush();
        });
        self.handles.push(handle);
    }

    /// Seal the active chunk and flush the contiguous resolved prefix.
    pub fn end(&mut self) {
        let mut seq = self.state.lock().expect("chunk sequence poisoned");
        seq.seal();
        seq.flush();
    }

    /// Text flushed so far; pending placeholders hold everything after them
    /// back regardless of completion order.
    pub fn flushed(&self) -> String {
        self.state
            .lock()
            .expect("chunk sequence poisoned")
            .sink
            .clone()
    }

    /// Number of async branches still in flight.
    pub fn in_flight(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Await every in-flight branch and return the composed output.
    pub async fn finish(mut self) -> String {
        self.state
            .lock()
            .expect("chunk sequence poisoned")
            .seal();

        let handles = std::mem::take(&mut self.handles);
        for result in join_all(handles).await {
            if let Err(e) = result {
                error!("chunk branch aborted: {e}");
            }
        }
        self.drain()
    }

    /// Await branches up to `deadline`; any placeholder still pending when it
    /// elapses resolves as empty. This is the page-level timeout path owned
    /// by the external request layer.
    pub async fn finish_with_timeout(mut self, deadline: Duration) -> String {
        self.state
            .lock()
            .expect("chunk sequence poisoned")
            .seal();

        let mut handles = std::mem::take(&mut self.handles);
        if timeout(deadline, join_all(handles.iter_mut())).await.is_err() {
            debug!("render deadline elapsed; resolving pending chunks as empty");
            for handle in &handles {
                handle.abort();
            }
        }
        self.drain()
    }

    fn drain(&self) -> String {
        let mut seq = self.state.lock().expect("chunk sequence poisoned");
        for chunk in &mut seq.chunks {
            if matches!(chunk, Chunk::Pending) {
                *chunk = Chunk::Resolved(String::new());
            }
        }
        seq.flush();
        std::mem::take(&mut seq.sink)
    }
}

impl Default for ChunkScheduler {
    fn default() -> Self {
        Self::new()
    }
}
