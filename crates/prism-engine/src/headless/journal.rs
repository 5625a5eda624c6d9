use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One platform call observed by the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSurface,
    RequestAdapter,
    RequestDevice,
    Configure {
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    },
    CreateRecording { recording: u64 },
    AcquireTexture { texture: u64 },
    CreateView { texture: u64, view: u64 },
    BeginRenderPass { recording: u64 },
    DebugMarker { recording: u64, label: String },
    EndRenderPass { recording: u64 },
    Finish { recording: u64 },
    Submit { buffers: Vec<u64> },
    Present { texture: u64 },
}

impl Call {
    /// Stable snake_case name, handy for asserting call sequences.
    pub fn name(&self) -> &'static str {
        match self {
            Call::CreateSurface => "create_surface",
            Call::RequestAdapter => "request_adapter",
            Call::RequestDevice => "request_device",
            Call::Configure { .. } => "configure",
            Call::CreateRecording { .. } => "create_recording",
            Call::AcquireTexture { .. } => "acquire_texture",
            Call::CreateView { .. } => "create_view",
            Call::BeginRenderPass { .. } => "begin_render_pass",
            Call::DebugMarker { .. } => "debug_marker",
            Call::EndRenderPass { .. } => "end_render_pass",
            Call::Finish { .. } => "finish",
            Call::Submit { .. } => "submit",
            Call::Present { .. } => "present",
        }
    }
}

/// Color attachment as it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAttachment {
    pub view: u64,
    /// Texture the view was created from; `0` for detached views.
    pub texture: u64,
    pub ops: wgpu::Operations<wgpu::Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PassCommand {
    DebugMarker(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPass {
    pub label: Option<String>,
    pub color_attachments: Vec<RecordedAttachment>,
    pub commands: Vec<PassCommand>,
}

/// Contents of a finished command buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuffer {
    pub id: u64,
    pub label: Option<String>,
    pub passes: Vec<RecordedPass>,
}

/// Buffers handed to one `submit` call, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedBatch {
    /// Position of the batch in queue order, starting at 0.
    pub sequence: u64,
    pub buffers: Vec<RecordedBuffer>,
}

#[derive(Debug, Default)]
struct JournalState {
    calls: Vec<Call>,
    submissions: Vec<SubmittedBatch>,
    acquire_failures: VecDeque<wgpu::SurfaceError>,
    last_id: u64,
}

/// Shared, ordered log of everything the headless backend was asked to do.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    state: Arc<Mutex<JournalState>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Snapshot of all submitted batches, in queue order.
    pub fn submissions(&self) -> Vec<SubmittedBatch> {
        self.lock().submissions.clone()
    }

    pub(crate) fn record(&self, call: Call) {
        log::trace!("headless: {call:?}");
        self.lock().calls.push(call);
    }

    /// Ids are unique across every kind of handle.
    pub(crate) fn next_id(&self) -> u64 {
        let mut state = self.lock();
        state.last_id += 1;
        state.last_id
    }

    pub(crate) fn push_submission(&self, buffers: Vec<RecordedBuffer>) {
        let mut state = self.lock();
        let sequence = state.submissions.len() as u64;
        state.calls.push(Call::Submit {
            buffers: buffers.iter().map(|b| b.id).collect(),
        });
        state.submissions.push(SubmittedBatch { sequence, buffers });
    }

    pub(crate) fn push_acquire_failure(&self, err: wgpu::SurfaceError) {
        self.lock().acquire_failures.push_back(err);
    }

    pub(crate) fn take_acquire_failure(&self) -> Option<wgpu::SurfaceError> {
        self.lock().acquire_failures.pop_front()
    }

    fn lock(&self) -> MutexGuard<'_, JournalState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_calls() {
        let journal = Journal::new();
        let other = journal.clone();

        other.record(Call::CreateSurface);

        assert_eq!(journal.calls(), vec![Call::CreateSurface]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let journal = Journal::new();
        let a = journal.next_id();
        let b = journal.next_id();
        assert!(b > a);
        assert_ne!(a, 0);
    }

    #[test]
    fn submissions_are_sequenced() {
        let journal = Journal::new();
        let buffer = |id| RecordedBuffer { id, label: None, passes: Vec::new() };

        journal.push_submission(vec![buffer(1), buffer(2)]);
        journal.push_submission(vec![buffer(3)]);

        let batches = journal.submissions();
        assert_eq!(batches[0].sequence, 0);
        assert_eq!(batches[1].sequence, 1);
        assert_eq!(journal.calls()[0], Call::Submit { buffers: vec![1, 2] });
    }

    #[test]
    fn acquire_failures_are_fifo() {
        let journal = Journal::new();
        journal.push_acquire_failure(wgpu::SurfaceError::Timeout);
        journal.push_acquire_failure(wgpu::SurfaceError::Lost);

        assert_eq!(journal.take_acquire_failure(), Some(wgpu::SurfaceError::Timeout));
        assert_eq!(journal.take_acquire_failure(), Some(wgpu::SurfaceError::Lost));
        assert_eq!(journal.take_acquire_failure(), None);
    }
}
