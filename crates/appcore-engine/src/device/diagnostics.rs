use std::sync::{Arc, Mutex, PoisonError};

/// Collects wgpu validation errors.
///
/// Installed as the device's uncaptured-error handler. Inside [`capture`]
/// errors are collected and returned to the caller (shader compilation and
/// pipeline creation use this to obtain their diagnostic text); outside of
/// it they are logged.
///
/// wgpu reports validation errors synchronously from the call that caused
/// them, so a capture window around a single `create_*` call sees exactly
/// that call's errors.
///
/// [`capture`]: DiagnosticSink::capture
#[derive(Clone, Default)]
pub struct DiagnosticSink {
    inner: Arc<Mutex<SinkState>>,
}

#[derive(Default)]
struct SinkState {
    capturing: bool,
    messages: Vec<String>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `device`'s uncaptured errors into this sink.
    pub fn install(&self, device: &wgpu::Device) {
        let sink = self.clone();
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| {
            sink.report(err.to_string());
        }));
    }

    /// Records one error message.
    pub fn report(&self, message: String) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.capturing {
            state.messages.push(message);
        } else {
            drop(state);
            log::error!("gpu validation error: {message}");
        }
    }

    /// Runs `f` and returns its result with the errors reported meanwhile.
    pub fn capture<R>(&self, f: impl FnOnce() -> R) -> (R, Vec<String>) {
        self.set_capturing(true);
        let out = f();
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.capturing = false;
        (out, std::mem::take(&mut state.messages))
    }

    fn set_capturing(&self, on: bool) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.capturing = on;
        state.messages.clear();
    }
}

/// Joins captured messages into one diagnostic string, `None` if empty.
pub(crate) fn join_diagnostics(messages: Vec<String>) -> Option<String> {
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_returns_reported_messages() {
        let sink = DiagnosticSink::new();
        let (value, messages) = sink.capture(|| {
            sink.report("first".into());
            sink.report("second".into());
            7
        });
        assert_eq!(value, 7);
        assert_eq!(messages, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn reports_outside_capture_are_not_collected() {
        let sink = DiagnosticSink::new();
        sink.report("stray".into());
        let ((), messages) = sink.capture(|| ());
        assert!(messages.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let sink = DiagnosticSink::new();
        let handler = sink.clone();
        let ((), messages) = sink.capture(|| handler.report("from handler".into()));
        assert_eq!(messages, vec!["from handler".to_string()]);
    }

    #[test]
    fn join_diagnostics_empty_is_none() {
        assert_eq!(join_diagnostics(Vec::new()), None);
        assert_eq!(
            join_diagnostics(vec!["a".into(), "b".into()]).as_deref(),
            Some("a\nb")
        );
    }
}
