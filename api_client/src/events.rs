//! Push events emitted by the backend while it generates previews.

use crate::ApiClientError;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const PREVIEW_START: &str = "preview-start";
pub const PREVIEW_PROGRESS: &str = "preview-progress";
pub const PREVIEW_END: &str = "preview-end";

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    Start,
    /// Percentage in `0.0..=100.0`.
    Progress(f32),
    End,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
}

impl PreviewEvent {
    /// Map a named event and its payload. Unknown names yield `None`.
    pub fn from_wire(name: &str, payload: &serde_json::Value) -> Option<Self> {
        match name {
            PREVIEW_START => Some(PreviewEvent::Start),
            PREVIEW_PROGRESS => {
                let value = payload.as_f64()?;
                Some(PreviewEvent::Progress(value.clamp(0.0, 100.0) as f32))
            }
            PREVIEW_END => Some(PreviewEvent::End),
            _ => None,
        }
    }

    /// Parse one line of the newline-delimited event stream.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ApiClientError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let wire: WireEvent =
            serde_json::from_str(line).map_err(|e| ApiClientError::Decode(e.to_string()))?;
        Ok(Self::from_wire(&wire.event, &wire.payload))
    }
}

/// Aborts the reader task when dropped.
#[derive(Debug)]
pub struct EventGuard {
    handle: Option<JoinHandle<()>>,
}

impl EventGuard {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl Drop for EventGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A live subscription to backend push events.
///
/// The background reader stops as soon as the subscription (or its guard,
/// after [`EventSubscription::into_parts`]) is dropped.
#[derive(Debug)]
pub struct EventSubscription {
    receiver: mpsc::UnboundedReceiver<PreviewEvent>,
    guard: EventGuard,
}

impl EventSubscription {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<PreviewEvent>, guard: EventGuard) -> Self {
        Self { receiver, guard }
    }

    pub async fn recv(&mut self) -> Option<PreviewEvent> {
        self.receiver.recv().await
    }

    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<PreviewEvent>, EventGuard) {
        (self.receiver, self.guard)
    }
}

/// Forward decoded events from a byte stream until it ends or the receiver
/// goes away.
pub(crate) async fn pump_events<S, B, E>(mut stream: S, tx: mpsc::UnboundedSender<PreviewEvent>)
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut buffer: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Event stream interrupted: {}", e);
                break;
            }
        };
        buffer.extend_from_slice(chunk.as_ref());
        while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            if !forward_line(&line, &tx) {
                return;
            }
        }
    }
    if !buffer.is_empty() {
        forward_line(&buffer, &tx);
    }
    tracing::debug!("Event stream closed");
}

fn forward_line(line: &[u8], tx: &mpsc::UnboundedSender<PreviewEvent>) -> bool {
    let text = String::from_utf8_lossy(line);
    match PreviewEvent::parse_line(&text) {
        Ok(Some(event)) => tx.send(event).is_ok(),
        Ok(None) => true,
        Err(e) => {
            tracing::warn!("Skipping malformed event {:?}: {}", text.trim(), e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_wire() {
        assert_eq!(
            PreviewEvent::from_wire("preview-start", &json!(null)),
            Some(PreviewEvent::Start)
        );
        assert_eq!(
            PreviewEvent::from_wire("preview-progress", &json!(42.5)),
            Some(PreviewEvent::Progress(42.5))
        );
        assert_eq!(
            PreviewEvent::from_wire("preview-progress", &json!(250)),
            Some(PreviewEvent::Progress(100.0))
        );
        assert_eq!(PreviewEvent::from_wire("preview-progress", &json!("x")), None);
        assert_eq!(PreviewEvent::from_wire("tagging-start", &json!(null)), None);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(PreviewEvent::parse_line("   ").unwrap(), None);
        assert_eq!(
            PreviewEvent::parse_line(r#"{"event":"preview-end"}"#).unwrap(),
            Some(PreviewEvent::End)
        );
        assert!(PreviewEvent::parse_line("not json").is_err());
    }

    #[tokio::test]
    async fn test_pump_events_handles_split_chunks() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"{\"event\":\"preview-start\"}\n{\"event\":\"preview-pro".to_vec()),
            Ok(b"gress\",\"payload\":10}\ngarbage\n".to_vec()),
            Ok(b"{\"event\":\"preview-end\"}".to_vec()),
        ];
        let (tx, mut rx) = mpsc::unbounded_channel();
        pump_events(futures::stream::iter(chunks), tx).await;

        assert_eq!(rx.recv().await, Some(PreviewEvent::Start));
        assert_eq!(rx.recv().await, Some(PreviewEvent::Progress(10.0)));
        assert_eq!(rx.recv().await, Some(PreviewEvent::End));
        assert_eq!(rx.recv().await, None);
    }
}
