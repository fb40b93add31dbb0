//! Websocket client for the visit push channel.
//!
//! The channel is opened once per page mount and closed on unmount. It has no
//! reconnect loop: a dropped connection leaves the page in
//! [`PushStatus::Disconnected`] and broadcasts are skipped until the page is
//! mounted again. REST persistence of location samples is unaffected.
//!
//! All websocket logic is gated behind `#[cfg(feature = "hydrate")]` since it
//! requires a browser environment.

#[cfg(test)]
#[path = "push_channel_test.rs"]
mod push_channel_test;

use events::{Event, LocationUpdate, StartLocationSharing, VisitStatusUpdate};

use super::types::{LocationSample, VisitStatus};

/// Push-channel connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PushStatus {
    /// Not connected; socket is closed or not yet opened.
    #[default]
    Disconnected,
    /// Websocket handshake is in progress.
    Connecting,
    /// Socket is open and the server sent its `connected` acknowledgment.
    Connected,
}

/// Outbound handle for the push channel.
///
/// Cloning shares the same queue. A default sender is disconnected and
/// drops every event.
#[derive(Clone, Debug, Default)]
pub struct PushSender {
    #[cfg(feature = "hydrate")]
    tx: Option<futures::channel::mpsc::UnboundedSender<String>>,
}

impl PushSender {
    /// Queue an event for the socket.
    ///
    /// Returns `false` if the channel is closed or the event cannot be encoded.
    pub fn send(&self, event: &Event) -> bool {
        #[cfg(feature = "hydrate")]
        {
            let Some(tx) = self.tx.as_ref() else {
                return false;
            };
            match events::encode_event(event) {
                Ok(text) => tx.unbounded_send(text).is_ok(),
                Err(e) => {
                    leptos::logging::warn!("push event encode failed: {e}");
                    false
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = event;
            false
        }
    }

    /// Close the outbound queue, which ends the socket task.
    pub fn close(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(tx) = self.tx.as_ref() {
                tx.close_channel();
            }
        }
    }
}

// =============================================================================
// Event builders
// =============================================================================

pub fn start_sharing_event(visit_id: &str) -> Event {
    Event::StartLocationSharing(StartLocationSharing { visit_id: visit_id.to_owned() })
}

pub fn location_event(visit_id: &str, sample: &LocationSample) -> Event {
    Event::LocationUpdate(LocationUpdate {
        visit_id: visit_id.to_owned(),
        latitude: sample.latitude,
        longitude: sample.longitude,
        accuracy: sample.accuracy,
    })
}

pub fn status_event(visit_id: &str, status: VisitStatus, notes: &str) -> Event {
    Event::VisitStatusUpdate(VisitStatusUpdate {
        visit_id: visit_id.to_owned(),
        status: status.as_str().to_owned(),
        notes: notes.to_owned(),
    })
}

/// Map an inbound text message to a status change, if it carries one.
#[cfg(any(test, feature = "hydrate"))]
fn status_for_incoming(text: &str) -> Result<Option<PushStatus>, events::CodecError> {
    match events::decode_event(text)? {
        Event::Connected(_) => Ok(Some(PushStatus::Connected)),
        Event::StartLocationSharing(_) | Event::LocationUpdate(_) | Event::VisitStatusUpdate(_) => Ok(None),
    }
}

// =============================================================================
// Socket lifecycle
// =============================================================================

/// Open the push channel and spawn its socket task.
///
/// `status` tracks the connection; the returned sender queues outbound events.
#[cfg(feature = "hydrate")]
pub fn open_push_channel(url: String, status: leptos::prelude::RwSignal<PushStatus>) -> PushSender {
    use futures::channel::mpsc;
    use leptos::prelude::Set;

    let (tx, rx) = mpsc::unbounded::<String>();
    status.set(PushStatus::Connecting);
    leptos::task::spawn_local(async move {
        match connect_and_run(&url, status, rx).await {
            Ok(()) => leptos::logging::log!("push channel closed"),
            Err(e) => leptos::logging::warn!("push channel error: {e}"),
        }
        status.try_set(PushStatus::Disconnected);
    });
    PushSender { tx: Some(tx) }
}

/// Connect and pump messages until either side closes.
#[cfg(feature = "hydrate")]
async fn connect_and_run(
    url: &str,
    status: leptos::prelude::RwSignal<PushStatus>,
    mut rx: futures::channel::mpsc::UnboundedReceiver<String>,
) -> Result<(), String> {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;
    use leptos::prelude::Set;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    let send_task = async {
        use futures::SinkExt;
        while let Some(msg) = rx.next().await {
            if ws_write.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
        let _ = ws_write.close().await;
    };

    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => match status_for_incoming(&text) {
                    Ok(Some(next)) => status.set(next),
                    Ok(None) => {}
                    Err(e) => leptos::logging::warn!("push channel ignored message: {e}"),
                },
                Ok(Message::Bytes(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("push channel recv error: {e}");
                    break;
                }
            }
        }
    };

    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    Ok(())
}
