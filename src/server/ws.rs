//! WebSocket transport

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State as AxumState};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{future, StreamExt};
use std::net::SocketAddr;
use tracing::{debug, warn};

use super::AppState;
use crate::session::{ConnectionGuard, Session, SessionContext, SessionEnd};

pub(crate) async fn ws_handler(
    AxumState(state): AxumState<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(guard) = state.context.tracker.try_acquire(state.max_connections) else {
        warn!(
            "Rejecting connection from {}: limit of {} reached",
            peer, state.max_connections
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "Too many connections").into_response();
    };

    let context = state.context.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, context, guard, peer))
}

async fn handle_socket(
    socket: WebSocket,
    context: SessionContext,
    guard: ConnectionGuard,
    peer: SocketAddr,
) {
    let session = Session::new(context, guard, peer.to_string());
    let id = session.id();

    // Pings are answered by the socket itself while it is being read
    let frames = socket
        .take_while(|message| future::ready(!matches!(message, Ok(Message::Close(_)))))
        .filter_map(|message| future::ready(frame_text(message)));

    match session.run(frames).await {
        SessionEnd::ClientClosed => debug!("Connection #{} closed by client", id),
        SessionEnd::TransportTerminated(reason) => {
            debug!("Connection #{} terminated: {}", id, reason)
        }
    }
}

/// Text carried by a message, if it is a command frame
fn frame_text(message: Result<Message, axum::Error>) -> Option<Result<String, axum::Error>> {
    match message {
        Ok(Message::Text(text)) => Some(Ok(text)),
        Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
            Ok(text) => Some(Ok(text)),
            Err(_) => {
                debug!("Ignoring non-UTF-8 binary frame");
                None
            }
        },
        Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Close(_)) => None,
        Err(e) => Some(Err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_utf8_binary_are_frames() {
        assert_eq!(
            frame_text(Ok(Message::Text("1,2".to_string()))).unwrap().unwrap(),
            "1,2"
        );
        assert_eq!(
            frame_text(Ok(Message::Binary(b"click:left".to_vec())))
                .unwrap()
                .unwrap(),
            "click:left"
        );
    }

    #[test]
    fn test_control_and_invalid_binary_are_skipped() {
        assert!(frame_text(Ok(Message::Ping(vec![1]))).is_none());
        assert!(frame_text(Ok(Message::Pong(vec![]))).is_none());
        assert!(frame_text(Ok(Message::Binary(vec![0xff, 0xfe]))).is_none());
    }
}
