use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::{FeedError, Result};

// ─── FrameStream ──────────────────────────────────────────────────────────

/// An async stream of raw text frames from the scoreboard.
///
/// Backed by a Tokio mpsc channel. A background task owns the underlying
/// connection or reader and forwards frames until the source ends or fails.
/// A source failure is delivered as a single `Err` item, after which the
/// stream ends. Dropping `FrameStream` closes the receiver, which causes the
/// background task to exit on the next send attempt.
///
/// ```rust,ignore
/// use futures::StreamExt;
/// use roundcast_feed::FrameStream;
///
/// let mut frames = FrameStream::websocket("ws://localhost:8080/ws");
/// while let Some(frame) = frames.next().await {
///     println!("{}", frame?);
/// }
/// ```
pub struct FrameStream {
    rx: mpsc::Receiver<Result<String>>,
}

impl FrameStream {
    /// Connect to a websocket endpoint and stream its text messages.
    ///
    /// Binary, ping and pong messages are skipped. A close message ends the
    /// stream normally.
    pub fn websocket(url: impl Into<String>) -> Self {
        let url = url.into();
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let (mut ws, _response) = match tokio_tungstenite::connect_async(url.as_str()).await {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = tx.send(Err(FeedError::WebSocket(e))).await;
                    return;
                }
            };
            tracing::info!(%url, "scoreboard stream connected");

            while let Some(msg) = ws.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if tx.send(Ok(text.to_string())).await.is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        let _ = tx.send(Err(FeedError::WebSocket(e))).await;
                        break;
                    }
                }
            }

            let _ = ws.close(None).await;
            tracing::info!(%url, "scoreboard stream closed");
        });

        FrameStream { rx }
    }

    /// Stream newline-delimited frames from a reader (a recorded capture or
    /// stdin). Blank lines are skipped.
    pub fn lines<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        if tx.send(Ok(line)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        let _ = tx.send(Err(FeedError::Io(e))).await;
                        break;
                    }
                }
            }
        });

        FrameStream { rx }
    }

    /// Wrap a raw receiver, for callers that produce frames themselves.
    pub fn from_channel(rx: mpsc::Receiver<Result<String>>) -> Self {
        Self { rx }
    }
}

impl Stream for FrameStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn lines_skip_blank_lines() {
        let input = "{\"a\":1}\n\n   \n{\"b\":2}\n";
        let frames: Vec<_> = FrameStream::lines(Cursor::new(input.as_bytes().to_vec()))
            .collect()
            .await;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_ref().unwrap(), "{\"a\":1}");
        assert_eq!(frames[1].as_ref().unwrap(), "{\"b\":2}");
    }

    #[tokio::test]
    async fn lines_read_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "first").unwrap();
        writeln!(f, "second").unwrap();
        let file = tokio::fs::File::open(f.path()).await.unwrap();
        let frames: Vec<_> = FrameStream::lines(file).collect().await;
        let texts: Vec<_> = frames.into_iter().map(|f| f.unwrap()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[tokio::test]
    async fn channel_stream_ends_when_sender_drops() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(Ok("x".to_string())).await.unwrap();
        drop(tx);
        let frames: Vec<_> = FrameStream::from_channel(rx).collect().await;
        assert_eq!(frames.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_websocket_yields_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let frames: Vec<_> = FrameStream::websocket(format!("ws://127.0.0.1:{port}/ws"))
            .collect()
            .await;
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0], Err(FeedError::WebSocket(_))));
    }
}
