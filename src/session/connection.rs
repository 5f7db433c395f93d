//! Per-connection session driver
//!
//! One reader loop and one writer task per connection. The reader drives the
//! login handshake and the chat loop; the writer drains the session's outbox
//! channel to the socket. Keeping all writes behind the outbox means a
//! history replay, a direct prompt and a concurrent broadcast can never split
//! each other mid-line.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::hub::ChatHub;
use crate::protocol::text::{
    chat_line, is_quit, join_confirmation, joined_notice, left_notice, GOODBYE, GROUP_PROMPT,
    USER_PROMPT, WELCOME,
};
use crate::protocol::LineReader;
use crate::registry::Member;
use crate::session::state::SessionState;

/// A single client connection from accept to disconnect
pub struct ConnectionSession {
    state: SessionState,
    hub: Arc<ChatHub>,
    max_line: usize,
}

impl ConnectionSession {
    /// Create a session for an accepted connection
    pub fn new(session_id: u64, peer_addr: SocketAddr, hub: Arc<ChatHub>, max_line: usize) -> Self {
        Self {
            state: SessionState::new(session_id, peer_addr),
            hub,
            max_line,
        }
    }

    /// Drive the session to completion
    ///
    /// Cleanup always runs: whatever ends the reader loop, the session leaves
    /// its group, the departure notice goes out to the remaining members, and
    /// the writer gets to flush everything still queued (the farewell
    /// included) before the socket closes.
    pub async fn run(mut self, socket: TcpStream) -> Result<()> {
        let (read_half, write_half) = socket.into_split();
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(Self::run_writer(write_half, outbox_rx));
        let mut lines = LineReader::new(BufReader::new(read_half), self.max_line);

        let result = self.drive(&mut lines, &outbox_tx).await;

        self.state.close();
        if let Some(group_id) = self.hub.leave(self.state.id).await {
            if let Some(user_id) = self.state.user_id() {
                let notice = left_notice(user_id);
                self.hub.publish(&group_id, &notice, None, false).await;
            }
        }

        // Last sender gone: the writer drains the queue and exits
        drop(outbox_tx);
        let delivered = writer.await.unwrap_or(0);

        self.state.stats.lines_delivered = delivered;
        self.state.stats.duration = self.state.duration();
        tracing::info!(
            session_id = self.state.id,
            peer = %self.state.peer_addr,
            received = self.state.stats.lines_received,
            published = self.state.stats.messages_published,
            delivered = delivered,
            duration_ms = self.state.stats.duration.as_millis() as u64,
            "Session closed"
        );

        result
    }

    /// Login handshake followed by the chat relay loop
    async fn drive(
        &mut self,
        lines: &mut LineReader<BufReader<OwnedReadHalf>>,
        outbox: &mpsc::UnboundedSender<Bytes>,
    ) -> Result<()> {
        let send = |text: &str| {
            let _ = outbox.send(Bytes::from(text.to_string()));
        };

        send(WELCOME);
        self.state.begin_login();

        send(USER_PROMPT);
        let user_id = match lines.next_line().await? {
            Some(line) => {
                self.state.stats.lines_received += 1;
                line
            }
            None => return Ok(()),
        };
        if user_id.is_empty() {
            tracing::debug!(session_id = self.state.id, "Empty user id, closing");
            return Ok(());
        }
        self.state.set_user_id(&user_id);

        send(GROUP_PROMPT);
        let group_id = match lines.next_line().await? {
            Some(line) => {
                self.state.stats.lines_received += 1;
                line
            }
            None => return Ok(()),
        };
        if group_id.is_empty() {
            tracing::debug!(session_id = self.state.id, "Empty group id, closing");
            return Ok(());
        }

        let member = Member::new(self.state.id, user_id.clone(), outbox.clone());
        self.hub.join(&group_id, member.clone()).await;
        self.state.join_group(&group_id);

        send(&join_confirmation(&group_id, &user_id));
        self.hub.replay(&group_id, &member).await;
        self.hub
            .publish(&group_id, &joined_notice(&user_id), Some(self.state.id), false)
            .await;

        while let Some(line) = lines.next_line().await? {
            self.state.stats.lines_received += 1;
            if line.is_empty() {
                continue;
            }
            if is_quit(&line) {
                send(GOODBYE);
                break;
            }

            let text = chat_line(&group_id, &user_id, &line);
            self.hub
                .publish(&group_id, &text, Some(self.state.id), true)
                .await;
            self.state.stats.messages_published += 1;
        }

        Ok(())
    }

    /// Drain the outbox to the socket until every sender is gone
    async fn run_writer(
        mut write_half: OwnedWriteHalf,
        mut outbox: mpsc::UnboundedReceiver<Bytes>,
    ) -> u64 {
        let mut delivered = 0u64;
        while let Some(line) = outbox.recv().await {
            if let Err(e) = write_half.write_all(&line).await {
                tracing::debug!(error = %e, "Write failed, dropping remaining output");
                break;
            }
            delivered += 1;
        }
        let _ = write_half.shutdown().await;
        delivered
    }
}
