//! Chat client implementation
//!
//! Line-oriented client for the group chat protocol, used by the demo client
//! binary and the integration tests.
//!
//! The login prompts arrive without a line terminator, so the client does not
//! wait for them: it writes both identifiers right after connecting and then
//! reads lines until the join confirmation shows up. The server consumes the
//! two lines in order either way.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::error::Result;
use crate::protocol::text::CRLF;
use crate::protocol::LineReader;

/// Marker that terminates a history replay
const REPLAY_FOOTER_PREFIX: &str = "--- End of recent messages ---";

/// Marker for a replay with nothing to show
const REPLAY_EMPTY_PREFIX: &str = "(No messages in this group";

/// Group chat client
///
/// # Example
/// ```no_run
/// use groupchat_rs::client::ChatClient;
///
/// # async fn example() -> groupchat_rs::error::Result<()> {
/// let mut client = ChatClient::connect("127.0.0.1:5003".parse().unwrap()).await?;
/// client.login("alice", "group1").await?;
/// client.skip_replay().await?;
///
/// client.send("hello everyone").await?;
/// while let Some(line) = client.recv_line().await? {
///     println!("{}", line);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChatClient {
    lines: LineReader<BufReader<OwnedReadHalf>>,
    write_half: OwnedWriteHalf,
}

impl ChatClient {
    /// Connect to a chat server
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let socket = TcpStream::connect(addr).await?;
        socket.set_nodelay(true)?;
        let (read_half, write_half) = socket.into_split();

        Ok(Self {
            lines: LineReader::new(BufReader::new(read_half), 64 * 1024),
            write_half,
        })
    }

    /// Complete the login handshake
    ///
    /// Sends both identifiers and reads until the server confirms the join.
    pub async fn login(&mut self, user_id: &str, group_id: &str) -> Result<()> {
        self.send(user_id).await?;
        self.send(group_id).await?;

        while let Some(line) = self.lines.next_line().await? {
            if line.starts_with("You joined group ") {
                return Ok(());
            }
        }

        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed during login",
        )
        .into())
    }

    /// Read past the history replay that follows a login
    ///
    /// Returns the number of replayed history lines.
    pub async fn skip_replay(&mut self) -> Result<usize> {
        let mut in_replay = false;
        let mut replayed = 0;

        while let Some(line) = self.lines.next_line().await? {
            if line.starts_with("--- Messages in group ") {
                in_replay = true;
                continue;
            }
            if line.starts_with(REPLAY_FOOTER_PREFIX) || line.starts_with(REPLAY_EMPTY_PREFIX) {
                // Both markers are followed by one blank separator line
                self.lines.next_line().await?;
                return Ok(replayed);
            }
            if in_replay && !line.is_empty() {
                replayed += 1;
            }
        }

        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed during history replay",
        )
        .into())
    }

    /// Send one chat line
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.write_half.write_all(text.as_bytes()).await?;
        self.write_half.write_all(CRLF.as_bytes()).await?;
        Ok(())
    }

    /// Read the next line from the server, `None` on disconnect
    pub async fn recv_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    /// Leave politely and wait for the farewell
    pub async fn quit(mut self) -> Result<()> {
        self.send("/quit").await?;

        while let Some(line) = self.lines.next_line().await? {
            if line.starts_with("Goodbye!") {
                break;
            }
        }

        let _ = self.write_half.shutdown().await;
        Ok(())
    }

    /// Split into the line reader and the raw write half
    ///
    /// For callers that read and write concurrently, like the demo client.
    pub fn into_split(self) -> (LineReader<BufReader<OwnedReadHalf>>, OwnedWriteHalf) {
        (self.lines, self.write_half)
    }
}
