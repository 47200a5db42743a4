use crate::events::{self, AppEvent};
use async_channel::Sender;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/hexclock.sock";

pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(&socket_path).is_ok() {
        let _ = fs_err::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    forward_lines(BufReader::new(stream), &tx).await;
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Parses one event per line until EOF or until the receiver goes away.
pub async fn forward_lines<R: AsyncBufRead + Unpin>(reader: R, tx: &Sender<AppEvent>) {
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read from client: {}", e);
                break;
            }
        };

        match events::parse_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipping malformed event {:?}: {}", line, e),
        }
    }
}

pub fn socket_path_or_default(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH))
}
