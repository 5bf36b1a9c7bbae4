//! Sequential control-socket server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;

use autoadj_core::ProfileName;

use crate::error::{io_err, DaemonError};
use crate::protocol::{
    ControlReply, ControlRequest, MAX_PAYLOAD, OPCODE_LIST_PROFILES, OPCODE_SET_PROFILE,
    OPCODE_SET_TIMER, OPCODE_STATUS,
};
use crate::store::ProfileStore;

/// Accept-dispatch loop, one request/response exchange per connection.
///
/// Connections are served inline: the next one is not accepted until
/// the previous response is written and the socket closed. Concurrent
/// clients queue in the listen backlog. Connection-level failures are
/// logged and the loop continues; only a failed bind is fatal.
pub async fn server_task(
    socket_path: PathBuf,
    store: Arc<ProfileStore>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let listener = bind_socket(&socket_path)?;
    tracing::info!(socket = %socket_path.display(), "control socket listening");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _)) => {
                        if let Err(err) = handle_connection(stream, &store).await {
                            tracing::warn!(error = %err, "control connection failed");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "accept on control socket failed");
                    }
                }
            }
        }
    }

    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
    }
    tracing::info!("control server stopped");
    Ok(())
}

/// Bind the listener, clearing a stale socket file first. A path that
/// still accepts connections belongs to a live daemon and is an error.
fn bind_socket(socket_path: &Path) -> Result<UnixListener, DaemonError> {
    if socket_path.exists() {
        match std::os::unix::net::UnixStream::connect(socket_path) {
            Ok(_) => {
                return Err(DaemonError::SocketInUse {
                    socket: socket_path.to_path_buf(),
                });
            }
            Err(err) => {
                tracing::warn!(
                    socket = %socket_path.display(),
                    error = %err,
                    "removing stale control socket before bind",
                );
            }
        }
        match std::fs::remove_file(socket_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(io_err(socket_path, err)),
        }
    }
    UnixListener::bind(socket_path).map_err(|e| io_err(socket_path, e))
}

/// One exchange: opcode → optional payload → dispatch → framed response.
///
/// A request that cannot be decoded (truncated payload, oversized
/// length prefix, non-UTF-8 name) is a connection-level failure: no
/// response is written and the store is untouched. An unrecognized
/// opcode still gets the generic invalid-command response.
async fn handle_connection(
    mut stream: UnixStream,
    store: &ProfileStore,
) -> Result<(), DaemonError> {
    let reply = match read_request(&mut stream).await? {
        Some(request) => dispatch(request, store).await,
        None => ControlReply::Err("invalid command".to_owned()),
    };

    stream
        .write_all(&reply.encode())
        .await
        .map_err(|e| io_err("control socket write", e))?;
    stream
        .shutdown()
        .await
        .map_err(|e| io_err("control socket shutdown", e))?;
    Ok(())
}

/// Decode one request. `Ok(None)` means the opcode was readable but
/// unknown; errors mean the request was malformed or truncated.
async fn read_request(stream: &mut UnixStream) -> Result<Option<ControlRequest>, DaemonError> {
    let mut opcode = [0u8; 2];
    stream
        .read_exact(&mut opcode)
        .await
        .map_err(|e| io_err("control socket read", e))?;

    match opcode {
        OPCODE_STATUS => Ok(Some(ControlRequest::Status)),
        OPCODE_LIST_PROFILES => Ok(Some(ControlRequest::ListProfiles)),
        OPCODE_SET_PROFILE => {
            let len = stream
                .read_u32()
                .await
                .map_err(|e| io_err("control socket read", e))?;
            if len > MAX_PAYLOAD {
                return Err(DaemonError::Protocol(format!(
                    "oversized set-profile payload ({len} bytes)"
                )));
            }
            let mut name = vec![0u8; len as usize];
            stream
                .read_exact(&mut name)
                .await
                .map_err(|e| io_err("control socket read", e))?;
            let name = String::from_utf8(name)
                .map_err(|e| DaemonError::Protocol(format!("profile name is not UTF-8: {e}")))?;
            Ok(Some(ControlRequest::SetProfile(name)))
        }
        OPCODE_SET_TIMER => {
            let seconds = stream
                .read_u32()
                .await
                .map_err(|e| io_err("control socket read", e))?;
            Ok(Some(ControlRequest::SetTimer(seconds)))
        }
        _ => Ok(None),
    }
}

async fn dispatch(request: ControlRequest, store: &ProfileStore) -> ControlReply {
    match request {
        ControlRequest::Status => {
            let (profile, timer) = store.status().await;
            ControlReply::Ok(format!("profile:{profile}\ntimer:{timer}"))
        }
        ControlRequest::ListProfiles => {
            let lines: Vec<String> = store
                .list_profiles()
                .await
                .into_iter()
                .map(|(name, args)| format!("{name}:{}", args.join(",")))
                .collect();
            ControlReply::Ok(lines.join("\n"))
        }
        ControlRequest::SetProfile(name) => {
            match store.set_active_profile(&ProfileName::from(name)).await {
                Ok(()) => ControlReply::Ok("OK".to_owned()),
                Err(err) => ControlReply::Err(err.to_string()),
            }
        }
        ControlRequest::SetTimer(seconds) => {
            store.set_timer(seconds).await;
            ControlReply::Ok("OK".to_owned())
        }
    }
}
