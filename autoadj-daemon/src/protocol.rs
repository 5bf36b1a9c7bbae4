//! Binary control protocol shared by the daemon and its clients.
//!
//! A request starts with a 2-byte ASCII opcode. `BA` carries a 4-byte
//! big-endian length followed by a UTF-8 profile name; `BB` carries a
//! 4-byte big-endian timer value. Every response is framed as a 4-byte
//! big-endian length followed by exactly that many UTF-8 bytes, no
//! terminator. On the wire a payload starting with `ERR` marks a
//! failure; inside the process that distinction is the typed
//! [`ControlReply`], and the marker only exists at the wire boundary.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use crate::error::{io_err, DaemonError};

pub const OPCODE_STATUS: [u8; 2] = *b"AA";
pub const OPCODE_LIST_PROFILES: [u8; 2] = *b"AB";
pub const OPCODE_SET_PROFILE: [u8; 2] = *b"BA";
pub const OPCODE_SET_TIMER: [u8; 2] = *b"BB";

/// Upper bound on a length-prefixed payload. A longer prefix cannot be
/// a well-formed request or response and is treated as malformed.
pub const MAX_PAYLOAD: u32 = 64 * 1024;

const ERR_MARKER: &str = "ERR - ";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A decoded control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    Status,
    ListProfiles,
    SetProfile(String),
    SetTimer(u32),
}

impl ControlRequest {
    /// Wire encoding: opcode followed by the opcode-specific payload.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ControlRequest::Status => OPCODE_STATUS.to_vec(),
            ControlRequest::ListProfiles => OPCODE_LIST_PROFILES.to_vec(),
            ControlRequest::SetProfile(name) => {
                let mut buf = OPCODE_SET_PROFILE.to_vec();
                buf.extend_from_slice(&(name.len() as u32).to_be_bytes());
                buf.extend_from_slice(name.as_bytes());
                buf
            }
            ControlRequest::SetTimer(seconds) => {
                let mut buf = OPCODE_SET_TIMER.to_vec();
                buf.extend_from_slice(&seconds.to_be_bytes());
                buf
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// A control response before wire framing, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlReply {
    Ok(String),
    Err(String),
}

impl ControlReply {
    /// The framed wire form: 4-byte big-endian length + payload bytes.
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.payload();
        let mut buf = Vec::with_capacity(4 + payload.len());
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload.as_bytes());
        buf
    }

    /// The response payload as it appears on the wire. Failures carry
    /// the `ERR - ` marker existing clients key on.
    pub fn payload(&self) -> String {
        match self {
            ControlReply::Ok(text) => text.clone(),
            ControlReply::Err(message) => format!("{ERR_MARKER}{message}"),
        }
    }

    /// Classify a received payload by its failure marker.
    pub fn from_payload(payload: String) -> Self {
        match payload.strip_prefix(ERR_MARKER) {
            Some(message) => ControlReply::Err(message.to_owned()),
            None => ControlReply::Ok(payload),
        }
    }
}

// ---------------------------------------------------------------------------
// Client half — blocking, one exchange per connection
// ---------------------------------------------------------------------------

/// Send one request over the control socket and decode the response.
pub fn send_request(socket: &Path, request: &ControlRequest) -> Result<ControlReply, DaemonError> {
    if !socket.exists() {
        return Err(DaemonError::DaemonNotRunning {
            socket: socket.to_path_buf(),
        });
    }

    let mut stream = UnixStream::connect(socket).map_err(|err| {
        if matches!(
            err.kind(),
            std::io::ErrorKind::NotFound
                | std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::ConnectionReset
        ) {
            DaemonError::DaemonNotRunning {
                socket: socket.to_path_buf(),
            }
        } else {
            io_err(socket, err)
        }
    })?;

    stream
        .write_all(&request.encode())
        .map_err(|e| io_err(socket, e))?;
    stream.flush().map_err(|e| io_err(socket, e))?;

    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).map_err(|e| io_err(socket, e))?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_PAYLOAD {
        return Err(DaemonError::Protocol(format!(
            "oversized response ({len} bytes)"
        )));
    }

    let mut payload = vec![0u8; len as usize];
    stream
        .read_exact(&mut payload)
        .map_err(|e| io_err(socket, e))?;
    let payload = String::from_utf8(payload)
        .map_err(|e| DaemonError::Protocol(format!("response is not UTF-8: {e}")))?;
    Ok(ControlReply::from_payload(payload))
}

pub fn request_status(socket: &Path) -> Result<ControlReply, DaemonError> {
    send_request(socket, &ControlRequest::Status)
}

pub fn request_profiles(socket: &Path) -> Result<ControlReply, DaemonError> {
    send_request(socket, &ControlRequest::ListProfiles)
}

pub fn request_set_profile(socket: &Path, name: &str) -> Result<ControlReply, DaemonError> {
    send_request(socket, &ControlRequest::SetProfile(name.to_owned()))
}

pub fn request_set_timer(socket: &Path, seconds: u32) -> Result<ControlReply, DaemonError> {
    send_request(socket, &ControlRequest::SetTimer(seconds))
}
