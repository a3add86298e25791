//! Length-prefixed framing over a byte stream.
//!
//! # Frame layout
//!
//! ```text
//! +----------------+----------------------+
//! | len: u32 (BE)  | payload: len bytes   |
//! +----------------+----------------------+
//! ```
//!
//! The [`Transport`] trait is the seam the exchange channel talks to.
//! [`FramedStream`] implements it for any `Read + Write` stream;
//! [`FramedListener`] binds a TCP endpoint and accepts the optimizer.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use crate::{ProtocolError, ProtocolResult};

// ── Transport ─────────────────────────────────────────────────────────────────

/// A bidirectional, message-oriented byte channel.
pub trait Transport: Send {
    /// Send one complete frame.
    fn send(&mut self, frame: &[u8]) -> ProtocolResult<()>;

    /// Block until one complete frame arrives.
    fn recv(&mut self) -> ProtocolResult<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, frame: &[u8]) -> ProtocolResult<()> {
        (**self).send(frame)
    }

    fn recv(&mut self) -> ProtocolResult<Vec<u8>> {
        (**self).recv()
    }
}

// ── FramedStream ──────────────────────────────────────────────────────────────

/// [`Transport`] over a byte stream using a 4-byte big-endian length prefix.
pub struct FramedStream<S> {
    stream:          S,
    max_frame_bytes: usize,
}

impl<S: Read + Write> FramedStream<S> {
    pub fn new(stream: S, max_frame_bytes: usize) -> Self {
        Self { stream, max_frame_bytes }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write + Send> Transport for FramedStream<S> {
    fn send(&mut self, frame: &[u8]) -> ProtocolResult<()> {
        let len = u32::try_from(frame.len())
            .ok()
            .filter(|&l| l as usize <= self.max_frame_bytes)
            .ok_or(ProtocolError::FrameTooLarge { len: frame.len(), max: self.max_frame_bytes })?;
        self.stream.write_all(&len.to_be_bytes())?;
        self.stream.write_all(frame)?;
        self.stream.flush()?;
        Ok(())
    }

    fn recv(&mut self) -> ProtocolResult<Vec<u8>> {
        let mut header = [0_u8; 4];
        self.stream.read_exact(&mut header).map_err(closed_on_eof)?;
        let len = u32::from_be_bytes(header) as usize;
        if len > self.max_frame_bytes {
            return Err(ProtocolError::FrameTooLarge { len, max: self.max_frame_bytes });
        }

        let mut payload = vec![0_u8; len];
        self.stream.read_exact(&mut payload).map_err(closed_on_eof)?;
        Ok(payload)
    }
}

fn closed_on_eof(err: io::Error) -> ProtocolError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ProtocolError::ConnectionClosed
    } else {
        ProtocolError::Io(err)
    }
}

// ── TCP ───────────────────────────────────────────────────────────────────────

/// A bound TCP endpoint waiting for the optimizer to connect.
pub struct FramedListener {
    listener:        TcpListener,
    max_frame_bytes: usize,
}

impl FramedListener {
    pub fn bind<A: ToSocketAddrs>(addr: A, max_frame_bytes: usize) -> ProtocolResult<Self> {
        let listener = TcpListener::bind(addr)?;
        log::info!("listening for the optimizer on {}", listener.local_addr()?);
        Ok(Self { listener, max_frame_bytes })
    }

    /// Actual bound address; useful after binding port 0.
    pub fn local_addr(&self) -> ProtocolResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Block until one peer connects.  The listener is closed afterwards;
    /// the protocol serves exactly one optimizer per run.
    pub fn accept(self) -> ProtocolResult<FramedStream<TcpStream>> {
        let (stream, peer) = self.listener.accept()?;
        stream.set_nodelay(true)?;
        log::info!("optimizer connected from {peer}");
        Ok(FramedStream::new(stream, self.max_frame_bytes))
    }
}

/// Connect to a bridge endpoint.  Used by optimizer-side peers and tests.
pub fn connect<A: ToSocketAddrs>(addr: A, max_frame_bytes: usize) -> ProtocolResult<FramedStream<TcpStream>> {
    let stream = TcpStream::connect(addr)?;
    stream.set_nodelay(true)?;
    Ok(FramedStream::new(stream, max_frame_bytes))
}
