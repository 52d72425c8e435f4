use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use tracklink_proto::Packet;
use tracklink_wire::read_u32;

use crate::error::Result;

const FRAME_STAGING_CAPACITY: usize = 64;

/// The loopback socket to the companion process.
///
/// One frame is `[id byte][payload]` outbound; inbound frames are
/// identified by a `u32` id (the companion reads and writes ids with its
/// 4-byte integer codec on the way back).
pub struct Link {
    stream: TcpStream,
}

impl Link {
    /// Connect to the companion socket with a connect timeout, then apply
    /// read/write timeouts for everything after.
    pub fn connect(addr: SocketAddr, connect_timeout: Duration, io_timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&addr, connect_timeout)?;
        stream.set_read_timeout(Some(io_timeout))?;
        stream.set_write_timeout(Some(io_timeout))?;
        stream.set_nodelay(true)?;

        debug!(%addr, "connected to companion socket");
        Ok(Self { stream })
    }

    /// Write one packet: id byte plus encoded payload, staged in a single
    /// buffer so the frame hits the socket in one write, then flushed.
    pub fn send_packet(&mut self, id: u8, packet: &dyn Packet) -> Result<()> {
        let mut staging = BytesMut::with_capacity(FRAME_STAGING_CAPACITY).writer();
        staging.write_all(&[id])?;
        packet.write(&mut staging)?;

        let frame = staging.into_inner();
        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        trace!(id, kind = ?packet.kind(), len = frame.len(), "sent packet");
        Ok(())
    }

    /// Read the inbound packet id (`u32`, little-endian).
    pub fn read_packet_id(&mut self) -> Result<u32> {
        Ok(read_u32(&mut self.stream)?)
    }

    /// Decode a packet payload off the stream.
    pub fn receive_into(&mut self, packet: &mut dyn Packet) -> Result<()> {
        packet.read(&mut self.stream)?;
        Ok(())
    }

    /// Close both directions. Errors are ignored; the socket may already
    /// be gone.
    pub fn shutdown(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
        debug!("companion socket shut down");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::net::TcpListener;
    use std::time::Duration;

    use tracklink_proto::{NextPacket, StatePacket};

    use super::*;

    fn local_listener() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[test]
    fn connect_refused_is_a_socket_error() {
        // Bind then drop to get a port with nothing listening.
        let (listener, addr) = local_listener();
        drop(listener);

        let err = Link::connect(addr, Duration::from_millis(500), Duration::from_secs(1))
            .err()
            .expect("connect should fail");
        assert!(matches!(err, crate::BridgeError::Socket(_)));
    }

    #[test]
    fn send_packet_writes_id_byte_then_payload() {
        let (listener, addr) = local_listener();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).unwrap();
            buf
        });

        let mut link =
            Link::connect(addr, Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        link.send_packet(0, &StatePacket::request()).unwrap();
        link.send_packet(2, &NextPacket).unwrap();
        link.shutdown();

        let wire = server.join().unwrap();
        // Both packets have empty payloads: just the two id bytes.
        assert_eq!(wire, [0, 2]);
    }

    #[test]
    fn read_times_out_when_companion_is_silent() {
        let (listener, addr) = local_listener();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // Hold the connection open without writing.
            std::thread::sleep(Duration::from_millis(500));
            drop(stream);
        });

        let mut link =
            Link::connect(addr, Duration::from_secs(1), Duration::from_millis(50)).unwrap();
        let err = link.read_packet_id().unwrap_err();
        assert!(matches!(err, crate::BridgeError::Socket(_)));

        server.join().unwrap();
    }
}
