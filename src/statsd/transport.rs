use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::trace;

use super::config::DEFAULT_MAX_PACKET_SIZE;
use crate::{MetricResult, MetricsError};

/// Delivers serialized lines to the aggregator.
///
/// Implement this trait to redirect metrics elsewhere, or to observe what the
/// client transmits in tests. Errors are logged by the
/// [`Client`](crate::Client) and never reach its callers.
pub trait Transport: Send + Sync {
    /// Sends every line to `host:port`, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns `MetricResult::Err` if the destination cannot be resolved, the
    /// socket cannot be opened, or a write fails. The remaining lines of the
    /// call are not retried.
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        (**self).send(lines, host, port)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        (**self).send(lines, host, port)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        (**self).send(lines, host, port)
    }
}

/// Low-level datagram sink the packet writer flushes into.
pub trait Writer {
    /// Sends one datagram.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn write(&self, buf: &[u8]) -> std::io::Result<usize>;
}

impl<T> Writer for &T
where
    T: Writer,
{
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (*self).write(buf)
    }
}

struct UdpSocketWriter {
    sock: UdpSocket,
    destination_addr: SocketAddr,
}

impl Writer for UdpSocketWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        self.sock.send_to(buf, self.destination_addr)
    }
}

/// Packs newline-separated lines into datagrams of at most
/// `max_packet_size` bytes.
///
/// A line longer than the limit is sent on its own, bypassing the buffer.
pub struct PacketWriter<T> {
    max_packet_size: usize,
    writer: T,
    current_transmit: String,
    written: usize,
}

impl<T: Writer> PacketWriter<T> {
    /// Creates a writer flushing into `writer`.
    pub fn new(writer: T, max_packet_size: usize) -> Self {
        Self {
            max_packet_size,
            writer,
            current_transmit: String::with_capacity(max_packet_size),
            written: 0,
        }
    }

    /// Buffers `line`, flushing the current datagram first if it would not
    /// fit.
    ///
    /// # Errors
    /// Returns the I/O error of a flush triggered by this line.
    pub fn write_line(&mut self, line: &str) -> MetricResult<()> {
        // separator only between lines of the same datagram
        let needed = if self.current_transmit.is_empty() {
            line.len()
        } else {
            line.len() + 1
        };

        if self.current_transmit.len() + needed > self.max_packet_size {
            self.flush_current_transmit()?;
        }

        if line.len() > self.max_packet_size {
            self.written += self.writer.write(line.as_bytes())?;
            return Ok(());
        }

        if !self.current_transmit.is_empty() {
            self.current_transmit.push('\n');
        }
        self.current_transmit.push_str(line);
        Ok(())
    }

    /// Sends any buffered datagram and returns the total bytes written.
    ///
    /// # Errors
    /// Returns the I/O error of the final write.
    pub fn finish(mut self) -> MetricResult<usize> {
        self.flush_current_transmit()?;
        Ok(self.written)
    }

    fn flush_current_transmit(&mut self) -> MetricResult<()> {
        if !self.current_transmit.is_empty() {
            self.written += self.writer.write(self.current_transmit.as_bytes())?;
            // only clear when no error occurs
            self.current_transmit.clear();
        }
        Ok(())
    }
}

/// Fire-and-forget UDP transport.
///
/// Every call resolves the destination, binds a fresh non-blocking socket of
/// the matching address family, writes and then drops the socket.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    max_packet_size: usize,
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UdpTransport {
    /// Creates a transport with [`DEFAULT_MAX_PACKET_SIZE`] datagrams.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_packet_size(DEFAULT_MAX_PACKET_SIZE)
    }

    /// Creates a transport packing lines into datagrams of at most
    /// `max_packet_size` bytes.
    #[must_use]
    pub const fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self { max_packet_size }
    }

    /// Largest datagram this transport builds.
    #[must_use]
    pub const fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }
}

fn resolve(host: &str, port: u16) -> MetricResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| MetricsError::NoAddress(format!("{host}:{port}")))
}

impl Transport for UdpTransport {
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        if lines.is_empty() {
            return Ok(0);
        }

        let destination_addr = resolve(host, port)?;
        let bind_addr: SocketAddr = if destination_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let sock = UdpSocket::bind(bind_addr)?;
        sock.set_nonblocking(true)?;

        let mut writer = PacketWriter::new(
            UdpSocketWriter {
                sock,
                destination_addr,
            },
            self.max_packet_size,
        );
        for line in lines {
            writer.write_line(line)?;
        }
        let written = writer.finish()?;
        trace!("sent {} lines ({written} bytes) to {destination_addr}", lines.len());
        Ok(written)
    }
}
