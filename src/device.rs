// src/device.rs

use crate::error::LinkError;
use escooter_display_lib::transport::{ByteSource, FrameSink, ReceiveCallback};
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::convert::Infallible;
use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

// Read timeout of the receive thread; bounds how long a read blocks between checks
const READ_TIMEOUT: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 64;

/// One serial port, 8N1 at a fixed baud rate.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        info!("Opening {} at {} baud...", path, baud_rate);
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| LinkError::Open {
                port: path.to_string(),
                source,
            })?;
        info!("Port {} open.", path);
        Ok(Self {
            port,
            name: path.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A second handle on the same port, e.g. to relay into while frames are mirrored.
    pub fn try_clone(&self) -> Result<Self, LinkError> {
        Ok(Self {
            port: self.port.try_clone()?,
            name: self.name.clone(),
        })
    }
}

impl FrameSink for SerialLink {
    type Error = LinkError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let io_err = |source| LinkError::Io {
            port: self.name.clone(),
            source,
        };
        self.port.write_all(bytes).map_err(io_err)?;
        self.port.flush().map_err(io_err)
    }
}

impl ByteSource for SerialLink {
    type Error = LinkError;

    /// Spawns a thread reading a cloned handle until the port fails.
    fn on_receive(&mut self, mut callback: ReceiveCallback) -> Result<(), Self::Error> {
        let mut port = self.port.try_clone()?;
        let name = self.name.clone();
        thread::Builder::new()
            .name(format!("rx-{}", name))
            .spawn(move || {
                let mut buf = [0u8; READ_CHUNK];
                loop {
                    match port.read(&mut buf) {
                        Ok(0) => continue,
                        Ok(n) => callback(&buf[..n]),
                        Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!("Receive on {} stopped: {}", name, e);
                            break;
                        }
                    }
                }
            })
            .map_err(|source| LinkError::Io {
                port: self.name.clone(),
                source,
            })?;
        debug!("Receive thread started for {}", self.name);
        Ok(())
    }
}

/// Sink that only logs frames, for running without hardware.
#[derive(Debug, Default)]
pub struct LogSink;

impl FrameSink for LogSink {
    type Error = Infallible;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        info!(bytes = hex::encode(bytes), "Dry run write");
        Ok(())
    }
}

/// Log the serial ports the OS reports.
pub fn list_ports() -> Result<usize, LinkError> {
    let ports = serialport::available_ports()?;
    for (i, port) in ports.iter().enumerate() {
        info!("Port #{}: {} ({:?})", i + 1, port.port_name, port.port_type);
    }
    if ports.is_empty() {
        info!("No serial ports found.");
    }
    Ok(ports.len())
}
