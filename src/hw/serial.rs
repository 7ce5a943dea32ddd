use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, trace};

use super::transport::{Transport, TransportError};
use crate::utils::format_hex;

/// Default controller line speed.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Serial line settings. Controllers run 8N1 without flow control.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    pub flow_control: tokio_serial::FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            flow_control: tokio_serial::FlowControl::None,
        }
    }
}

/// Transport over an RS-232/RS-485 serial port.
#[derive(Debug)]
pub struct SerialTransport {
    port: SerialStream,
    port_name: String,
}

impl SerialTransport {
    /// Opens `port` at `baud_rate` with 8N1 framing.
    ///
    /// # Errors
    ///
    /// Returns an error when the port cannot be opened.
    pub fn open(port: &str, baud_rate: u32) -> Result<Self, TransportError> {
        Self::open_with_config(
            port,
            SerialConfig {
                baud_rate,
                ..SerialConfig::default()
            },
        )
    }

    /// Opens `port` with explicit line settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the port cannot be opened.
    pub fn open_with_config(port: &str, config: SerialConfig) -> Result<Self, TransportError> {
        debug!(port, ?config, "opening serial port");
        let stream = tokio_serial::new(port, config.baud_rate)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .parity(config.parity)
            .flow_control(config.flow_control)
            .open_native_async()
            .map_err(|source| TransportError::Open {
                port: port.to_owned(),
                source,
            })?;
        info!(port, baud_rate = config.baud_rate, "serial port opened");

        Ok(Self {
            port: stream,
            port_name: port.to_owned(),
        })
    }

    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        trace!(port = %self.port_name, frame = %format_hex(frame), "writing frame");
        self.port.write_all(frame).await?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        self.port.flush().await?;
        Ok(())
    }
}
