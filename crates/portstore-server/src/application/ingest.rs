//! Port Ingestion (Use Case)
//!
//! Streams a JSON object of the form `{"<port id>": {<attributes>}, ...}`
//! into the store without buffering the whole document.
//!
//! Decoding runs on a blocking thread driving a `serde_json` map visitor.
//! Each decoded entry is handed to the async side as a rendezvous: the
//! decoder waits until the consumer has taken the entry before it reads the
//! next one. At most one record sits between parse and store, records land
//! in input order, and the decoder never runs ahead of the store. The first
//! failure of any kind ends the call; entries stored before it stay stored.

use std::fmt;
use std::io::{self, BufReader, Read};
use std::sync::Arc;

use axum::body::Bytes;
use futures::{Stream, TryStreamExt};
use serde::de::{self, Deserializer as _, MapAccess, Visitor};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::io::{StreamReader, SyncIoBridge};
use tracing::{debug, info, warn};

use portstore::{CancellationToken, DomainError, Port, PortFields, PortRepository};

use super::PortService;
use crate::models::PortPayload;

/// Slot for the entry being handed over; the decoder still waits for the
/// consumer to take it
const HANDOFF_CAPACITY: usize = 1;

/// Decoded entry plus the acknowledgement the consumer sends on taking it
type Handoff = (PortFields, oneshot::Sender<()>);

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed JSON or a document that is not an object of objects
    #[error("Malformed port stream: {0}")]
    Format(#[source] serde_json::Error),

    /// A decoded entry failed Port validation
    #[error("Invalid port: {0}")]
    Validation(String),

    /// The store rejected a write
    #[error("Failed to store port: {0}")]
    Repository(#[source] DomainError),

    #[error("Ingestion cancelled")]
    Cancelled,

    /// The decoder thread panicked
    #[error("Port decoder failed: {0}")]
    Decoder(String),
}

impl From<DomainError> for IngestError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Cancelled => Self::Cancelled,
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::Repository(other),
        }
    }
}

/// Streaming bulk loader that feeds a [`PortService`]
pub struct PortIngestor<R: PortRepository> {
    service: Arc<PortService<R>>,
}

impl<R: PortRepository> PortIngestor<R> {
    pub fn new(service: Arc<PortService<R>>) -> Self {
        Self { service }
    }

    /// Ingest from a stream of byte chunks, such as an HTTP request body
    pub async fn ingest_stream<S, E>(
        &self,
        stream: S,
        cancel: &CancellationToken,
    ) -> Result<usize, IngestError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        let stream = Box::pin(stream.map_err(io::Error::other));
        let reader = SyncIoBridge::new(StreamReader::new(stream));
        self.ingest(reader, cancel).await
    }

    /// Ingest from a blocking reader
    ///
    /// Returns the number of ports stored by this call.
    pub async fn ingest<Rd>(
        &self,
        reader: Rd,
        cancel: &CancellationToken,
    ) -> Result<usize, IngestError>
    where
        Rd: Read + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Handoff>(HANDOFF_CAPACITY);
        let decoder_cancel = cancel.clone();
        let decoder =
            tokio::task::spawn_blocking(move || decode_ports(reader, tx, &decoder_cancel));

        let mut accepted = 0usize;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(accepted, "Port ingestion cancelled");
                    return Err(IngestError::Cancelled);
                }
                next = rx.recv() => next,
            };

            // Channel closes once the decoder is done, successfully or not
            let Some((fields, taken)) = next else { break };
            // Release the decoder; it may now read the next entry
            let _ = taken.send(());

            let port = Port::from_fields(fields)?;
            let id = port.id().to_string();
            self.service.upsert(cancel, Some(port)).await?;
            accepted += 1;
            debug!(accepted, port_id = %id, "Received port");
        }

        match decoder.await {
            Ok(Ok(decoded)) => {
                info!(decoded, accepted, "Finished reading ports");
                Ok(accepted)
            }
            Ok(Err(err)) => {
                warn!(accepted, error = %err, "Port ingestion stopped");
                Err(err)
            }
            Err(err) => Err(IngestError::Decoder(err.to_string())),
        }
    }
}

fn decode_ports<Rd: Read>(
    reader: Rd,
    tx: mpsc::Sender<Handoff>,
    cancel: &CancellationToken,
) -> Result<usize, IngestError> {
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader));
    let visitor = PortMapVisitor { tx: &tx, cancel };

    (&mut deserializer)
        .deserialize_map(visitor)
        .and_then(|decoded| deserializer.end().map(|()| decoded))
        .map_err(|err| {
            if cancel.is_cancelled() {
                IngestError::Cancelled
            } else {
                IngestError::Format(err)
            }
        })
}

/// Walks the top-level object, handing each entry to the consumer
struct PortMapVisitor<'a> {
    tx: &'a mpsc::Sender<Handoff>,
    cancel: &'a CancellationToken,
}

impl<'de> Visitor<'de> for PortMapVisitor<'_> {
    type Value = usize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of port attributes keyed by port id")
    }

    fn visit_map<A>(self, mut map: A) -> Result<usize, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut decoded = 0usize;
        loop {
            if self.cancel.is_cancelled() {
                return Err(de::Error::custom("ingestion cancelled"));
            }

            let Some(id) = map.next_key::<String>()? else {
                break;
            };
            let payload: PortPayload = map.next_value()?;

            let (taken_tx, taken_rx) = oneshot::channel();
            self.tx
                .blocking_send((payload.into_fields_with_id(id), taken_tx))
                .map_err(|_| de::Error::custom("port consumer stopped"))?;
            // Blocks until the consumer has taken this entry
            taken_rx
                .blocking_recv()
                .map_err(|_| de::Error::custom("port consumer stopped"))?;
            decoded += 1;
        }
        Ok(decoded)
    }
}
