//! MQTT stream adapter.
//!
//! Owns the broker connection and hands every publish to the ingestion
//! pipeline. Reconnection is rumqttc's: polling the event loop again after an
//! error re-establishes the connection, and each ConnAck triggers a fresh
//! subscription.

use crate::config::BrokerConfig;
use carstate_ingest::IngestionPipeline;
use rumqttc::{
    AsyncClient, ClientError, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet,
    QoS,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_CAPACITY: usize = 64;

/// Errors from the broker connection.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Could not establish the initial connection.
    #[error("connection to {broker} failed: {source}")]
    Connect {
        broker: String,
        #[source]
        source: ConnectionError,
    },

    /// Could not queue the subscription request.
    #[error("subscribe to {topic} failed: {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: ClientError,
    },

    /// Could not queue the disconnect request.
    #[error("disconnect from {broker} failed: {source}")]
    Disconnect {
        broker: String,
        #[source]
        source: ClientError,
    },
}

/// Subscribes to the telemetry topics and feeds the pipeline.
pub struct StreamSubscriber {
    client: AsyncClient,
    eventloop: EventLoop,
    pipeline: Arc<IngestionPipeline>,
    broker: String,
    topic: String,
}

impl StreamSubscriber {
    pub fn new(broker: &BrokerConfig, pipeline: Arc<IngestionPipeline>) -> Self {
        let mut options = MqttOptions::new(&broker.client_id, &broker.host, broker.port);
        options.set_keep_alive(KEEP_ALIVE);
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        Self {
            client,
            eventloop,
            topic: pipeline.subscription(),
            pipeline,
            broker: format!("{}:{}", broker.host, broker.port),
        }
    }

    /// Waits for the first ConnAck and subscribes. Any failure here is
    /// fatal for the process.
    pub async fn connect(&mut self) -> Result<(), StreamError> {
        info!("Connecting to {}...", self.broker);
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => return self.subscribe(),
                Ok(event) => debug!("MQTT event before ConnAck: {:?}", event),
                Err(source) => {
                    return Err(StreamError::Connect {
                        broker: self.broker.clone(),
                        source,
                    });
                }
            }
        }
    }

    /// Processes messages until `shutdown` resolves, then disconnects from
    /// the broker. Connection loss is logged and retried; the store keeps
    /// serving its last values meanwhile.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<(), StreamError> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                event = self.eventloop.poll() => self.dispatch(event).await,
            }
        }
        self.disconnect().await
    }

    async fn dispatch(&mut self, event: Result<Event, ConnectionError>) {
        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                self.pipeline
                    .handle_message(&publish.topic, &publish.payload)
                    .await;
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Reconnected to {}", self.broker);
                if let Err(e) = self.subscribe() {
                    error!("{}", e);
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!(service = "mqtt", "Connection lost: {}", e);
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }

    // The event loop owns the request channel, so it has to keep running
    // until the DISCONNECT packet has been flushed.
    async fn disconnect(mut self) -> Result<(), StreamError> {
        info!("Disconnecting from {}...", self.broker);
        self.client
            .try_disconnect()
            .map_err(|source| StreamError::Disconnect {
                broker: self.broker.clone(),
                source,
            })?;

        let drain = async {
            loop {
                match self.eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                        info!("Disconnected from {}", self.broker);
                        return;
                    }
                    Ok(event) => debug!("MQTT event during shutdown: {:?}", event),
                    Err(e) => {
                        debug!("Connection closed during shutdown: {}", e);
                        return;
                    }
                }
            }
        };
        if tokio::time::timeout(DISCONNECT_TIMEOUT, drain).await.is_err() {
            warn!("Timed out disconnecting from {}", self.broker);
        }
        Ok(())
    }

    fn subscribe(&self) -> Result<(), StreamError> {
        info!("Subscribing to {}...", self.topic);
        self.client
            .try_subscribe(self.topic.as_str(), QoS::AtLeastOnce)
            .map_err(|source| StreamError::Subscribe {
                topic: self.topic.clone(),
                source,
            })
    }
}
