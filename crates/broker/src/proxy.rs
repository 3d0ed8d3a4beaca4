//! Kafka REST proxy collaborator.
//!
//! The service reads and writes Kafka through an HTTP proxy rather than a
//! native client. Outbound records carry a small JSON value envelope
//! (`{"headers": ..., "body": ...}`) so broker headers survive the proxy
//! hop; inbound records are unwrapped from the same shape.

use crate::{
    ConnectivityCheck, ConsumerError, Message, MessageConsumer, MessageProducer, ProducerError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// Content type for JSON-embedded records.
const KAFKA_JSON_V2: &str = "application/vnd.kafka.json.v2+json";
/// Content type for proxy control requests.
const KAFKA_V2: &str = "application/vnd.kafka.v2+json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the queue proxy.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Base address of the proxy, e.g. "http://localhost:8082"
    pub address: String,
    /// Consumer group used to read messages
    pub group: String,
    /// Topic to read native records from
    pub read_topic: String,
    /// Topic to write publication events to
    pub write_topic: String,
    /// Optional Authorization header value for the proxy
    pub authorization: Option<String>,
}

fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build()
}

/// Value envelope put on the wire for each record.
#[derive(Debug, Serialize, Deserialize)]
struct RecordValue {
    headers: HashMap<String, String>,
    body: String,
}

fn producer_error(error: ureq::Error) -> ProducerError {
    match error {
        ureq::Error::Status(status, _) => ProducerError::Status { status },
        ureq::Error::Transport(transport) => ProducerError::Transport(transport.to_string()),
    }
}

fn consumer_error(error: ureq::Error) -> ConsumerError {
    match error {
        ureq::Error::Status(status, _) => ConsumerError::Status { status },
        ureq::Error::Transport(transport) => ConsumerError::Transport(transport.to_string()),
    }
}

/// Producer posting records to the outbound topic through the proxy.
pub struct ProxyProducer {
    config: ProxyConfig,
    agent: ureq::Agent,
}

impl ProxyProducer {
    /// Create a producer for the configured write topic.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config,
            agent: build_agent(),
        }
    }
}

impl MessageProducer for ProxyProducer {
    fn send(&self, key: &str, message: Message) -> Result<(), ProducerError> {
        let url = format!("{}/topics/{}", self.config.address, self.config.write_topic);
        let records = json!({
            "records": [{
                "key": key,
                "value": RecordValue {
                    headers: message.headers,
                    body: message.body,
                },
            }]
        });

        let mut request = self.agent.post(&url).set("Content-Type", KAFKA_JSON_V2);
        if let Some(authorization) = &self.config.authorization {
            request = request.set("Authorization", authorization);
        }
        request.send_json(records).map_err(producer_error)?;
        Ok(())
    }
}

/// Instance registration response from the proxy.
#[derive(Debug, Deserialize)]
struct InstanceInfo {
    base_uri: String,
}

/// One record as returned by the proxy's poll endpoint.
#[derive(Debug, Deserialize)]
struct InboundRecord {
    value: serde_json::Value,
}

/// Consumer polling the inbound topic through the proxy.
///
/// Registers a consumer instance lazily on first poll and recreates it after
/// a failed poll; the instance is deregistered on [`ProxyConsumer::close`]
/// or drop.
pub struct ProxyConsumer {
    config: ProxyConfig,
    agent: ureq::Agent,
    instance: Option<String>,
}

impl ProxyConsumer {
    /// Create a consumer for the configured read topic.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config,
            agent: build_agent(),
            instance: None,
        }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = self.agent.request(method, url);
        if let Some(authorization) = &self.config.authorization {
            request = request.set("Authorization", authorization);
        }
        request
    }

    /// Register an instance and subscribe it to the read topic, if not done.
    fn ensure_instance(&mut self) -> Result<String, ConsumerError> {
        if let Some(base_uri) = &self.instance {
            return Ok(base_uri.clone());
        }

        let url = format!("{}/consumers/{}", self.config.address, self.config.group);
        let response = self
            .request("POST", &url)
            .set("Content-Type", KAFKA_V2)
            .send_json(json!({"format": "json", "auto.offset.reset": "latest"}))
            .map_err(consumer_error)?;
        let info: InstanceInfo = response
            .into_json()
            .map_err(|e| ConsumerError::Decode(e.to_string()))?;

        let subscription = format!("{}/subscription", info.base_uri);
        self.request("POST", &subscription)
            .set("Content-Type", KAFKA_V2)
            .send_json(json!({"topics": [self.config.read_topic]}))
            .map_err(consumer_error)?;

        tracing::info!(base_uri = %info.base_uri, "registered consumer instance");
        self.instance = Some(info.base_uri.clone());
        Ok(info.base_uri)
    }

    /// Deregister the consumer instance, if one is registered.
    pub fn close(&mut self) {
        if let Some(base_uri) = self.instance.take() {
            if let Err(error) = self
                .request("DELETE", &base_uri)
                .set("Content-Type", KAFKA_V2)
                .call()
            {
                tracing::warn!(%error, "failed to deregister consumer instance");
            }
        }
    }
}

impl MessageConsumer for ProxyConsumer {
    fn poll(&mut self) -> Result<Vec<Message>, ConsumerError> {
        let base_uri = self.ensure_instance()?;
        let url = format!("{}/records", base_uri);

        let response = match self.request("GET", &url).set("Accept", KAFKA_JSON_V2).call() {
            Ok(response) => response,
            Err(error) => {
                // A failed instance is abandoned; the next poll registers a
                // fresh one.
                self.instance = None;
                return Err(consumer_error(error));
            }
        };

        let records: Vec<InboundRecord> = response
            .into_json()
            .map_err(|e| ConsumerError::Decode(e.to_string()))?;

        let mut messages = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<RecordValue>(record.value) {
                Ok(value) => messages.push(Message {
                    headers: value.headers,
                    body: value.body,
                }),
                Err(error) => {
                    tracing::warn!(%error, "skipping record with unexpected value shape");
                }
            }
        }
        Ok(messages)
    }
}

impl Drop for ProxyConsumer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Reachability probe against the proxy's topic listing, backing the health
/// endpoints.
pub struct ProxyHealth {
    address: String,
    authorization: Option<String>,
    agent: ureq::Agent,
}

impl ProxyHealth {
    /// Create a probe for the configured proxy address.
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            address: config.address.clone(),
            authorization: config.authorization.clone(),
            agent: build_agent(),
        }
    }
}

impl ConnectivityCheck for ProxyHealth {
    fn name(&self) -> &str {
        "message queue proxy reachable"
    }

    fn check(&self) -> Result<(), String> {
        let url = format!("{}/topics", self.address);
        let mut request = self.agent.get(&url);
        if let Some(authorization) = &self.authorization {
            request = request.set("Authorization", authorization);
        }
        match request.call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => {
                Err(format!("queue proxy returned status {}", status))
            }
            Err(ureq::Error::Transport(transport)) => Err(transport.to_string()),
        }
    }
}
