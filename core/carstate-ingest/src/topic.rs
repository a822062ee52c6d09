//! Stream topic parsing.

use crate::{IngestError, IngestResult};
use carstate_types::EntityId;

/// Prefix under which TeslaMate publishes per-car fields.
pub const DEFAULT_TOPIC_PREFIX: &str = "teslamate/cars/";

/// Entity and field named by one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTopic<'a> {
    pub entity: EntityId,
    pub field: &'a str,
}

/// Splits topics of the form `<prefix><entity>/<field>[/...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicParser {
    prefix: String,
}

impl TopicParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Wildcard filter covering every topic under the prefix.
    pub fn subscription(&self) -> String {
        format!("{}#", self.prefix)
    }

    /// Parses a topic. Segments after the field name are ignored.
    pub fn parse<'a>(&self, topic: &'a str) -> IngestResult<ParsedTopic<'a>> {
        let malformed = |reason| IngestError::MalformedTopic {
            topic: topic.to_string(),
            reason,
        };

        let rest = topic
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| malformed("missing prefix"))?;

        let mut segments = rest.split('/');
        let entity = segments.next().unwrap_or_default();
        let field = segments
            .next()
            .ok_or_else(|| malformed("missing field segment"))?;

        let entity = EntityId::parse(entity).map_err(|_| malformed("empty entity segment"))?;
        if field.is_empty() {
            return Err(malformed("empty field segment"));
        }

        Ok(ParsedTopic { entity, field })
    }
}

impl Default for TopicParser {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_PREFIX)
    }
}
