use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::models::{AnalysisDetail, AnalysisId};

/// Named publish/subscribe topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Every connected subscriber
    Global,
    /// Subscribers that joined the room of one analysis
    Analysis(AnalysisId),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Global => f.write_str("global"),
            Topic::Analysis(id) => write!(f, "analysis:{}", id),
        }
    }
}

/// Event pushed to subscribers, serialized as `{"event": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum Notification {
    NewAnalysis(Box<AnalysisDetail>),
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::NewAnalysis(_) => "new-analysis",
        }
    }
}

/// Port for the real-time notification transport
pub trait Notifier: Send + Sync {
    /// Publish to a topic, returning how many subscribers received it
    fn publish(&self, topic: Topic, notification: Notification) -> Result<usize>;
}
