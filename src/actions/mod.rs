pub mod handlers;
pub mod messages;

use crate::github::client::IssueSource;
use crate::query::IssueQueryService;
use serde::{Deserialize, Serialize};

/// Follow-up conversation event. Handlers here never emit any.
pub type Event = serde_json::Value;

/// Actions served to the conversational framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    TopLabels,
    GoodFirstIssues,
    IssuesByLabel,
    WelcomeUser,
    GoodbyeUser,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::TopLabels => "action_get_top_labels",
            ActionKind::GoodFirstIssues => "action_get_good_first_issues",
            ActionKind::IssuesByLabel => "action_get_issues_by_label",
            ActionKind::WelcomeUser => "action_welcome_user",
            ActionKind::GoodbyeUser => "action_goodbye_user",
        }
    }

    /// Get all actions, in registration order
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::TopLabels,
            ActionKind::GoodFirstIssues,
            ActionKind::IssuesByLabel,
            ActionKind::WelcomeUser,
            ActionKind::GoodbyeUser,
        ]
    }

    pub fn from_name(name: &str) -> Option<ActionKind> {
        ActionKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
    }
}

/// One message sent back to the user.
///
/// Serializes as `{"text": ...}` or `{"response": ...}`; a `response` names a
/// template the framework renders itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BotMessage {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "response")]
    Template(String),
}

/// Collects the messages an action utters during one invocation.
#[derive(Debug, Default)]
pub struct CollectingDispatcher {
    messages: Vec<BotMessage>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utter_text(&mut self, text: impl Into<String>) {
        self.messages.push(BotMessage::Text(text.into()));
    }

    pub fn utter_template(&mut self, template: impl Into<String>) {
        self.messages.push(BotMessage::Template(template.into()));
    }

    #[cfg(test)]
    fn messages(&self) -> &[BotMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<BotMessage> {
        self.messages
    }
}

/// Entity extracted by the framework from the user's latest message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

impl Entity {
    /// The value as label text, or `None` when it is null, false, zero or empty.
    pub fn text(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(value) if value.is_empty() => None,
            serde_json::Value::String(value) => Some(value.clone()),
            serde_json::Value::Number(value) if value.as_f64() == Some(0.0) => None,
            serde_json::Value::Array(items) if items.is_empty() => None,
            serde_json::Value::Object(map) if map.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// The slice of conversation state the actions read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub latest_message: LatestMessage,
}

impl Tracker {
    /// Tracker whose latest message carries the given `(entity, value)` pairs.
    pub fn with_entities(entities: &[(&str, &str)]) -> Self {
        Tracker {
            sender_id: None,
            latest_message: LatestMessage {
                text: None,
                entities: entities
                    .iter()
                    .map(|(entity, value)| Entity {
                        entity: entity.to_string(),
                        value: serde_json::Value::String(value.to_string()),
                        role: None,
                        group: None,
                    })
                    .collect(),
            },
        }
    }

    /// Values of `entity` in the latest message, in extraction order.
    ///
    /// Only entities without a role or group count. A value that carries no
    /// usable text (null, false, zero, empty) is yielded as `None` so callers
    /// taking the first value do not fall through to a later one.
    pub fn latest_entity_values<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = Option<String>> + 'a {
        self.latest_message
            .entities
            .iter()
            .filter(move |candidate| {
                candidate.entity == entity && candidate.role.is_none() && candidate.group.is_none()
            })
            .map(Entity::text)
    }
}

/// What one action invocation hands back to the framework.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Event>,
    pub responses: Vec<BotMessage>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ActionError {
    #[error("No registered action found for name '{0}'.")]
    UnknownAction(String),
}

/// Maps action names to handlers sharing one issue query service.
#[derive(Debug)]
pub struct ActionRegistry<S> {
    service: IssueQueryService<S>,
    project_name: String,
}

impl<S: IssueSource> ActionRegistry<S> {
    pub fn new(service: IssueQueryService<S>, project_name: impl Into<String>) -> Self {
        ActionRegistry {
            service,
            project_name: project_name.into(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        ActionKind::all().iter().map(ActionKind::name).collect()
    }

    /// Runs the action registered under `name` against `tracker`.
    pub async fn run(&self, name: &str, tracker: &Tracker) -> Result<ActionResponse, ActionError> {
        let kind =
            ActionKind::from_name(name).ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;
        tracing::info!(action = kind.name(), "running action");

        let mut dispatcher = CollectingDispatcher::new();
        let project = self.project_name.as_str();
        let events = match kind {
            ActionKind::TopLabels => {
                handlers::get_top_labels(&self.service, &mut dispatcher, project).await
            }
            ActionKind::GoodFirstIssues => {
                handlers::get_good_first_issues(&self.service, &mut dispatcher, project).await
            }
            ActionKind::IssuesByLabel => {
                handlers::get_issues_by_label(&self.service, tracker, &mut dispatcher, project)
                    .await
            }
            ActionKind::WelcomeUser => handlers::welcome_user(&mut dispatcher),
            ActionKind::GoodbyeUser => handlers::goodbye_user(&mut dispatcher),
        };

        Ok(ActionResponse {
            events,
            responses: dispatcher.into_messages(),
        })
    }
}
