use crate::actions::messages::{self, GOOD_FIRST_ISSUE_LABEL, TOP_LABELS_COUNT};
use crate::actions::{CollectingDispatcher, Event, Tracker};
use crate::github::client::IssueSource;
use crate::query::{IssueQueryService, QueryResult};

pub const LABEL_ENTITY: &str = "label";
pub const GREET_TEMPLATE: &str = "utter_greet";
pub const GOODBYE_TEMPLATE: &str = "utter_goodbye_user";

/// Reports the most used labels among the open issues.
pub async fn get_top_labels<S: IssueSource>(
    service: &IssueQueryService<S>,
    dispatcher: &mut CollectingDispatcher,
    project: &str,
) -> Vec<Event> {
    let message = match service.fetch_open_issues().await {
        QueryResult::Success(issues) => {
            let ranked = service.top_labels(&issues, TOP_LABELS_COUNT);
            messages::top_labels(&ranked, project)
        }
        QueryResult::Failure(_) => messages::UPSTREAM_FAILURE.to_string(),
    };
    dispatcher.utter_text(message);
    Vec::new()
}

/// Lists the open issues marked as suitable for newcomers.
pub async fn get_good_first_issues<S: IssueSource>(
    service: &IssueQueryService<S>,
    dispatcher: &mut CollectingDispatcher,
    project: &str,
) -> Vec<Event> {
    let message = match service.fetch_open_issues().await {
        QueryResult::Success(issues) => {
            let matching = service.filter_by_label(&issues, GOOD_FIRST_ISSUE_LABEL);
            messages::good_first_issues(&matching, project)
        }
        QueryResult::Failure(_) => messages::UPSTREAM_FAILURE.to_string(),
    };
    dispatcher.utter_text(message);
    Vec::new()
}

/// Lists the open issues carrying the label the user asked for.
///
/// Without a usable `label` entity nothing is fetched.
pub async fn get_issues_by_label<S: IssueSource>(
    service: &IssueQueryService<S>,
    tracker: &Tracker,
    dispatcher: &mut CollectingDispatcher,
    project: &str,
) -> Vec<Event> {
    let Some(label) = tracker.latest_entity_values(LABEL_ENTITY).next().flatten() else {
        tracing::info!("no label entity in latest message");
        dispatcher.utter_text(messages::LABEL_NOT_IDENTIFIED);
        return Vec::new();
    };

    let message = match service.fetch_open_issues().await {
        QueryResult::Success(issues) => {
            let matching = service.filter_by_label(&issues, &label);
            messages::issues_by_label(&matching, &label, project)
        }
        QueryResult::Failure(_) => messages::UPSTREAM_FAILURE.to_string(),
    };
    dispatcher.utter_text(message);
    Vec::new()
}

pub fn welcome_user(dispatcher: &mut CollectingDispatcher) -> Vec<Event> {
    dispatcher.utter_template(GREET_TEMPLATE);
    Vec::new()
}

pub fn goodbye_user(dispatcher: &mut CollectingDispatcher) -> Vec<Event> {
    dispatcher.utter_template(GOODBYE_TEMPLATE);
    Vec::new()
}
