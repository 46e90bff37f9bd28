use super::*;
use crate::schemas::MessageSummary;
use async_trait::async_trait;
use std::sync::Mutex;

fn message(id: &str, text: &str) -> MessageSummary {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "date": "2023-06-01T10:00:00",
        "text": text,
        "from_id": "user1",
        "from_name": "Alice"
    }))
    .unwrap()
}

fn page_with(id: &str) -> ResultPage {
    ResultPage {
        messages: vec![message(id, "hello")],
        total: 1,
    }
}

#[test]
fn test_starts_idle_without_criteria() {
    let (controller, ticket) = SearchController::with_query(QueryState::new());
    assert_eq!(*controller.status(), SearchStatus::Idle);
    assert!(ticket.is_none());
    assert!(controller.share_params().is_empty());
}

#[test]
fn test_mounting_with_criteria_starts_loading() {
    let (controller, ticket) = SearchController::with_query(QueryState::new().with_text("foo"));
    assert_eq!(*controller.status(), SearchStatus::Loading);
    let ticket = ticket.unwrap();
    assert_eq!(ticket.query().text.as_deref(), Some("foo"));
    assert_eq!(ticket.params().search_text.as_deref(), Some("foo"));
}

#[test]
fn test_query_change_moves_to_loading_and_republishes() {
    let mut controller = SearchController::new();
    let next = controller.query().clone().with_text("deploy");
    let ticket = controller.set_query(next);

    assert!(ticket.is_some());
    assert_eq!(*controller.status(), SearchStatus::Loading);
    // The shareable representation follows the query immediately, before
    // the fetch resolves.
    assert_eq!(
        controller.share_params(),
        vec![("q".to_string(), "deploy".to_string())]
    );
}

#[test]
fn test_identical_query_is_not_a_change() {
    let (mut controller, first) =
        SearchController::with_query(QueryState::new().with_text("foo"));
    controller.complete(&first.unwrap(), Ok(page_with("1")));

    let same = controller.query().clone();
    assert!(controller.set_query(same).is_none());
    assert!(matches!(controller.status(), SearchStatus::Ready(_)));
}

#[test]
fn test_clearing_criteria_returns_to_idle() {
    let (mut controller, _) = SearchController::with_query(QueryState::new().with_text("foo"));
    let ticket = controller.set_query(QueryState::new());
    assert!(ticket.is_none());
    assert_eq!(*controller.status(), SearchStatus::Idle);
    assert!(controller.share_params().is_empty());
}

#[test]
fn test_last_request_wins_in_order() {
    let (mut controller, ticket_a) =
        SearchController::with_query(QueryState::new().with_text("first"));
    let ticket_a = ticket_a.unwrap();
    let ticket_b = controller
        .set_query(controller.query().clone().with_text("second"))
        .unwrap();

    controller.complete(&ticket_a, Ok(page_with("stale")));
    assert_eq!(*controller.status(), SearchStatus::Loading);

    controller.complete(&ticket_b, Ok(page_with("fresh")));
    match controller.status() {
        SearchStatus::Ready(page) => assert_eq!(page.messages[0].id, "fresh"),
        other => panic!("expected Ready, got {other:?}"),
    }
}

#[test]
fn test_last_request_wins_out_of_order() {
    // B resolves before A; A's late arrival must not overwrite it.
    let (mut controller, ticket_a) =
        SearchController::with_query(QueryState::new().with_text("first"));
    let ticket_a = ticket_a.unwrap();
    let ticket_b = controller
        .set_query(controller.query().clone().with_text("second"))
        .unwrap();

    controller.complete(&ticket_b, Ok(page_with("fresh")));
    controller.complete(&ticket_a, Ok(page_with("stale")));

    match controller.status() {
        SearchStatus::Ready(page) => assert_eq!(page.messages[0].id, "fresh"),
        other => panic!("expected Ready, got {other:?}"),
    }
}

#[test]
fn test_failure_replaces_prior_results() {
    let (mut controller, ticket) =
        SearchController::with_query(QueryState::new().with_text("foo"));
    let ticket = ticket.unwrap();
    controller.complete(&ticket, Ok(page_with("1")));

    let ticket = controller.retry();
    assert!(ticket.is_none(), "retry is only valid from Failed");

    let ticket = controller
        .set_query(controller.query().clone().with_page(2))
        .unwrap();
    controller.complete(&ticket, Err(SearchError::Timeout));

    // The error is shown, not stale data.
    assert_eq!(
        *controller.status(),
        SearchStatus::Failed("search failed, retry".to_string())
    );
}

#[test]
fn test_stale_failure_is_discarded() {
    let (mut controller, ticket_a) =
        SearchController::with_query(QueryState::new().with_text("first"));
    let ticket_a = ticket_a.unwrap();
    let ticket_b = controller
        .set_query(controller.query().clone().with_text("second"))
        .unwrap();

    controller.complete(&ticket_b, Ok(page_with("fresh")));
    controller.complete(&ticket_a, Err(SearchError::Status { code: 500 }));

    assert!(matches!(controller.status(), SearchStatus::Ready(_)));
}

#[test]
fn test_retry_reuses_current_query() {
    let (mut controller, ticket) =
        SearchController::with_query(QueryState::new().with_text("foo").with_page(3));
    controller.complete(&ticket.unwrap(), Err(SearchError::Timeout));

    let retry = controller.retry().unwrap();
    assert_eq!(retry.query(), controller.query());
    assert_eq!(retry.query().page, 3);
    assert_eq!(*controller.status(), SearchStatus::Loading);
}

#[test]
fn test_share_params_encode_the_full_query() {
    let (controller, _) = SearchController::with_query(
        QueryState::new().with_text("foo").with_has_media(true).with_page(2),
    );
    let share = controller.share_params();
    assert!(share.contains(&("q".to_string(), "foo".to_string())));
    assert!(share.contains(&("has_media".to_string(), "true".to_string())));
    assert!(share.contains(&("page".to_string(), "2".to_string())));
}

struct StubClient {
    outcomes: Mutex<Vec<Result<ResultPage, SearchError>>>,
}

impl StubClient {
    fn new(outcomes: Vec<Result<ResultPage, SearchError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
        }
    }
}

#[async_trait]
impl RemoteSearchClient for StubClient {
    async fn search(&self, _params: &SearchParams) -> Result<ResultPage, SearchError> {
        self.outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(SearchError::Timeout))
    }
}

#[tokio::test]
async fn test_run_applies_successful_fetch() {
    let client = StubClient::new(vec![Ok(page_with("1"))]);
    let (mut controller, ticket) =
        SearchController::with_query(QueryState::new().with_text("foo"));

    controller.run(&client, ticket.unwrap()).await;
    match controller.status() {
        SearchStatus::Ready(page) => assert_eq!(page.total, 1),
        other => panic!("expected Ready, got {other:?}"),
    }
}

#[tokio::test]
async fn test_run_surfaces_failure() {
    let client = StubClient::new(vec![Err(SearchError::Status { code: 503 })]);
    let (mut controller, ticket) =
        SearchController::with_query(QueryState::new().with_text("foo"));

    controller.run(&client, ticket.unwrap()).await;
    assert!(matches!(controller.status(), SearchStatus::Failed(_)));
}

#[tokio::test]
async fn test_run_drops_result_for_superseded_query() {
    let client = StubClient::new(vec![Ok(page_with("stale"))]);
    let (mut controller, ticket_a) =
        SearchController::with_query(QueryState::new().with_text("first"));
    let ticket_a = ticket_a.unwrap();

    // Query moves on while A is still in flight.
    controller
        .set_query(controller.query().clone().with_text("second"))
        .unwrap();

    controller.run(&client, ticket_a).await;
    assert_eq!(*controller.status(), SearchStatus::Loading);
}
