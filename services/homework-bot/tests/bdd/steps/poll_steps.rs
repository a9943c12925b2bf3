//! BDD step definitions for the poll loop

use std::sync::Arc;
use std::time::Duration;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use homework_bot::engine::PollLoop;
use homework_bot::io::HttpResponse;
use homework_bot::practicum::PracticumClient;
use homework_bot::telegram::TelegramNotifier;

use crate::world::BotWorld;

pub const ENDPOINT: &str = "https://homework.test/api/user_api/homework_statuses/";
const FROM_DATE: i64 = 1_700_000_000;

fn script(world: &BotWorld, response: Option<HttpResponse>) {
    world.http.api_responses.lock().unwrap().push_back(response);
}

fn poll_loop(world: &mut BotWorld) -> &mut PollLoop {
    let http = Arc::clone(&world.http);
    world.poll_loop.get_or_insert_with(|| {
        let fetcher = Arc::new(PracticumClient::new(ENDPOINT, "api-token", http.clone()));
        let notifier = Arc::new(TelegramNotifier::new(
            "https://telegram.test",
            "123:abc",
            "42",
            http,
        ));
        PollLoop::new(
            fetcher,
            notifier,
            Duration::from_secs(600),
            FROM_DATE,
            CancellationToken::new(),
        )
    })
}

fn sent_message(world: &BotWorld, index: usize) -> String {
    let messages = world.http.sent_messages.lock().unwrap();
    messages
        .get(index - 1)
        .unwrap_or_else(|| panic!("only {} messages were sent", messages.len()))
        .clone()
}

#[given("the homework API responds with:")]
fn api_responds_with(world: &mut BotWorld, step: &Step) {
    let body = step.docstring.as_ref().expect("docstring required");
    script(
        world,
        Some(HttpResponse {
            status: 200,
            body: body.trim().to_string(),
        }),
    );
}

#[given(expr = "the homework API responds with status {int}")]
fn api_responds_with_status(world: &mut BotWorld, status: u16) {
    script(
        world,
        Some(HttpResponse {
            status,
            body: String::new(),
        }),
    );
}

#[given("the homework API is unreachable")]
fn api_unreachable(world: &mut BotWorld) {
    script(world, None);
}

#[given(expr = "the chat endpoint answers with status {int}")]
fn chat_status(world: &mut BotWorld, status: u16) {
    *world.http.chat_status.lock().unwrap() = Some(status);
}

#[when("the bot polls once")]
async fn polls_once(world: &mut BotWorld) {
    let outcome = poll_loop(world).poll_once().await;
    world.outcomes.push(outcome);
}

#[when(expr = "the bot polls {int} times")]
async fn polls_times(world: &mut BotWorld, times: usize) {
    for _ in 0..times {
        let outcome = poll_loop(world).poll_once().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "the chat should have received {int} message(s)")]
fn chat_received(world: &mut BotWorld, count: usize) {
    let messages = world.http.sent_messages.lock().unwrap();
    assert_eq!(messages.len(), count, "messages: {:?}", *messages);
}

#[then(expr = "message {int} should be:")]
fn message_should_be(world: &mut BotWorld, index: usize, step: &Step) {
    let expected = step.docstring.as_ref().expect("docstring required");
    assert_eq!(sent_message(world, index), expected.trim());
}

#[then(expr = "message {int} should start with {string}")]
fn message_starts_with(world: &mut BotWorld, index: usize, prefix: String) {
    let message = sent_message(world, index);
    assert!(message.starts_with(&prefix), "{}", message);
}

#[then(expr = "message {int} should contain {string}")]
fn message_contains(world: &mut BotWorld, index: usize, fragment: String) {
    let message = sent_message(world, index);
    assert!(message.contains(&fragment), "{}", message);
}

#[then(expr = "the bot should still remember status marker {string}")]
fn remembers_marker(world: &mut BotWorld, marker: String) {
    let state = world.poll_loop.as_ref().expect("bot never polled").state();
    assert_eq!(
        state.last_notified_marker,
        Some(serde_json::Value::String(marker))
    );
}

#[then("every request should ask for updates since the start time")]
fn fixed_from_date(world: &mut BotWorld) {
    let gets = world.http.gets.lock().unwrap();
    assert!(!gets.is_empty());
    for get in gets.iter() {
        assert_eq!(get.url, ENDPOINT);
        assert_eq!(
            get.query,
            vec![("from_date".to_string(), FROM_DATE.to_string())]
        );
    }
}

#[then(expr = "every request should carry the header {string} with value {string}")]
fn request_header(world: &mut BotWorld, name: String, value: String) {
    let gets = world.http.gets.lock().unwrap();
    assert!(!gets.is_empty());
    for get in gets.iter() {
        assert!(get.headers.contains(&(name.clone(), value.clone())));
    }
}
