//! Event-to-action bindings for an interactive session.
//!
//! Typed commands and connectivity transitions arrive as [`AppEvent`]s on one
//! channel; [`dispatch`] maps each to `refresh()` or `report()`.

use std::io::BufRead;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::connectivity::Connectivity;
use crate::controller::FetchCycle;
use crate::render::View;
use crate::status::StatusReporter;
use crate::transport::HeadlineTransport;

/// How often [`wait_idle`] checks whether the in-flight cycle has finished.
const IDLE_POLL: Duration = Duration::from_millis(50);

pub const HELP: &str = "Commands:\n  r, refresh   fetch the latest headlines\n  h, help      show this help\n  q, quit      exit\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Refresh,
    Connectivity(Connectivity),
    Help,
    Quit,
    /// The input stream ended without an explicit quit.
    InputClosed,
    Unknown(String),
}

/// What the session loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
    /// Let the in-flight cycle finish, then exit.
    Drain,
}

/// Parse one line of user input. Blank lines carry no event.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let command = line.trim();
    let event = match command.to_ascii_lowercase().as_str() {
        "" => return None,
        // Ctrl+R arrives as DC2 when the terminal passes it through.
        "r" | "refresh" | "\u{12}" => AppEvent::Refresh,
        "h" | "help" | "?" => AppEvent::Help,
        "q" | "quit" | "exit" => AppEvent::Quit,
        _ => AppEvent::Unknown(command.to_string()),
    };
    Some(event)
}

/// Read commands from `input` until EOF, then report that input is gone.
///
/// Blocking; the binary runs it on a dedicated thread.
///
/// # Arguments
///
/// * `input` - Line-oriented command source, stdin in the binary
/// * `events` - Session channel; reading stops early once it is closed
pub fn read_commands<R: BufRead>(input: R, events: UnboundedSender<AppEvent>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        if let Some(event) = parse_command(&line) {
            if events.send(event).is_err() {
                return;
            }
        }
    }
    let _ = events.send(AppEvent::InputClosed);
}

/// Apply one event. Refreshes are spawned onto the local task set and not
/// awaited, so input keeps flowing while a cycle is in flight.
pub fn dispatch<T, V, S>(event: AppEvent, cycle: &Rc<FetchCycle<T, V, S>>) -> Flow
where
    T: HeadlineTransport + 'static,
    V: View + 'static,
    S: StatusReporter + 'static,
{
    match event {
        AppEvent::Refresh => {
            if cycle.is_busy() {
                debug!("Refresh requested while loading; ignored");
                return Flow::Continue;
            }
            let cycle = Rc::clone(cycle);
            tokio::task::spawn_local(async move { cycle.refresh().await });
        }
        AppEvent::Connectivity(change) => cycle.status().report(change.status_message()),
        AppEvent::Help => print!("{}", HELP),
        AppEvent::Unknown(command) => println!("Unknown command '{}'. Type h for help.", command),
        AppEvent::Quit => return Flow::Exit,
        AppEvent::InputClosed => {
            warn!(busy = cycle.is_busy(), "Input closed; exiting once the current refresh settles");
            return Flow::Drain;
        }
    }
    Flow::Continue
}

/// Resolve once no cycle is in flight.
///
/// Refreshes spawned just before the call get one turn of the local task set
/// to engage the busy flag first.
pub async fn wait_idle<T, V, S>(cycle: &FetchCycle<T, V, S>)
where
    T: HeadlineTransport,
    V: View,
    S: StatusReporter,
{
    tokio::task::yield_now().await;
    while cycle.is_busy() {
        tokio::time::sleep(IDLE_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::connectivity::{LOST_MESSAGE, RESTORED_MESSAGE};
    use crate::error::CycleResult;
    use crate::models::DisplayArticle;
    use crate::request::RequestDescriptor;
    use crate::transport::RawResponse;
    use std::cell::{Cell, RefCell};
    use std::io::Cursor;
    use tokio::sync::{mpsc, Notify};
    use tokio::task::LocalSet;

    struct CountingTransport {
        calls: Rc<Cell<usize>>,
        gate: Option<Rc<Notify>>,
    }

    impl HeadlineTransport for CountingTransport {
        async fn get(&self, _request: &RequestDescriptor) -> CycleResult<RawResponse> {
            self.calls.set(self.calls.get() + 1);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(RawResponse {
                status: 200,
                body: r#"{"status": "ok", "articles": [{"title": "a"}]}"#.to_string(),
            })
        }
    }

    struct SilentView;

    impl View for SilentView {
        fn show_loading(&self) {}
        fn hide_loading(&self) {}
        fn show_error(&self) {}
        fn render(&self, _articles: &[DisplayArticle]) {}
    }

    #[derive(Default)]
    struct RecordingStatus {
        messages: RefCell<Vec<String>>,
    }

    impl StatusReporter for RecordingStatus {
        fn report(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    type TestCycle = FetchCycle<CountingTransport, SilentView, RecordingStatus>;

    fn session(gate: Option<Rc<Notify>>) -> (Rc<TestCycle>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let config = ApiConfig {
            api_key: "test-key".to_string(),
            ..ApiConfig::default()
        };
        let transport = CountingTransport {
            calls: Rc::clone(&calls),
            gate,
        };
        let cycle = FetchCycle::new(config, transport, SilentView, RecordingStatus::default());
        (Rc::new(cycle), calls)
    }

    fn messages(cycle: &TestCycle) -> Vec<String> {
        cycle.status().messages.borrow().clone()
    }

    #[test]
    fn test_dispatch_reports_connectivity_changes() {
        let (cycle, calls) = session(None);

        let flow = dispatch(AppEvent::Connectivity(Connectivity::Offline), &cycle);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(messages(&cycle), vec!["No internet connection"]);

        dispatch(AppEvent::Connectivity(Connectivity::Online), &cycle);
        assert_eq!(messages(&cycle), vec![LOST_MESSAGE, RESTORED_MESSAGE]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_dispatch_quit_exits() {
        let (cycle, _) = session(None);
        assert_eq!(dispatch(AppEvent::Quit, &cycle), Flow::Exit);
    }

    #[tokio::test]
    async fn test_refresh_while_in_flight_sends_one_request() {
        LocalSet::new()
            .run_until(async {
                let gate = Rc::new(Notify::new());
                let (cycle, calls) = session(Some(Rc::clone(&gate)));

                assert_eq!(dispatch(AppEvent::Refresh, &cycle), Flow::Continue);
                for _ in 0..10 {
                    if cycle.is_busy() {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
                assert!(cycle.is_busy());

                assert_eq!(dispatch(AppEvent::Refresh, &cycle), Flow::Continue);
                gate.notify_one();
                wait_idle(&cycle).await;

                assert_eq!(calls.get(), 1);
                let messages = messages(&cycle);
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with("Last updated: "));
            })
            .await;
    }

    #[tokio::test]
    async fn test_input_closed_lets_initial_refresh_finish() {
        LocalSet::new()
            .run_until(async {
                let (cycle, calls) = session(None);

                dispatch(AppEvent::Refresh, &cycle);
                assert_eq!(dispatch(AppEvent::InputClosed, &cycle), Flow::Drain);
                wait_idle(&cycle).await;

                assert_eq!(calls.get(), 1);
                assert!(!cycle.is_busy());
                assert!(messages(&cycle)[0].starts_with("Last updated: "));
            })
            .await;
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("r"), Some(AppEvent::Refresh));
        assert_eq!(parse_command("  Refresh \n"), Some(AppEvent::Refresh));
        assert_eq!(parse_command("\u{12}"), Some(AppEvent::Refresh));
        assert_eq!(parse_command("q"), Some(AppEvent::Quit));
        assert_eq!(parse_command("help"), Some(AppEvent::Help));
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("x"), Some(AppEvent::Unknown("x".to_string())));
    }

    #[test]
    fn test_read_commands_ends_with_input_closed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_commands(Cursor::new("r\n\nbogus\n"), tx);

        assert_eq!(rx.try_recv().unwrap(), AppEvent::Refresh);
        assert_eq!(rx.try_recv().unwrap(), AppEvent::Unknown("bogus".to_string()));
        assert_eq!(rx.try_recv().unwrap(), AppEvent::InputClosed);
        assert!(rx.try_recv().is_err());
    }
}
